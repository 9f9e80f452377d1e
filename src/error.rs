//! Error type shared by every layer of the client

use crate::soap::Fault;
use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum Error {
    /// The service answered with a SOAP fault and raise-on-error is enabled
    #[error("SOAP fault: {0}")]
    Fault(Fault),

    #[error("invalid argument '{value}': expected one of {}", .valid.join(", "))]
    InvalidArgument {
        value: String,
        valid: &'static [&'static str],
    },

    /// Operation or parameter name that is not a valid XML element name
    #[error("invalid element name '{0}'")]
    InvalidName(String),

    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] std::io::Error),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Error::Transport(format!("Client error: {}", err))
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
