//! SOAP request/response pipeline
//!
//! This module provides:
//! - Operation signing (HMAC-SHA1 over operation name and timestamp)
//! - Envelope construction from nested parameter lists
//! - Response parsing and fault extraction

pub mod envelope;
pub mod response;
pub mod signer;
pub mod tree;
pub mod value;

pub use envelope::{build_envelope, S3_NS};
pub use response::{Fault, Response};
pub use signer::SoapSigner;
pub use tree::Element;
pub use value::{Params, Value};
