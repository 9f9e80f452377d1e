//! SOAP response unwrapping
//!
//! A reply is parsed into an [`Element`] tree rooted at `Envelope`. Paths
//! handed to [`Response::find`] and friends start below the root, so the
//! fault lives at `Body/Fault` and payloads at `Body/<Op>Response/...`.

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::soap::tree::{self, Element};

/// Structured error returned by the service inside a response envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// `faultcode`, e.g. `soapenv:Client.NoSuchBucket`
    pub code: String,
    /// `faultstring`
    pub message: String,
    pub actor: Option<String>,
    /// `detail` subtree, if the service sent one
    pub detail: Option<Element>,
}

impl Fault {
    pub fn from_element(fault: &Element) -> Self {
        Self {
            code: fault.child_text("faultcode").unwrap_or_default().to_string(),
            message: fault
                .child_text("faultstring")
                .unwrap_or_default()
                .to_string(),
            actor: fault.child_text("faultactor").map(str::to_string),
            detail: fault.child("detail").cloned(),
        }
    }

    /// Code without the namespace prefix (`Client.NoSuchBucket`)
    pub fn short_code(&self) -> &str {
        self.code
            .rsplit_once(':')
            .map(|(_, c)| c)
            .unwrap_or(&self.code)
    }

    /// Multi-line human-readable dump
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("SOAP Fault\n");
        out.push_str("  faultcode:   ");
        out.push_str(&self.code);
        out.push('\n');
        out.push_str("  faultstring: ");
        out.push_str(&self.message);
        out.push('\n');
        if let Some(actor) = &self.actor {
            out.push_str("  faultactor:  ");
            out.push_str(actor);
            out.push('\n');
        }
        if let Some(detail) = &self.detail {
            out.push_str("  detail:\n");
            for line in detail.to_pretty_xml().lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Parsed reply to one operation
#[derive(Debug, Clone)]
pub struct Response {
    operation: String,
    raw: Bytes,
    root: Element,
    fault: Option<Fault>,
}

impl Response {
    /// Parse `raw` as the reply to `operation`
    pub fn parse(operation: &str, raw: Bytes) -> Result<Self> {
        let root = tree::parse(&raw)?;
        if root.name != "Envelope" || root.child("Body").is_none() {
            return Err(Error::InvalidResponse(format!(
                "{} reply is not a SOAP envelope (root element '{}')",
                operation, root.name
            )));
        }
        let fault = root.find("Body/Fault").map(Fault::from_element);

        Ok(Self {
            operation: operation.to_string(),
            raw,
            root,
            fault,
        })
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }

    /// Unparsed reply body
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Reply body as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }

    /// The `Envelope` element
    pub fn envelope(&self) -> &Element {
        &self.root
    }

    pub fn find(&self, path: &str) -> Option<&Element> {
        self.root.find(path)
    }

    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        self.root.find_all(path)
    }

    /// Path of the payload element, `Body/<Op>Response/<Op>Response`
    pub fn result_path(&self) -> String {
        format!(
            "Body/{op}Response/{op}Response",
            op = self.operation
        )
    }

    /// The payload element, if present
    pub fn result(&self) -> Option<&Element> {
        self.root.find(&self.result_path())
    }

    /// Elements at `path` below the payload element
    pub fn result_all(&self, path: &str) -> Vec<&Element> {
        match self.result() {
            Some(result) => result.find_all(path),
            None => Vec::new(),
        }
    }

    /// Re-indented copy of the reply
    pub fn tidy(&self) -> String {
        self.root.to_pretty_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
<soapenv:Body>
<soapenv:Fault>
<faultcode>soapenv:Client.BucketNotEmpty</faultcode>
<faultstring>The bucket you tried to delete is not empty</faultstring>
<detail><BucketName>photos</BucketName></detail>
</soapenv:Fault>
</soapenv:Body>
</soapenv:Envelope>"#;

    const OK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
<soapenv:Body>
<CreateBucketResponse xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
<CreateBucketResponse><Bucket>photos</Bucket></CreateBucketResponse>
</CreateBucketResponse>
</soapenv:Body>
</soapenv:Envelope>"#;

    #[test]
    fn test_fault_is_extracted() {
        let resp = Response::parse("DeleteBucket", Bytes::from_static(FAULT.as_bytes())).unwrap();
        let fault = resp.fault().unwrap();

        assert_eq!(fault.code, "soapenv:Client.BucketNotEmpty");
        assert_eq!(fault.short_code(), "Client.BucketNotEmpty");
        assert_eq!(fault.message, "The bucket you tried to delete is not empty");
        assert_eq!(
            fault.detail.as_ref().and_then(|d| d.child_text("BucketName")),
            Some("photos")
        );
    }

    #[test]
    fn test_fault_dump_is_readable() {
        let resp = Response::parse("DeleteBucket", Bytes::from_static(FAULT.as_bytes())).unwrap();
        let dump = resp.fault().unwrap().dump();

        assert!(dump.starts_with("SOAP Fault\n"));
        assert!(dump.contains("faultcode:   soapenv:Client.BucketNotEmpty"));
        assert!(dump.contains("<BucketName>photos</BucketName>"));
    }

    #[test]
    fn test_success_payload_lookup() {
        let resp = Response::parse("CreateBucket", Bytes::from_static(OK.as_bytes())).unwrap();

        assert!(!resp.is_fault());
        assert_eq!(resp.result_path(), "Body/CreateBucketResponse/CreateBucketResponse");
        assert_eq!(resp.result().and_then(|r| r.child_text("Bucket")), Some("photos"));
        assert!(resp.text().contains("CreateBucketResponse"));
    }

    #[test]
    fn test_non_envelope_is_rejected() {
        let err = Response::parse("CreateBucket", Bytes::from_static(b"<Error/>")).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_unparseable_body_is_xml_error() {
        let err = Response::parse("CreateBucket", Bytes::from_static(b"<html><body>")).unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
