//! SOAP 1.1 envelope builder
//!
//! Produces the request body for one operation:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <soap:Envelope xmlns:soap="..." ...>
//!   <soap:Body>
//!     <CreateBucket xmlns="http://s3.amazonaws.com/doc/2006-03-01/" xsi:nillable="true">
//!       <Bucket>test-bucket</Bucket>
//!       ...
//!     </CreateBucket>
//!   </soap:Body>
//! </soap:Envelope>
//! ```
//!
//! The writer indents by two spaces, so output for a given parameter list is
//! byte-for-byte stable.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::soap::{Params, Value};

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";
pub const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
pub const WSDL_SOAP_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace of the storage service operations
pub const S3_NS: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

const INDENT_SIZE: usize = 2;

/// Build the complete envelope for `operation` with `params` as its children
pub fn build_envelope(operation: &str, params: &Params) -> Result<Vec<u8>> {
    check_name(operation)?;
    let mut writer = Writer::new_with_indent(Vec::with_capacity(1024), b' ', INDENT_SIZE);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let envelope = BytesStart::new("soap:Envelope").with_attributes([
        ("xmlns:soap", SOAP_ENVELOPE_NS),
        ("xmlns:soapenc", SOAP_ENCODING_NS),
        ("xmlns:wsdl", WSDL_NS),
        ("xmlns:wsdlsoap", WSDL_SOAP_NS),
        ("xmlns:xsd", XSD_NS),
        ("xmlns:xsi", XSI_NS),
        ("xmlns:tns", S3_NS),
    ]);
    writer.write_event(Event::Start(envelope))?;
    writer.write_event(Event::Start(BytesStart::new("soap:Body")))?;

    let body = BytesStart::new(operation)
        .with_attributes([("xmlns", S3_NS), ("xsi:nillable", "true")]);
    if params.is_empty() {
        writer.write_event(Event::Empty(body))?;
    } else {
        writer.write_event(Event::Start(body))?;
        write_params(&mut writer, params)?;
        writer.write_event(Event::End(BytesEnd::new(operation)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("soap:Body")))?;
    writer.write_event(Event::End(BytesEnd::new("soap:Envelope")))?;

    Ok(writer.into_inner())
}

/// Write each parameter as a child element, recursing into nested lists
fn write_params<W: Write>(writer: &mut Writer<W>, params: &Params) -> Result<()> {
    for (name, value) in params.iter() {
        check_name(name)?;
        match value {
            Value::Scalar(text) if text.is_empty() => {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            }
            Value::Scalar(text) => {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Value::List(children) if children.is_empty() => {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            }
            Value::List(children) => {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                write_params(writer, children)?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }
    Ok(())
}

/// Element names are unprefixed: a letter or `_`, then letters, digits,
/// `-`, `_` or `.`
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(operation: &str, params: &Params) -> String {
        String::from_utf8(build_envelope(operation, params).unwrap()).unwrap()
    }

    #[test]
    fn test_envelope_declares_namespaces() {
        let xml = build("ListAllMyBuckets", &Params::new());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        for ns in [SOAP_ENVELOPE_NS, SOAP_ENCODING_NS, WSDL_NS, WSDL_SOAP_NS, XSD_NS, XSI_NS, S3_NS] {
            assert!(xml.contains(ns), "missing namespace {}", ns);
        }
        assert!(xml.contains(
            "<ListAllMyBuckets xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\" xsi:nillable=\"true\"/>"
        ));
    }

    #[test]
    fn test_scalar_params_are_indented_children() {
        let params = Params::new().with("Bucket", "test-bucket");
        let xml = build("CreateBucket", &params);

        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\" \
xmlns:soapenc=\"http://schemas.xmlsoap.org/soap/encoding/\" \
xmlns:wsdl=\"http://schemas.xmlsoap.org/wsdl/\" \
xmlns:wsdlsoap=\"http://schemas.xmlsoap.org/wsdl/soap/\" \
xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
xmlns:tns=\"http://s3.amazonaws.com/doc/2006-03-01/\">
  <soap:Body>
    <CreateBucket xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\" xsi:nillable=\"true\">
      <Bucket>test-bucket</Bucket>
    </CreateBucket>
  </soap:Body>
</soap:Envelope>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_nested_lists_preserve_depth_and_order() {
        let grant = Params::new()
            .with("Grantee", Params::new().with("URI", "http://example.com/all"))
            .with("Permission", "READ");
        let params = Params::new()
            .with("Bucket", "b")
            .with("Key", "k")
            .with("AccessControlList", Params::new().with("Grant", grant))
            .with("Tail", "t");
        let xml = build("SetObjectAccessControlPolicy", &params);

        let positions: Vec<usize> = [
            "<Bucket>b</Bucket>",
            "<Key>k</Key>",
            "<AccessControlList>",
            "<Grant>",
            "<Grantee>",
            "<URI>http://example.com/all</URI>",
            "</Grantee>",
            "<Permission>READ</Permission>",
            "</Grant>",
            "</AccessControlList>",
            "<Tail>t</Tail>",
        ]
        .iter()
        .map(|needle| xml.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        // depth shows up as indentation
        assert!(xml.contains("\n            <URI>http://example.com/all</URI>"));
    }

    #[test]
    fn test_empty_list_is_self_closing() {
        let params = Params::new().with("AccessControlList", Params::new());
        let xml = build("SetObjectAccessControlPolicy", &params);
        assert!(xml.contains("<AccessControlList/>"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for op in ["", "Get Object", "1Op", "a<b", "soap:Body"] {
            assert!(
                matches!(build_envelope(op, &Params::new()), Err(Error::InvalidName(ref n)) if n == op),
                "accepted {:?}",
                op
            );
        }
        let nested = Params::new().with("Grant", Params::new().with("Bad Name", "x"));
        assert!(matches!(
            build_envelope("SetObjectAccessControlPolicy", &nested),
            Err(Error::InvalidName(_))
        ));
        assert!(build_envelope("x-amz_op.v2", &Params::new().with("_Key", "k")).is_ok());
    }

    #[test]
    fn test_text_is_escaped() {
        let params = Params::new().with("Key", "a<b&c");
        let xml = build("DeleteObject", &params);
        assert!(xml.contains("<Key>a&lt;b&amp;c</Key>"));
    }
}
