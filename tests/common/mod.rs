//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bytes::Bytes;
use http::{Request, Response};
use s3soap::soap::tree::{self, Element};
use s3soap::{Client, ClientOptions, Error, Transport};

pub const ENDPOINT: &str = "https://soap.test/soap";
pub const ACCESS_KEY: &str = "AKIDEXAMPLE";
pub const SECRET_KEY: &str = "secret";

/// A request as the transport saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: http::HeaderMap,
    pub body: String,
}

impl Recorded {
    /// The parsed request envelope
    pub fn envelope(&self) -> Element {
        tree::parse(self.body.as_bytes()).expect("request body is well-formed XML")
    }

    /// The operation element inside `Body`
    pub fn operation(&self) -> Element {
        self.envelope()
            .find("Body")
            .and_then(|body| body.children.first().cloned())
            .expect("Body has an operation element")
    }

    /// Names of the operation's parameters, in order
    pub fn param_names(&self) -> Vec<String> {
        self.operation()
            .children
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.operation().child_text(name).map(str::to_string)
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<(u16, String)>,
    requests: Vec<Recorded>,
}

/// Handle kept by the test to script replies and read recorded requests
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Script>>);

impl Recorder {
    pub fn reply(&self, body: impl Into<String>) -> &Self {
        self.reply_with_status(200, body)
    }

    pub fn reply_with_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.0.borrow_mut().replies.push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.0.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.0.borrow().requests.len()
    }

    pub fn last(&self) -> Recorded {
        self.0
            .borrow()
            .requests
            .last()
            .cloned()
            .expect("at least one request was sent")
    }
}

pub struct MockTransport {
    script: Recorder,
}

impl Transport for MockTransport {
    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    fn send(&self, request: Request<Bytes>) -> s3soap::Result<Response<Bytes>> {
        let mut script = self.script.0.borrow_mut();
        script.requests.push(Recorded {
            headers: request.headers().clone(),
            body: String::from_utf8_lossy(request.body()).into_owned(),
        });

        let (status, body) = script
            .replies
            .pop_front()
            .ok_or_else(|| Error::Transport("connection refused".to_string()))?;

        Ok(Response::builder()
            .status(status)
            .header("content-type", "text/xml")
            .body(Bytes::from(body))?)
    }
}

/// Cloneable in-memory writer for capturing debug output
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A client over a fresh mock transport
pub fn client(options: ClientOptions) -> (Client, Recorder) {
    let recorder = Recorder::default();
    let transport = MockTransport {
        script: recorder.clone(),
    };
    let client = Client::with_transport(
        ACCESS_KEY.to_string(),
        SECRET_KEY.to_string(),
        options,
        transport,
    );
    (client, recorder)
}

/// Wrap `body` in a response envelope
pub fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<soapenv:Body>{}</soapenv:Body>
</soapenv:Envelope>"#,
        body
    )
}

/// Successful reply to `operation` carrying `payload`
pub fn ok(operation: &str, payload: &str) -> String {
    envelope(&format!(
        r#"<{op}Response xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><{op}Response>{payload}</{op}Response></{op}Response>"#,
        op = operation,
        payload = payload
    ))
}

/// Fault reply
pub fn fault(code: &str, message: &str) -> String {
    envelope(&format!(
        "<soapenv:Fault><faultcode>soapenv:Client.{}</faultcode><faultstring>{}</faultstring></soapenv:Fault>",
        code, message
    ))
}
