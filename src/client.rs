//! SOAP client: signing, dispatch and fault bookkeeping
//!
//! Every remote call goes through [`Client::invoke`]:
//! 1. the signer appends `AWSAccessKeyId`, `Timestamp` and `Signature`
//! 2. the parameters are wrapped in a SOAP envelope
//! 3. the transport posts it to the endpoint
//! 4. the reply is parsed and its fault (if any) recorded on the client
//!
//! The client is single-session state: the last fault and the debug /
//! raise-error flags live in `Cell`/`RefCell`, so handles can borrow the
//! client while flags change, but the client is not `Sync`.

use std::cell::{Cell, RefCell};
use std::io::Write;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{Method, Request};
use tracing::{debug, error, warn};

use crate::bucket::Bucket;
use crate::error::{Error, Result};
use crate::soap::{build_envelope, Fault, Params, Response, SoapSigner, S3_NS};
use crate::transport::{self, HttpsTransport, Transport, TransportConfig};
use crate::types::BucketSummary;

/// Construction-time switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Print request, response headers and tidied reply to stderr
    pub debug: bool,
    /// Turn a fault in any reply into `Err(Error::Fault)`
    pub raise_error: bool,
}

/// Client for the S3 SOAP interface
pub struct Client {
    signer: SoapSigner,
    transport: Box<dyn Transport>,
    /// Headers sent with every request of this session
    session_headers: HeaderMap,
    debug: Cell<bool>,
    /// Destination of debug-mode traces, stderr by default
    debug_output: RefCell<Box<dyn Write>>,
    raise_error: Cell<bool>,
    last_fault: RefCell<Option<Fault>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("signer", &self.signer)
            .field("endpoint", &self.transport.endpoint())
            .field("debug", &self.debug.get())
            .field("raise_error", &self.raise_error.get())
            .field("last_fault", &self.last_fault.borrow())
            .finish()
    }
}

impl Client {
    /// Create a client talking HTTPS to the default endpoint
    pub fn new(access_key: String, secret_key: String, options: ClientOptions) -> Result<Self> {
        Self::with_config(access_key, secret_key, options, TransportConfig::default())
    }

    /// Create a client with explicit transport settings
    pub fn with_config(
        access_key: String,
        secret_key: String,
        options: ClientOptions,
        config: TransportConfig,
    ) -> Result<Self> {
        let transport = HttpsTransport::new(config)?;
        Ok(Self::with_transport(access_key, secret_key, options, transport))
    }

    /// Create a client over any transport
    pub fn with_transport<T: Transport + 'static>(
        access_key: String,
        secret_key: String,
        options: ClientOptions,
        transport: T,
    ) -> Self {
        let mut session_headers = HeaderMap::new();
        session_headers.insert(ACCEPT, HeaderValue::from_static("text/xml"));

        Self {
            signer: SoapSigner::new(access_key, secret_key),
            transport: Box::new(transport),
            session_headers,
            debug: Cell::new(options.debug),
            debug_output: RefCell::new(Box::new(std::io::stderr())),
            raise_error: Cell::new(options.raise_error),
            last_fault: RefCell::new(None),
        }
    }

    pub fn access_key(&self) -> &str {
        self.signer.access_key()
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn debug(&self) -> bool {
        self.debug.get()
    }

    pub fn set_debug(&self, debug: bool) {
        self.debug.set(debug);
    }

    /// Send debug-mode traces to `out` instead of stderr
    pub fn set_debug_output(&self, out: impl Write + 'static) {
        *self.debug_output.borrow_mut() = Box::new(out);
    }

    pub fn raise_error(&self) -> bool {
        self.raise_error.get()
    }

    pub fn set_raise_error(&self, raise_error: bool) {
        self.raise_error.set(raise_error);
    }

    /// Fault of the most recent call, `None` if it succeeded
    ///
    /// Overwritten by every call; read it before issuing the next one.
    pub fn last_fault(&self) -> Option<Fault> {
        self.last_fault.borrow().clone()
    }

    pub fn has_fault(&self) -> bool {
        self.last_fault.borrow().is_some()
    }

    /// Invoke any operation the service supports
    ///
    /// `operation` is used verbatim as the SOAP operation name. The reply is
    /// returned even when it carries a fault, unless raise-error is on.
    pub fn invoke(&self, operation: &str, mut params: Params) -> Result<Response> {
        self.signer.append_auth(&mut params, operation);
        let body = build_envelope(operation, &params)?;
        let request = self.build_request(operation, body)?;

        debug!(operation = %operation, endpoint = %self.transport.endpoint(), "invoking SOAP operation");
        if self.debug.get() {
            self.debug_print("SOAP Request", &transport::describe_request(&request));
        }

        let reply = self.transport.send(request)?;

        if self.debug.get() {
            self.debug_print("SOAP Response Headers", &transport::describe_response_head(&reply));
        }

        let status = reply.status();
        let response = Response::parse(operation, reply.into_body())?;

        if self.debug.get() {
            self.debug_print("SOAP Response", &response.tidy());
        }

        *self.last_fault.borrow_mut() = response.fault().cloned();

        if let Some(fault) = response.fault() {
            if self.raise_error.get() {
                error!(operation = %operation, code = %fault.code, "SOAP fault");
                eprint!("{}", fault.dump());
                return Err(Error::Fault(fault.clone()));
            }
            warn!(
                operation = %operation,
                status = %status,
                code = %fault.code,
                message = %fault.message,
                "SOAP fault recorded"
            );
        }

        Ok(response)
    }

    /// Write one titled section of debug output; write failures only log
    fn debug_print(&self, title: &str, body: &str) {
        let mut out = self.debug_output.borrow_mut();
        if let Err(e) = writeln!(out, "=== {} ===\n{}", title, body).and_then(|_| out.flush()) {
            warn!(error = %e, "failed to write debug output");
        }
    }

    fn build_request(&self, operation: &str, body: Vec<u8>) -> Result<Request<Bytes>> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(self.transport.endpoint())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}#{}\"", S3_NS, operation))
            .body(Bytes::from(body))?;

        for (name, value) in &self.session_headers {
            request.headers_mut().insert(name.clone(), value.clone());
        }
        Ok(request)
    }

    /// All buckets owned by the account, in reply order
    pub fn list_buckets(&self) -> Result<Vec<Bucket<'_>>> {
        let response = self.invoke("ListAllMyBuckets", Params::new())?;
        Ok(response
            .result_all("Buckets/Bucket")
            .into_iter()
            .map(|b| Bucket::new(self, b.child_text("Name").unwrap_or_default()))
            .collect())
    }

    /// Name and creation date of every bucket owned by the account
    pub fn list_bucket_summaries(&self) -> Result<Vec<BucketSummary>> {
        let response = self.invoke("ListAllMyBuckets", Params::new())?;
        Ok(response
            .result_all("Buckets/Bucket")
            .into_iter()
            .map(BucketSummary::from_element)
            .collect())
    }

    /// Create a bucket; `None` if the service answered with a fault
    pub fn create_bucket(&self, name: &str) -> Result<Option<Bucket<'_>>> {
        let response = self.invoke("CreateBucket", Params::new().with("Bucket", name))?;
        if response.is_fault() {
            return Ok(None);
        }
        Ok(Some(Bucket::new(self, name)))
    }

    /// Handle for an existing bucket. No network call.
    pub fn bucket(&self, name: &str) -> Bucket<'_> {
        Bucket::new(self, name)
    }
}
