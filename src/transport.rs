//! HTTP transport for SOAP requests
//!
//! The client only needs "send these bytes, give me the reply". [`Transport`]
//! is that seam; [`HttpsTransport`] implements it with hyper and a private
//! current-thread tokio runtime, so callers stay fully synchronous.
//!
//! HTTP settings:
//! - HTTP/1.1 only
//! - TCP_NODELAY, 10s connect timeout
//! - native-tls (OpenSSL) for TLS
//! - whole-request timeout from [`TransportConfig::timeout`]

use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use native_tls::TlsConnector;

use crate::error::{Error, Result};

/// Default SOAP endpoint of the storage service
pub const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com/soap";

/// Sends a fully built request and returns the raw reply
pub trait Transport {
    /// URL every request is posted to
    fn endpoint(&self) -> &str;

    /// Send `request` and collect the whole reply body
    ///
    /// Non-2xx statuses are returned as responses, not errors; SOAP faults
    /// arrive with status 500.
    fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }

    fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        (**self).send(request)
    }
}

/// Settings for [`HttpsTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub endpoint: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Skip certificate and hostname verification
    pub insecure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(300),
            insecure: false,
        }
    }
}

/// Blocking HTTPS transport backed by hyper
pub struct HttpsTransport {
    client: HyperClient<HttpsConnector<HttpConnector>, Full<Bytes>>,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpsTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpsTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut http = HttpConnector::new();
        http.set_nodelay(true);
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(10)));

        let tls = if config.insecure {
            tracing::warn!("INSECURE TLS MODE ENABLED: Certificate verification is disabled!");
            TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
        } else {
            TlsConnector::new()
        }
        .map_err(|e| Error::Transport(format!("Failed to build TLS connector: {}", e)))?;

        let https = HttpsConnector::from((http, tls.into()));

        let client = HyperClient::builder(TokioExecutor::new())
            .set_host(true)
            .build(https);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Transport(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            client,
            runtime,
            endpoint: config.endpoint,
            timeout: config.timeout,
        })
    }

    async fn send_async(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, Full::new(body));

        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(Response::from_parts(parts, body))
    }
}

impl Transport for HttpsTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let timeout = self.timeout;
        self.runtime.block_on(async {
            tokio::time::timeout(timeout, self.send_async(request))
                .await
                .map_err(|_| Error::Timeout(timeout))?
        })
    }
}

/// Render a request the way it goes over the wire, for debug output
pub fn describe_request(request: &Request<Bytes>) -> String {
    let mut out = String::with_capacity(request.body().len() + 256);
    out.push_str(request.method().as_str());
    out.push(' ');
    out.push_str(&request.uri().to_string());
    out.push_str(" HTTP/1.1\n");
    out.push_str(&describe_headers(request.headers()));
    out.push_str(&format!("Content-Length: {}\n\n", request.body().len()));
    out.push_str(&String::from_utf8_lossy(request.body()));
    out
}

/// Status line and headers of a response, for debug output
pub fn describe_response_head(response: &Response<Bytes>) -> String {
    let mut out = format!("HTTP/1.1 {}\n", response.status());
    out.push_str(&describe_headers(response.headers()));
    out
}

fn describe_headers(headers: &http::HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(!config.insecure);
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpsTransport::new(TransportConfig {
            endpoint: "https://localhost:8443/soap".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(transport.endpoint(), "https://localhost:8443/soap");
    }

    #[test]
    fn test_describe_request() {
        let request = Request::post("https://s3.amazonaws.com/soap")
            .header("accept", "text/xml")
            .body(Bytes::from_static(b"<x/>"))
            .unwrap();
        let text = describe_request(&request);

        assert!(text.starts_with("POST https://s3.amazonaws.com/soap HTTP/1.1\n"));
        assert!(text.contains("accept: text/xml\n"));
        assert!(text.contains("Content-Length: 4\n\n<x/>"));
    }

    #[test]
    fn test_describe_response_head() {
        let response = Response::builder()
            .status(500)
            .header("content-type", "text/xml")
            .body(Bytes::new())
            .unwrap();
        let text = describe_response_head(&response);
        assert!(text.starts_with("HTTP/1.1 500 Internal Server Error\n"));
        assert!(text.contains("content-type: text/xml"));
    }
}
