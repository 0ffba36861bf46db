//! HTTP transport.
//!
//! The `Client` never talks to the network itself. It hands a fully composed
//! `TransportRequest` to a `Transport` and gets a `RawResponse` back; status
//! codes are interpreted later, so a transport only fails when no response
//! was received at all.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, ACCEPT_ENCODING};
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::trace;
use url::Url;

use crate::request::Query;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid proxy settings: {0}")]
    InvalidProxy(String),
    #[error("{0}")]
    Other(String),
}

/// Proxy parameters handed to the transport on every call. All fields empty means "no proxy".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProxySettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxySettings {
    pub fn is_empty(&self) -> bool {
        self.host.is_none()
            && self.port.is_none()
            && self.username.is_none()
            && self.password.is_none()
    }

    fn proxy_url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        Some(match self.port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        })
    }
}

/// A request ready to be sent over the wire
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub query: Query,
    pub headers: HeaderMap,
    /// Serialized JSON payload
    pub body: Option<String>,
    pub proxy: ProxySettings,
}

/// Whatever came back, including error statuses
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests on behalf of the `Client`
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

/// Blocking transport built on `reqwest`.
///
/// One underlying client is kept per distinct proxy configuration and gzip
/// setting. Gzip is negotiated only when the request carries `Accept-Encoding`.
pub struct ReqwestTransport {
    timeout: Option<Duration>,
    clients: Mutex<HashMap<(ProxySettings, bool), Client>>,
}

impl ReqwestTransport {
    pub fn new() -> ReqwestTransport {
        ReqwestTransport {
            timeout: None,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_timeout(timeout: Duration) -> ReqwestTransport {
        ReqwestTransport {
            timeout: Some(timeout),
            ..ReqwestTransport::new()
        }
    }

    fn client_for(&self, proxy: &ProxySettings, gzip: bool) -> Result<Client, TransportError> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| TransportError::Other("transport client pool is poisoned".to_string()))?;

        let key = (proxy.clone(), gzip);
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        let mut builder = Client::builder().gzip(gzip);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        match proxy.proxy_url() {
            None => builder = builder.no_proxy(),
            Some(proxy_url) => {
                trace!("Routing requests through proxy {}", proxy_url);
                let mut reqwest_proxy = reqwest::Proxy::all(&proxy_url)
                    .map_err(|e| TransportError::InvalidProxy(e.to_string()))?;
                if let Some(username) = &proxy.username {
                    reqwest_proxy = reqwest_proxy
                        .basic_auth(username, proxy.password.as_deref().unwrap_or(""));
                }
                builder = builder.proxy(reqwest_proxy);
            }
        }

        let client = builder.build()?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let gzip = request.headers.contains_key(ACCEPT_ENCODING);
        let client = self.client_for(&request.proxy, gzip)?;
        let url = Url::parse(&request.url)?;
        trace!("{} {}", request.method, url);

        let mut builder = client
            .request(request.method, url)
            .headers(request.headers)
            .query(&request.query);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text()?;
        trace!("Received HTTP {} with {} bytes", status, body.len());

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
