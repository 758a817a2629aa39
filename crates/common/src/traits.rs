//! Transport trait: the seam between the API client and the network.
//!
//! The client builds a complete [`HttpRequest`] (URL, headers, body) and
//! hands it to an [`HttpTransport`]. Production code plugs in a reqwest
//! backed transport; tests plug in an in-memory one.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PollenError, PollenResult};

/// HTTP methods the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A fully-built outgoing request.
///
/// Headers are fixed at construction; nothing the client does after
/// handing the request to a transport can change them.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(url)
        }
    }

    /// Append a header.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json_body<T: Serialize>(mut self, body: &T) -> PollenResult<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| PollenError::Other(format!("Serialize request body: {e}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response. Status codes are not interpreted here.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON. `endpoint` only feeds the error message.
    pub fn json<T: DeserializeOwned>(&self, endpoint: &str) -> PollenResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| PollenError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

/// Performs HTTP exchanges on behalf of the client.
///
/// Implementations report only transport-level failures as errors;
/// any response that arrives, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> PollenResult<HttpResponse>;
}
