//! reqwest-backed [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use pollen_common::error::{PollenError, PollenResult};
use pollen_common::traits::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Production transport: one pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport without a request timeout.
    pub fn new() -> PollenResult<Self> {
        Self::build(None)
    }

    /// Transport that aborts requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> PollenResult<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> PollenResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PollenError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> PollenResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http.request(to_reqwest_method(method), &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| PollenError::Network(format!("{method} {url} failed: {e}")))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp
            .bytes()
            .await
            .map_err(|e| PollenError::Network(format!("Reading body of {url} failed: {e}")))?
            .to_vec();

        debug!(%method, %url, status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
