//! Pollen backend API client.
//!
//! Every call maps to one HTTP request against the configured base URL:
//!
//! | Method | Request |
//! |---|---|
//! | [`fetch_genera`](ApiClient::fetch_genera) | `GET /genera` |
//! | [`get_recent`](ApiClient::get_recent) | `GET /recent?num_days=365&genus=..` |
//! | [`get_recent_raw`](ApiClient::get_recent_raw) | `GET /recent?num_days=5` |
//! | [`get_between`](ApiClient::get_between) | `GET /between/{from}/{to}?genus=..` |
//! | [`get_heatmap`](ApiClient::get_heatmap) | `GET /heatmap/{genus}` |
//! | [`get_lineplot`](ApiClient::get_lineplot) | `GET /graph/lineplot/{genus}` |
//! | [`login`](ApiClient::login) | `POST /auth` |
//! | [`upload`](ApiClient::upload) | `GET /upload` (authorized) |
//!
//! Nothing is retried, cached or timed out here; failures go straight
//! back to the caller.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use pollen_common::constants::*;
use pollen_common::error::{PollenError, PollenResult};
use pollen_common::traits::{HttpRequest, HttpResponse, HttpTransport};
use pollen_common::types::{
    Credentials, GenusMap, Heatmap, Language, Lineplot, MediaType, PlotlySeries,
    SUPPORTED_LANGUAGES,
};

use crate::heatmap::heatmap_from_wire;
use crate::transport::ReqwestTransport;

/// Client for the pollen/spore backend.
///
/// The session token sits behind a lock so [`set_token`](Self::set_token)
/// works through a shared reference. Authorized requests copy the token
/// when they are built; a later `set_token` never alters a request that
/// is already in flight.
pub struct ApiClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    base: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient<ReqwestTransport> {
    /// Client without a token, using the default reqwest transport.
    pub fn new(base_url: &str) -> PollenResult<Self> {
        Self::with_token(base_url, None)
    }

    /// Client seeded with an existing session token.
    pub fn with_token(base_url: &str, token: Option<String>) -> PollenResult<Self> {
        Self::with_transport(ReqwestTransport::new()?, base_url, token)
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Client over any transport.
    pub fn with_transport(transport: T, base_url: &str, token: Option<String>) -> PollenResult<Self> {
        let base = parse_base_url(base_url)?;
        info!(url = %base, "API client initialized");
        Ok(Self {
            transport,
            base,
            token: RwLock::new(token),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current session token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store the token used by subsequent authorized requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    // ── Read endpoints ──────────────────────────────────────────────

    /// All genera the backend knows about, as returned.
    pub async fn fetch_genera(&self) -> PollenResult<Value> {
        self.get_json(&["genera"], &[], None).await
    }

    /// Last year of counts for `genus`, as one plotly trace.
    ///
    /// `None` when the backend has no entry for `genus`.
    pub async fn get_recent(&self, genus: &str) -> PollenResult<Option<Value>> {
        let days = RECENT_NUM_DAYS.to_string();
        self.get_keyed(
            &["recent"],
            &[("num_days", days.as_str()), ("genus", genus)],
            Some(MediaType::Plotly),
            genus,
        )
        .await
    }

    /// Last few days for every genus, as plain JSON.
    pub async fn get_recent_raw(&self) -> PollenResult<Value> {
        let days = RECENT_RAW_NUM_DAYS.to_string();
        self.get_json(&["recent"], &[("num_days", days.as_str())], Some(MediaType::Json))
            .await
    }

    /// Counts for `genus` between two dates (inclusive, as the backend
    /// defines it). `from <= to` is not checked here.
    pub async fn get_between(
        &self,
        genus: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PollenResult<Option<Value>> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        self.get_keyed(
            &["between", from.as_str(), to.as_str()],
            &[("genus", genus)],
            Some(MediaType::Plotly),
            genus,
        )
        .await
    }

    /// [`get_recent`](Self::get_recent) decoded as a [`PlotlySeries`].
    pub async fn get_recent_series(&self, genus: &str) -> PollenResult<Option<PlotlySeries>> {
        decode_series(self.get_recent(genus).await?, "/recent")
    }

    /// [`get_between`](Self::get_between) decoded as a [`PlotlySeries`].
    pub async fn get_between_series(
        &self,
        genus: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PollenResult<Option<PlotlySeries>> {
        decode_series(self.get_between(genus, from, to).await?, "/between")
    }

    /// Historical heatmap for `genus` with missing cells restored to NaN.
    pub async fn get_heatmap(&self, genus: &str) -> PollenResult<Heatmap> {
        let url = self.endpoint(&["heatmap", genus], &[])?;
        let response = self.execute(HttpRequest::get(url.as_str())).await?;
        let body: Value = response.json(url.path())?;
        heatmap_from_wire(body, url.path())
    }

    /// Rendered line plot image for `genus`.
    pub async fn get_lineplot(&self, genus: &str) -> PollenResult<Lineplot> {
        let url = self.endpoint(&["graph", "lineplot", genus], &[])?;
        let response = self.execute(HttpRequest::get(url.as_str())).await?;
        if !response.is_success() {
            return Err(PollenError::Status {
                status: response.status,
                endpoint: url.path().to_string(),
            });
        }
        Ok(Lineplot {
            content_type: response.content_type,
            data: response.body,
        })
    }

    /// UI languages. Local constant, no request.
    pub fn supported_languages(&self) -> Vec<Language> {
        SUPPORTED_LANGUAGES.to_vec()
    }

    // ── Auth ────────────────────────────────────────────────────────

    /// Exchange credentials for a session token.
    ///
    /// Does not store the token; call [`set_token`](Self::set_token).
    pub async fn login(&self, username: &str, password: &str) -> PollenResult<String> {
        let url = self.endpoint(&["auth"], &[])?;
        let request = HttpRequest::post(url.as_str())
            .header(HEADER_CONTENT_TYPE, MediaType::Json.as_str())
            .json_body(&Credentials { username, password })?;

        let response = self.execute(request).await?;
        let body: Value = response.json(url.path())?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| PollenError::MissingField("token".into()))?;

        info!(username, "login succeeded");
        Ok(token)
    }

    /// Authorized call to the upload endpoint.
    ///
    /// A 401 becomes [`PollenError::Unauthorized`] whatever the body says;
    /// any other status is decoded as JSON.
    pub async fn upload(&self, file: &Path) -> PollenResult<Value> {
        let url = self.endpoint(&["upload"], &[])?;
        let mut request = HttpRequest::get(url.as_str());
        match self.token() {
            Some(token) => {
                request = request.header(HEADER_AUTHORIZATION, format!("{AUTH_SCHEME} {token}"));
            }
            None => warn!("upload without a session token"),
        }
        debug!(file = %file.display(), "upload");

        let response = self.execute(request).await?;
        if response.status == 401 {
            return Err(PollenError::Unauthorized);
        }
        response.json(url.path())
    }

    // ── Plumbing ────────────────────────────────────────────────────

    /// Base URL + path segments + query, percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> PollenResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| PollenError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(&self, request: HttpRequest) -> PollenResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "request");
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, %url, "non-success response");
        }
        Ok(response)
    }

    /// GET a JSON endpoint, optionally with an `Accept` header.
    async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        accept: Option<MediaType>,
    ) -> PollenResult<Value> {
        let url = self.endpoint(segments, query)?;
        let mut request = HttpRequest::get(url.as_str());
        if let Some(accept) = accept {
            request = request.header(HEADER_ACCEPT, accept.as_str());
        }
        self.execute(request).await?.json(url.path())
    }

    /// GET a genus-keyed JSON endpoint and pick out `genus`.
    async fn get_keyed(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        accept: Option<MediaType>,
        genus: &str,
    ) -> PollenResult<Option<Value>> {
        let body = self.get_json(segments, query, accept).await?;
        Ok(GenusMap::from_value(body).take(genus))
    }
}

/// Whether the backend accepts `path` as an upload (by extension).
pub fn is_allowed_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .is_some_and(|ext| UPLOAD_EXTENSIONS.contains(&ext.as_str()))
}

/// Parse and normalise a backend base URL. Any query or fragment is
/// dropped; endpoints carry their own query.
pub fn parse_base_url(raw: &str) -> PollenResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let mut url =
        Url::parse(trimmed).map_err(|e| PollenError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(PollenError::InvalidUrl(raw.to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn decode_series(entry: Option<Value>, endpoint: &str) -> PollenResult<Option<PlotlySeries>> {
    entry
        .map(|v| {
            serde_json::from_value(v).map_err(|e| PollenError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}
