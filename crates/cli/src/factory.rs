//! Client factory: resolves the backend URL and render mode from config,
//! environment and flags, then builds a client seeded with the stored
//! session token.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use pollen_common::constants::{ENV_API_URL, ENV_RENDER_MODE};
use pollen_common::error::{PollenError, PollenResult};
use pollen_common::types::RenderMode;
use pollen_core::config::AppConfig;
use pollen_core::{ApiClient, ReqwestTransport, TokenStore};

/// Everything a command needs to know about where it talks to.
pub struct Context {
    pub config: AppConfig,
    pub api_url: String,
}

impl Context {
    /// Precedence for the URL: `--url`, then `POLLEN_API_URL`, then config.
    pub fn new(config: AppConfig, url_flag: Option<String>) -> Self {
        let env_url = std::env::var(ENV_API_URL).ok();
        let api_url = resolve_url(&config, url_flag.as_deref(), env_url.as_deref());
        Self { config, api_url }
    }

    pub fn token_store(&self) -> TokenStore {
        TokenStore::for_url(&self.api_url)
    }

    /// Build a client, seeded with the stored token when there is one.
    pub fn client(&self) -> Result<ApiClient> {
        let transport = match self.config.api.timeout_secs {
            Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
            None => ReqwestTransport::new()?,
        };
        let client = ApiClient::with_transport(transport, &self.api_url, None)?;

        match self.token_store().load() {
            Ok(Some(token)) => {
                debug!("using stored session token");
                client.set_token(token);
            }
            Ok(None) => {}
            Err(e) => warn!("could not read stored session token: {e}"),
        }
        Ok(client)
    }

    /// Render mode: `--mode`, then `MODE`, then config.
    pub fn mode(&self, flag: Option<&str>) -> PollenResult<RenderMode> {
        let env_mode = std::env::var(ENV_RENDER_MODE).ok();
        resolve_mode(&self.config, flag, env_mode.as_deref())
    }
}

pub fn resolve_url(config: &AppConfig, flag: Option<&str>, env: Option<&str>) -> String {
    let override_url = flag
        .filter(|u| !u.trim().is_empty())
        .or(env.filter(|u| !u.trim().is_empty()));
    config.effective_url(override_url).trim().to_string()
}

pub fn resolve_mode(
    config: &AppConfig,
    flag: Option<&str>,
    env: Option<&str>,
) -> PollenResult<RenderMode> {
    match flag.or(env).filter(|m| !m.trim().is_empty()) {
        Some(raw) => parse_mode(raw),
        None => Ok(config.system.mode),
    }
}

pub fn parse_mode(raw: &str) -> PollenResult<RenderMode> {
    raw.parse().map_err(PollenError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_precedence() {
        let mut config = AppConfig::default();
        config.api.url = "http://config:8000".into();

        assert_eq!(resolve_url(&config, None, None), "http://config:8000");
        assert_eq!(resolve_url(&config, None, Some("http://env:8000")), "http://env:8000");
        assert_eq!(
            resolve_url(&config, Some("http://flag:8000"), Some("http://env:8000")),
            "http://flag:8000"
        );
        assert_eq!(resolve_url(&config, Some(" "), Some("")), "http://config:8000");
    }

    #[test]
    fn test_mode_precedence() {
        let mut config = AppConfig::default();
        config.system.mode = RenderMode::Pwa;

        assert_eq!(resolve_mode(&config, None, None).unwrap(), RenderMode::Pwa);
        assert_eq!(resolve_mode(&config, None, Some("ssr")).unwrap(), RenderMode::Ssr);
        assert_eq!(resolve_mode(&config, Some("spa"), Some("ssr")).unwrap(), RenderMode::Spa);
        assert_eq!(resolve_mode(&config, None, Some("")).unwrap(), RenderMode::Pwa);
        let err = resolve_mode(&config, Some("desktop"), None).unwrap_err();
        assert!(matches!(err, PollenError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
