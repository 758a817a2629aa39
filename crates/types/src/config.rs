use serde::{Deserialize, Serialize};

use pollen_common::constants::DEFAULT_API_URL;
use pollen_common::types::RenderMode;

// ═══════════════════════════════════════════════════════════════════════
//  APP CONFIG: top-level, stored at ~/.pollen/config.toml
// ═══════════════════════════════════════════════════════════════════════

/// Top-level configuration stored in `$HOME/.pollen/config.toml`.
///
/// ```toml
/// [api]
/// url = "http://localhost:8000"
/// # timeout_secs = 30
///
/// [system]
/// verbose = false
/// mode = "spa"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Local behaviour (logging, front-end mode).
    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub url: String,

    /// Per-request timeout. Unset means requests wait indefinitely,
    /// which matches the backend contract (no client-side timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Enable verbose tracing output.
    #[serde(default)]
    pub verbose: bool,

    /// Front-end build mode the route table is generated for.
    #[serde(default)]
    pub mode: RenderMode,
}

impl AppConfig {
    /// Serialize to a TOML string for writing to disk.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Base URL with `override_url` (env / flag) taking precedence.
    pub fn effective_url<'a>(&'a self, override_url: Option<&'a str>) -> &'a str {
        override_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.api.url)
    }
}
