//! Error model for the pollen client.
//!
//! Every error carries:
//! - **code**: machine-readable error code (e.g. `UNAUTHORIZED`)
//! - **category**: error class (`auth`, `config`, `network`, `validation`, `system`)
//! - **recoverable**: whether retrying or fixing input can help
//! - **hints**: actionable suggestions for recovery
//!
//! JSON output format:
//! ```json
//! {
//!   "ok": false,
//!   "error": {
//!     "code": "UNAUTHORIZED",
//!     "message": "Authorization failed",
//!     "category": "auth",
//!     "recoverable": true,
//!     "hints": ["Log in again with: pollen login <username>"]
//!   }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Error category. Determines exit code and recovery strategy.
///
/// Exit codes:
/// - `0`: success
/// - `1`: user error (auth, config, validation)
/// - `2`: network error
/// - `3`: system error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Auth,
    Config,
    Network,
    Validation,
    System,
}

impl ErrorCategory {
    /// Process exit code for this category.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Auth => 1,
            ErrorCategory::Config => 1,
            ErrorCategory::Validation => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::System => 3,
        }
    }
}

/// Structured error detail for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

/// Top-level error type for all client operations.
#[derive(Debug, Error)]
pub enum PollenError {
    // ── Auth ─────────────────────────────────────────────────────────
    #[error("Authorization failed")]
    Unauthorized,

    #[error("Keyring error: {0}")]
    Keyring(String),

    // ── Config ───────────────────────────────────────────────────────
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ── Network ─────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Response field '{0}' is missing")]
    MissingField(String),

    #[error("Unsupported upload file: {0}")]
    UnsupportedFile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── System ───────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl PollenError {
    /// Get the structured error detail for JSON output.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            // Auth
            PollenError::Unauthorized => ErrorDetail {
                code: "UNAUTHORIZED".into(),
                message: self.to_string(),
                category: ErrorCategory::Auth,
                recoverable: true,
                hints: vec!["Log in again with: pollen login <username>".into()],
            },
            PollenError::Keyring(msg) => ErrorDetail {
                code: "KEYRING_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::Auth,
                recoverable: false,
                hints: vec!["Check OS keyring service is running".into()],
            },

            // Config
            PollenError::InvalidUrl(url) => ErrorDetail {
                code: "INVALID_URL".into(),
                message: format!("Invalid base URL: {url}"),
                category: ErrorCategory::Config,
                recoverable: true,
                hints: vec!["Run: pollen configure url http://host:port".into()],
            },
            PollenError::Config(msg) => ErrorDetail {
                code: "CONFIG_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::Config,
                recoverable: true,
                hints: vec![],
            },

            // Network
            PollenError::Network(msg) => ErrorDetail {
                code: "NETWORK_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::Network,
                recoverable: true,
                hints: vec![
                    "Check network connectivity".into(),
                    "Check the configured URL: pollen configure show".into(),
                ],
            },

            PollenError::Status { status, endpoint } => ErrorDetail {
                code: "HTTP_STATUS".into(),
                message: format!("HTTP {status} from {endpoint}"),
                category: ErrorCategory::Network,
                recoverable: *status >= 500,
                hints: vec![],
            },

            // Validation
            PollenError::Decode { endpoint, message } => ErrorDetail {
                code: "DECODE_ERROR".into(),
                message: format!("{endpoint}: {message}"),
                category: ErrorCategory::Validation,
                recoverable: false,
                hints: vec![],
            },
            PollenError::MissingField(field) => ErrorDetail {
                code: "MISSING_FIELD".into(),
                message: self.to_string(),
                category: ErrorCategory::Validation,
                recoverable: false,
                hints: if field == "token" {
                    vec!["Check username and password".into()]
                } else {
                    vec![]
                },
            },
            PollenError::UnsupportedFile(msg) => ErrorDetail {
                code: "UNSUPPORTED_FILE".into(),
                message: msg.clone(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec!["Only .csv files are accepted".into()],
            },

            PollenError::InvalidInput(msg) => ErrorDetail {
                code: "INVALID_INPUT".into(),
                message: msg.clone(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec![],
            },

            // System
            PollenError::Io(msg) => ErrorDetail {
                code: "IO_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::System,
                recoverable: false,
                hints: vec![],
            },
            PollenError::Other(msg) => ErrorDetail {
                code: "UNKNOWN_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::System,
                recoverable: false,
                hints: vec![],
            },
        }
    }

    /// Error category shortcut.
    pub fn category(&self) -> ErrorCategory {
        self.detail().category
    }

    /// Exit code: 0 success, 1 user error, 2 network, 3 system.
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// Serialize this error as the JSON error envelope.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "error": self.detail(),
        })
    }
}

pub type PollenResult<T> = Result<T, PollenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detail() {
        let err = PollenError::Unauthorized;
        assert_eq!(err.to_string(), "Authorization failed");
        let detail = err.detail();
        assert_eq!(detail.code, "UNAUTHORIZED");
        assert_eq!(detail.category, ErrorCategory::Auth);
        assert!(detail.recoverable);
        assert!(!detail.hints.is_empty());
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(PollenError::Unauthorized.exit_code(), 1);
        assert_eq!(PollenError::InvalidUrl("nope".into()).exit_code(), 1);
        assert_eq!(PollenError::Network("refused".into()).exit_code(), 2);
        assert_eq!(PollenError::Io("disk full".into()).exit_code(), 3);
        assert_eq!(PollenError::MissingField("token".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_json_format() {
        let err = PollenError::Network("connection refused".into());
        let json = err.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "NETWORK_ERROR");
        assert_eq!(json["error"]["category"], "network");
        assert_eq!(json["error"]["recoverable"], true);
        assert!(json["error"]["hints"].is_array());
    }

    #[test]
    fn test_error_json_no_empty_hints() {
        let err = PollenError::Other("boom".into());
        let serialized = serde_json::to_string(&err.detail()).unwrap();
        assert!(!serialized.contains("\"hints\""));
    }

    #[test]
    fn test_decode_error_mentions_endpoint() {
        let err = PollenError::Decode {
            endpoint: "/heatmap/betula".into(),
            message: "expected value".into(),
        };
        let detail = err.detail();
        assert_eq!(detail.code, "DECODE_ERROR");
        assert!(detail.message.contains("/heatmap/betula"));
    }

    #[test]
    fn test_missing_token_hints_credentials() {
        let detail = PollenError::MissingField("token".into()).detail();
        assert_eq!(detail.hints, vec!["Check username and password".to_string()]);
        let detail = PollenError::MissingField("z".into()).detail();
        assert!(detail.hints.is_empty());
    }

    #[test]
    fn test_status_error_recoverable_only_for_server_errors() {
        let err = PollenError::Status { status: 503, endpoint: "/graph/lineplot/betula".into() };
        assert!(err.detail().recoverable);
        assert_eq!(err.exit_code(), 2);
        let err = PollenError::Status { status: 404, endpoint: "/graph/lineplot/x".into() };
        assert!(!err.detail().recoverable);
    }

    #[test]
    fn test_user_input_errors_exit_one() {
        let err = PollenError::InvalidInput("bad date".into());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.detail().code, "INVALID_INPUT");
        assert_eq!(PollenError::Config("bad mode".into()).exit_code(), 1);
    }
}
