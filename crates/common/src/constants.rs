//! Wire constants shared by the client and the CLI.

/// Default backend base URL used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Window (in days) requested by `/recent` when asking for a single genus.
pub const RECENT_NUM_DAYS: u32 = 365;

/// Window (in days) requested by the raw `/recent` overview.
pub const RECENT_RAW_NUM_DAYS: u32 = 5;

/// Value the backend writes into heatmap cells that have no data.
///
/// JSON has no literal for NaN, so missing cells travel as `-1`.
pub const HEATMAP_SENTINEL: f64 = -1.0;

/// Name of the heatmap field holding the 2-D value grid.
pub const HEATMAP_GRID_FIELD: &str = "z";

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "JWT";

/// File extensions the backend accepts on `/upload`.
pub const UPLOAD_EXTENSIONS: &[&str] = &[".csv"];

/// Environment variable overriding the configured base URL.
pub const ENV_API_URL: &str = "POLLEN_API_URL";

/// Environment variable selecting the front-end render mode.
pub const ENV_RENDER_MODE: &str = "MODE";

/// HTTP header names.
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
