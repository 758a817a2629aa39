//! Structured output types for JSON/table rendering.
//!
//! Every data-producing command returns one of these types.
//! They all derive `Serialize` for JSON output; `pollen-utils`
//! implements `TableDisplay` on them for human-readable rendering.

use serde::Serialize;
use serde_json::Value;

use pollen_common::types::{Heatmap, Language, RenderMode};

// ─── Genera ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct GeneraOutput {
    pub genera: Vec<String>,
}

// ─── Time series (recent / between) ─────────────────────────────────

/// One genus' counts over a date range.
///
/// ```json
/// {
///   "genus": "betula",
///   "found": true,
///   "points": [{ "date": "2023-03-05", "value": 12.0 }]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SeriesOutput {
    pub genus: String,
    /// False when the backend returned no entry for this genus.
    pub found: bool,
    pub points: Vec<PointRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointRow {
    pub date: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiSeriesOutput {
    pub series: Vec<SeriesOutput>,
}

/// Untyped payload passed through as received.
#[derive(Debug, Clone, Serialize)]
pub struct RawOutput {
    pub data: Value,
}

// ─── Heatmap ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapOutput {
    pub genus: String,
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
    pub heatmap: Heatmap,
}

// ─── Line plot ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LineplotOutput {
    pub genus: String,
    pub path: String,
    pub bytes: usize,
    pub content_type: Option<String>,
}

// ─── Languages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LanguagesOutput {
    pub languages: Vec<Language>,
}

// ─── Auth ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub username: String,
    pub api_url: String,
    pub token_stored: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutOutput {
    pub api_url: String,
    pub token_cleared: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutput {
    pub file: String,
    pub response: Value,
}

// ─── Routes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RoutesOutput {
    pub mode: RenderMode,
    pub routes: Vec<RouteRow>,
    pub deep_links: Vec<String>,
}

/// Flattened route entry; `depth` is 0 for top-level entries.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRow {
    pub path: String,
    pub view: String,
    pub module: String,
    pub depth: usize,
}

// ─── Config ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ConfigOutput {
    pub config_path: String,
    pub api_url: String,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
    pub mode: RenderMode,
    pub logged_in: bool,
}
