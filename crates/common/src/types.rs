//! Types shared by the client, the route table and the CLI.
//!
//! The backend speaks loosely-shaped JSON; these types pin down the parts
//! callers rely on and leave the rest as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Languages ──────────────────────────────────────────────────────

/// UI languages the front-end ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Lb,
    Fr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Lb => "lb",
            Language::Fr => "fr",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Supported languages, in display order.
pub const SUPPORTED_LANGUAGES: [Language; 4] =
    [Language::En, Language::De, Language::Lb, Language::Fr];

// ─── Content negotiation ────────────────────────────────────────────

/// Response representations the backend can negotiate via `Accept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Plain tabular JSON.
    Json,
    /// One plotly trace per genus.
    Plotly,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Plotly => "application/prs.plotlydict+json",
        }
    }
}

// ─── Genus-keyed responses ──────────────────────────────────────────

/// A response object keyed by genus.
///
/// Looking up a genus the backend did not return yields `None`; it is
/// never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenusMap(Map<String, Value>);

impl GenusMap {
    /// Wrap a decoded body. Anything other than a JSON object yields an
    /// empty map.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, genus: &str) -> Option<&Value> {
        self.0.get(genus)
    }

    /// Remove and return the entry for `genus`.
    pub fn take(&mut self, genus: &str) -> Option<Value> {
        self.0.remove(genus)
    }

    /// Genera present in the response.
    pub fn genera(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One plotly trace, as served under `application/prs.plotlydict+json`.
///
/// ```json
/// { "x": ["2023-03-05", ...], "y": [12.0, null, ...], "name": "betula", "type": "bar" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlySeries {
    #[serde(default)]
    pub x: Vec<String>,
    #[serde(default)]
    pub y: Vec<Option<f64>>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PlotlySeries {
    /// `(date, value)` pairs; a trailing unmatched side is dropped.
    pub fn points(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.x.iter().map(String::as_str).zip(self.y.iter().copied())
    }
}

// ─── Heatmap ────────────────────────────────────────────────────────

/// Heatmap payload with missing cells restored to NaN.
///
/// `extra` carries every field other than the grid exactly as received
/// (axis labels, titles, ...). When serialized, NaN cells are written as
/// `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Heatmap {
    pub z: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Heatmap {
    /// `(rows, columns of the widest row)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let cols = self.z.iter().map(Vec::len).max().unwrap_or(0);
        (self.z.len(), cols)
    }

    /// Number of cells with no data.
    pub fn missing_cells(&self) -> usize {
        self.z.iter().flatten().filter(|v| v.is_nan()).count()
    }
}

// ─── Images ─────────────────────────────────────────────────────────

/// Rendered line plot returned by `/graph/lineplot/{genus}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineplot {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

// ─── Auth ───────────────────────────────────────────────────────────

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// ─── Render mode ────────────────────────────────────────────────────

/// Front-end build mode; decides how unmatched paths are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Spa,
    /// Server-side rendering: the server answers unmatched paths itself.
    Ssr,
    Pwa,
    Electron,
}

impl RenderMode {
    pub fn is_ssr(self) -> bool {
        self == RenderMode::Ssr
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Spa => write!(f, "spa"),
            RenderMode::Ssr => write!(f, "ssr"),
            RenderMode::Pwa => write!(f, "pwa"),
            RenderMode::Electron => write!(f, "electron"),
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spa" | "" => Ok(RenderMode::Spa),
            "ssr" => Ok(RenderMode::Ssr),
            "pwa" => Ok(RenderMode::Pwa),
            "electron" => Ok(RenderMode::Electron),
            other => Err(format!("Unknown render mode: {other}. Use spa, ssr, pwa or electron")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_supported_languages_order() {
        let codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "de", "lb", "fr"]);
    }

    #[test]
    fn test_language_serializes_as_code() {
        let json = serde_json::to_string(&SUPPORTED_LANGUAGES).unwrap();
        assert_eq!(json, r#"["en","de","lb","fr"]"#);
    }

    #[test]
    fn test_genus_map_lookup() {
        let mut map = GenusMap::from_value(json!({ "betula": { "y": [1] }, "alnus": 3 }));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("alnus"), Some(&json!(3)));
        assert_eq!(map.get("quercus"), None);
        assert_eq!(map.take("betula"), Some(json!({ "y": [1] })));
        assert_eq!(map.take("betula"), None);
    }

    #[test]
    fn test_genus_map_non_object_is_empty() {
        let map = GenusMap::from_value(json!(["betula"]));
        assert!(map.is_empty());
        assert_eq!(map.get("betula"), None);
    }

    #[test]
    fn test_plotly_series_decodes_nulls() {
        let series: PlotlySeries = serde_json::from_value(json!({
            "x": ["2023-03-05", "2023-03-06"],
            "y": [4.5, null],
            "name": "betula",
            "type": "bar"
        }))
        .unwrap();
        assert_eq!(series.kind, "bar");
        let points: Vec<_> = series.points().collect();
        assert_eq!(points, vec![("2023-03-05", Some(4.5)), ("2023-03-06", None)]);
    }

    #[test]
    fn test_heatmap_serializes_nan_as_null() {
        let mut extra = Map::new();
        extra.insert("x".into(), json!(["jan", "feb"]));
        let heatmap = Heatmap {
            z: vec![vec![1.0, f64::NAN]],
            extra,
        };
        let value = serde_json::to_value(&heatmap).unwrap();
        assert_eq!(value, json!({ "z": [[1.0, null]], "x": ["jan", "feb"] }));
        assert_eq!(heatmap.dimensions(), (1, 2));
        assert_eq!(heatmap.missing_cells(), 1);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials { username: "alice", password: "secret" };
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("alice"));
        assert!(!dbg.contains("secret"));
    }

    #[test]
    fn test_render_mode_parse() {
        assert_eq!("ssr".parse::<RenderMode>().unwrap(), RenderMode::Ssr);
        assert_eq!("SPA".parse::<RenderMode>().unwrap(), RenderMode::Spa);
        assert_eq!("".parse::<RenderMode>().unwrap(), RenderMode::Spa);
        assert!("cordova".parse::<RenderMode>().is_err());
        assert!(RenderMode::Ssr.is_ssr());
        assert!(!RenderMode::default().is_ssr());
    }

    #[test]
    fn test_media_type_strings() {
        assert_eq!(MediaType::Json.as_str(), "application/json");
        assert_eq!(MediaType::Plotly.as_str(), "application/prs.plotlydict+json");
    }
}
