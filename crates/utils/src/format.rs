//! Formatting utilities for table output.

/// Placeholder for a missing value.
pub const DASH: &str = "—";

/// Format a measurement. `None` and NaN both print as [`DASH`].
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => DASH.to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => DASH.to_string(),
    }
}

/// Format a JSON scalar the way a table cell shows it.
pub fn format_json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => DASH.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => format_value(n.as_f64()),
        other => other.to_string(),
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// Cut `s` to at most `width` characters, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let keep: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{keep}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(12.0)), "12");
        assert_eq!(format_value(Some(3.456)), "3.46");
        assert_eq!(format_value(Some(f64::NAN)), DASH);
        assert_eq!(format_value(None), DASH);
    }

    #[test]
    fn test_format_json_cell() {
        assert_eq!(format_json_cell(&json!(null)), DASH);
        assert_eq!(format_json_cell(&json!("2023-03-05")), "2023-03-05");
        assert_eq!(format_json_cell(&json!(7)), "7");
        assert_eq!(format_json_cell(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("betula", 10), "betula");
        assert_eq!(truncate("ambrosia artemisiifolia", 8), "ambrosi…");
    }
}
