//! Unified output rendering: JSON or human-readable table.
//!
//! Usage:
//! ```ignore
//! use pollen_utils::output::{OutputFormat, render};
//!
//! let data = GeneraOutput { genera };
//! render(format, &data)?;
//! ```

use anyhow::Result;
use serde::Serialize;

use crate::format::{format_bytes, format_json_cell, format_value, truncate, DASH};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Table,
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
}

/// Trait for types that can render as a human-readable table.
pub trait TableDisplay {
    fn print_table(&self);
}

/// Render structured output, JSON or table depending on format.
pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    if !render_json_or(format, data)? {
        data.print_table();
    }
    Ok(())
}

/// Render just the JSON formats (for types that handle their own table display).
/// Returns true if JSON was rendered, false if table mode was requested.
pub fn render_json_or<T: Serialize>(format: OutputFormat, data: &T) -> Result<bool> {
    match format {
        OutputFormat::Table => Ok(false),
        OutputFormat::Json => {
            let json = serde_json::to_string(data)?;
            println!("{json}");
            Ok(true)
        }
        OutputFormat::JsonPretty => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
            Ok(true)
        }
    }
}

// ─── TableDisplay implementations for output types ──────────────────

use pollen_types::output::*;

impl TableDisplay for GeneraOutput {
    fn print_table(&self) {
        if self.genera.is_empty() {
            println!("No genera.");
            return;
        }
        println!("┌────────────────────────────────┐");
        println!("│ Genus                          │");
        println!("├────────────────────────────────┤");
        for genus in &self.genera {
            println!("│ {:<30} │", truncate(genus, 30));
        }
        println!("└────────────────────────────────┘");
    }
}

impl TableDisplay for SeriesOutput {
    fn print_table(&self) {
        if !self.found {
            println!("No data for {}.", self.genus);
            return;
        }
        println!("┌──────────────────────────────────────┐");
        println!("│ {:<36} │", truncate(&self.genus.to_uppercase(), 36));
        println!("├──────────────┬───────────────────────┤");
        println!("│ Date         │ Count                 │");
        println!("├──────────────┼───────────────────────┤");
        for p in &self.points {
            println!("│ {:<12} │ {:>21} │", truncate(&p.date, 12), format_value(p.value));
        }
        println!("└──────────────┴───────────────────────┘");
    }
}

impl TableDisplay for MultiSeriesOutput {
    fn print_table(&self) {
        for (i, series) in self.series.iter().enumerate() {
            if i > 0 {
                println!();
            }
            series.print_table();
        }
    }
}

impl TableDisplay for RawOutput {
    fn print_table(&self) {
        let Some(map) = self.data.as_object() else {
            println!("{}", self.data);
            return;
        };
        if map.is_empty() {
            println!("No data.");
            return;
        }
        for (key, value) in map {
            match value {
                serde_json::Value::Array(items) => {
                    let cells: Vec<String> = items.iter().map(format_json_cell).collect();
                    println!("{key:<20} {}", cells.join("  "));
                }
                serde_json::Value::Object(fields) => {
                    println!("{key}");
                    for (field, v) in fields {
                        let shown = match v {
                            serde_json::Value::Array(items) => items
                                .iter()
                                .map(format_json_cell)
                                .collect::<Vec<_>>()
                                .join("  "),
                            other => format_json_cell(other),
                        };
                        println!("  {field:<8} {shown}");
                    }
                }
                other => println!("{key:<20} {}", format_json_cell(other)),
            }
        }
    }
}

impl TableDisplay for HeatmapOutput {
    fn print_table(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  HEATMAP {:<48}║", truncate(&self.genus.to_uppercase(), 48));
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║  Rows    : {:<46}║", self.rows);
        println!("║  Columns : {:<46}║", self.columns);
        println!("║  Missing : {:<46}║", self.missing);
        println!("╚══════════════════════════════════════════════════════════╝");
        for row in &self.heatmap.z {
            let cells: Vec<String> = row
                .iter()
                .map(|v| format!("{:>6}", format_value(Some(*v))))
                .collect();
            println!("{}", cells.join(" "));
        }
    }
}

impl TableDisplay for LineplotOutput {
    fn print_table(&self) {
        println!(
            "✓ Line plot for {} saved to {} ({}, {})",
            self.genus,
            self.path,
            format_bytes(self.bytes),
            self.content_type.as_deref().unwrap_or(DASH),
        );
    }
}

impl TableDisplay for LanguagesOutput {
    fn print_table(&self) {
        let codes: Vec<String> = self.languages.iter().map(ToString::to_string).collect();
        println!("Languages: {}", codes.join(", "));
    }
}

impl TableDisplay for LoginOutput {
    fn print_table(&self) {
        if self.token_stored {
            println!("✓ Logged in as {} on {}", self.username, self.api_url);
        } else {
            println!("✓ Logged in as {} on {} (token not persisted)", self.username, self.api_url);
        }
    }
}

impl TableDisplay for LogoutOutput {
    fn print_table(&self) {
        if self.token_cleared {
            println!("✓ Logged out of {}", self.api_url);
        } else {
            println!("Not logged in to {}", self.api_url);
        }
    }
}

impl TableDisplay for UploadOutput {
    fn print_table(&self) {
        println!("✓ Upload of {} accepted", self.file);
        println!("{}", self.response);
    }
}

impl TableDisplay for RoutesOutput {
    fn print_table(&self) {
        println!("Routes ({} mode)", self.mode);
        println!("┌──────────────────────┬──────────────┬──────────────────────────┐");
        println!("│ Path                 │ View         │ Module                   │");
        println!("├──────────────────────┼──────────────┼──────────────────────────┤");
        for r in &self.routes {
            let path = if r.path.is_empty() { "(index)" } else { r.path.as_str() };
            let indented = format!("{}{}", "  ".repeat(r.depth), path);
            println!(
                "│ {:<20} │ {:<12} │ {:<24} │",
                truncate(&indented, 20),
                truncate(&r.view, 12),
                truncate(&r.module, 24),
            );
        }
        println!("└──────────────────────┴──────────────┴──────────────────────────┘");
        println!("Deep links: {}", self.deep_links.join(", "));
    }
}

impl TableDisplay for ConfigOutput {
    fn print_table(&self) {
        let timeout = self
            .timeout_secs
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "none".to_string());
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  POLLEN CONFIGURATION                                    ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║  File      : {:<43}║", truncate(&self.config_path, 43));
        println!("║  API URL   : {:<43}║", truncate(&self.api_url, 43));
        println!("║  Timeout   : {:<43}║", timeout);
        println!("║  Verbose   : {:<43}║", self.verbose);
        println!("║  Mode      : {:<43}║", self.mode);
        println!("║  Logged in : {:<43}║", if self.logged_in { "✓" } else { "✗" });
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}
