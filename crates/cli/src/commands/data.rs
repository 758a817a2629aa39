use std::path::{Path, PathBuf};

use anyhow::Result;
use futures::future::try_join_all;

use pollen_common::error::{PollenError, PollenResult};
use pollen_core::output::{
    GeneraOutput, HeatmapOutput, LanguagesOutput, LineplotOutput, MultiSeriesOutput, RawOutput,
};
use pollen_core::ApiClient;
use pollen_utils::output::{render, OutputFormat};

use super::helpers::{genera_names, parse_date, series_output};

/// `pollen genera`
pub async fn genera(client: &ApiClient, fmt: OutputFormat) -> Result<()> {
    let body = client.fetch_genera().await?;
    render(fmt, &GeneraOutput { genera: genera_names(&body) })
}

/// `pollen recent <genus>...`: one request per genus, all in flight at once.
pub async fn recent(client: &ApiClient, genera: &[String], fmt: OutputFormat) -> Result<()> {
    let series = try_join_all(genera.iter().map(|genus| async move {
        client
            .get_recent_series(genus)
            .await
            .map(|s| series_output(genus, s))
    }))
    .await?;

    render(fmt, &MultiSeriesOutput { series })
}

/// `pollen recent-raw`
pub async fn recent_raw(client: &ApiClient, fmt: OutputFormat) -> Result<()> {
    let data = client.get_recent_raw().await?;
    render(fmt, &RawOutput { data })
}

/// `pollen between <genus> <from> <to>`
pub async fn between(
    client: &ApiClient,
    genus: &str,
    from: &str,
    to: &str,
    fmt: OutputFormat,
) -> Result<()> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    let series = client.get_between_series(genus, from, to).await?;
    render(fmt, &series_output(genus, series))
}

/// `pollen heatmap <genus>`
pub async fn heatmap(client: &ApiClient, genus: &str, fmt: OutputFormat) -> Result<()> {
    let heatmap = client.get_heatmap(genus).await?;
    let (rows, columns) = heatmap.dimensions();
    let output = HeatmapOutput {
        genus: genus.to_string(),
        rows,
        columns,
        missing: heatmap.missing_cells(),
        heatmap,
    };
    render(fmt, &output)
}

/// `pollen lineplot <genus> [--out <file>]`
pub async fn lineplot(
    client: &ApiClient,
    genus: &str,
    out: Option<PathBuf>,
    fmt: OutputFormat,
) -> Result<()> {
    let plot = client.get_lineplot(genus).await?;
    let path = match out {
        Some(path) => path,
        None => default_plot_path(genus)?,
    };
    write_file(&path, &plot.data)?;

    let output = LineplotOutput {
        genus: genus.to_string(),
        path: path.display().to_string(),
        bytes: plot.data.len(),
        content_type: plot.content_type,
    };
    render(fmt, &output)
}

/// `pollen languages`
pub fn languages(client: &ApiClient, fmt: OutputFormat) -> Result<()> {
    render(fmt, &LanguagesOutput { languages: client.supported_languages() })
}

fn default_plot_path(genus: &str) -> Result<PathBuf> {
    Ok(pollen_core::workspace::resolve("plots")?.join(plot_file_name(genus)))
}

/// File name for a genus plot. Separators are replaced so the name
/// always stays a single path component.
fn plot_file_name(genus: &str) -> String {
    let stem: String = genus
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if std::path::is_separator(c) => '_',
            c => c,
        })
        .collect();
    format!("{stem}.png")
}

fn write_file(path: &Path, data: &[u8]) -> PollenResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            PollenError::Io(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, data)
        .map_err(|e| PollenError::Io(format!("Failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Component;

    #[test]
    fn test_plot_file_name_is_one_component() {
        for genus in ["betula", "../x", "a/b/c", "..\\evil", "/etc/passwd"] {
            let name = plot_file_name(genus);
            let components: Vec<_> = Path::new(&name).components().collect();
            assert_eq!(components.len(), 1, "{genus} -> {name}");
            assert!(matches!(components[0], Component::Normal(_)), "{genus} -> {name}");
        }
        assert_eq!(plot_file_name("betula"), "betula.png");
        assert_eq!(plot_file_name("../x"), ".._x.png");
    }

    #[test]
    fn test_default_plot_path_stays_in_plots_dir() {
        let plots = pollen_core::workspace::resolve("plots").unwrap();
        let path = default_plot_path("../../x").unwrap();
        assert_eq!(path.parent(), Some(plots.as_path()));
    }

    #[test]
    fn test_write_failure_is_system_error() {
        let dir = std::env::temp_dir().join(format!("pollen-plot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        // Writing to a directory path fails.
        let err = write_file(&dir, b"png").unwrap_err();
        assert!(matches!(err, PollenError::Io(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
