use anyhow::Result;

use pollen_common::types::RenderMode;
use pollen_core::output::{RouteRow, RoutesOutput};
use pollen_core::routes::{deep_links, flatten, routes};
use pollen_utils::output::{render, OutputFormat};

/// `pollen routes [--mode <mode>]`
pub fn run(mode: RenderMode, fmt: OutputFormat) -> Result<()> {
    render(fmt, &build(mode))
}

fn build(mode: RenderMode) -> RoutesOutput {
    let table = routes(mode);
    let rows = flatten(&table)
        .into_iter()
        .map(|(depth, route)| RouteRow {
            path: route.path.to_string(),
            view: route.view.to_string(),
            module: route.view.module().to_string(),
            depth,
        })
        .collect();

    RoutesOutput {
        mode,
        routes: rows,
        deep_links: deep_links(&table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rows() {
        let out = build(RenderMode::Spa);
        assert_eq!(out.routes.len(), 7);
        assert_eq!(out.routes.last().unwrap().path, "*");
        assert_eq!(out.routes[1].path, "");
        assert_eq!(out.routes[1].depth, 1);
        assert_eq!(out.deep_links.len(), 5);

        let ssr = build(RenderMode::Ssr);
        assert!(ssr.routes.iter().all(|r| r.path != "*"));
    }
}
