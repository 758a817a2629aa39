//! Front-end route table.
//!
//! Static path → view associations handed to the front-end's view
//! router. The catch-all entry has to come last so it only matches when
//! nothing else does; under server-side rendering it is left out because
//! the server answers unmatched paths itself.

use serde::Serialize;

use pollen_common::types::RenderMode;

/// Path of the catch-all entry.
pub const WILDCARD: &str = "*";

/// Views the router can load on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    MainLayout,
    Information,
    Pollen,
    Spores,
    Data,
    NotFound,
}

impl View {
    /// Module the front-end imports lazily for this view.
    pub fn module(self) -> &'static str {
        match self {
            View::MainLayout => "layouts/main.vue",
            View::Information => "pages/information.vue",
            View::Pollen => "pages/pollen.vue",
            View::Spores => "pages/spores.vue",
            View::Data => "pages/data.vue",
            View::NotFound => "pages/Error404.vue",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::MainLayout => write!(f, "main_layout"),
            View::Information => write!(f, "information"),
            View::Pollen => write!(f, "pollen"),
            View::Spores => write!(f, "spores"),
            View::Data => write!(f, "data"),
            View::NotFound => write!(f, "not_found"),
        }
    }
}

/// One route entry. An empty `path` is the index route of its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Route>,
}

impl Route {
    pub fn leaf(path: &'static str, view: View) -> Self {
        Self {
            path,
            view,
            children: Vec::new(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.path == WILDCARD
    }

    pub fn is_index(&self) -> bool {
        self.path.is_empty()
    }
}

/// Route table for `mode`.
pub fn routes(mode: RenderMode) -> Vec<Route> {
    let mut routes = vec![Route {
        path: "/",
        view: View::MainLayout,
        children: vec![
            Route::leaf("", View::Information),
            Route::leaf("pollen", View::Pollen),
            Route::leaf("spores", View::Spores),
            Route::leaf("information", View::Information),
            Route::leaf("data", View::Data),
        ],
    }];

    // Always last.
    if !mode.is_ssr() {
        routes.push(Route::leaf(WILDCARD, View::NotFound));
    }

    routes
}

/// Every entry with its nesting depth, parents before children.
pub fn flatten(routes: &[Route]) -> Vec<(usize, &Route)> {
    fn walk<'a>(routes: &'a [Route], depth: usize, out: &mut Vec<(usize, &'a Route)>) {
        for route in routes {
            out.push((depth, route));
            walk(&route.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(routes, 0, &mut out);
    out
}

/// Absolute paths a user can link to directly, in table order.
///
/// The catch-all is not a link target and is skipped.
pub fn deep_links(routes: &[Route]) -> Vec<String> {
    fn walk(routes: &[Route], parent: &str, out: &mut Vec<String>) {
        for route in routes.iter().filter(|r| !r.is_wildcard()) {
            let full = join_path(parent, route.path);
            if !out.contains(&full) {
                out.push(full.clone());
            }
            walk(&route.children, &full, out);
        }
    }

    let mut out = Vec::new();
    walk(routes, "", &mut out);
    out
}

fn join_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    let base = parent.trim_end_matches('/');
    match (base.is_empty(), child.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => base.to_string(),
        _ => format!("{base}/{child}"),
    }
}
