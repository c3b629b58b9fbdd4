//! Route table and lazy view resolution.
//!
//! Four fixed routes map URL paths to views. A [`Router`] loads each view the
//! first time one of its paths is resolved and serves it from cache after that.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use strum::Display;

use crate::error::CoreError;

// ── ViewId ───────────────────────────────────────────────────────────

/// Identifies each dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewId {
    #[default]
    Dashboard,
    Teams,
    History,
    Settings,
}

impl ViewId {
    /// Heading shown for the view.
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Teams => "Teams",
            Self::History => "Bet History",
            Self::Settings => "Settings",
        }
    }
}

// ── Route table ──────────────────────────────────────────────────────

/// One path-to-view mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub view: ViewId,
}

/// The dashboard's routes, in declaration order.
pub const ROUTES: [RouteEntry; 4] = [
    RouteEntry {
        path: "/",
        name: "dashboard",
        view: ViewId::Dashboard,
    },
    RouteEntry {
        path: "/teams",
        name: "teams",
        view: ViewId::Teams,
    },
    RouteEntry {
        path: "/history",
        name: "history",
        view: ViewId::History,
    },
    RouteEntry {
        path: "/settings",
        name: "settings",
        view: ViewId::Settings,
    },
];

/// Immutable view over a static route list.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteEntry],
}

impl RouteTable {
    /// The dashboard's route table.
    pub const fn dashboard() -> Self {
        Self { routes: &ROUTES }
    }

    pub fn routes(&self) -> &'static [RouteEntry] {
        self.routes
    }

    /// First route whose path equals the normalized `path`.
    pub fn match_path(&self, path: &str) -> Option<&'static RouteEntry> {
        let path = normalize_path(path)?;
        self.routes.iter().find(|r| r.path == path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.path, self.name, self.view)
    }
}

/// Drop query and fragment, and one trailing slash unless the path is the
/// root. Paths with empty segments (`//`) match nothing.
fn normalize_path(path: &str) -> Option<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.is_empty() {
        return Some("/");
    }
    if path.contains("//") {
        return None;
    }
    match path.strip_suffix('/') {
        Some("") | None => Some(path),
        Some(trimmed) => Some(trimmed),
    }
}

// ── Lazy view loading ────────────────────────────────────────────────

/// Produces the view for a [`ViewId`]. Called at most once per view per
/// router unless a load fails.
pub trait ViewLoader {
    type View;

    fn load(&self, id: ViewId) -> impl Future<Output = Result<Self::View, CoreError>> + Send;
}

/// A matched route together with its view.
#[derive(Debug)]
pub struct Resolved<V> {
    pub route: &'static RouteEntry,
    pub view: Arc<V>,
    /// `true` when this resolution had to run the loader.
    pub loaded_now: bool,
}

/// Resolves paths against a [`RouteTable`], loading views on first use.
pub struct Router<L: ViewLoader> {
    table: RouteTable,
    loader: L,
    cache: HashMap<ViewId, Arc<L::View>>,
}

impl<L: ViewLoader> Router<L> {
    pub fn new(table: RouteTable, loader: L) -> Self {
        Self {
            table,
            loader,
            cache: HashMap::new(),
        }
    }

    pub fn table(&self) -> RouteTable {
        self.table
    }

    /// Whether the view has already been loaded.
    pub fn is_loaded(&self, id: ViewId) -> bool {
        self.cache.contains_key(&id)
    }

    /// Match `path` and return its view, loading it if needed.
    ///
    /// Unmatched paths are an error: the table has no catch-all route.
    /// A failed load is not cached.
    pub async fn resolve(&mut self, path: &str) -> Result<Resolved<L::View>, CoreError> {
        let route = self
            .table
            .match_path(path)
            .ok_or_else(|| CoreError::RouteNotFound { path: path.into() })?;

        if let Some(view) = self.cache.get(&route.view) {
            return Ok(Resolved {
                route,
                view: Arc::clone(view),
                loaded_now: false,
            });
        }

        tracing::debug!(view = %route.view, "Loading view");
        let view = Arc::new(self.loader.load(route.view).await?);
        self.cache.insert(route.view, Arc::clone(&view));

        Ok(Resolved {
            route,
            view,
            loaded_now: true,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
