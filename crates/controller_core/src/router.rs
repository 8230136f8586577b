use std::{
    cell::{Cell, RefCell},
    fmt,
    str::FromStr,
};

use tracing::{debug, warn};

pub trait Router {
    fn init(&self);

    fn navigate(&self, path: &str);

    fn location(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryKind {
    #[default]
    Hash,
    Browser,
}

impl HistoryKind {
    pub fn href(self, path: &str) -> String {
        let path = path.trim_start_matches('#');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        match self {
            HistoryKind::Hash => format!("#{path}"),
            HistoryKind::Browser => path,
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryKind::Hash => f.write_str("hash"),
            HistoryKind::Browser => f.write_str("browser"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown history kind '{0}', expected 'hash' or 'browser'")]
pub struct UnknownHistoryKind(pub String);

impl FromStr for HistoryKind {
    type Err = UnknownHistoryKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(HistoryKind::Hash),
            "browser" => Ok(HistoryKind::Browser),
            _ => Err(UnknownHistoryKind(value.to_string())),
        }
    }
}

/// In-memory history router. Navigation before `init` is ignored.
#[derive(Debug, Default)]
pub struct HistoryRouter {
    kind: Cell<HistoryKind>,
    active: Cell<Option<HistoryKind>>,
    entries: RefCell<Vec<String>>,
}

impl HistoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_kind(kind: HistoryKind) -> Self {
        let router = Self::new();
        router.set_history_kind(kind);
        router
    }

    pub fn set_history_kind(&self, kind: HistoryKind) -> &Self {
        self.kind.set(kind);
        self
    }

    pub fn history_kind(&self) -> Option<HistoryKind> {
        self.active.get()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Router for HistoryRouter {
    fn init(&self) {
        self.active.set(Some(self.kind.get()));
        debug!(history = %self.kind.get(), "router initialized");
    }

    fn navigate(&self, path: &str) {
        let Some(kind) = self.active.get() else {
            warn!(path, "navigation before router init ignored");
            return;
        };
        let href = kind.href(path);
        debug!(href = %href, "navigating");
        self.entries.borrow_mut().push(href);
    }

    fn location(&self) -> Option<String> {
        self.entries.borrow().last().cloned()
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
