// Element identifiers
// Stable string ids used to cross-reference accessibility attributes

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATED_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a menu element (tab, item list or item)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an explicit id supplied by the caller
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a process-unique id of the form `tabs-menu-<component>-<n>`
    pub fn generate(component: &str) -> Self {
        let n = NEXT_GENERATED_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("tabs-menu-{}-{}", component, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Join ids with single spaces (the format of an id-reference list such as `aria-labelledby`)
pub fn join_ids<'a>(ids: impl IntoIterator<Item = &'a ElementId>) -> String {
    ids.into_iter()
        .map(ElementId::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
