/// Route definitions and resolution results
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::pattern::Params;

/// Opaque reference to a page component
///
/// The router never looks inside it; the rendering layer maps it to a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRef(String);

impl PageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single entry of the route table
///
/// The pattern is kept as written and validated when the table is built.
///
/// # Examples
///
/// ```
/// use kino_router::RouteDefinition;
///
/// let route = RouteDefinition::new("/movie/:kp_id", "player-page", "PlayerPage")
///     .with_title("Просмотр фильма")
///     .with_meta("section", "player");
///
/// assert_eq!(route.title(), Some("Просмотр фильма"));
/// assert_eq!(route.get_meta("section"), Some("player"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Path pattern like "/movie/:kp_id"
    pub path: String,
    /// Unique route name
    pub name: String,
    /// Page component rendered for this route
    pub page: PageRef,
    /// Document title applied on navigation
    pub title: Option<String>,
    /// Arbitrary extra metadata
    pub meta: HashMap<String, String>,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, name: impl Into<String>, page: impl Into<PageRef>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            page: page.into(),
            title: None,
            meta: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a metadata key-value pair
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Merges several metadata entries at once
    pub fn with_metadata(mut self, meta: HashMap<String, String>) -> Self {
        self.meta.extend(meta);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}

/// The route matched for a concrete location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub(crate) route: Arc<RouteDefinition>,
    pub(crate) params: Params,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) hash: Option<String>,
}

impl ResolvedRoute {
    pub fn route(&self) -> &RouteDefinition {
        &self.route
    }

    pub fn name(&self) -> &str {
        &self.route.name
    }

    pub fn page(&self) -> &PageRef {
        &self.route.page
    }

    pub fn title(&self) -> Option<&str> {
        self.route.title()
    }

    /// Captured parameters; empty when the route has none
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Normalized path that was matched
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Full location including query and hash
    pub fn href(&self) -> String {
        crate::path::Location {
            path: self.path.clone(),
            query: self.query.clone(),
            hash: self.hash.clone(),
        }
        .to_href()
    }
}

impl fmt::Display for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.route.name, self.path)
    }
}
