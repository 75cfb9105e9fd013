//! The immutable route table
//!
//! Built once from an ordered list of [`RouteDefinition`]s. Registration
//! enforces the table invariants:
//!
//! - route names are unique
//! - exactly one catch-all route exists and it is declared last
//! - every pattern parses
//!
//! Resolution tries static routes first, then parameterized routes, then
//! repeatable ones, each tier in declaration order. The catch-all closes the
//! last tier, so every location resolves.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::path::{self, Location};
use crate::route::{Params, PathPattern, ResolvedRoute, RouteDefinition};

/// Matching options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterOptions {
    /// Compare static segments case-sensitively (default: false)
    pub case_sensitive: bool,
}

#[derive(Debug)]
struct CompiledRoute {
    definition: Arc<RouteDefinition>,
    pattern: PathPattern,
}

/// Ordered, validated route table
///
/// # Examples
///
/// ```
/// use kino_router::{RouteDefinition, RouteTable};
///
/// let table = RouteTable::new(vec![
///     RouteDefinition::new("/", "home", "MovieSearch"),
///     RouteDefinition::new("/movie/:kp_id", "player-page", "PlayerPage"),
///     RouteDefinition::new("/:pathMatch(.*)*", "NotFound", "NotFound"),
/// ])
/// .unwrap();
///
/// let resolved = table.resolve("/movie/42");
/// assert_eq!(resolved.name(), "player-page");
/// assert_eq!(resolved.param("kp_id"), Some("42"));
///
/// assert_eq!(table.resolve("/no/such/page").name(), "NotFound");
/// ```
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    match_order: Vec<usize>,
    named: HashMap<String, usize>,
    not_found: usize,
    options: RouterOptions,
}

impl RouteTable {
    /// Builds a table with default options
    pub fn new<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        Self::with_options(definitions, RouterOptions::default())
    }

    pub fn with_options<I>(definitions: I, options: RouterOptions) -> Result<Self>
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        let mut routes: Vec<CompiledRoute> = Vec::new();
        let mut named: HashMap<String, usize> = HashMap::new();

        for definition in definitions {
            if definition.name.is_empty() {
                return Err(RouterError::config(format!(
                    "route `{}` has an empty name",
                    definition.path
                )));
            }
            if named.contains_key(&definition.name) {
                return Err(RouterError::config(format!(
                    "duplicate route name `{}`",
                    definition.name
                )));
            }
            if let Some(previous) = routes.last() {
                if previous.pattern.is_catch_all() {
                    return Err(RouterError::config(format!(
                        "catch-all route `{}` must be declared last, found `{}` after it",
                        previous.definition.name, definition.name
                    )));
                }
            }

            let pattern = PathPattern::parse(&definition.path)?;
            named.insert(definition.name.clone(), routes.len());
            routes.push(CompiledRoute {
                definition: Arc::new(definition),
                pattern,
            });
        }

        let not_found = match routes.last() {
            Some(route) if route.pattern.is_catch_all() => routes.len() - 1,
            _ => {
                return Err(RouterError::config(
                    "route table needs a catch-all route (e.g. `/:pathMatch(.*)*`) as its last entry",
                ))
            }
        };

        // stable: declaration order is kept within a rank
        let mut match_order: Vec<usize> = (0..routes.len()).collect();
        match_order.sort_by_key(|&idx| routes[idx].pattern.rank());

        debug!(routes = routes.len(), "route table registered");

        Ok(Self {
            routes,
            match_order,
            named,
            not_found,
            options,
        })
    }

    /// Resolves a location to exactly one route
    ///
    /// Accepts an optional `?query` and `#hash`; the path is normalized
    /// before matching.
    pub fn resolve(&self, location: &str) -> ResolvedRoute {
        let location = Location::parse(location);
        let segments = path::segments(&location.path);

        let (idx, params) = self
            .match_order
            .iter()
            .find_map(|&idx| {
                self.routes[idx]
                    .pattern
                    .matches(&segments, self.options.case_sensitive)
                    .map(|params| (idx, params))
            })
            .unwrap_or_else(|| (self.not_found, Params::new()));

        let route = &self.routes[idx];
        debug!(path = %location.path, route = %route.definition.name, "resolved");

        ResolvedRoute {
            route: Arc::clone(&route.definition),
            params,
            path: location.path,
            query: location.query,
            hash: location.hash,
        }
    }

    /// Builds the concrete path of a named route
    ///
    /// # Examples
    ///
    /// ```
    /// use kino_router::{kino_routes, RouteTable, RouterError};
    /// use std::collections::HashMap;
    ///
    /// let table = RouteTable::new(kino_routes()).unwrap();
    ///
    /// let params = HashMap::from([("kp_id".to_string(), "7".to_string())]);
    /// assert_eq!(table.url_for("player-page", &params).unwrap(), "/movie/7");
    ///
    /// assert!(matches!(
    ///     table.url_for("player-page", &HashMap::new()),
    ///     Err(RouterError::MissingParameter { .. })
    /// ));
    /// ```
    pub fn url_for(&self, name: &str, params: &Params) -> Result<String> {
        let route = self
            .named
            .get(name)
            .map(|&idx| &self.routes[idx])
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        route.pattern.generate(name, params)
    }

    /// Convenience form of [`url_for`](Self::url_for) taking parameter tuples
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let params: Params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.url_for(name, &params)
    }

    /// Gets a route by its name
    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.named
            .get(name)
            .map(|&idx| self.routes[idx].definition.as_ref())
    }

    /// Parsed pattern of a named route
    pub fn pattern(&self, name: &str) -> Option<&PathPattern> {
        self.named.get(name).map(|&idx| &self.routes[idx].pattern)
    }

    /// Routes in declaration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> + '_ {
        self.routes.iter().map(|r| r.definition.as_ref())
    }

    /// The catch-all route unmatched paths resolve to
    pub fn not_found(&self) -> &RouteDefinition {
        &self.routes[self.not_found].definition
    }

    pub fn options(&self) -> RouterOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false for a registered table, which holds at least the catch-all
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
