// File: src/config.rs
// Purpose: Route table configuration parsing from kino.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::app::kino_routes;
use crate::navigation::{Router, DEFAULT_TITLE};
use crate::route::{PageRef, RouteDefinition};
use crate::table::{RouteTable, RouterOptions};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,

    /// Route table; the built-in kino routes are used when empty
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Router behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Title applied when a route has none
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Whether static segments are matched case-sensitively (default: false)
    #[serde(default)]
    pub case_sensitive: bool,
}

/// One `[[routes]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub name: String,
    pub page: PageRef,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub meta: HashMap<String, String>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            case_sensitive: false,
        }
    }
}

impl From<&RouteConfig> for RouteDefinition {
    fn from(route: &RouteConfig) -> Self {
        let definition = RouteDefinition::new(&route.path, &route.name, route.page.clone())
            .with_metadata(route.meta.clone());
        match &route.title {
            Some(title) => definition.with_title(title),
            None => definition,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./kino.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("kino.toml")
    }

    pub fn options(&self) -> RouterOptions {
        RouterOptions {
            case_sensitive: self.router.case_sensitive,
        }
    }

    /// Route definitions in declaration order
    pub fn route_definitions(&self) -> Vec<RouteDefinition> {
        if self.routes.is_empty() {
            kino_routes()
        } else {
            self.routes.iter().map(RouteDefinition::from).collect()
        }
    }

    pub fn build_table(&self) -> crate::Result<RouteTable> {
        RouteTable::with_options(self.route_definitions(), self.options())
    }

    pub fn build_router(&self) -> crate::Result<Router> {
        let table = self.build_table()?;
        Ok(Router::new(Arc::new(table)).with_default_title(&self.router.default_title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.router.default_title, "Vue App");
        assert!(!config.router.case_sensitive);
        assert!(config.routes.is_empty());
        assert_eq!(config.route_definitions().len(), 5);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.router.default_title, "Vue App");
        assert!(config.build_table().is_ok());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("definitely/not/here/kino.toml").unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_custom_routes() {
        let toml = r#"
            [router]
            default_title = "Кино"
            case_sensitive = true

            [[routes]]
            path = "/"
            name = "home"
            page = "MovieSearch"
            title = "Поиск фильмов"

            [[routes]]
            path = "/series/:id"
            name = "series"
            page = "SeriesPage"
            [routes.meta]
            section = "series"

            [[routes]]
            path = "/:pathMatch(.*)*"
            name = "NotFound"
            page = "NotFound"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.router.default_title, "Кино");
        assert!(config.options().case_sensitive);

        let definitions = config.route_definitions();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0].title(), Some("Поиск фильмов"));
        assert_eq!(definitions[1].title(), None);
        assert_eq!(definitions[1].get_meta("section"), Some("series"));
        assert_eq!(definitions[1].page.as_str(), "SeriesPage");

        let router = config.build_router().unwrap();
        assert_eq!(router.default_title(), "Кино");
        assert_eq!(router.table().resolve("/series/9").name(), "series");
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let toml = r#"
            [[routes]]
            path = "/"
            name = "home"
            page = "MovieSearch"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.build_table().is_err());
    }
}
