//! # Kino Router
//!
//! Client-side route resolution and navigation lifecycle for the kino movie site.
//!
//! - Static routes (`/top`)
//! - Dynamic parameters (`/movie/:kp_id`), optionally restricted by a regex (`:kp_id(\d+)`)
//! - Optional parameters (`/top/:page?`)
//! - Repeatable tails and the catch-all (`/:pathMatch(.*)*`)
//! - Named routes with URL generation
//! - A `before_each` hook that runs before every navigation commits
//!
//! ## Resolution order
//!
//! 1. Static routes, in declaration order
//! 2. Parameterized routes, in declaration order
//! 3. Repeatable routes, ending with the catch-all
//!
//! Registration rejects duplicate names and a catch-all that is not declared
//! last, so resolution is total: every location maps to exactly one route.
//!
//! ## Example
//!
//! ```
//! use kino_router::{kino_routes, title_hook, DocumentTitle, Router};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let router = Router::from_definitions(kino_routes()).unwrap();
//! let document = Rc::new(RefCell::new(DocumentTitle::new()));
//! router.before_each(title_hook(document.clone()));
//!
//! let resolved = router.navigate("/movie/42").unwrap();
//! assert_eq!(resolved.name(), "player-page");
//! assert_eq!(resolved.param("kp_id"), Some("42"));
//! assert_eq!(document.borrow().current(), Some("Просмотр фильма"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod app;
pub mod config;
mod error;
mod navigation;
pub mod path;
mod presentation;
pub mod route;
mod table;

pub use app::{kino_routes, pages, KINO_ROUTES};
pub use config::Config;
pub use error::{Result, RouterError};
pub use navigation::{NavigationEvent, NavigationPhase, Proceed, Router, DEFAULT_TITLE};
pub use path::{normalize_path, Location};
pub use presentation::{title_hook, DocumentTitle, PresentationContext};
pub use route::{PageRef, Params, PathPattern, ResolvedRoute, RouteDefinition};
pub use table::{RouteTable, RouterOptions};
