//! The kino site's route table

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::route::RouteDefinition;
use crate::table::RouteTable;

/// Page components of the site
pub mod pages {
    pub const MOVIE_SEARCH: &str = "MovieSearch";
    pub const TOP_MOVIES: &str = "TopMovies";
    pub const PLAYER_PAGE: &str = "PlayerPage";
    pub const CONTACTS_PAGE: &str = "ContactsPage";
    pub const NOT_FOUND: &str = "NotFound";
}

/// Fresh definitions of the site's routes, in declaration order
pub fn kino_routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new("/", "home", pages::MOVIE_SEARCH).with_title("Поиск фильмов"),
        RouteDefinition::new("/top", "top-movies", pages::TOP_MOVIES).with_title("Топ фильмов"),
        RouteDefinition::new("/movie/:kp_id", "player-page", pages::PLAYER_PAGE)
            .with_title("Просмотр фильма"),
        RouteDefinition::new("/contact", "ContactsPage", pages::CONTACTS_PAGE)
            .with_title("Контакты"),
        RouteDefinition::new("/:pathMatch(.*)*", "NotFound", pages::NOT_FOUND)
            .with_title("404 - Страница не найдена"),
    ]
}

/// Shared, process-wide table built from [`kino_routes`]
pub static KINO_ROUTES: Lazy<Arc<RouteTable>> = Lazy::new(|| {
    Arc::new(RouteTable::new(kino_routes()).expect("built-in route table is valid"))
});
