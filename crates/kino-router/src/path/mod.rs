/// Location paths: canonical form and segment splitting
///
/// Route matching only ever sees canonical paths, `/` or `/a/b` with no
/// empty segments and no trailing separator.
use std::borrow::Cow;

pub mod location;
pub use location::Location;

fn is_canonical(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    path.starts_with('/')
        && !path.contains('\\')
        && path.split('/').skip(1).all(|segment| !segment.is_empty())
}

/// Rewrites a location path to its canonical form
///
/// Backslashes count as separators, empty segments are dropped and a missing
/// leading `/` is added. Canonical input comes back borrowed.
///
/// # Examples
///
/// ```
/// use kino_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/movie/42"), Cow::Borrowed("/movie/42")));
/// assert_eq!(normalize_path("movie//42/"), "/movie/42");
/// assert_eq!(normalize_path("\\contact"), "/contact");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let mut canonical = String::with_capacity(path.len() + 1);
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        canonical.push('/');
        canonical.push_str(segment);
    }

    if canonical.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(canonical)
    }
}

/// Splits a normalized path into its non-empty segments
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
