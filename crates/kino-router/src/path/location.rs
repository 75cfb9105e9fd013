/// A requested location split into path, query and hash
///
/// Only the path takes part in route matching; query and hash are carried
/// through to the resolved route untouched.
///
/// # Examples
///
/// ```
/// use kino_router::path::Location;
///
/// let loc = Location::parse("/movie/42/?t=90#player");
/// assert_eq!(loc.path, "/movie/42");
/// assert_eq!(loc.query.as_deref(), Some("t=90"));
/// assert_eq!(loc.hash.as_deref(), Some("player"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Normalized path
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    /// Raw fragment without the leading `#`
    pub hash: Option<String>,
}

impl Location {
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };

        Self {
            path: super::normalize_path(path).into_owned(),
            query: query.filter(|q| !q.is_empty()),
            hash: hash.filter(|h| !h.is_empty()),
        }
    }

    /// Reassembles the location as `path?query#hash`
    pub fn to_href(&self) -> String {
        let mut href = self.path.clone();
        if let Some(query) = &self.query {
            href.push('?');
            href.push_str(query);
        }
        if let Some(hash) = &self.hash {
            href.push('#');
            href.push_str(hash);
        }
        href
    }
}
