/// Path pattern parsing, matching and URL generation
///
/// Patterns are written in the history-router style:
///
/// - `/top` — static segments
/// - `/movie/:kp_id` — named parameter (one non-empty segment)
/// - `/movie/:kp_id(\d+)` — parameter restricted by a regular expression
/// - `/search/:query?` — optional parameter
/// - `/docs/:rest(.*)+` — repeatable parameter, one or more trailing segments
/// - `/:pathMatch(.*)*` — repeatable parameter, zero or more trailing segments
///
/// A pattern made of a single zero-or-more segment that accepts anything is
/// the catch-all.
use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::path;

/// Captured parameters, parameter name → decoded value
pub type Params = HashMap<String, String>;

/// How many trailing segments a repeatable parameter consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `*` — zero or more
    ZeroOrMore,
    /// `+` — one or more
    OneOrMore,
}

/// Regular expression attached to a parameter segment
///
/// Compiled anchored, so it has to match the whole segment value. `.` also
/// matches newlines, since values are checked after percent-decoding.
#[derive(Debug, Clone)]
pub struct SegmentRegex {
    source: String,
    compiled: Regex,
}

impl SegmentRegex {
    fn new(source: &str) -> std::result::Result<Self, regex::Error> {
        let compiled = Regex::new(&format!("^(?s:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }

    fn accepts_anything(&self) -> bool {
        self.source == ".*"
    }
}

impl PartialEq for SegmentRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SegmentRegex {}

/// A single parsed pattern segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text
    Static(String),
    /// `:name`, `:name(re)`, `:name?`
    Param {
        name: String,
        regex: Option<SegmentRegex>,
        optional: bool,
    },
    /// `:name(re)*` or `:name(re)+`, always the last segment
    Repeatable {
        name: String,
        regex: Option<SegmentRegex>,
        repeat: Repeat,
    },
}

impl PatternSegment {
    fn param_name(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Param { name, .. } | Self::Repeatable { name, .. } => Some(name),
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Static(_) => false,
            Self::Param { regex, .. } | Self::Repeatable { regex, .. } => {
                regex.as_ref().map_or(true, |re| re.is_match(value))
            }
        }
    }
}

/// Classifies one raw segment of a pattern
///
/// # Examples
///
/// ```
/// use kino_router::route::pattern::{classify_segment, PatternSegment, Repeat};
///
/// assert_eq!(
///     classify_segment("top").unwrap(),
///     PatternSegment::Static("top".to_string())
/// );
///
/// let seg = classify_segment(":pathMatch(.*)*").unwrap();
/// assert!(matches!(seg, PatternSegment::Repeatable { repeat: Repeat::ZeroOrMore, .. }));
///
/// assert!(classify_segment(":").is_err());
/// assert!(classify_segment(":id(\\d+").is_err());
/// ```
pub fn classify_segment(segment: &str) -> std::result::Result<PatternSegment, String> {
    let Some(rest) = segment.strip_prefix(':') else {
        return Ok(PatternSegment::Static(segment.to_string()));
    };

    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (name, rest) = rest.split_at(name_len);
    if name.is_empty() {
        return Err(format!("parameter without a name in `{}`", segment));
    }

    let (regex, modifier) = match rest.strip_prefix('(') {
        Some(body) => {
            let close = find_closing_paren(body)
                .ok_or_else(|| format!("unbalanced parentheses in `{}`", segment))?;
            let source = &body[..close];
            let regex = SegmentRegex::new(source)
                .map_err(|e| format!("invalid regex for `{}`: {}", name, e))?;
            (Some(regex), &body[close + 1..])
        }
        None => (None, rest),
    };

    let name = name.to_string();
    match modifier {
        "" => Ok(PatternSegment::Param {
            name,
            regex,
            optional: false,
        }),
        "?" => Ok(PatternSegment::Param {
            name,
            regex,
            optional: true,
        }),
        "*" => Ok(PatternSegment::Repeatable {
            name,
            regex,
            repeat: Repeat::ZeroOrMore,
        }),
        "+" => Ok(PatternSegment::Repeatable {
            name,
            regex,
            repeat: Repeat::OneOrMore,
        }),
        other => Err(format!("unexpected `{}` after parameter `{}`", other, name)),
    }
}

/// Index of the `)` closing a group whose `(` was already consumed
fn find_closing_paren(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth == 0 => return Some(idx),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Matching precedence tier; lower tiers are tried first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatternRank {
    /// Only static segments
    Static,
    /// At least one single-segment parameter
    Dynamic,
    /// Ends in a repeatable parameter
    Repeatable,
}

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parses and validates a pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use kino_router::route::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/movie/:kp_id").unwrap();
    /// assert_eq!(pattern.param_names(), vec!["kp_id"]);
    /// assert!(!pattern.is_catch_all());
    ///
    /// assert!(PathPattern::parse("/:pathMatch(.*)*").unwrap().is_catch_all());
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        if !source.starts_with('/') {
            return Err(RouterError::config(format!(
                "pattern `{}` must start with `/`",
                source
            )));
        }

        let segments = path::segments(source)
            .into_iter()
            .map(classify_segment)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RouterError::config(format!("pattern `{}`: {}", source, e)))?;

        let mut seen: Vec<&str> = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            if matches!(segment, PatternSegment::Repeatable { .. }) && idx + 1 != segments.len() {
                return Err(RouterError::config(format!(
                    "pattern `{}`: repeatable parameter must be the last segment",
                    source
                )));
            }
            if let Some(name) = segment.param_name() {
                if seen.contains(&name) {
                    return Err(RouterError::config(format!(
                        "pattern `{}`: parameter `{}` appears twice",
                        source, name
                    )));
                }
                seen.push(name);
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Parameter names in declaration order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments.iter().filter_map(|s| s.param_name()).collect()
    }

    pub fn rank(&self) -> PatternRank {
        match self.segments.last() {
            Some(PatternSegment::Repeatable { .. }) => PatternRank::Repeatable,
            _ if self.segments.iter().any(|s| s.param_name().is_some()) => PatternRank::Dynamic,
            _ => PatternRank::Static,
        }
    }

    /// Whether this pattern matches every path
    pub fn is_catch_all(&self) -> bool {
        match self.segments.as_slice() {
            [PatternSegment::Repeatable {
                regex,
                repeat: Repeat::ZeroOrMore,
                ..
            }] => regex.as_ref().map_or(true, SegmentRegex::accepts_anything),
            _ => false,
        }
    }

    /// Matches pre-split path segments, returning captured parameters
    ///
    /// Captured values are percent-decoded before regex checks.
    pub fn matches(&self, path_segments: &[&str], case_sensitive: bool) -> Option<Params> {
        match_segments(&self.segments, path_segments, Params::new(), case_sensitive)
    }

    /// Builds a concrete path by substituting `params`
    ///
    /// `route` is only used to label errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use kino_router::route::PathPattern;
    /// use std::collections::HashMap;
    ///
    /// let pattern = PathPattern::parse("/movie/:kp_id").unwrap();
    /// let params = HashMap::from([("kp_id".to_string(), "7".to_string())]);
    /// assert_eq!(pattern.generate("player-page", &params).unwrap(), "/movie/7");
    /// assert!(pattern.generate("player-page", &HashMap::new()).is_err());
    /// ```
    pub fn generate(&self, route: &str, params: &Params) -> Result<String> {
        let missing = |param: &str| RouterError::MissingParameter {
            route: route.to_string(),
            param: param.to_string(),
        };
        let invalid = |param: &str, value: &str| RouterError::InvalidParameter {
            route: route.to_string(),
            param: param.to_string(),
            value: value.to_string(),
        };

        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                PatternSegment::Static(text) => parts.push(text.clone()),
                PatternSegment::Param { name, optional, .. } => {
                    match params.get(name).filter(|v| !v.is_empty()) {
                        Some(value) if segment.accepts(value) => {
                            parts.push(urlencoding::encode(value).into_owned())
                        }
                        Some(value) => return Err(invalid(name, value)),
                        None if *optional => {}
                        None => return Err(missing(name)),
                    }
                }
                PatternSegment::Repeatable { name, repeat, .. } => {
                    let pieces: Vec<&str> = params
                        .get(name)
                        .map(|v| path::segments(v))
                        .unwrap_or_default();
                    if pieces.is_empty() && *repeat == Repeat::OneOrMore {
                        return Err(missing(name));
                    }
                    for piece in pieces {
                        if !segment.accepts(piece) {
                            return Err(invalid(name, piece));
                        }
                        parts.push(urlencoding::encode(piece).into_owned());
                    }
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Tail-recursive walk over pattern and path segments
///
/// Optional parameters backtrack: the consuming branch is tried first.
fn match_segments(
    pattern: &[PatternSegment],
    path: &[&str],
    mut params: Params,
    case_sensitive: bool,
) -> Option<Params> {
    let Some((segment, pattern_rest)) = pattern.split_first() else {
        return path.is_empty().then_some(params);
    };

    match segment {
        PatternSegment::Static(text) => {
            let (head, path_rest) = path.split_first()?;
            let same = if case_sensitive {
                text == head
            } else {
                text.eq_ignore_ascii_case(head)
            };
            if !same {
                return None;
            }
            match_segments(pattern_rest, path_rest, params, case_sensitive)
        }
        PatternSegment::Param { name, optional, .. } => {
            if let Some((head, path_rest)) = path.split_first() {
                let value = decode(head);
                if segment.accepts(&value) {
                    let mut consumed = params.clone();
                    consumed.insert(name.clone(), value);
                    if let Some(found) =
                        match_segments(pattern_rest, path_rest, consumed, case_sensitive)
                    {
                        return Some(found);
                    }
                }
            }
            if *optional {
                match_segments(pattern_rest, path, params, case_sensitive)
            } else {
                None
            }
        }
        PatternSegment::Repeatable { name, repeat, .. } => {
            if path.is_empty() && *repeat == Repeat::OneOrMore {
                return None;
            }
            let values: Vec<String> = path.iter().map(|s| decode(s)).collect();
            if !values.iter().all(|v| segment.accepts(v)) {
                return None;
            }
            params.insert(name.clone(), values.join("/"));
            Some(params)
        }
    }
}
