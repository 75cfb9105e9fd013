/// Route definitions and path patterns
///
/// - `pattern`: parsing, matching and URL generation for path patterns
/// - `definition`: route table entries and resolution results
pub mod definition;
pub mod pattern;

pub use definition::{PageRef, ResolvedRoute, RouteDefinition};
pub use pattern::{Params, PathPattern, PatternRank, PatternSegment};
