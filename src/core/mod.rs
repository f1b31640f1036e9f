/// Core functionality modules
///
/// Query validation, matching, catalog search, the working-set builder
/// and the session context that ties them together.

pub mod matcher;
pub mod query;
pub mod searcher;
pub mod session;
pub mod working_set;

pub use matcher::{MatchResult, Matcher};
pub use query::{Query, MAX_QUERY_LENGTH};
pub use searcher::{BrowsePage, Searcher, StoreHealth};
pub use session::{Session, SessionSummary};
pub use working_set::{script_file_name, Artifact, WorkingSet};
