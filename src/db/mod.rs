/// Database module for cmd-finder
///
/// Record store adapter: holds the command catalog in SQLite via sqlx and
/// hands the full record set to the matcher.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats};
pub use models::*;
