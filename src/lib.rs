/// cmd-finder library
///
/// Search a command catalog, get live suggestions while typing, and collect
/// picked commands into a downloadable batch script.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod http;
pub mod suggest;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{FinderError, Result};

/// Canned searches offered on the start screen
pub const QUICK_SEARCHES: &[(&str, &str)] = &[
    ("file", "File operations"),
    ("network", "Network commands"),
    ("system", "System tools"),
];
