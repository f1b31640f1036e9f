/// Validated search query
///
/// Anything that reaches the matcher went through Query::parse first.

use crate::error::{FinderError, Result};
use std::fmt;

/// Longest accepted query, in characters
pub const MAX_QUERY_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    needle: String,
}

impl Query {
    /// Trim and validate raw user input
    pub fn parse(raw: &str) -> Result<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(FinderError::EmptyQuery);
        }
        if text.chars().count() > MAX_QUERY_LENGTH {
            return Err(FinderError::QueryTooLong(MAX_QUERY_LENGTH));
        }

        Ok(Self {
            text: text.to_string(),
            needle: text.to_lowercase(),
        })
    }

    /// The trimmed query as typed
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lowercased form used for case-insensitive matching
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_input() {
        let q = Query::parse("  Copy Files \n").unwrap();
        assert_eq!(q.as_str(), "Copy Files");
        assert_eq!(q.needle(), "copy files");
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(matches!(Query::parse(""), Err(FinderError::EmptyQuery)));
        assert!(matches!(Query::parse(" \t\n "), Err(FinderError::EmptyQuery)));
    }

    #[test]
    fn test_length_bound_counts_chars() {
        let max = "ż".repeat(MAX_QUERY_LENGTH);
        assert!(Query::parse(&max).is_ok());

        let over = "a".repeat(MAX_QUERY_LENGTH + 1);
        assert!(matches!(
            Query::parse(&over),
            Err(FinderError::QueryTooLong(MAX_QUERY_LENGTH))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_does_not_count() {
        let padded = format!("   {}   ", "a".repeat(MAX_QUERY_LENGTH));
        assert!(Query::parse(&padded).is_ok());
    }
}
