/// Data models for catalog entities
///
/// `RecordRow` maps the `records` table; `Record` is the read-only view the
/// rest of the crate works with.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Separator between the snippet and the note of a stored usage example
pub const EXAMPLE_DELIMITER: char = '|';

/// Raw row from the records table
#[derive(Debug, Clone, FromRow)]
pub struct RecordRow {
    pub id: i64,
    pub command: String,
    pub description: String,
    pub details: Option<String>,
    pub syntax: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub keywords: String, // JSON array
    pub examples: String, // JSON array of "snippet | note"
}

/// A catalog entry: one command with its documentation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    /// The invocable string, e.g. `xcopy`
    pub command: String,
    pub description: String,
    pub details: Option<String>,
    pub syntax: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub keywords: Vec<String>,
    pub examples: Vec<UsageExample>,
}

impl Record {
    /// Build a record with only the required fields set
    pub fn new(id: i64, command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            command: command.into(),
            description: description.into(),
            details: None,
            syntax: String::new(),
            category: None,
            difficulty: None,
            keywords: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        // Malformed JSON columns degrade to empty lists, same as absent ones
        let keywords: Vec<String> = serde_json::from_str(&row.keywords).unwrap_or_default();
        let raw_examples: Vec<String> = serde_json::from_str(&row.examples).unwrap_or_default();

        Self {
            id: row.id,
            command: row.command,
            description: row.description,
            details: row.details.filter(|d| !d.trim().is_empty()),
            syntax: row.syntax,
            category: row.category,
            difficulty: row.difficulty,
            keywords,
            examples: raw_examples
                .iter()
                .map(|raw| UsageExample::parse(raw))
                .collect(),
        }
    }
}

/// One usage example: a snippet and an optional explanation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageExample {
    pub snippet: String,
    pub note: Option<String>,
}

impl UsageExample {
    /// Split a stored `"snippet | note"` string on the first delimiter
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(EXAMPLE_DELIMITER) {
            Some((snippet, note)) => {
                let note = note.trim();
                Self {
                    snippet: snippet.trim().to_string(),
                    note: (!note.is_empty()).then(|| note.to_string()),
                }
            }
            None => Self {
                snippet: raw.trim().to_string(),
                note: None,
            },
        }
    }
}

/// Input for inserting a new record (catalog import)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub command: String,
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub syntax: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl NewRecord {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            details: None,
            syntax: String::new(),
            category: None,
            difficulty: None,
            keywords: Vec::new(),
            examples: Vec::new(),
        }
    }
}
