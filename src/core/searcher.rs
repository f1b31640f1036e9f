/// Catalog searcher
///
/// Loads the record set from the store for each request and runs the
/// matcher over it.

use crate::config::{SearchConfig, DEFAULT_SUGGESTION_LIMIT};
use crate::core::{MatchResult, Matcher, Query};
use crate::db::{Database, Record};
use crate::error::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// One page of the catalog plus the total size of the catalog
#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub records: Vec<Record>,
    pub total: i64,
}

/// Connectivity of the record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    Connected,
    Disconnected(String),
}

impl StoreHealth {
    pub fn is_connected(&self) -> bool {
        matches!(self, StoreHealth::Connected)
    }
}

/// Handles catalog searching
pub struct Searcher {
    db: Arc<Database>,
    limits: SearchConfig,
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new(db: Arc<Database>, limits: SearchConfig) -> Self {
        Self { db, limits }
    }

    pub fn limits(&self) -> &SearchConfig {
        &self.limits
    }

    /// Search the catalog
    ///
    /// # Arguments
    /// * `query` - Validated query
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(MatchResult)` - Matches in ascending id order, with timing
    pub async fn search(&self, query: &Query, limit: usize) -> Result<MatchResult> {
        let started = Instant::now();

        let records = self.db.all_records().await?;
        let matched = Matcher::search(query, &records, limit);

        let result = MatchResult::new(matched, started.elapsed());
        debug!(
            query = %query,
            count = result.count,
            elapsed_ms = result.search_time.as_millis() as u64,
            "search finished"
        );

        Ok(result)
    }

    /// Explicit search with the configured search bound
    pub async fn search_all(&self, query: &Query) -> Result<MatchResult> {
        self.search(query, self.limits.search_limit).await
    }

    /// Short preview used by the suggestion dropdown
    pub async fn preview(&self, query: &Query) -> Result<Vec<String>> {
        let limit = self.limits.suggestion_limit.min(DEFAULT_SUGGESTION_LIMIT);
        let result = self.search(query, limit).await?;
        Ok(result.labels())
    }

    /// First page of the catalog for the initial view
    pub async fn browse(&self) -> Result<BrowsePage> {
        let records = self.db.browse_records(self.limits.browse_limit as i64).await?;
        let total = self.db.count_records().await?;

        Ok(BrowsePage { records, total })
    }

    /// Look up one record by id
    pub async fn get(&self, id: i64) -> Result<Option<Record>> {
        self.db.get_record_by_id(id).await
    }

    /// Check that the record store answers
    pub async fn health(&self) -> StoreHealth {
        match self.db.ping().await {
            Ok(()) => StoreHealth::Connected,
            Err(e) => {
                warn!(error = %e, "record store health check failed");
                StoreHealth::Disconnected(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewRecord;

    async fn setup() -> Searcher {
        let db = Arc::new(Database::new_test().await.unwrap());

        db.import_records(vec![
            NewRecord::new("dir", "list directory contents"),
            NewRecord::new("copy", "copy files"),
            NewRecord {
                keywords: vec!["network".to_string()],
                ..NewRecord::new("ping", "Test reachability of a host")
            },
        ])
        .await
        .unwrap();

        Searcher::new(db, SearchConfig::default())
    }

    #[tokio::test]
    async fn test_search_scenario() {
        let searcher = setup().await;

        let query = Query::parse("file").unwrap();
        let result = searcher.search(&query, 20).await.unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.records[0].id, 2);
        assert_eq!(result.records[0].command, "copy");
    }

    #[tokio::test]
    async fn test_search_by_keyword() {
        let searcher = setup().await;

        let query = Query::parse("NETWORK").unwrap();
        let result = searcher.search_all(&query).await.unwrap();
        assert_eq!(result.labels(), vec!["ping"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let searcher = setup().await;

        let query = Query::parse("format c:").unwrap();
        let result = searcher.search_all(&query).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn test_preview_respects_suggestion_limit() {
        let db = Arc::new(Database::new_test().await.unwrap());
        let inputs = (1..=12)
            .map(|i| NewRecord::new(format!("net{}", i), "network helper"))
            .collect();
        db.import_records(inputs).await.unwrap();
        let searcher = Searcher::new(db, SearchConfig::default());

        let labels = searcher.preview(&Query::parse("net").unwrap()).await.unwrap();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "net1");
    }

    #[tokio::test]
    async fn test_preview_never_exceeds_eight_labels() {
        let db = Arc::new(Database::new_test().await.unwrap());
        let inputs = (1..=12)
            .map(|i| NewRecord::new(format!("net{}", i), "network helper"))
            .collect();
        db.import_records(inputs).await.unwrap();
        let limits = SearchConfig {
            suggestion_limit: 50,
            ..SearchConfig::default()
        };
        let searcher = Searcher::new(db, limits);

        let labels = searcher.preview(&Query::parse("net").unwrap()).await.unwrap();
        assert_eq!(labels.len(), DEFAULT_SUGGESTION_LIMIT);
    }

    #[tokio::test]
    async fn test_browse_and_health() {
        let searcher = setup().await;

        let page = searcher.browse().await.unwrap();
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.total, 3);

        assert_eq!(searcher.health().await, StoreHealth::Connected);
    }

    #[tokio::test]
    async fn test_health_reports_closed_store() {
        let db = Arc::new(Database::new_test().await.unwrap());
        let searcher = Searcher::new(Arc::clone(&db), SearchConfig::default());

        db.close().await;
        assert!(!searcher.health().await.is_connected());
        assert!(searcher.browse().await.is_err());
    }
}
