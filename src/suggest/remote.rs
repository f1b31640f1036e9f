/// Catalog access over HTTP
///
/// Talks to a running `cmd-finder serve` through `POST /records/search`.
/// Previews and full searches share the endpoint; anything that goes wrong
/// between here and the server comes back as `FinderError::Transport`.

use crate::error::{FinderError, Result};
use crate::http::handlers::SearchResponse;
use crate::suggest::SuggestionSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

pub struct RemoteSource {
    client: Client,
    search_url: String,
}

impl RemoteSource {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cmd-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FinderError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url: format!("{}/records/search", base_url.trim_end_matches('/')),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Run a full search on the server
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let response = self
            .client
            .post(&self.search_url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| FinderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinderError::Transport(format!(
                "server answered {}: {}",
                status,
                body.trim()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| FinderError::Transport(format!("unreadable response: {}", e)))?;
        debug!(query, count = body.count, "remote search finished");

        Ok(body)
    }
}

#[async_trait]
impl SuggestionSource for RemoteSource {
    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let response = self.search(query).await?;
        Ok(response.records.into_iter().map(|r| r.command).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::core::Searcher;
    use crate::db::{Database, NewRecord};
    use crate::http::{router, AppState};
    use crate::suggest::spawn_controller;
    use std::sync::Arc;

    /// Serve a small catalog on an ephemeral port
    async fn serve_catalog() -> (String, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());
        db.import_records(vec![
            NewRecord::new("netstat", "Show network connections"),
            NewRecord::new("dir", "list directory contents"),
            NewRecord::new("net use", "Map a network drive"),
        ])
        .await
        .unwrap();

        let app = router(Arc::new(AppState {
            searcher: Searcher::new(Arc::clone(&db), SearchConfig::default()),
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), db)
    }

    async fn dead_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_search_url_joins_cleanly() {
        let source = RemoteSource::new("http://localhost:5000/").unwrap();
        assert_eq!(source.search_url(), "http://localhost:5000/records/search");
    }

    #[tokio::test]
    async fn test_remote_search_and_suggest() {
        let (url, _db) = serve_catalog().await;
        let source = RemoteSource::new(&url).unwrap();

        let response = source.search("network").await.unwrap();
        assert_eq!(response.count, 2);

        let labels = source.suggest("NETWORK").await.unwrap();
        assert_eq!(labels, vec!["netstat", "net use"]);
    }

    #[tokio::test]
    async fn test_rejected_query_is_transport_error() {
        let (url, _db) = serve_catalog().await;
        let source = RemoteSource::new(&url).unwrap();

        match source.search(&"a".repeat(201)).await {
            Err(FinderError::Transport(msg)) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("Invalid search query"));
            }
            other => panic!("Expected Transport error, got {:?}", other.map(|r| r.count)),
        }
    }

    #[tokio::test]
    async fn test_server_failure_is_transport_error() {
        let (url, db) = serve_catalog().await;
        let source = RemoteSource::new(&url).unwrap();
        db.close().await;

        let err = source.suggest("dir").await.unwrap_err();
        assert!(matches!(err, FinderError::Transport(ref msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let source = RemoteSource::new(&dead_url().await).unwrap();

        let err = source.search("dir").await.unwrap_err();
        assert!(matches!(err, FinderError::Transport(_)));
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn test_controller_over_http() {
        let (url, _db) = serve_catalog().await;
        let config = SearchConfig {
            debounce_ms: 10,
            ..SearchConfig::default()
        };
        let handle = spawn_controller(Arc::new(RemoteSource::new(&url).unwrap()), &config);

        let view = handle.settle("net").await.unwrap();
        assert!(view.visible);
        assert_eq!(view.suggestions, vec!["netstat", "net use"]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_controller_hides_transport_failure() {
        let config = SearchConfig {
            debounce_ms: 10,
            ..SearchConfig::default()
        };
        let source = RemoteSource::new(&dead_url().await).unwrap();
        let handle = spawn_controller(Arc::new(source), &config);

        let view = handle.settle("net").await.unwrap();
        assert!(!view.visible);
        assert!(view.suggestions.is_empty());

        handle.shutdown().await;
    }
}
