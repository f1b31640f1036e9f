/// Where suggestion previews come from
///
/// The driver only needs labels for a query; the searcher provides them
/// locally, tests plug in scripted sources.

use crate::core::{Query, Searcher};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Labels of the records matching `query`, in result order
    async fn suggest(&self, query: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl SuggestionSource for Searcher {
    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let query = Query::parse(query)?;
        self.preview(&query).await
    }
}
