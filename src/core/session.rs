/// User session context
///
/// Owns everything that lives for one sitting: the working set and the last
/// result list. Created with `Session::start`, torn down with `Session::end`.

use crate::core::{Artifact, MatchResult, Query, Searcher, WorkingSet};
use crate::db::Record;
use crate::error::{FinderError, Result};
use chrono::{DateTime, Local};
use tracing::debug;

/// What a session leaves behind when it ends
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub searches: usize,
    pub commands_collected: usize,
}

pub struct Session {
    started_at: DateTime<Local>,
    working_set: WorkingSet,
    last_result: Option<MatchResult>,
    searches: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::start()
    }
}

impl Session {
    /// Begin a session with an empty working set
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            working_set: WorkingSet::default(),
            last_result: None,
            searches: 0,
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn last_result(&self) -> Option<&MatchResult> {
        self.last_result.as_ref()
    }

    /// Run a primary search
    ///
    /// Validation happens before the store is touched. A failed search
    /// leaves the previous result in place.
    pub async fn search(&mut self, searcher: &Searcher, raw: &str) -> Result<&MatchResult> {
        let query = Query::parse(raw)?;
        let result = searcher.search_all(&query).await?;

        self.searches += 1;
        Ok(self.last_result.insert(result))
    }

    /// Add a record to the working set
    pub fn add(&mut self, record: Record) -> bool {
        let inserted = self.working_set.add(record);
        debug!(inserted, size = self.working_set.len(), "working set add");
        inserted
    }

    /// Add a record from the last search result by id
    pub fn add_from_results(&mut self, id: i64) -> Result<bool> {
        let record = self
            .last_result
            .as_ref()
            .and_then(|r| r.records.iter().find(|rec| rec.id == id))
            .cloned()
            .ok_or(FinderError::RecordNotFound(id))?;

        Ok(self.add(record))
    }

    pub fn remove(&mut self, id: i64) -> Option<Record> {
        self.working_set.remove(id)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.working_set.set_name(name);
    }

    /// Explicit user reset: empties the working set and forgets the results
    pub fn clear(&mut self) {
        self.working_set.clear();
        self.last_result = None;
    }

    /// Render the working set for download or copy
    pub fn export(&self) -> Result<Artifact> {
        self.working_set.export(Local::now())
    }

    /// Tear the session down
    pub fn end(self) -> SessionSummary {
        SessionSummary {
            started_at: self.started_at,
            ended_at: Local::now(),
            searches: self.searches,
            commands_collected: self.working_set.len(),
        }
    }
}
