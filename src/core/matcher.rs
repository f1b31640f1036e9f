/// Multi-field substring matcher
///
/// A record matches when the query is a case-insensitive substring of its
/// label, description, details, or any keyword. Results come back in
/// catalog order (ascending id); there is no relevance scoring.

use crate::core::Query;
use crate::db::Record;
use serde::Serialize;
use std::time::Duration;

/// Stateless matcher, safe to share across tasks
pub struct Matcher;

impl Matcher {
    /// Search `records` for `query`, returning at most `limit` matches
    ///
    /// # Arguments
    /// * `query` - Validated query
    /// * `records` - Full record set, in any order
    /// * `limit` - Maximum results; excess matches are dropped
    ///
    /// # Returns
    /// * Matches sorted by ascending id
    pub fn search(query: &Query, records: &[Record], limit: usize) -> Vec<Record> {
        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|record| Self::matches(query, record))
            .collect();

        matched.sort_by_key(|record| record.id);
        matched.into_iter().take(limit).cloned().collect()
    }

    /// Does any searchable field contain the query?
    pub fn matches(query: &Query, record: &Record) -> bool {
        let needle = query.needle();
        let contains = |field: &str| field.to_lowercase().contains(needle);

        contains(&record.command)
            || contains(&record.description)
            || record.details.as_deref().is_some_and(contains)
            || record.keywords.iter().any(|k| contains(k))
    }
}

/// Result of a timed search
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub records: Vec<Record>,
    pub count: usize,
    /// Display only
    pub search_time: Duration,
}

impl MatchResult {
    pub fn new(records: Vec<Record>, search_time: Duration) -> Self {
        Self {
            count: records.len(),
            records,
            search_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Labels of the matched records, in result order
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.command.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(raw: &str) -> Query {
        Query::parse(raw).unwrap()
    }

    fn catalog() -> Vec<Record> {
        vec![
            Record::new(1, "dir", "list directory contents"),
            Record::new(2, "copy", "copy files"),
            Record::new(3, "ipconfig", "Show network adapter settings")
                .with_keywords(["TCP/IP", "dhcp"]),
            Record::new(4, "systeminfo", "Display OS configuration")
                .with_details("Prints hardware, hotfix and uptime information"),
        ]
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_description_substring() {
        let results = Matcher::search(&q("file"), &catalog(), 20);
        assert_eq!(ids(&results), vec![2]);
    }

    #[test]
    fn test_case_insensitive_on_every_field() {
        let records = catalog();
        assert_eq!(ids(&Matcher::search(&q("DIR"), &records, 20)), vec![1]);
        assert_eq!(ids(&Matcher::search(&q("Network"), &records, 20)), vec![3]);
        assert_eq!(ids(&Matcher::search(&q("tcp/ip"), &records, 20)), vec![3]);
        assert_eq!(ids(&Matcher::search(&q("HOTFIX"), &records, 20)), vec![4]);
    }

    #[test]
    fn test_any_field_is_enough() {
        // "con": dir via description, ipconfig via label, systeminfo via description
        let results = Matcher::search(&q("con"), &catalog(), 20);
        assert_eq!(ids(&results), vec![1, 3, 4]);
    }

    #[test]
    fn test_syntax_and_category_are_not_searched() {
        let mut record = Record::new(9, "cls", "Clear the screen");
        record.syntax = "cls [/x]".to_string();
        record.category = Some("terminal".to_string());

        assert!(!Matcher::matches(&q("/x"), &record));
        assert!(!Matcher::matches(&q("terminal"), &record));
    }

    #[test]
    fn test_orders_by_id_regardless_of_input_order() {
        let mut records = catalog();
        records.reverse();

        let results = Matcher::search(&q("s"), &records, 20);
        let got = ids(&results);
        let mut sorted = got.clone();
        sorted.sort();
        assert_eq!(got, sorted);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn test_limit_truncates_silently() {
        let records: Vec<Record> = (1..=30)
            .rev()
            .map(|i| Record::new(i, format!("cmd{}", i), "batch helper"))
            .collect();

        let results = Matcher::search(&q("helper"), &records, 8);
        assert_eq!(ids(&results), (1..=8).collect::<Vec<_>>());

        assert!(Matcher::search(&q("helper"), &records, 0).is_empty());
    }

    #[test]
    fn test_no_match_and_empty_catalog() {
        assert!(Matcher::search(&q("zzz"), &catalog(), 20).is_empty());
        assert!(Matcher::search(&q("dir"), &[], 20).is_empty());
    }

    #[test]
    fn test_match_iff_some_field_contains_query() {
        let records = catalog();
        for raw in ["a", "in", "co", "dhcp", "os", "x", "list d", "files"] {
            let query = q(raw);
            let results = Matcher::search(&query, &records, usize::MAX);
            for record in &records {
                let needle = raw.to_lowercase();
                let expected = record.command.to_lowercase().contains(&needle)
                    || record.description.to_lowercase().contains(&needle)
                    || record
                        .details
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || record
                        .keywords
                        .iter()
                        .any(|k| k.to_lowercase().contains(&needle));
                assert_eq!(
                    results.iter().any(|r| r.id == record.id),
                    expected,
                    "query {:?} record {}",
                    raw,
                    record.id
                );
            }
        }
    }

    #[test]
    fn test_match_result_count() {
        let records = Matcher::search(&q("file"), &catalog(), 20);
        let result = MatchResult::new(records, Duration::from_millis(3));
        assert_eq!(result.count, 1);
        assert_eq!(result.labels(), vec!["copy"]);
    }
}
