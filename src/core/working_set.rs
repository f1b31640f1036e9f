/// Working set: the commands a user has picked, rendered as a batch script
///
/// Members are unique by record id and keep insertion order.

use crate::db::Record;
use crate::error::{FinderError, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_SCRIPT_NAME: &str = "my_script";
const SCRIPT_EXTENSION: &str = ".bat";
const LINE_END: &str = "\r\n";
const RULE: &str = "REM ==================================================";

fn unsafe_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern is a literal, compiling it cannot fail
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap())
}

/// Rendered script ready to save or copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    /// Write the script into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct WorkingSet {
    name: String,
    members: Vec<Record>,
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_NAME)
    }
}

impl WorkingSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn members(&self) -> &[Record] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.members.iter().any(|r| r.id == id)
    }

    /// Append `record` unless a member with the same id is already present
    ///
    /// Returns whether the record was inserted.
    pub fn add(&mut self, record: Record) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.members.push(record);
        true
    }

    /// Remove the member with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: i64) -> Option<Record> {
        let index = self.members.iter().position(|r| r.id == id)?;
        Some(self.members.remove(index))
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Render the script text
    ///
    /// Output depends only on the members, the name and `generated_at`.
    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        let mut lines: Vec<String> = vec![
            "@echo off".to_string(),
            RULE.to_string(),
            format!("REM Script: {}", single_line(&self.name)),
            format!("REM Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("REM Commands: {}", self.members.len()),
            RULE.to_string(),
            String::new(),
        ];

        for record in &self.members {
            lines.push(format!("REM {}", single_line(&record.description)));
            lines.push(record.command.clone());
            lines.push(String::new());
        }

        lines.push(RULE.to_string());
        lines.push("REM End of script".to_string());
        lines.push(RULE.to_string());
        lines.push("pause".to_string());

        let mut out = lines.join(LINE_END);
        out.push_str(LINE_END);
        out
    }

    /// Render for download; refuses an empty working set
    pub fn export(&self, generated_at: DateTime<Local>) -> Result<Artifact> {
        if self.is_empty() {
            return Err(FinderError::EmptyWorkingSet);
        }

        Ok(Artifact {
            file_name: script_file_name(&self.name),
            contents: self.render(generated_at),
        })
    }
}

/// Turn a user-chosen name into a safe `.bat` file name
pub fn script_file_name(name: &str) -> String {
    let cleaned = unsafe_filename_chars().replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_matches(|c| c == '_' || c == '.');
    let stem = if cleaned.is_empty() {
        DEFAULT_SCRIPT_NAME
    } else {
        cleaned
    };

    let lower = stem.to_lowercase();
    if lower.ends_with(".bat") || lower.ends_with(".cmd") {
        stem.to_string()
    } else {
        format!("{}{}", stem, SCRIPT_EXTENSION)
    }
}

// Comment lines must not spill onto a second line of the script
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn dir() -> Record {
        Record::new(1, "dir", "list directory contents")
    }

    fn copy() -> Record {
        Record::new(2, "copy", "copy files")
    }

    fn ids(set: &WorkingSet) -> Vec<i64> {
        set.members().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_add_is_idempotent_and_keeps_first_position() {
        let mut set = WorkingSet::default();

        assert!(set.add(copy()));
        assert!(set.add(dir()));
        assert!(!set.add(copy()));

        assert_eq!(ids(&set), vec![2, 1]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut set = WorkingSet::default();
        set.add(copy());
        set.add(dir());
        set.add(Record::new(3, "del", "delete files"));

        let removed = set.remove(1).unwrap();
        assert_eq!(removed.command, "dir");
        assert_eq!(ids(&set), vec![2, 3]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = WorkingSet::default();
        set.add(copy());
        set.add(dir());

        assert!(set.remove(42).is_none());
        assert_eq!(ids(&set), vec![2, 1]);
    }

    #[test]
    fn test_scenario_add_remove_render() {
        let mut set = WorkingSet::new("cleanup");
        set.add(copy());
        set.add(dir());
        set.add(copy());
        assert_eq!(ids(&set), vec![2, 1]);

        set.remove(2);
        assert_eq!(ids(&set), vec![1]);

        let script = set.render(fixed_time());
        assert_eq!(script.matches("REM list directory contents").count(), 1);
        assert_eq!(script.lines().filter(|l| l.trim_end() == "dir").count(), 1);
        assert!(!script.contains("copy"));
        assert!(script.contains("REM Commands: 1"));
        assert!(script.contains("REM Script: cleanup"));
        assert!(script.contains("REM Generated: 2025-03-14 09:26:53"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut set = WorkingSet::new("net");
        set.add(dir());
        set.add(copy());

        assert_eq!(set.render(fixed_time()), set.render(fixed_time()));
    }

    #[test]
    fn test_render_layout() {
        let mut set = WorkingSet::new("demo");
        set.add(dir());

        let script = set.render(fixed_time());
        let lines: Vec<&str> = script.split("\r\n").collect();

        assert_eq!(lines[0], "@echo off");
        assert_eq!(lines[7], "REM list directory contents");
        assert_eq!(lines[8], "dir");
        assert!(script.ends_with("pause\r\n"));
    }

    #[test]
    fn test_multiline_description_stays_a_comment() {
        let mut set = WorkingSet::default();
        set.add(Record::new(5, "robocopy", "Robust copy\nwith retries"));

        let script = set.render(fixed_time());
        assert!(script.contains("REM Robust copy with retries\r\nrobocopy"));
    }

    #[test]
    fn test_render_empty_is_valid_but_export_is_not() {
        let set = WorkingSet::default();

        assert!(set.render(fixed_time()).contains("REM Commands: 0"));
        assert!(matches!(
            set.export(fixed_time()),
            Err(FinderError::EmptyWorkingSet)
        ));
    }

    #[test]
    fn test_export_and_write() {
        let mut set = WorkingSet::new("My Backup Script");
        set.add(copy());

        let artifact = set.export(fixed_time()).unwrap();
        assert_eq!(artifact.file_name, "My_Backup_Script.bat");

        let dir = tempfile::tempdir().unwrap();
        let path = artifact.write_to(dir.path()).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, artifact.contents);
    }

    #[test]
    fn test_script_file_name() {
        assert_eq!(script_file_name("backup"), "backup.bat");
        assert_eq!(script_file_name("deploy.CMD"), "deploy.CMD");
        assert_eq!(script_file_name("../../etc/passwd"), "etc_passwd.bat");
        assert_eq!(script_file_name("   "), "my_script.bat");
        assert_eq!(script_file_name("???"), "my_script.bat");
    }
}
