//! Recent searches.
//!
//! A short, most-recent-first list of committed queries kept in
//! `recent_searches.json` under the data dir. Loading is forgiving (missing or
//! corrupt file means "no history"); writes go through a temp file so a crash
//! mid-write never leaves a truncated list behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::search::driver::RecentSink;

/// How many entries are kept.
pub const RECENT_CAP: usize = 5;

const FILE_NAME: &str = "recent_searches.json";

pub fn recent_path_for(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAME)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct RecentFile {
    #[serde(default)]
    entries: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecentSearches {
    path: PathBuf,
    entries: Vec<String>,
}

impl RecentSearches {
    /// Load from `path`; any read or parse failure yields an empty list.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<RecentFile>(&content) {
                Ok(file) => file.entries,
                Err(e) => {
                    debug!(path = %path.display(), "ignoring unreadable recent searches: {e}");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        let mut recent = Self {
            path,
            entries: Vec::new(),
        };
        // Re-apply the policy in case the file was edited by hand.
        for entry in entries.into_iter().rev() {
            recent.push(&entry);
        }
        recent
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `query` to the front, dropping duplicates and anything past the cap.
    pub fn push(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|e| e != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(RECENT_CAP);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating recent searches directory {}", parent.display()))?;

        let json = serde_json::to_string_pretty(&RecentFile {
            entries: self.entries.clone(),
        })?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("creating temp file in {}", parent.display()))?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl RecentSink for RecentSearches {
    fn record_recent(&mut self, query: &str) -> Result<()> {
        self.push(query);
        self.save()
    }
}
