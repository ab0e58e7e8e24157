use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Typechange,
}

impl ChangeStatus {
    /// Single-letter code as printed by `git diff --name-status`.
    pub fn letter(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Renamed => 'R',
            ChangeStatus::Copied => 'C',
            ChangeStatus::Typechange => 'T',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Renamed => "renamed",
            ChangeStatus::Copied => "copied",
            ChangeStatus::Typechange => "typechange",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_file_name: Option<String>,
    pub status: ChangeStatus,
    pub additions: usize,
    pub deletions: usize,
    pub is_binary: bool,
    pub language: String,
    pub scan_profile: String,
    pub diff: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}

impl LanguageStats {
    pub fn add_file(&mut self, f: &FileDiff) {
        self.files += 1;
        self.additions += f.additions;
        self.deletions += f.deletions;
    }

    pub fn lines_changed(&self) -> usize {
        self.additions + self.deletions
    }
}

/// Everything one commit changed, relative to its first parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDiff {
    pub commit_hash: String,
    pub short_hash: String,
    pub author: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub parent_hashes: Vec<String>,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub languages: IndexMap<String, LanguageStats>,
    pub file_diffs: Vec<FileDiff>,
}

impl CommitDiff {
    /// Builds the aggregate counters from the per-file diffs so they can never
    /// disagree with `file_diffs`.
    pub fn from_parts(header: CommitHeader, file_diffs: Vec<FileDiff>) -> Self {
        let mut languages: IndexMap<String, LanguageStats> = IndexMap::new();
        for f in &file_diffs {
            languages.entry(f.language.clone()).or_default().add_file(f);
        }
        // Busiest languages first, ties by name
        languages.sort_by(|ka, a, kb, b| {
            b.lines_changed()
                .cmp(&a.lines_changed())
                .then_with(|| ka.cmp(kb))
        });

        CommitDiff {
            short_hash: header.hash.chars().take(7).collect(),
            commit_hash: header.hash,
            author: header.author,
            email: header.email,
            message: header.message,
            timestamp: header.timestamp,
            parent_hashes: header.parent_hashes,
            files_changed: file_diffs.len(),
            insertions: file_diffs.iter().map(|f| f.additions).sum(),
            deletions: file_diffs.iter().map(|f| f.deletions).sum(),
            languages,
            file_diffs,
        }
    }

    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Commit metadata, before the diff is attached.
#[derive(Debug, Clone)]
pub struct CommitHeader {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub parent_hashes: Vec<String>,
}
