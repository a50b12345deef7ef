use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    #[serde(default)]
    pub shots: u32,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub time_secs: f64,
    /// `YYYY-MM-DD`, UTC.
    #[serde(default)]
    pub date: String,
}

fn default_mode() -> String {
    "classic".to_string()
}

/// Bounded high-score list, highest first, optionally backed by a JSON file.
#[derive(Debug)]
pub struct ScoreStore {
    path: Option<PathBuf>,
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl ScoreStore {
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Open the store at `path`. A missing or unreadable file yields an
    /// empty leaderboard.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut store = Self {
            path: Some(path.clone()),
            ..Self::in_memory(capacity)
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<ScoreEntry>>(&content) {
                Ok(entries) => {
                    store.entries = entries;
                    store.normalize();
                    tracing::info!(
                        path = %path.display(),
                        entries = store.entries.len(),
                        "Loaded leaderboard"
                    );
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "Leaderboard file is corrupt ({e}), starting empty"
                    );
                },
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No leaderboard file yet");
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), "Could not read leaderboard: {e}");
            },
        }
        store
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert an entry. Returns its rank (0-based), or `None` if it did not
    /// make the cut. Ties rank below existing entries.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .filter(|e| e.score >= entry.score)
            .count();
        if rank >= self.capacity {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

/// Write serialized entries to `path`, creating parent directories.
pub async fn write_file(path: &Path, json: String) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await
}
