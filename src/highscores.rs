//! High score leaderboard system
//!
//! Persisted as a JSON file, tracks the top 5 scores. Every save rewrites
//! the whole list.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_HIGH_SCORES;

/// Errors from the file-backed stores (high scores, settings, tuning)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Display date when achieved
    pub date: String,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, date: impl Into<String>) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            date: date.into(),
        };

        // Ties keep the older entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and length after loading untrusted data
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// Format a Unix timestamp (seconds, UTC) as `M/D/YY`.
/// Timestamps outside chrono's range give an empty label.
pub fn format_date(unix_secs: u64) -> String {
    i64::try_from(unix_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%-m/%-d/%y").to_string())
        .unwrap_or_default()
}

/// JSON file holding the leaderboard
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list, starting fresh if the file is missing or unreadable
    pub fn load(&self) -> HighScores {
        match self.try_load() {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No high scores at {}, starting fresh", self.path.display());
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Could not read {}: {} - starting fresh", self.path.display(), e);
                HighScores::new()
            }
        }
    }

    fn try_load(&self) -> Result<HighScores, StoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.normalize();
        Ok(scores)
    }

    /// Replace the stored list wholesale
    pub fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(scores)?;
        std::fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}
