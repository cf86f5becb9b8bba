//! Best score and leaderboard
//!
//! Read once when the host starts and written back when a finished run beats
//! the stored best. The storage medium is pluggable through [`ScoreStore`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::sim::GameStatus;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: i64,
    /// Progress reached when the run ended
    pub progress: f32,
    /// How the run ended
    pub outcome: GameStatus,
}

/// Result of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    /// Leaderboard rank (1-indexed), if the run qualified
    pub rank: Option<usize>,
    /// The run beat the previous best
    pub new_best: bool,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Best score ever recorded (0 when nothing positive has been scored)
    #[serde(default)]
    pub best: i64,
    /// Sorted by score, highest first
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run
    pub fn record_run(&mut self, score: i64, progress: f32, outcome: GameStatus) -> RunRecord {
        let new_best = score > self.best;
        if new_best {
            log::info!("New best score: {} (was {})", score, self.best);
            self.best = score;
        }

        if !self.qualifies(score) {
            return RunRecord {
                rank: None,
                new_best,
            };
        }

        let entry = HighScoreEntry {
            score,
            progress,
            outcome,
        };
        let rank = match self.entries.iter().position(|e| score > e.score) {
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

        RunRecord {
            rank: Some(rank),
            new_best,
        }
    }

    pub fn best(&self) -> i64 {
        self.best
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where high scores live between sessions
pub trait ScoreStore {
    fn load(&self) -> Result<HighScores, StoreError>;
    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// Keeps scores for the life of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<HighScores>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.saved = Some(scores.clone());
        Ok(())
    }
}

/// JSON file on disk; writes go through a temp file and a rename
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let scores: HighScores = serde_json::from_str(&json)?;
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Ok(HighScores::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(scores)?;
        let tmp = self.path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.potential_rank(300), Some(1));

        let first = scores.record_run(300, 4_000.0, GameStatus::GameOver);
        assert_eq!(first, RunRecord { rank: Some(1), new_best: true });

        let second = scores.record_run(150, 2_000.0, GameStatus::GameOver);
        assert_eq!(second, RunRecord { rank: Some(2), new_best: false });

        let third = scores.record_run(900, 10_000.0, GameStatus::Success);
        assert_eq!(third.rank, Some(1));
        assert!(third.new_best);
        assert_eq!(scores.best(), 900);
        assert_eq!(scores.entries[0].outcome, GameStatus::Success);
    }

    #[test]
    fn test_non_positive_scores_never_rank() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        let record = scores.record_run(-50, 100.0, GameStatus::GameOver);
        assert_eq!(record, RunRecord { rank: None, new_best: false });
        assert!(scores.is_empty());
        assert_eq!(scores.best(), 0);
    }

    #[test]
    fn test_leaderboard_is_capped() {
        let mut scores = HighScores::new();
        for score in 1..=15 {
            scores.record_run(score * 10, 0.0, GameStatus::GameOver);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[0].score, 150);
        assert_eq!(scores.entries[MAX_HIGH_SCORES - 1].score, 60);
        assert!(!scores.qualifies(60));
        assert_eq!(scores.potential_rank(61), Some(MAX_HIGH_SCORES));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), HighScores::new());
        let mut scores = HighScores::new();
        scores.record_run(420, 5_000.0, GameStatus::GameOver);
        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap(), scores);
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("scores.json"));

        // Missing file is an empty leaderboard
        assert!(store.load().unwrap().is_empty());

        let mut scores = HighScores::new();
        scores.record_run(1_200, 10_000.0, GameStatus::Success);
        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap(), scores);
        assert!(!dir.path().join("scores.tmp").exists());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        // A non-empty directory in the way makes the final rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut store = JsonFileStore::new(&path);
        let mut scores = HighScores::new();
        scores.record_run(75, 900.0, GameStatus::GameOver);

        assert!(matches!(store.save(&scores), Err(StoreError::Io(_))));
        assert!(!dir.path().join("scores.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_json_file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ definitely not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }
}
