//! Global leaderboard boundary
//!
//! Scores live in a remote ledger service. The game talks to it only through
//! [`ScoreBackend`]; ranking and storage are the backend's business.

pub mod local;
pub mod query;
pub mod submit;

use serde::{Deserialize, Serialize};

use crate::auth::Identity;

pub use local::LocalBackend;
pub use query::{QueryCache, QueryKey, QueryStatus};
pub use submit::{ScoreSubmission, SubmissionState};

/// Entries shown on the leaderboard panel
pub const LEADERBOARD_SIZE: usize = 10;

/// Longest player name accepted on submission
pub const MAX_PLAYER_NAME_LEN: usize = 30;

/// One recorded run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: Identity,
    pub score: u64,
    /// Nanoseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl ScoreEntry {
    /// Milliseconds since the Unix epoch, for date display
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp as f64 / 1_000_000.0
    }
}

/// Failures at the leaderboard boundary
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("no finished run to submit")]
    NothingToSubmit,
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("malformed leaderboard data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote score service
pub trait ScoreBackend {
    /// Record a score for the calling identity
    fn submit_score(
        &mut self,
        caller: &Identity,
        player_name: Option<&str>,
        score: u64,
    ) -> Result<(), LeaderboardError>;

    /// Best `count` scores across all players, highest first
    fn top_global_scores(&self, count: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    /// Every score recorded by `caller`, newest first
    fn caller_scores(&self, caller: &Identity) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// Trim, cap at [`MAX_PLAYER_NAME_LEN`] characters, and map blank to `None`
pub fn normalize_player_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let capped: String = trimmed.chars().take(MAX_PLAYER_NAME_LEN).collect();
    Some(capped.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_player_name() {
        assert_eq!(normalize_player_name(""), None);
        assert_eq!(normalize_player_name("   "), None);
        assert_eq!(normalize_player_name("  Neo "), Some("Neo".into()));

        let long = "x".repeat(45);
        assert_eq!(normalize_player_name(&long).map(|s| s.len()), Some(30));

        // Multi-byte names are capped by characters, not bytes
        let glyphs = "é".repeat(40);
        assert_eq!(
            normalize_player_name(&glyphs).map(|s| s.chars().count()),
            Some(30)
        );
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = ScoreEntry {
            player: Identity::new("aaaaa-bbbbb"),
            score: 420,
            timestamp: 1_700_000_000_000_000_000,
            player_name: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("player_name"));
        assert_eq!(entry.timestamp_ms(), 1_700_000_000_000.0);
    }
}
