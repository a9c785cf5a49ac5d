//! Device-local score backend
//!
//! Stands in for the remote ledger: keeps every entry in memory and, on the
//! web, mirrors them to LocalStorage.

use serde::{Deserialize, Serialize};

use super::{LeaderboardError, ScoreBackend, ScoreEntry};
use crate::auth::Identity;

/// Nanoseconds per millisecond
const NS_PER_MS: f64 = 1_000_000.0;

/// Score store backed by a plain vector
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalBackend {
    entries: Vec<ScoreEntry>,
    /// Mirror writes to LocalStorage
    #[serde(skip)]
    persistent: bool,
}

impl LocalBackend {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_dash_scores";

    /// Empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing entries
    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries,
            persistent: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load stored scores. Corrupt data is discarded with a warning.
    pub fn load() -> Self {
        let mut backend = match crate::platform::storage_get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(backend) => {
                    log::info!("Loaded {} leaderboard entries", backend.entries.len());
                    backend
                }
                Err(e) => {
                    log::warn!("Discarding stored leaderboard: {}", e);
                    Self::new()
                }
            },
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        };
        backend.persistent = true;
        backend
    }

    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let entries: Vec<ScoreEntry> = serde_json::from_str(json)?;
        Ok(Self::with_entries(entries))
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        if !self.persistent {
            return Ok(());
        }
        let json = self.to_json()?;
        crate::platform::storage_set(Self::STORAGE_KEY, &json).map_err(LeaderboardError::Storage)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreBackend for LocalBackend {
    fn submit_score(
        &mut self,
        caller: &Identity,
        player_name: Option<&str>,
        score: u64,
    ) -> Result<(), LeaderboardError> {
        let timestamp = (crate::platform::now_ms() * NS_PER_MS) as u64;
        self.entries.push(ScoreEntry {
            player: caller.clone(),
            score,
            timestamp,
            player_name: player_name.map(str::to_string),
        });

        if let Err(e) = self.save() {
            // Keep memory and storage consistent
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    fn top_global_scores(&self, count: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut ranked = self.entries.clone();
        // Highest first; earlier runs win ties
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
        ranked.truncate(count);
        Ok(ranked)
    }

    fn caller_scores(&self, caller: &Identity) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut mine: Vec<ScoreEntry> = self
            .entries
            .iter()
            .filter(|e| &e.player == caller)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, score: u64, timestamp: u64) -> ScoreEntry {
        ScoreEntry {
            player: Identity::new(player),
            score,
            timestamp,
            player_name: None,
        }
    }

    #[test]
    fn test_top_scores_ordering_and_truncation() {
        let backend = LocalBackend::with_entries(vec![
            entry("a", 50, 3),
            entry("b", 300, 5),
            entry("c", 120, 1),
            entry("d", 300, 2),
            entry("e", 10, 4),
        ]);

        let top = backend.top_global_scores(3).unwrap();
        let ranked: Vec<(&str, u64)> = top.iter().map(|e| (e.player.as_str(), e.score)).collect();
        assert_eq!(ranked, vec![("d", 300), ("b", 300), ("c", 120)]);

        assert_eq!(backend.top_global_scores(100).unwrap().len(), 5);
        assert!(backend.top_global_scores(0).unwrap().is_empty());
    }

    #[test]
    fn test_submit_records_caller_and_name() {
        let mut backend = LocalBackend::new();
        let me = Identity::new("me");
        backend.submit_score(&me, Some("Neo"), 77).unwrap();
        backend.submit_score(&Identity::new("you"), None, 99).unwrap();
        assert_eq!(backend.len(), 2);

        let mine = backend.caller_scores(&me).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].score, 77);
        assert_eq!(mine[0].player_name.as_deref(), Some("Neo"));
        assert!(mine[0].timestamp > 0);
    }

    #[test]
    fn test_caller_scores_newest_first() {
        let backend = LocalBackend::with_entries(vec![
            entry("me", 1, 10),
            entry("other", 2, 20),
            entry("me", 3, 30),
        ]);
        let mine = backend.caller_scores(&Identity::new("me")).unwrap();
        let scores: Vec<u64> = mine.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![3, 1]);
    }

    #[test]
    fn test_json_roundtrip_and_corruption() {
        let backend = LocalBackend::with_entries(vec![entry("a", 5, 1)]);
        let restored = LocalBackend::from_json(&backend.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);

        assert!(matches!(
            LocalBackend::from_json("{broken"),
            Err(LeaderboardError::Serialization(_))
        ));
    }
}
