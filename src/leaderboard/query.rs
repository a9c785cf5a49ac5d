//! Keyed cache for leaderboard reads
//!
//! Several screens show the same leaderboard. They share one cache entry per
//! key, so a read only reaches the backend when the entry is missing, has
//! been invalidated, or has outlived its refetch interval.

use std::collections::HashMap;

use super::{LEADERBOARD_SIZE, ScoreBackend, ScoreEntry};
use crate::auth::Identity;

/// Background refresh interval for the global leaderboard
pub const TOP_SCORES_REFETCH_MS: f64 = 30_000.0;

/// What is being read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Best N scores across all players
    TopScores(usize),
    /// Every score of the logged-in player
    CallerScores,
}

impl QueryKey {
    /// The leaderboard panel's query
    pub fn leaderboard() -> Self {
        QueryKey::TopScores(LEADERBOARD_SIZE)
    }

    /// Age after which the entry is refetched; `None` means only on
    /// invalidation
    pub fn refetch_interval_ms(&self) -> Option<f64> {
        match self {
            QueryKey::TopScores(_) => Some(TOP_SCORES_REFETCH_MS),
            QueryKey::CallerScores => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct QueryEntry {
    data: Option<Vec<ScoreEntry>>,
    error: Option<String>,
    fetched_at_ms: f64,
    invalidated: bool,
}

/// Display state of one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryStatus<'a> {
    /// Nothing fetched yet
    Pending,
    /// Last fetch failed and there is no earlier data
    Failed(&'a str),
    /// Fetched, no scores recorded
    Empty,
    Loaded(&'a [ScoreEntry]),
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, QueryEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fetch of `key` at `now_ms` would reach the backend
    pub fn is_stale(&self, key: QueryKey, now_ms: f64) -> bool {
        let Some(entry) = self.entries.get(&key) else {
            return true;
        };
        if entry.invalidated || (entry.data.is_none() && entry.error.is_none()) {
            return true;
        }
        match key.refetch_interval_ms() {
            Some(interval) => now_ms - entry.fetched_at_ms >= interval,
            None => false,
        }
    }

    /// Refresh `key` if it is stale. Disabled while no backend is ready, and
    /// for caller scores while logged out. Returns true if the backend was
    /// called.
    pub fn fetch<B: ScoreBackend + ?Sized>(
        &mut self,
        key: QueryKey,
        backend: Option<&B>,
        caller: Option<&Identity>,
        now_ms: f64,
    ) -> bool {
        let Some(backend) = backend else {
            return false;
        };
        if !self.is_stale(key, now_ms) {
            return false;
        }

        let result = match key {
            QueryKey::TopScores(count) => backend.top_global_scores(count),
            QueryKey::CallerScores => match caller {
                Some(caller) => backend.caller_scores(caller),
                None => return false,
            },
        };

        let entry = self.entries.entry(key).or_default();
        entry.fetched_at_ms = now_ms;
        entry.invalidated = false;
        match result {
            Ok(scores) => {
                log::debug!("Fetched {:?}: {} entries", key, scores.len());
                entry.data = Some(scores);
                entry.error = None;
            }
            Err(e) => {
                log::warn!("Failed to fetch {:?}: {}", key, e);
                entry.error = Some(e.to_string());
            }
        }
        true
    }

    /// Mark every global leaderboard entry stale (after a submission)
    pub fn invalidate_top_scores(&mut self) {
        for (key, entry) in self.entries.iter_mut() {
            if matches!(key, QueryKey::TopScores(_)) {
                entry.invalidated = true;
            }
        }
    }

    pub fn invalidate(&mut self, key: QueryKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.invalidated = true;
        }
    }

    /// Forget a query entirely (e.g. caller scores on logout)
    pub fn remove(&mut self, key: QueryKey) {
        self.entries.remove(&key);
    }

    pub fn status(&self, key: QueryKey) -> QueryStatus<'_> {
        let Some(entry) = self.entries.get(&key) else {
            return QueryStatus::Pending;
        };
        match (&entry.data, &entry.error) {
            (Some(scores), _) if scores.is_empty() => QueryStatus::Empty,
            (Some(scores), _) => QueryStatus::Loaded(scores.as_slice()),
            (None, Some(error)) => QueryStatus::Failed(error.as_str()),
            (None, None) => QueryStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{LeaderboardError, LocalBackend};
    use std::cell::Cell;

    /// Backend that counts reads and can be switched to failing
    struct CountingBackend {
        inner: LocalBackend,
        reads: Cell<u32>,
        failing: Cell<bool>,
    }

    impl CountingBackend {
        fn new(inner: LocalBackend) -> Self {
            Self {
                inner,
                reads: Cell::new(0),
                failing: Cell::new(false),
            }
        }
    }

    impl ScoreBackend for CountingBackend {
        fn submit_score(
            &mut self,
            caller: &Identity,
            player_name: Option<&str>,
            score: u64,
        ) -> Result<(), LeaderboardError> {
            self.inner.submit_score(caller, player_name, score)
        }

        fn top_global_scores(&self, count: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
            self.reads.set(self.reads.get() + 1);
            if self.failing.get() {
                return Err(LeaderboardError::Unavailable("replica down".into()));
            }
            self.inner.top_global_scores(count)
        }

        fn caller_scores(&self, caller: &Identity) -> Result<Vec<ScoreEntry>, LeaderboardError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.caller_scores(caller)
        }
    }

    fn seeded_backend() -> CountingBackend {
        let mut inner = LocalBackend::new();
        inner.submit_score(&Identity::new("a"), Some("Ada"), 120).unwrap();
        inner.submit_score(&Identity::new("b"), None, 80).unwrap();
        CountingBackend::new(inner)
    }

    #[test]
    fn test_refetch_only_after_interval() {
        let backend = seeded_backend();
        let mut cache = QueryCache::new();
        let key = QueryKey::leaderboard();

        assert_eq!(cache.status(key), QueryStatus::Pending);
        assert!(cache.fetch(key, Some(&backend), None, 0.0));
        assert_eq!(backend.reads.get(), 1);
        assert!(matches!(cache.status(key), QueryStatus::Loaded(s) if s.len() == 2));

        // Shared by every reader within the interval
        assert!(!cache.fetch(key, Some(&backend), None, 10_000.0));
        assert!(!cache.fetch(key, Some(&backend), None, TOP_SCORES_REFETCH_MS - 1.0));
        assert_eq!(backend.reads.get(), 1);

        assert!(cache.fetch(key, Some(&backend), None, TOP_SCORES_REFETCH_MS));
        assert_eq!(backend.reads.get(), 2);
    }

    #[test]
    fn test_invalidation_forces_refetch() {
        let mut backend = seeded_backend();
        let mut cache = QueryCache::new();
        let key = QueryKey::leaderboard();
        cache.fetch(key, Some(&backend), None, 0.0);

        backend
            .submit_score(&Identity::new("c"), Some("Cy"), 500)
            .unwrap();
        cache.invalidate_top_scores();
        assert!(cache.fetch(key, Some(&backend), None, 1.0));

        match cache.status(key) {
            QueryStatus::Loaded(top) => {
                assert_eq!(top[0].score, 500);
                assert_eq!(top.len(), 3);
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_disabled_without_backend_or_identity() {
        let mut cache = QueryCache::new();
        assert!(!cache.fetch::<LocalBackend>(QueryKey::leaderboard(), None, None, 0.0));
        assert_eq!(cache.status(QueryKey::leaderboard()), QueryStatus::Pending);

        let backend = seeded_backend();
        assert!(!cache.fetch(QueryKey::CallerScores, Some(&backend), None, 0.0));
        assert_eq!(backend.reads.get(), 0);

        let me = Identity::new("a");
        assert!(cache.fetch(QueryKey::CallerScores, Some(&backend), Some(&me), 0.0));
        assert!(matches!(cache.status(QueryKey::CallerScores), QueryStatus::Loaded(s) if s.len() == 1));

        // Caller scores never go stale on their own
        assert!(!cache.fetch(QueryKey::CallerScores, Some(&backend), Some(&me), 1.0e9));
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let backend = seeded_backend();
        let mut cache = QueryCache::new();
        let key = QueryKey::leaderboard();

        backend.failing.set(true);
        cache.fetch(key, Some(&backend), None, 0.0);
        assert!(matches!(cache.status(key), QueryStatus::Failed(msg) if msg.contains("replica down")));

        backend.failing.set(false);
        cache.invalidate(key);
        cache.fetch(key, Some(&backend), None, 1.0);
        assert!(cache.entries[&key].error.is_none());

        backend.failing.set(true);
        cache.invalidate(key);
        cache.fetch(key, Some(&backend), None, 2.0);
        assert!(cache.entries[&key].error.is_some());
        assert!(matches!(cache.status(key), QueryStatus::Loaded(s) if s.len() == 2));
    }

    #[test]
    fn test_empty_board() {
        let backend = CountingBackend::new(LocalBackend::new());
        let mut cache = QueryCache::new();
        cache.fetch(QueryKey::leaderboard(), Some(&backend), None, 0.0);
        assert_eq!(cache.status(QueryKey::leaderboard()), QueryStatus::Empty);
    }
}
