//! Once-per-run score submission

use super::{LeaderboardError, QueryCache, ScoreBackend, normalize_player_name};
use crate::auth::Session;
use crate::notify::Toasts;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Score submitted to leaderboard!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit score";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Log in to save your score to the leaderboard";

/// Where the current run's submission stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Submitted,
    /// Last attempt failed; the player may try again
    Failed,
}

/// Submission flow for the run shown on the game-over screen
#[derive(Debug, Clone, Default)]
pub struct ScoreSubmission {
    state: SubmissionState,
}

impl ScoreSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn has_submitted(&self) -> bool {
        self.state == SubmissionState::Submitted
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    /// Start over for a new run
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }

    /// Submit `score` for the logged-in player. Successful submissions
    /// invalidate the cached leaderboard. Every outcome is reported through a
    /// toast; the local score is never discarded.
    #[allow(clippy::too_many_arguments)]
    pub fn submit<B: ScoreBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        session: &Session,
        raw_name: &str,
        score: u64,
        cache: &mut QueryCache,
        toasts: &mut Toasts,
        now_ms: f64,
    ) -> Result<(), LeaderboardError> {
        if matches!(self.state, SubmissionState::Submitted | SubmissionState::Pending) {
            return Ok(());
        }

        let Some(caller) = session.identity() else {
            toasts.error(LOGIN_REQUIRED_MESSAGE, now_ms);
            return Err(LeaderboardError::NotAuthenticated);
        };

        let name = normalize_player_name(raw_name);
        self.state = SubmissionState::Pending;

        match backend.submit_score(caller, name.as_deref(), score) {
            Ok(()) => {
                self.state = SubmissionState::Submitted;
                cache.invalidate_top_scores();
                toasts.success(SUBMIT_SUCCESS_MESSAGE, now_ms);
                log::info!("Submitted score {} as {:?}", score, name);
                Ok(())
            }
            Err(e) => {
                self.state = SubmissionState::Failed;
                toasts.error(SUBMIT_FAILURE_MESSAGE, now_ms);
                log::warn!("Failed to submit score {}: {}", score, e);
                Err(e)
            }
        }
    }
}
