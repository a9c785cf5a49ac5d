//! Screen flow and run lifecycle
//!
//! [`App`] is the single owner of all client state. Input handlers only set
//! the jump latch; the frame callback consumes it and advances the run.

use crate::auth::{Identity, Session};
use crate::leaderboard::{
    LeaderboardError, QueryCache, QueryKey, ScoreBackend, ScoreSubmission,
};
use crate::notify::Toasts;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{SimState, TickInput, TickOutcome, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver { score: u64 },
}

/// Jump intent recorded between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpLatch {
    pending: bool,
}

impl JumpLatch {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Read and clear
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Values shown on the in-game HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub speed_multiplier: f32,
}

pub struct App<B: ScoreBackend> {
    screen: Screen,
    run: Option<SimState>,
    latch: JumpLatch,
    pub tuning: Tuning,
    pub settings: Settings,
    pub session: Session,
    backend: Option<B>,
    pub cache: QueryCache,
    pub submission: ScoreSubmission,
    pub toasts: Toasts,
}

impl<B: ScoreBackend> App<B> {
    pub fn new(tuning: Tuning, settings: Settings, session: Session, backend: Option<B>) -> Self {
        Self {
            screen: Screen::Menu,
            run: None,
            latch: JumpLatch::default(),
            tuning,
            settings,
            session,
            backend,
            cache: QueryCache::new(),
            submission: ScoreSubmission::new(),
            toasts: Toasts::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }

    /// Current run, while playing
    pub fn run(&self) -> Option<&SimState> {
        self.run.as_ref()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Attach the score backend once it is ready
    pub fn set_backend(&mut self, backend: B) {
        self.backend = Some(backend);
    }

    /// Final score shown on the game-over screen
    pub fn final_score(&self) -> Option<u64> {
        match self.screen {
            Screen::GameOver { score } => Some(score),
            _ => None,
        }
    }

    fn begin_run(&mut self, seed: u64) {
        self.run = Some(SimState::with_tuning(seed, self.tuning.clone()));
        self.latch = JumpLatch::default();
        self.screen = Screen::Playing;
        log::info!("Run started with seed {}", seed);
    }

    /// Menu → Playing
    pub fn start_game(&mut self, seed: u64) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        self.begin_run(seed);
        true
    }

    /// Game over → Playing with a fresh run
    pub fn restart(&mut self, seed: u64) -> bool {
        if !matches!(self.screen, Screen::GameOver { .. }) {
            return false;
        }
        self.begin_run(seed);
        true
    }

    /// Back to the menu, discarding any run and final score
    pub fn back_to_menu(&mut self) {
        self.run = None;
        self.latch = JumpLatch::default();
        self.screen = Screen::Menu;
    }

    /// Record a jump request from input; applied on the next frame
    pub fn request_jump(&mut self) {
        if self.is_playing() {
            self.latch.request();
        }
    }

    /// Advance the run by one frame. `None` when not playing.
    pub fn frame(&mut self, viewport_width: f32) -> Option<TickOutcome> {
        if !self.is_playing() {
            return None;
        }
        let run = self.run.as_mut()?;
        let input = TickInput::new(viewport_width).with_jump(self.latch.take());
        let outcome = tick(run, &input);

        if let TickOutcome::GameOver { score } = outcome {
            log::info!(
                "Game over: score {} at speed {:.2}x",
                score,
                run.speed_multiplier()
            );
            self.run = None;
            self.screen = Screen::GameOver { score };
            self.submission.reset();
        }
        Some(outcome)
    }

    pub fn hud(&self) -> Option<Hud> {
        let run = self.run.as_ref()?;
        Some(Hud {
            score: run.score(),
            speed_multiplier: run.speed_multiplier(),
        })
    }

    /// Submit the final score of the last run
    pub fn submit_score(&mut self, raw_name: &str, now_ms: f64) -> Result<(), LeaderboardError> {
        let Some(score) = self.final_score() else {
            return Err(LeaderboardError::NothingToSubmit);
        };
        let Some(backend) = self.backend.as_mut() else {
            self.toasts
                .error(crate::leaderboard::submit::SUBMIT_FAILURE_MESSAGE, now_ms);
            return Err(LeaderboardError::Unavailable("backend not ready".into()));
        };

        let result = self.submission.submit(
            backend,
            &self.session,
            raw_name,
            score,
            &mut self.cache,
            &mut self.toasts,
            now_ms,
        );
        if result.is_ok() && self.settings.last_player_name != raw_name.trim() {
            self.settings.last_player_name = raw_name.trim().to_string();
            self.settings.save();
        }
        result
    }

    /// Refresh stale leaderboard queries and expire toasts
    pub fn poll(&mut self, now_ms: f64) {
        let backend = self.backend.as_ref();
        let caller = self.session.identity();
        self.cache
            .fetch(QueryKey::leaderboard(), backend, None, now_ms);
        self.cache
            .fetch(QueryKey::CallerScores, backend, caller, now_ms);
        self.toasts.expire(now_ms);
    }

    pub fn login(&mut self, identity: Identity) {
        self.session.complete_login(identity);
        self.cache.invalidate(QueryKey::CallerScores);
    }

    /// Log in with an identity that must first be stored on this device.
    /// A storage failure leaves the session in `LoginError`.
    pub fn login_remembered<F>(&mut self, identity: Identity, remember: F)
    where
        F: FnOnce(&Identity) -> Result<(), String>,
    {
        self.session.begin_login();
        match remember(&identity) {
            Ok(()) => self.login(identity),
            Err(e) => self.session.fail_login(format!("Could not save login: {}", e)),
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.cache.remove(QueryKey::CallerScores);
    }

    /// Switch quality preset and persist it
    pub fn set_quality(&mut self, preset: QualityPreset) {
        if self.settings.quality == preset {
            return;
        }
        self.settings.apply_preset(preset);
        self.settings.save();
        log::info!("Quality set to {}", preset.as_str());
    }

    /// Whether the game-over screen should offer submission
    pub fn can_submit(&self) -> bool {
        matches!(self.screen, Screen::GameOver { .. })
            && self.session.is_logged_in()
            && !self.submission.has_submitted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LoginStatus;
    use crate::consts::*;
    use crate::leaderboard::{LocalBackend, QueryStatus, SubmissionState};
    use crate::sim::{Obstacle, ObstacleKind};

    const WIDTH: f32 = 1280.0;

    fn app() -> App<LocalBackend> {
        App::new(
            Tuning::default(),
            Settings::default(),
            Session::new(),
            Some(LocalBackend::new()),
        )
    }

    /// Play until the run ends without jumping
    fn crash(app: &mut App<LocalBackend>) -> u64 {
        for _ in 0..5000 {
            if let Some(TickOutcome::GameOver { score }) = app.frame(WIDTH) {
                return score;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_screen_flow() {
        let mut app = app();
        assert_eq!(app.screen(), Screen::Menu);
        assert_eq!(app.frame(WIDTH), None);
        assert!(!app.restart(1));

        assert!(app.start_game(1));
        assert!(app.is_playing());
        assert!(!app.start_game(2));

        let score = crash(&mut app);
        assert!(score > 0);
        assert_eq!(app.screen(), Screen::GameOver { score });
        assert_eq!(app.final_score(), Some(score));
        assert!(app.run().is_none());
        assert_eq!(app.frame(WIDTH), None);

        assert!(app.restart(2));
        assert!(app.is_playing());
        assert_eq!(app.hud().map(|h| h.score), Some(0));

        app.back_to_menu();
        assert_eq!(app.screen(), Screen::Menu);
        assert_eq!(app.final_score(), None);
    }

    #[test]
    fn test_jump_latch_consumed_by_frame() {
        let mut app = app();
        app.request_jump();
        app.start_game(3);
        assert!(!app.latch.is_pending(), "requests outside a run are dropped");

        app.request_jump();
        app.request_jump();
        assert!(app.latch.is_pending());
        app.frame(WIDTH);
        assert!(!app.latch.is_pending());

        let player = app.run().unwrap().player;
        assert!(!player.grounded);
        assert_eq!(player.vel_y, JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_hud_values() {
        let mut app = app();
        app.start_game(4);
        app.frame(WIDTH);
        let hud = app.hud().unwrap();
        assert_eq!(hud.score, 0);
        assert!(hud.speed_multiplier > 1.0);
        assert!(hud.speed_multiplier < 1.001);
    }

    #[test]
    fn test_submit_after_game_over() {
        let mut app = app();
        app.login(Identity::new("abcde-fghij"));
        app.poll(0.0);
        assert_eq!(app.cache.status(QueryKey::leaderboard()), QueryStatus::Empty);

        app.start_game(5);
        // Guarantee an early crash
        if let Some(run) = app.run.as_mut() {
            run.obstacles.push(Obstacle {
                id: 999,
                x: PLAYER_X + 20.0,
                height: 80.0,
                kind: ObstacleKind::Block,
            });
        }
        let score = crash(&mut app);
        assert!(app.can_submit());

        app.submit_score("  Morpheus ", 10.0).unwrap();
        assert_eq!(app.submission.state(), SubmissionState::Submitted);
        assert!(!app.can_submit());
        assert_eq!(app.settings.last_player_name, "Morpheus");

        app.poll(20.0);
        match app.cache.status(QueryKey::leaderboard()) {
            QueryStatus::Loaded(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].score, score);
            }
            other => panic!("unexpected status {:?}", other),
        }
        // Caller scores only refresh when invalidated
        assert_eq!(app.cache.status(QueryKey::CallerScores), QueryStatus::Empty);
        app.cache.invalidate(QueryKey::CallerScores);
        app.poll(30.0);
        assert!(matches!(app.cache.status(QueryKey::CallerScores), QueryStatus::Loaded(s) if s.len() == 1));

        // New run resets the submission
        app.restart(6);
        crash(&mut app);
        assert_eq!(app.submission.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_submit_requires_finished_run() {
        let mut app = app();
        app.login(Identity::new("abcde-fghij"));
        assert!(matches!(
            app.submit_score("early", 0.0),
            Err(LeaderboardError::NothingToSubmit)
        ));

        app.start_game(8);
        app.frame(WIDTH);
        assert!(matches!(
            app.submit_score("early", 0.0),
            Err(LeaderboardError::NothingToSubmit)
        ));
        assert!(app.backend().unwrap().is_empty());
        assert_eq!(app.submission.state(), SubmissionState::Idle);
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_submit_without_backend_or_login() {
        let mut app: App<LocalBackend> =
            App::new(Tuning::default(), Settings::default(), Session::new(), None);
        app.start_game(7);
        crash(&mut app);
        assert!(matches!(
            app.submit_score("x", 0.0),
            Err(LeaderboardError::Unavailable(_))
        ));
        assert!(!app.toasts.is_empty());

        app.set_backend(LocalBackend::new());
        assert!(!app.can_submit());
        assert!(matches!(
            app.submit_score("x", 0.0),
            Err(LeaderboardError::NotAuthenticated)
        ));
        assert!(app.backend().unwrap().is_empty());
    }

    #[test]
    fn test_login_fails_when_identity_not_stored() {
        let mut app = app();
        app.login_remembered(Identity::new("abcde-fghij"), |_| Err("quota exceeded".into()));
        assert!(!app.session.is_logged_in());
        assert_eq!(
            app.session.status,
            LoginStatus::LoginError("Could not save login: quota exceeded".into())
        );

        app.login_remembered(Identity::new("abcde-fghij"), |_| Ok(()));
        assert!(app.session.is_logged_in());
    }

    #[test]
    fn test_set_quality_applies_preset() {
        let mut app = app();
        app.set_quality(QualityPreset::Low);
        assert_eq!(app.settings.quality, QualityPreset::Low);
        assert!(!app.settings.glow);
        assert!(!app.settings.ground_grid);

        app.set_quality(QualityPreset::High);
        assert!(app.settings.effective_glow());
        assert!(app.settings.ground_grid);
    }

    #[test]
    fn test_logout_drops_caller_scores() {
        let mut app = app();
        app.login(Identity::new("me"));
        app.poll(0.0);
        assert_eq!(app.cache.status(QueryKey::CallerScores), QueryStatus::Empty);
        app.logout();
        assert_eq!(app.cache.status(QueryKey::CallerScores), QueryStatus::Pending);
        assert!(!app.session.is_logged_in());
    }
}
