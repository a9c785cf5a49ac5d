//! Per-frame simulation tick
//!
//! Advances the run by exactly one display frame. The only inputs are the
//! pending jump intent and the current viewport width.

use super::collision::find_collision;
use super::spawn::{advance_obstacles, cull_obstacles, update_spawner};
use super::state::{RunPhase, SimState};

/// Input for a single frame
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Jump requested since the previous frame
    pub jump: bool,
    /// Current viewport width in pixels
    pub viewport_width: f32,
}

impl TickInput {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            jump: false,
            viewport_width,
        }
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }
}

/// What happened this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still alive; render and schedule the next frame
    Running { score: u64 },
    /// Collision; the run is over with this score
    GameOver { score: u64 },
}

impl TickOutcome {
    pub fn score(&self) -> u64 {
        match *self {
            TickOutcome::Running { score } | TickOutcome::GameOver { score } => score,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, TickOutcome::GameOver { .. })
    }
}

/// Advance the run by one frame
pub fn tick(state: &mut SimState, input: &TickInput) -> TickOutcome {
    if let RunPhase::Crashed { score } = state.phase {
        return TickOutcome::GameOver { score };
    }

    if input.jump {
        state.jump();
    }

    state.frame += 1;

    // Player physics
    state.player.integrate(state.tuning.gravity);

    // Difficulty ramp
    state.speed += state.tuning.speed_increment;

    // Obstacles
    advance_obstacles(&mut state.obstacles, state.speed);
    cull_obstacles(&mut state.obstacles);
    update_spawner(state, input.viewport_width);

    // Distance / score
    state.distance += state.speed;
    let score = state.score();

    if let Some(hit) = find_collision(&state.player, &state.obstacles) {
        log::info!(
            "Crashed into {:?} #{} after {} frames, score {}",
            hit.kind,
            hit.id,
            state.frame,
            score
        );
        state.phase = RunPhase::Crashed { score };
        return TickOutcome::GameOver { score };
    }

    TickOutcome::Running { score }
}
