//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`SimState`]. It is created at run
//! start, updated once per frame by [`super::tick`], and dropped at game over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Player hit an obstacle; final score is frozen
    Crashed { score: u64 },
}

/// The player's square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top edge (screen space, y grows downward)
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vel_y: f32,
    /// Resting on the ground line
    pub grounded: bool,
    /// In the air because of a jump (drives the tilt when rendering)
    pub jumping: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            y: Player::rest_y(),
            vel_y: 0.0,
            grounded: true,
            jumping: false,
        }
    }
}

impl Player {
    /// Top edge when standing on the ground line
    #[inline]
    pub const fn rest_y() -> f32 {
        GROUND_Y - PLAYER_SIZE
    }

    /// Start a jump. Ignored while airborne.
    pub fn jump(&mut self, jump_velocity: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel_y = jump_velocity;
        self.grounded = false;
        self.jumping = true;
        true
    }

    /// Integrate gravity and land on the ground line
    pub fn integrate(&mut self, gravity: f32) {
        self.vel_y += gravity;
        self.y += self.vel_y;

        if self.y >= Player::rest_y() {
            self.y = Player::rest_y();
            self.vel_y = 0.0;
            self.grounded = true;
            self.jumping = false;
        }
    }
}

/// Obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Spike,
    Block,
}

/// An obstacle sitting on the ground line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height above the ground line
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Top edge
    #[inline]
    pub fn top(&self) -> f32 {
        GROUND_Y - self.height
    }

    /// Whether the obstacle has fully scrolled off the left edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance values this run was started with
    pub tuning: Tuning,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Distance left until the next obstacle spawns
    pub spawn_cursor: f32,
    /// Scroll speed (pixels/frame), never decreases
    pub speed: f32,
    /// Total distance scrolled, never decreases
    pub distance: f32,
    pub phase: RunPhase,
    /// Frames simulated so far
    pub frame: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            player: Player::default(),
            obstacles: Vec::new(),
            spawn_cursor: tuning.spawn_cursor_initial,
            speed: tuning.speed_initial,
            distance: 0.0,
            phase: RunPhase::Running,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Player-facing score derived from distance
    #[inline]
    pub fn score(&self) -> u64 {
        score_for_distance(self.distance)
    }

    /// Speed relative to the starting speed (HUD multiplier)
    pub fn speed_multiplier(&self) -> f32 {
        self.speed / self.tuning.speed_initial
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Apply a jump command; no-op while airborne or after a crash
    pub fn jump(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.player.jump(self.tuning.jump_velocity)
    }
}

/// floor(distance / 10)
#[inline]
pub fn score_for_distance(distance: f32) -> u64 {
    (distance / DISTANCE_PER_POINT).floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SimState::new(7);
        assert_eq!(state.player.y, GROUND_Y - PLAYER_SIZE);
        assert_eq!(state.player.vel_y, 0.0);
        assert!(state.player.grounded);
        assert!(!state.player.jumping);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_cursor, SPAWN_CURSOR_INITIAL);
        assert_eq!(state.speed, GAME_SPEED_INITIAL);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.score(), 0);
        assert!(state.is_running());
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut player = Player::default();
        assert!(player.jump(JUMP_VELOCITY));
        assert_eq!(player.vel_y, JUMP_VELOCITY);
        assert!(!player.grounded);
        assert!(player.jumping);

        player.integrate(GRAVITY);
        let vel = player.vel_y;
        assert!(!player.jump(JUMP_VELOCITY));
        assert_eq!(player.vel_y, vel);
        assert!(player.jumping);
    }

    #[test]
    fn test_landing_clamps_and_resets() {
        let mut player = Player {
            y: Player::rest_y() - 1.0,
            vel_y: 12.0,
            grounded: false,
            jumping: true,
        };
        player.integrate(GRAVITY);
        assert_eq!(player.y, Player::rest_y());
        assert_eq!(player.vel_y, 0.0);
        assert!(player.grounded);
        assert!(!player.jumping);
    }

    #[test]
    fn test_score_for_distance() {
        assert_eq!(score_for_distance(0.0), 0);
        assert_eq!(score_for_distance(9.99), 0);
        assert_eq!(score_for_distance(10.0), 1);
        assert_eq!(score_for_distance(1234.5), 123);
    }

    #[test]
    fn test_obstacle_edges() {
        let obstacle = Obstacle {
            id: 1,
            x: -29.0,
            height: 60.0,
            kind: ObstacleKind::Block,
        };
        assert_eq!(obstacle.right(), 1.0);
        assert_eq!(obstacle.top(), GROUND_Y - 60.0);
        assert!(!obstacle.is_offscreen());

        let gone = Obstacle { x: -30.5, ..obstacle };
        assert!(gone.is_offscreen());
    }
}
