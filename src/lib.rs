//! Neon Dash - A neon side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions)
//! - `app`: Screen flow and run lifecycle
//! - `leaderboard`: Score backend boundary, query cache, submission
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod auth;
pub mod leaderboard;
pub mod notify;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use app::{App, Screen};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration applied every frame (pixels/frame²)
    pub const GRAVITY: f32 = 0.8;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: f32 = -15.0;

    /// Player square edge length
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Fixed horizontal position of the player's left edge
    pub const PLAYER_X: f32 = 100.0;
    /// Vertical coordinate of the floor (screen space, y grows downward)
    pub const GROUND_Y: f32 = 500.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_GAP_MIN: f32 = 300.0;
    pub const OBSTACLE_GAP_MAX: f32 = 500.0;
    pub const OBSTACLE_HEIGHT_MIN: f32 = 40.0;
    pub const OBSTACLE_HEIGHT_MAX: f32 = 100.0;

    /// Scroll speed at run start (pixels/frame)
    pub const GAME_SPEED_INITIAL: f32 = 5.0;
    /// Speed added every frame (difficulty ramp, unbounded)
    pub const GAME_SPEED_INCREMENT: f32 = 0.0005;

    /// Spawn cursor value at run start
    pub const SPAWN_CURSOR_INITIAL: f32 = 800.0;
    /// Spawn when the cursor is closer than viewport width + this margin
    pub const SPAWN_LOOKAHEAD: f32 = 200.0;
    /// New obstacles appear this far past the right edge of the viewport
    pub const SPAWN_OFFSET: f32 = 50.0;

    /// Distance units per score point
    pub const DISTANCE_PER_POINT: f32 = 10.0;

    /// Ground strip thickness when rendered
    pub const GROUND_THICKNESS: f32 = 4.0;
}
