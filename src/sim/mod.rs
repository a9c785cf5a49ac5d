//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, find_collision, obstacle_box, player_box};
pub use spawn::{advance_obstacles, cull_obstacles, update_spawner};
pub use state::{Obstacle, ObstacleKind, Player, RunPhase, SimState, score_for_distance};
pub use tick::{TickInput, TickOutcome, tick};
