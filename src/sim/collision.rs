//! Collision detection for the player square and ground obstacles
//!
//! Everything is an axis-aligned box in screen space. Touching edges do not
//! count as a hit.

use glam::Vec2;

use super::state::{Obstacle, Player};
use crate::consts::*;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from the top-left corner and a size
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// The player's box at its fixed horizontal position
pub fn player_box(player: &Player) -> Aabb {
    Aabb::from_origin_size(
        Vec2::new(PLAYER_X, player.y),
        Vec2::splat(PLAYER_SIZE),
    )
}

/// An obstacle's box, from its top down to the ground line
pub fn obstacle_box(obstacle: &Obstacle) -> Aabb {
    Aabb::new(
        Vec2::new(obstacle.x, obstacle.top()),
        Vec2::new(obstacle.right(), GROUND_Y),
    )
}

/// First obstacle the player overlaps, if any
pub fn find_collision<'a>(player: &Player, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    let player_box = player_box(player);
    obstacles
        .iter()
        .find(|obstacle| player_box.overlaps(&obstacle_box(obstacle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn obstacle_at(x: f32, height: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            height,
            kind: ObstacleKind::Spike,
        }
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_origin_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_origin_size(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        let touching = Aabb::from_origin_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let apart = Aabb::from_origin_size(Vec2::new(20.0, 20.0), Vec2::splat(1.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_grounded_player_hits_obstacle_in_lane() {
        let player = Player::default();
        let obstacles = [obstacle_at(PLAYER_X + 10.0, 40.0)];
        assert!(find_collision(&player, &obstacles).is_some());
    }

    #[test]
    fn test_obstacle_just_past_player_misses() {
        let player = Player::default();
        // Right edge exactly at the player's left edge
        let obstacles = [obstacle_at(PLAYER_X - OBSTACLE_WIDTH, 80.0)];
        assert!(find_collision(&player, &obstacles).is_none());
    }

    #[test]
    fn test_airborne_player_clears_short_obstacle() {
        let player = Player {
            y: GROUND_Y - 50.0 - PLAYER_SIZE,
            vel_y: 0.0,
            grounded: false,
            jumping: true,
        };
        // Obstacle top at GROUND_Y - 50, player bottom at the same line
        let obstacles = [obstacle_at(PLAYER_X, 50.0)];
        assert!(find_collision(&player, &obstacles).is_none());

        let taller = [obstacle_at(PLAYER_X, 51.0)];
        assert!(find_collision(&player, &taller).is_some());
    }
}
