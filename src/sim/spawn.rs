//! Obstacle spawning
//!
//! A spawn cursor counts down by the scroll speed every frame. When it comes
//! within the viewport plus a lookahead margin, one obstacle is placed just
//! past the right edge and the cursor is pushed out by a random gap.

use rand::Rng;

use super::state::{Obstacle, ObstacleKind, SimState};

/// Uniform sample in `[min, max)`; returns `min` for an empty range
fn sample_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Run the spawn policy for one frame. Returns the new obstacle's ID if one
/// was created.
pub fn update_spawner(state: &mut SimState, viewport_width: f32) -> Option<u32> {
    let tuning = &state.tuning;
    let mut spawned = None;

    if state.spawn_cursor < viewport_width + tuning.spawn_lookahead {
        let (gap_min, gap_max) = (tuning.gap_min, tuning.gap_max);
        let (height_min, height_max) = (tuning.height_min, tuning.height_max);
        let spawn_x = viewport_width + tuning.spawn_offset;

        let gap = sample_range(&mut state.rng, gap_min, gap_max);
        let height = sample_range(&mut state.rng, height_min, height_max);
        let kind = if state.rng.random_bool(0.5) {
            ObstacleKind::Spike
        } else {
            ObstacleKind::Block
        };

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            x: spawn_x,
            height,
            kind,
        });
        state.spawn_cursor = spawn_x + gap;
        log::debug!(
            "Spawned {:?} #{} at x={:.0} h={:.1}, next in {:.0}",
            kind,
            id,
            spawn_x,
            height,
            gap
        );
        spawned = Some(id);
    }

    state.spawn_cursor -= state.speed;
    spawned
}

/// Move every obstacle left by `speed`
pub fn advance_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Drop obstacles whose right edge has passed the left edge of the viewport
pub fn cull_obstacles(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(|o| !o.is_offscreen());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_spawns_when_cursor_inside_lookahead() {
        let mut state = SimState::new(1);
        let width = 1280.0;
        let id = update_spawner(&mut state, width);

        assert!(id.is_some());
        assert_eq!(state.obstacles.len(), 1);
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.x, width + SPAWN_OFFSET);
        assert!(obstacle.height >= OBSTACLE_HEIGHT_MIN && obstacle.height <= OBSTACLE_HEIGHT_MAX);

        let gap = state.spawn_cursor + state.speed - (width + SPAWN_OFFSET);
        assert!(gap >= OBSTACLE_GAP_MIN - 0.01 && gap <= OBSTACLE_GAP_MAX + 0.01);
    }

    #[test]
    fn test_no_spawn_while_cursor_far_away() {
        let mut state = SimState::new(1);
        state.spawn_cursor = 5000.0;
        assert_eq!(update_spawner(&mut state, 800.0), None);
        assert!(state.obstacles.is_empty());
        // Cursor still counts down
        assert_eq!(state.spawn_cursor, 5000.0 - GAME_SPEED_INITIAL);
    }

    #[test]
    fn test_degenerate_ranges_are_exact() {
        let tuning = Tuning {
            gap_min: 400.0,
            gap_max: 400.0,
            height_min: 70.0,
            height_max: 70.0,
            ..Default::default()
        };
        let mut state = SimState::with_tuning(3, tuning);
        update_spawner(&mut state, 1000.0);
        assert_eq!(state.obstacles[0].height, 70.0);
        assert_eq!(state.spawn_cursor, 1000.0 + SPAWN_OFFSET + 400.0 - GAME_SPEED_INITIAL);
    }

    #[test]
    fn test_both_kinds_appear() {
        let mut state = SimState::new(42);
        for _ in 0..64 {
            state.spawn_cursor = 0.0;
            update_spawner(&mut state, 800.0);
        }
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Spike));
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Block));
    }

    #[test]
    fn test_cull_only_fully_offscreen() {
        let mut obstacles = vec![
            Obstacle { id: 1, x: -OBSTACLE_WIDTH - 0.1, height: 50.0, kind: ObstacleKind::Spike },
            Obstacle { id: 2, x: -OBSTACLE_WIDTH, height: 50.0, kind: ObstacleKind::Block },
            Obstacle { id: 3, x: 200.0, height: 50.0, kind: ObstacleKind::Block },
        ];
        cull_obstacles(&mut obstacles);
        let ids: Vec<u32> = obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = SimState::new(99);
        let mut b = SimState::new(99);
        for _ in 0..10 {
            a.spawn_cursor = 0.0;
            b.spawn_cursor = 0.0;
            update_spawner(&mut a, 900.0);
            update_spawner(&mut b, 900.0);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }
}
