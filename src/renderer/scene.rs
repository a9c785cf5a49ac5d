//! Scene tessellation
//!
//! Turns a run snapshot into a triangle list in screen pixels. Pure, so the
//! draw order and the effect toggles can be tested without a GPU.

use glam::Vec2;
use std::f32::consts::FRAC_PI_8;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Obstacle, ObstacleKind, Player, SimState};

/// Horizontal spacing of the ground grid lines
pub const GRID_SPACING: f32 = 50.0;
/// Grid scroll rate relative to distance travelled
pub const GRID_PARALLAX: f32 = 0.5;
/// Tilt while airborne after a jump
pub const JUMP_TILT: f32 = -FRAC_PI_8;

const GLOW_SPREAD: f32 = 10.0;
const GLOW_LAYERS: u32 = 3;

/// Leftmost grid line position for `distance`
pub fn grid_offset(distance: f32) -> f32 {
    (distance * GRID_PARALLAX) % GRID_SPACING
}

/// Build the full frame. Without a run only the ground is drawn.
pub fn build_scene(run: Option<&SimState>, viewport: Vec2, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(256);
    let distance = run.map_or(0.0, |r| r.distance);

    ground(&mut vertices, viewport.x, distance, settings);

    if let Some(run) = run {
        for obstacle in &run.obstacles {
            draw_obstacle(&mut vertices, obstacle, settings);
        }
        draw_player(&mut vertices, &run.player, settings);
    }

    vertices
}

fn ground(out: &mut Vec<Vertex>, width: f32, distance: f32, settings: &Settings) {
    if settings.ground_grid {
        let offset = if settings.grid_scrolls() {
            grid_offset(distance)
        } else {
            0.0
        };
        let mut x = -offset;
        while x < width {
            out.extend(shapes::line(
                Vec2::new(x, GROUND_Y),
                Vec2::new(x + GRID_SPACING * 0.5, GROUND_Y + GRID_SPACING),
                1.0,
                colors::GRID,
            ));
            x += GRID_SPACING;
        }
    }

    out.extend(shapes::rect(
        Vec2::new(0.0, GROUND_Y),
        Vec2::new(width, GROUND_Y + GROUND_THICKNESS),
        colors::GROUND,
    ));
}

fn draw_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle, settings: &Settings) {
    let min = Vec2::new(obstacle.x, obstacle.top());
    let max = Vec2::new(obstacle.right(), GROUND_Y);
    let color = match obstacle.kind {
        ObstacleKind::Spike => colors::SPIKE,
        ObstacleKind::Block => colors::BLOCK,
    };

    if settings.effective_glow() {
        out.extend(shapes::glow_rect(min, max, GLOW_SPREAD, color, GLOW_LAYERS));
    }

    match obstacle.kind {
        ObstacleKind::Spike => out.extend(shapes::triangle(
            Vec2::new(min.x, max.y),
            Vec2::new((min.x + max.x) * 0.5, min.y),
            max,
            color,
        )),
        ObstacleKind::Block => out.extend(shapes::rect(min, max, color)),
    }
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player, settings: &Settings) {
    let half = PLAYER_SIZE * 0.5;
    let center = Vec2::new(PLAYER_X + half, player.y + half);
    let angle = if player.jumping && settings.effective_jump_tilt() {
        JUMP_TILT
    } else {
        0.0
    };

    if settings.effective_glow() {
        out.extend(shapes::glow_rect(
            center - Vec2::splat(half),
            center + Vec2::splat(half),
            GLOW_SPREAD,
            colors::PLAYER,
            GLOW_LAYERS,
        ));
    }
    out.extend(shapes::rotated_square(center, half, angle, colors::PLAYER));
}
