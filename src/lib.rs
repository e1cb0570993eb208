//! Coin Dodge - a single-screen arcade game
//!
//! Core modules:
//! - `sim`: Session logic (state machine, spawners, contacts, input, HUD)
//! - `engine`: Headless scene host (sprites, labels, timers, contact detection)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Data-driven game configuration
//! - `autopilot`: Demo-mode player that drives the scene by itself

pub mod autopilot;
pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SpawnerSettings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference scene size (portrait phone); HUD layout is scaled from it
    pub const REFERENCE_WIDTH: f32 = 750.0;
    pub const REFERENCE_HEIGHT: f32 = 1334.0;

    /// Lives at the start of every session
    pub const STARTING_LIVES: u32 = 5;

    /// Enemy spawner: one enemy per second, 1.5 s fall
    pub const ENEMY_SPAWN_INTERVAL: f32 = 1.0;
    pub const ENEMY_DESCENT_DURATION: f32 = 1.5;
    pub const ENEMY_SIZE: f32 = 70.0;

    /// Coin spawner: one coin every 1.4 s, 1.6 s fall
    pub const COIN_SPAWN_INTERVAL: f32 = 1.4;
    pub const COIN_DESCENT_DURATION: f32 = 1.6;
    pub const COIN_SIZE: f32 = 50.0;

    /// Player sprite edge length
    pub const PLAYER_SIZE: f32 = 90.0;

    /// Falling entities overshoot the player's row by this much before removal
    pub const DESCENT_OVERSHOOT: f32 = 200.0;

    /// Time comparisons tolerate float accumulation error
    pub const TIME_EPSILON: f32 = 1e-3;

    /// Frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Player resting position: horizontally centered, one third of the
/// screen height below the scene center.
#[inline]
pub fn player_home(screen: Vec2) -> Vec2 {
    Vec2::new(0.0, -screen.y / 3.0)
}

/// Vertical target of every falling entity
#[inline]
pub fn descent_target_y(screen: Vec2, overshoot: f32) -> f32 {
    player_home(screen).y - overshoot
}

/// Convert a canvas point (CSS pixels, origin top-left, y down) into
/// center-origin scene coordinates (y up).
///
/// The scene is letterboxed into the canvas preserving its aspect ratio.
pub fn canvas_to_scene(point: Vec2, canvas: Vec2, screen: Vec2) -> Vec2 {
    let scale = canvas_scale(canvas, screen);
    if scale <= 0.0 {
        return Vec2::ZERO;
    }
    let centered = point - canvas * 0.5;
    Vec2::new(centered.x / scale, -centered.y / scale)
}

/// Inverse of [`canvas_to_scene`]: where a scene point lands on the canvas
pub fn scene_to_canvas(point: Vec2, canvas: Vec2, screen: Vec2) -> Vec2 {
    let scale = canvas_scale(canvas, screen);
    canvas * 0.5 + Vec2::new(point.x * scale, -point.y * scale)
}

/// Ratio of canvas pixels to scene points (letterboxed)
pub fn canvas_scale(canvas: Vec2, screen: Vec2) -> f32 {
    (canvas.x / screen.x).min(canvas.y / screen.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_home() {
        let home = player_home(Vec2::new(750.0, 1334.0));
        assert_eq!(home.x, 0.0);
        assert!((home.y + 1334.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_descent_target_below_player() {
        let screen = Vec2::new(750.0, 1334.0);
        let target = descent_target_y(screen, consts::DESCENT_OVERSHOOT);
        assert!((target - (player_home(screen).y - 200.0)).abs() < 0.001);
    }

    #[test]
    fn test_canvas_to_scene_center_and_corners() {
        let screen = Vec2::new(750.0, 1334.0);
        // Canvas at half scale, same aspect
        let canvas = Vec2::new(375.0, 667.0);

        let center = canvas_to_scene(canvas * 0.5, canvas, screen);
        assert!(center.length() < 0.001);

        let top_left = canvas_to_scene(Vec2::ZERO, canvas, screen);
        assert!((top_left.x + 375.0).abs() < 0.01);
        assert!((top_left.y - 667.0).abs() < 0.01);
    }

    #[test]
    fn test_canvas_to_scene_letterboxed() {
        let screen = Vec2::new(750.0, 1334.0);
        // Wide canvas: height limits the scale, x gets pillarboxed
        let canvas = Vec2::new(2000.0, 667.0);
        let p = canvas_to_scene(Vec2::new(1000.0 + 187.5, 333.5), canvas, screen);
        assert!((p.x - 375.0).abs() < 0.01);
        assert!(p.y.abs() < 0.01);
    }

    #[test]
    fn test_scene_to_canvas_inverts_canvas_to_scene() {
        let screen = Vec2::new(750.0, 1334.0);
        let canvas = Vec2::new(1200.0, 800.0);
        for p in [Vec2::new(0.0, 0.0), Vec2::new(200.0, 600.0), Vec2::new(-375.0, -444.0)] {
            let back = canvas_to_scene(scene_to_canvas(p, canvas, screen), canvas, screen);
            assert!((back - p).length() < 0.01);
        }
    }
}
