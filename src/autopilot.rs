//! Demo-mode player
//!
//! Produces pointer positions the way a player's finger would: dodge
//! enemies about to land on the ship, otherwise chase the lowest coin,
//! and tap "Play Again" a moment after the game ends.

use glam::Vec2;

use crate::engine::{Scene, Sprite, Stage};
use crate::sim::{Category, GameController};

/// Finger speed limit (points per second)
const MAX_SPEED: f32 = 900.0;
/// How far above the player enemies are considered a threat
const LOOKAHEAD: f32 = 450.0;
/// Extra horizontal clearance kept from enemies
const CLEARANCE: f32 = 20.0;

/// Idle/demo mode driver
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Seconds to wait on the game-over screen before restarting
    pub restart_delay: f32,
    ended_for: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Autopilot {
    pub fn new(restart_delay: f32) -> Self {
        Self {
            restart_delay,
            ended_for: 0.0,
        }
    }

    /// Next pointer position, or `None` to leave the pointer alone
    pub fn pointer(&mut self, scene: &Scene, controller: &GameController, dt: f32) -> Option<Vec2> {
        if controller.state().is_ended() {
            self.ended_for += dt;
            if self.ended_for < self.restart_delay {
                return None;
            }
            self.ended_for = 0.0;
            return controller
                .hud()
                .and_then(|hud| hud.restart_frame(scene))
                .map(|frame| frame.center());
        }
        self.ended_for = 0.0;

        let player = scene.sprite(controller.player()?)?;
        let target = self.target_x(scene, player);

        let max_step = MAX_SPEED * dt;
        let x = player.position.x + (target - player.position.x).clamp(-max_step, max_step);
        Some(Vec2::new(x, player.position.y))
    }

    fn target_x(&self, scene: &Scene, player: &Sprite) -> f32 {
        let half_width = scene.size().x * 0.5;
        let px = player.position.x;
        let py = player.position.y;

        let in_category = |category: Category| {
            scene
                .sprites()
                .filter(move |s| s.category_mask == category.bit())
        };

        // Closest threatening enemy: above the player, within lookahead, overlapping our column
        let threat = in_category(Category::Enemy)
            .filter(|e| e.position.y > py - player.size.y && e.position.y < py + LOOKAHEAD)
            .filter(|e| (e.position.x - px).abs() < danger_width(player, e))
            .min_by(|a, b| a.position.y.total_cmp(&b.position.y));

        if let Some(enemy) = threat {
            let gap = danger_width(player, enemy) * 1.2;
            let left = enemy.position.x - gap;
            let right = enemy.position.x + gap;
            // Prefer the nearer escape that stays on screen
            let candidates = [left, right]
                .into_iter()
                .filter(|x| x.abs() <= half_width);
            return candidates
                .min_by(|a, b| (a - px).abs().total_cmp(&(b - px).abs()))
                .unwrap_or(0.0);
        }

        // Lowest coin that can still be reached
        in_category(Category::Coin)
            .filter(|c| c.position.y > py - player.size.y * 0.5)
            .min_by(|a, b| a.position.y.total_cmp(&b.position.y))
            .map(|c| c.position.x.clamp(-half_width, half_width))
            .unwrap_or(px)
    }
}

/// Horizontal distance below which an enemy and the player can touch
fn danger_width(player: &Sprite, enemy: &Sprite) -> f32 {
    player.size.x * 0.5 + enemy.radius() + CLEARANCE
}
