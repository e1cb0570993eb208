//! Heads-up display
//!
//! Four persistent labels: lives, coins, "Game Over" and the "Play Again"
//! restart control. Text is rewritten in place on every state change.

use glam::Vec2;

use super::state::SessionState;
use crate::consts::REFERENCE_HEIGHT;
use crate::engine::{Color, LabelDesc, LabelId, Rect, Stage};

const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];

pub fn lives_text(lives: u32) -> String {
    format!("{} lives left", lives)
}

pub fn coins_text(coins: u32) -> String {
    format!("Coins: {}", coins)
}

pub const GAME_OVER_TEXT: &str = "Game Over";
pub const RESTART_TEXT: &str = "Play Again";

/// Label placement, authored for the reference screen and scaled by height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    pub lives_pos: Vec2,
    pub coins_pos: Vec2,
    pub game_over_pos: Vec2,
    pub restart_pos: Vec2,
    pub counter_font: f32,
    pub game_over_font: f32,
    pub restart_font: f32,
}

impl HudLayout {
    pub fn for_screen(screen: Vec2) -> Self {
        let s = screen.y / REFERENCE_HEIGHT;
        Self {
            lives_pos: Vec2::new(200.0, 600.0) * s,
            coins_pos: Vec2::new(-200.0, 600.0) * s,
            game_over_pos: Vec2::ZERO,
            restart_pos: Vec2::new(0.0, -100.0) * s,
            counter_font: 40.0 * s,
            game_over_font: 90.0 * s,
            restart_font: 70.0 * s,
        }
    }
}

/// Handles to the HUD labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub lives: LabelId,
    pub coins: LabelId,
    pub game_over: LabelId,
    pub restart: LabelId,
}

impl Hud {
    /// Create all labels; game-over and restart start hidden
    pub fn create(stage: &mut dyn Stage, state: &SessionState) -> Self {
        let layout = HudLayout::for_screen(stage.size());

        let lives = stage.create_label(LabelDesc {
            text: lives_text(state.lives()),
            position: layout.lives_pos,
            color: WHITE,
            font_size: layout.counter_font,
            visible: true,
        });
        let coins = stage.create_label(LabelDesc {
            text: coins_text(state.coins()),
            position: layout.coins_pos,
            color: YELLOW,
            font_size: layout.counter_font,
            visible: true,
        });
        let game_over = stage.create_label(LabelDesc {
            text: GAME_OVER_TEXT.to_string(),
            position: layout.game_over_pos,
            color: WHITE,
            font_size: layout.game_over_font,
            visible: false,
        });
        let restart = stage.create_label(LabelDesc {
            text: RESTART_TEXT.to_string(),
            position: layout.restart_pos,
            color: WHITE,
            font_size: layout.restart_font,
            visible: false,
        });

        Self {
            lives,
            coins,
            game_over,
            restart,
        }
    }

    pub fn refresh_lives(&self, stage: &mut dyn Stage, lives: u32) {
        stage.set_label_text(self.lives, &lives_text(lives));
    }

    pub fn refresh_coins(&self, stage: &mut dyn Stage, coins: u32) {
        stage.set_label_text(self.coins, &coins_text(coins));
    }

    /// Ended: reveal game over and restart, hide the lives counter
    pub fn show_game_over(&self, stage: &mut dyn Stage) {
        stage.set_label_visible(self.game_over, true);
        stage.set_label_visible(self.restart, true);
        stage.set_label_visible(self.lives, false);
    }

    /// Active: counters visible and current, game over hidden
    pub fn show_session(&self, stage: &mut dyn Stage, state: &SessionState) {
        stage.set_label_visible(self.game_over, false);
        stage.set_label_visible(self.restart, false);
        self.refresh_lives(stage, state.lives());
        self.refresh_coins(stage, state.coins());
        stage.set_label_visible(self.lives, true);
        stage.set_label_visible(self.coins, true);
    }

    /// Hit region of the restart control
    pub fn restart_frame(&self, stage: &dyn Stage) -> Option<Rect> {
        stage.label_frame(self.restart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Scene;

    fn text(scene: &Scene, id: LabelId) -> String {
        scene.label(id).map(|l| l.text.clone()).unwrap_or_default()
    }

    fn visible(scene: &Scene, id: LabelId) -> bool {
        scene.label(id).is_some_and(|l| l.visible)
    }

    #[test]
    fn test_texts() {
        assert_eq!(lives_text(5), "5 lives left");
        assert_eq!(coins_text(12), "Coins: 12");
    }

    #[test]
    fn test_layout_scales_with_height() {
        let reference = HudLayout::for_screen(Vec2::new(750.0, 1334.0));
        assert_eq!(reference.lives_pos, Vec2::new(200.0, 600.0));
        assert_eq!(reference.restart_font, 70.0);

        let half = HudLayout::for_screen(Vec2::new(375.0, 667.0));
        assert!((half.coins_pos.x + 100.0).abs() < 0.001);
        assert!((half.counter_font - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_create_initial_visibility() {
        let mut scene = Scene::new(Vec2::new(750.0, 1334.0));
        let hud = Hud::create(&mut scene, &SessionState::default());
        assert_eq!(text(&scene, hud.lives), "5 lives left");
        assert_eq!(text(&scene, hud.coins), "Coins: 0");
        assert!(visible(&scene, hud.lives));
        assert!(visible(&scene, hud.coins));
        assert!(!visible(&scene, hud.game_over));
        assert!(!visible(&scene, hud.restart));
    }

    #[test]
    fn test_game_over_then_session() {
        let mut scene = Scene::new(Vec2::new(750.0, 1334.0));
        let mut state = SessionState::default();
        let hud = Hud::create(&mut scene, &state);

        hud.refresh_coins(&mut scene, 3);
        hud.show_game_over(&mut scene);
        assert!(visible(&scene, hud.game_over));
        assert!(visible(&scene, hud.restart));
        assert!(!visible(&scene, hud.lives));
        assert_eq!(text(&scene, hud.coins), "Coins: 3");

        state.restart();
        hud.show_session(&mut scene, &state);
        assert!(!visible(&scene, hud.game_over));
        assert!(!visible(&scene, hud.restart));
        assert!(visible(&scene, hud.lives));
        assert_eq!(text(&scene, hud.coins), "Coins: 0");
    }

    #[test]
    fn test_restart_frame_covers_button_center() {
        let mut scene = Scene::new(Vec2::new(750.0, 1334.0));
        let hud = Hud::create(&mut scene, &SessionState::default());
        let frame = hud.restart_frame(&scene).unwrap();
        assert!(frame.contains(Vec2::new(0.0, -80.0)));
        assert!(!frame.contains(Vec2::new(0.0, 600.0)));
    }
}
