//! Game session controller
//!
//! Reacts to scene callbacks and keeps the session state, the player
//! sprite and the HUD in step. It never polls: every change happens
//! inside a callback.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use glam::Vec2;

use super::collision::{Body, Category, Contact, resolve_contact};
use super::hud::Hud;
use super::input::resolve_pointer;
use super::spawner::Spawner;
use super::state::{HitOutcome, SessionState};
use crate::engine::{
    ContactListener, EntityId, InputListener, SceneDelegate, SpriteDesc, Stage, TimerId,
};
use crate::player_home;
use crate::settings::Settings;

/// Categories cleared from the scene on restart
const FALLING: u32 = Category::Enemy.bit() | Category::Coin.bit();

/// Scene controller for one game
pub struct GameController {
    state: SessionState,
    rng: Pcg32,
    player: Option<EntityId>,
    player_size: f32,
    hud: Option<Hud>,
    enemy_spawner: Spawner,
    coin_spawner: Spawner,
}

impl GameController {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            state: SessionState::new(settings.starting_lives),
            rng: Pcg32::seed_from_u64(seed),
            player: None,
            player_size: settings.player_size,
            hud: None,
            enemy_spawner: Spawner::new(Category::Enemy, settings.enemy, settings.descent_overshoot),
            coin_spawner: Spawner::new(Category::Coin, settings.coin, settings.descent_overshoot),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn hud(&self) -> Option<&Hud> {
        self.hud.as_ref()
    }

    pub fn enemy_spawner(&self) -> &Spawner {
        &self.enemy_spawner
    }

    pub fn coin_spawner(&self) -> &Spawner {
        &self.coin_spawner
    }

    fn spawn_player(&mut self, stage: &mut dyn Stage) -> EntityId {
        let home = player_home(stage.size());
        stage.create_sprite(SpriteDesc {
            image: Category::Player.image(),
            position: home,
            size: Vec2::splat(self.player_size),
            shape: Category::Player.shape(),
            category_mask: Category::Player.bit(),
            contact_mask: Category::Player.contact_mask(),
        })
    }

    fn enemy_hit(&mut self, stage: &mut dyn Stage, enemy: EntityId) {
        if self.state.is_ended() {
            return;
        }

        // One enemy costs at most one life
        stage.remove_sprite(enemy);

        let outcome = self.state.apply_enemy_hit();
        if let Some(hud) = &self.hud {
            hud.refresh_lives(stage, self.state.lives());
        }

        match outcome {
            HitOutcome::Damaged { lives_left } => {
                log::debug!("Enemy hit, {} lives left", lives_left);
            }
            HitOutcome::Ended => self.end_session(stage),
            HitOutcome::Ignored => {}
        }
    }

    fn coin_collected(&mut self, stage: &mut dyn Stage, coin: EntityId) {
        if self.state.is_ended() {
            return;
        }

        stage.remove_sprite(coin);

        if let Some(coins) = self.state.apply_coin_collect() {
            if let Some(hud) = &self.hud {
                hud.refresh_coins(stage, coins);
            }
            log::debug!("Coin collected, total {}", coins);
        }
    }

    /// Active → Ended
    fn end_session(&mut self, stage: &mut dyn Stage) {
        if let Some(hud) = &self.hud {
            hud.show_game_over(stage);
        }
        log::info!("Game over with {} coins", self.state.coins());
    }

    /// Ended → Active
    fn restart(&mut self, stage: &mut dyn Stage) {
        self.state.restart();

        let cleared = stage.remove_sprites_in(FALLING);
        if let Some(hud) = &self.hud {
            hud.show_session(stage, &self.state);
        }
        if let Some(player) = self.player {
            stage.set_position(player, player_home(stage.size()));
        }

        log::info!("Session restarted ({} falling entities cleared)", cleared);
    }
}

impl SceneDelegate for GameController {
    fn on_scene_start(&mut self, stage: &mut dyn Stage) {
        if self.player.is_some() {
            log::warn!("Scene start received twice; ignoring");
            return;
        }

        self.player = Some(self.spawn_player(stage));
        self.hud = Some(Hud::create(stage, &self.state));
        self.enemy_spawner.start(stage);
        self.coin_spawner.start(stage);

        log::info!(
            "Session started: {} lives, scene {}x{}",
            self.state.lives(),
            stage.size().x,
            stage.size().y
        );
    }

    fn on_timer(&mut self, stage: &mut dyn Stage, timer: TimerId) {
        if self.enemy_spawner.owns(timer) {
            self.enemy_spawner.tick(stage, &self.state, &mut self.rng);
        } else if self.coin_spawner.owns(timer) {
            self.coin_spawner.tick(stage, &self.state, &mut self.rng);
        }
    }
}

impl ContactListener for GameController {
    fn on_contact_begin(&mut self, stage: &mut dyn Stage, a: EntityId, b: EntityId) {
        let (Some(body_a), Some(body_b)) = (
            stage.sprite(a).map(|s| Body::new(s.id, s.category_mask)),
            stage.sprite(b).map(|s| Body::new(s.id, s.category_mask)),
        ) else {
            return;
        };

        match resolve_contact(body_a, body_b) {
            Contact::EnemyHit { enemy } => self.enemy_hit(stage, enemy),
            Contact::CoinCollected { coin } => self.coin_collected(stage, coin),
            Contact::Ignored => {}
        }
    }
}

impl InputListener for GameController {
    fn on_pointer_moved(&mut self, stage: &mut dyn Stage, point: Option<Vec2>) {
        let restart_frame = self.hud.and_then(|hud| hud.restart_frame(&*stage));
        let response = resolve_pointer(&self.state, point, restart_frame);

        if let (Some(x), Some(player)) = (response.player_x, self.player) {
            if let Some(position) = stage.sprite(player).map(|s| s.position) {
                stage.set_position(player, Vec2::new(x, position.y));
            }
        }

        if response.restart {
            self.restart(stage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::engine::{LabelId, Scene};

    const SCREEN: Vec2 = Vec2::new(750.0, 1334.0);

    fn start() -> (Scene, GameController) {
        let settings = Settings::default();
        let mut scene = Scene::new(settings.screen_size());
        let mut controller = GameController::new(&settings, 1234);
        scene.present(&mut controller);
        (scene, controller)
    }

    /// Drop a stationary entity of `category` directly onto the player
    fn drop_on_player(scene: &mut Scene, controller: &GameController, category: Category) -> EntityId {
        let player = controller.player().unwrap();
        let at = scene.sprite(player).unwrap().position;
        scene.create_sprite(SpriteDesc {
            image: category.image(),
            position: at,
            size: Vec2::splat(40.0),
            shape: category.shape(),
            category_mask: category.bit(),
            contact_mask: category.contact_mask(),
        })
    }

    fn label_text(scene: &Scene, id: LabelId) -> String {
        scene.label(id).map(|l| l.text.clone()).unwrap_or_default()
    }

    fn label_visible(scene: &Scene, id: LabelId) -> bool {
        scene.label(id).is_some_and(|l| l.visible)
    }

    fn player_pos(scene: &Scene, controller: &GameController) -> Vec2 {
        scene.sprite(controller.player().unwrap()).unwrap().position
    }

    fn restart_point(scene: &Scene, controller: &GameController) -> Vec2 {
        controller.hud().unwrap().restart_frame(scene).unwrap().center()
    }

    #[test]
    fn test_scene_start() {
        let (scene, controller) = start();
        let state = controller.state();
        assert_eq!(state.lives(), 5);
        assert_eq!(state.coins(), 0);
        assert!(!state.is_ended());

        let pos = player_pos(&scene, &controller);
        assert_eq!(pos, Vec2::new(0.0, -SCREEN.y / 3.0));

        let hud = controller.hud().unwrap();
        assert_eq!(label_text(&scene, hud.lives), "5 lives left");
        assert_eq!(label_text(&scene, hud.coins), "Coins: 0");
        assert!(!label_visible(&scene, hud.game_over));
        assert!(!label_visible(&scene, hud.restart));
        assert!(controller.enemy_spawner().timer().is_some());
        assert!(controller.coin_spawner().timer().is_some());
    }

    #[test]
    fn test_scene_start_twice_creates_one_player() {
        let (mut scene, mut controller) = start();
        controller.on_scene_start(&mut scene);
        assert_eq!(scene.count_in(Category::Player.bit()), 1);
    }

    #[test]
    fn test_enemy_hit_costs_one_life_and_removes_enemy() {
        let (mut scene, mut controller) = start();
        let enemy = drop_on_player(&mut scene, &controller, Category::Enemy);

        // Sustained overlap for many frames: only one life lost
        for _ in 0..10 {
            scene.advance(FRAME_DT, &mut controller);
        }
        assert_eq!(controller.state().lives(), 4);
        assert!(scene.sprite(enemy).is_none());
        let hud = controller.hud().unwrap();
        assert_eq!(label_text(&scene, hud.lives), "4 lives left");
    }

    #[test]
    fn test_three_coins() {
        let (mut scene, mut controller) = start();
        let mut coins = Vec::new();
        for _ in 0..3 {
            coins.push(drop_on_player(&mut scene, &controller, Category::Coin));
            scene.advance(FRAME_DT, &mut controller);
        }
        assert_eq!(controller.state().coins(), 3);
        assert!(coins.iter().all(|&c| scene.sprite(c).is_none()));
        let hud = controller.hud().unwrap();
        assert_eq!(label_text(&scene, hud.coins), "Coins: 3");

        // Removed coins cannot be contacted again
        let player = controller.player().unwrap();
        controller.on_contact_begin(&mut scene, player, coins[0]);
        assert_eq!(controller.state().coins(), 3);
    }

    #[test]
    fn test_full_session_and_restart() {
        let (mut scene, mut controller) = start();
        let hud = *controller.hud().unwrap();

        for _ in 0..5 {
            drop_on_player(&mut scene, &controller, Category::Enemy);
            scene.advance(FRAME_DT, &mut controller);
        }
        assert_eq!(controller.state().lives(), 0);
        assert!(controller.state().is_ended());
        assert!(label_visible(&scene, hud.game_over));
        assert!(label_visible(&scene, hud.restart));
        assert!(!label_visible(&scene, hud.lives));

        // Input is frozen while ended
        let before = player_pos(&scene, &controller);
        scene.pointer_moved(Some(Vec2::new(250.0, 500.0)), &mut controller);
        assert_eq!(player_pos(&scene, &controller), before);
        assert!(controller.state().is_ended());

        // Tap the restart control
        let tap = restart_point(&scene, &controller);
        scene.pointer_moved(Some(tap), &mut controller);
        let state = controller.state();
        assert_eq!(state.lives(), 5);
        assert_eq!(state.coins(), 0);
        assert!(!state.is_ended());
        assert_eq!(player_pos(&scene, &controller), Vec2::new(0.0, -SCREEN.y / 3.0));
        assert!(!label_visible(&scene, hud.game_over));
        assert!(!label_visible(&scene, hud.restart));
        assert!(label_visible(&scene, hud.lives));
        assert_eq!(label_text(&scene, hud.lives), "5 lives left");
    }

    #[test]
    fn test_restart_region_ignored_while_active() {
        let (mut scene, mut controller) = start();
        drop_on_player(&mut scene, &controller, Category::Coin);
        scene.advance(FRAME_DT, &mut controller);
        assert_eq!(controller.state().coins(), 1);

        let tap = restart_point(&scene, &controller);
        scene.pointer_moved(Some(tap), &mut controller);
        // Player moved, nothing reset
        assert_eq!(controller.state().coins(), 1);
        assert_eq!(player_pos(&scene, &controller).x, tap.x);
    }

    #[test]
    fn test_player_follows_pointer_x_only() {
        let (mut scene, mut controller) = start();
        let home = player_pos(&scene, &controller);
        for x in [120.0, -300.0, 42.5] {
            scene.pointer_moved(Some(Vec2::new(x, 555.0)), &mut controller);
            assert_eq!(player_pos(&scene, &controller), Vec2::new(x, home.y));
        }
        scene.pointer_moved(None, &mut controller);
        assert_eq!(player_pos(&scene, &controller).x, 42.5);
    }

    #[test]
    fn test_spawners_follow_intervals() {
        let (mut scene, mut controller) = start();
        // Keep the player out of the way
        scene.set_position(controller.player().unwrap(), Vec2::new(0.0, -5000.0));

        for _ in 0..(7 * 60) {
            scene.advance(FRAME_DT, &mut controller);
        }
        // 7 s: floor(7 / 1.0) enemies, floor(7 / 1.4) coins
        assert_eq!(controller.enemy_spawner().spawned(), 7);
        assert_eq!(controller.coin_spawner().spawned(), 5);
    }

    #[test]
    fn test_spawners_gated_after_game_over() {
        let (mut scene, mut controller) = start();
        for _ in 0..5 {
            drop_on_player(&mut scene, &controller, Category::Enemy);
            scene.advance(FRAME_DT, &mut controller);
        }
        assert!(controller.state().is_ended());
        scene.set_position(controller.player().unwrap(), Vec2::new(0.0, -5000.0));

        let enemies = controller.enemy_spawner().spawned();
        let coins = controller.coin_spawner().spawned();
        let attempts = controller.enemy_spawner().attempts();
        for _ in 0..(5 * 60) {
            scene.advance(FRAME_DT, &mut controller);
        }
        assert_eq!(controller.enemy_spawner().spawned(), enemies);
        assert_eq!(controller.coin_spawner().spawned(), coins);
        // Timer keeps ticking
        assert!(controller.enemy_spawner().attempts() >= attempts + 4);
    }

    /// Step until the first spawned `category` entity leaves the scene.
    /// Returns (spawn time, removal time, y on the spawn frame).
    fn first_lifetime(category: Category, dt: f32) -> (f32, f32, f32) {
        let (mut scene, mut controller) = start();
        // Out of the descent path
        scene.set_position(controller.player().unwrap(), Vec2::new(0.0, -5000.0));

        let mut first: Option<(EntityId, f32, f32)> = None;
        for _ in 0..((10.0 / dt) as u32) {
            scene.advance(dt, &mut controller);
            match first {
                None => {
                    first = scene
                        .sprites()
                        .find(|s| s.category_mask == category.bit())
                        .map(|s| (s.id, scene.time(), s.position.y));
                }
                Some((id, spawned_at, y)) => {
                    if scene.sprite(id).is_none() {
                        return (spawned_at, scene.time(), y);
                    }
                }
            }
        }
        panic!("{:?} never left the scene", category);
    }

    #[test]
    fn test_spawned_enemy_self_destroys_after_descent() {
        let settings = Settings::default();
        let spawn_y = SCREEN.y / 2.0 + settings.enemy.sprite_size / 2.0;

        for dt in [0.1, FRAME_DT] {
            let (spawned_at, removed_at, y) = first_lifetime(Category::Enemy, dt);
            assert!((spawned_at - 1.0).abs() < 1e-3, "spawned at {}", spawned_at);
            assert!((y - spawn_y).abs() < 1e-3, "moved on its spawn frame: {}", y);
            assert!(
                (removed_at - spawned_at - 1.5).abs() < 1e-3,
                "lifetime {}",
                removed_at - spawned_at
            );
        }
    }

    #[test]
    fn test_spawned_coin_self_destroys_after_descent() {
        let settings = Settings::default();
        let spawn_y = SCREEN.y / 2.0 + settings.coin.sprite_size / 2.0;

        for dt in [0.1, FRAME_DT] {
            let (spawned_at, removed_at, y) = first_lifetime(Category::Coin, dt);
            assert!((spawned_at - 1.4).abs() < 1e-3, "spawned at {}", spawned_at);
            assert!((y - spawn_y).abs() < 1e-3, "moved on its spawn frame: {}", y);
            assert!(
                (removed_at - spawned_at - 1.6).abs() < 1e-3,
                "lifetime {}",
                removed_at - spawned_at
            );
        }
    }

    #[test]
    fn test_restart_clears_falling_entities() {
        let (mut scene, mut controller) = start();
        for _ in 0..5 {
            drop_on_player(&mut scene, &controller, Category::Enemy);
            scene.advance(FRAME_DT, &mut controller);
        }
        drop_on_player(&mut scene, &controller, Category::Coin);
        let tap = restart_point(&scene, &controller);
        scene.pointer_moved(Some(tap), &mut controller);

        assert_eq!(scene.count_in(FALLING), 0);
        scene.advance(FRAME_DT, &mut controller);
        assert_eq!(controller.state().coins(), 0);
        assert_eq!(controller.state().lives(), 5);
    }
}
