//! Periodic spawners for falling entities
//!
//! A spawner owns one repeating engine timer. Every tick it either drops
//! a new entity from just above the top edge or, once the session has
//! ended, does nothing. The timer itself is never stopped.

use glam::Vec2;
use rand::Rng;

use super::collision::Category;
use super::state::SessionState;
use crate::descent_target_y;
use crate::engine::{EntityId, Motion, SpriteDesc, Stage, TimerId};
use crate::settings::SpawnerSettings;

/// Spawner for one category of falling entity
#[derive(Debug, Clone)]
pub struct Spawner {
    pub category: Category,
    pub settings: SpawnerSettings,
    /// Vertical overshoot below the player's row
    pub overshoot: f32,
    timer: Option<TimerId>,
    /// Ticks received
    attempts: u64,
    /// Entities actually created
    spawned: u64,
}

impl Spawner {
    pub fn new(category: Category, settings: SpawnerSettings, overshoot: f32) -> Self {
        Self {
            category,
            settings,
            overshoot,
            timer: None,
            attempts: 0,
            spawned: 0,
        }
    }

    /// Register the repeating timer. Starting twice keeps the first timer.
    pub fn start(&mut self, stage: &mut dyn Stage) -> TimerId {
        if let Some(timer) = self.timer {
            return timer;
        }
        let timer = stage.schedule_repeating(self.settings.interval);
        self.timer = Some(timer);
        timer
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn owns(&self, timer: TimerId) -> bool {
        self.timer == Some(timer)
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Where a new entity appears: random x over the full width, just
    /// above the top edge.
    pub fn spawn_position(&self, screen: Vec2, rng: &mut impl Rng) -> Vec2 {
        let half_width = screen.x * 0.5;
        let x = if half_width > 0.0 {
            rng.random_range(-half_width..half_width)
        } else {
            0.0
        };
        Vec2::new(x, screen.y * 0.5 + self.settings.sprite_size * 0.5)
    }

    /// Handle one timer tick, spawning unless the session has ended
    pub fn tick(
        &mut self,
        stage: &mut dyn Stage,
        state: &SessionState,
        rng: &mut impl Rng,
    ) -> Option<EntityId> {
        self.attempts += 1;
        if state.is_ended() {
            return None;
        }

        let screen = stage.size();
        let position = self.spawn_position(screen, rng);
        let id = stage.create_sprite(SpriteDesc {
            image: self.category.image(),
            position,
            size: Vec2::splat(self.settings.sprite_size),
            shape: self.category.shape(),
            category_mask: self.category.bit(),
            contact_mask: self.category.contact_mask(),
        });
        stage.run_motion(
            id,
            Motion::descend_and_remove(
                descent_target_y(screen, self.overshoot),
                self.settings.descent_duration,
            ),
        );

        self.spawned += 1;
        log::debug!("Spawned {:?} {:?} at x={:.1}", self.category, id, position.x);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Scene;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn screen() -> Vec2 {
        Vec2::new(750.0, 1334.0)
    }

    #[test]
    fn test_spawn_position_within_width_above_top() {
        let spawner = Spawner::new(Category::Enemy, SpawnerSettings::enemy(), 200.0);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let p = spawner.spawn_position(screen(), &mut rng);
            assert!(p.x >= -375.0 && p.x < 375.0);
            assert!((p.y - (667.0 + 35.0)).abs() < 0.001);
        }
    }

    #[test]
    fn test_tick_creates_falling_entity() {
        let mut scene = Scene::new(screen());
        let mut spawner = Spawner::new(Category::Coin, SpawnerSettings::coin(), 200.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let state = SessionState::default();

        let id = spawner.tick(&mut scene, &state, &mut rng).unwrap();
        let sprite = scene.sprite(id).unwrap();
        assert_eq!(sprite.category_mask, Category::Coin.bit());
        assert_eq!(sprite.contact_mask, Category::Player.bit());
        let motion = sprite.motion.unwrap();
        assert!((motion.target_y - (-1334.0 / 3.0 - 200.0)).abs() < 0.001);
        assert_eq!(motion.duration, 1.6);
        assert!(motion.remove_on_finish);
        assert_eq!(spawner.spawned(), 1);
    }

    #[test]
    fn test_tick_gated_when_ended() {
        let mut scene = Scene::new(screen());
        let mut spawner = Spawner::new(Category::Enemy, SpawnerSettings::enemy(), 200.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = SessionState::new(1);
        state.apply_enemy_hit();

        assert!(spawner.tick(&mut scene, &state, &mut rng).is_none());
        assert_eq!(spawner.attempts(), 1);
        assert_eq!(spawner.spawned(), 0);
        assert_eq!(scene.sprites().count(), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut scene = Scene::new(screen());
        let mut spawner = Spawner::new(Category::Enemy, SpawnerSettings::enemy(), 200.0);
        let first = spawner.start(&mut scene);
        let second = spawner.start(&mut scene);
        assert_eq!(first, second);
        assert!(spawner.owns(first));
        assert_eq!(scene.timer(first).map(|t| t.interval), Some(1.0));
    }
}
