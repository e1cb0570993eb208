//! Scene graph and frame loop
//!
//! One call to [`Scene::advance`] runs a frame in a fixed order:
//! 1. step motions, removing sprites whose motion finished
//! 2. fire due timers
//! 3. report contacts that began this frame
//! 4. `on_frame`
//!
//! Sprites created by a timer callback first move on the following frame,
//! so a descent of `d` seconds removes its sprite exactly `d` after spawn.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::action::{Motion, RepeatingTimer};
use super::node::{LabelDesc, LabelNode, Sprite, SpriteDesc};
use super::{EntityId, LabelId, SceneDelegate, Stage, TimerId};

/// Unordered sprite pair, stored smallest id first
type Pair = (EntityId, EntityId);

fn pair(a: EntityId, b: EntityId) -> Pair {
    if a <= b { (a, b) } else { (b, a) }
}

/// Headless scene: sprites, labels, timers, contacts
#[derive(Debug, Clone)]
pub struct Scene {
    size: Vec2,
    /// Sprites by id (BTreeMap keeps iteration deterministic)
    sprites: BTreeMap<EntityId, Sprite>,
    labels: BTreeMap<LabelId, LabelNode>,
    timers: Vec<RepeatingTimer>,
    /// Pairs overlapping at the end of the last contact pass
    touching: BTreeSet<Pair>,
    next_id: u32,
    time: f32,
    presented: bool,
}

impl Scene {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            sprites: BTreeMap::new(),
            labels: BTreeMap::new(),
            timers: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
            time: 0.0,
            presented: false,
        }
    }

    /// Seconds since the scene was presented
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelNode> {
        self.labels.values()
    }

    pub fn timer(&self, id: TimerId) -> Option<&RepeatingTimer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Count sprites whose category intersects `category_mask`
    pub fn count_in(&self, category_mask: u32) -> usize {
        self.sprites
            .values()
            .filter(|s| s.category_mask & category_mask != 0)
            .count()
    }

    fn next_raw_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hand the scene to its delegate. Only the first call has an effect.
    pub fn present(&mut self, delegate: &mut dyn SceneDelegate) {
        if self.presented {
            log::warn!("Scene already presented");
            return;
        }
        self.presented = true;
        delegate.on_scene_start(self);
    }

    /// Run one frame of `dt` seconds
    pub fn advance(&mut self, dt: f32, delegate: &mut dyn SceneDelegate) {
        if dt <= 0.0 {
            return;
        }
        self.time += dt;

        // Motions
        let mut finished = Vec::new();
        for sprite in self.sprites.values_mut() {
            if let Some(motion) = sprite.motion.as_mut() {
                sprite.position.y = motion.step(sprite.position.y, dt);
                if motion.is_finished() {
                    if motion.remove_on_finish {
                        finished.push(sprite.id);
                    }
                    sprite.motion = None;
                }
            }
        }
        for id in finished {
            self.remove_sprite(id);
        }

        // Timers
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            for _ in 0..timer.advance(dt) {
                fired.push(timer.id);
            }
        }
        for id in fired {
            delegate.on_timer(self, id);
        }

        // Contacts
        for (a, b) in self.begin_contacts() {
            // An earlier callback this frame may have removed either body
            if self.sprites.contains_key(&a) && self.sprites.contains_key(&b) {
                delegate.on_contact_begin(self, a, b);
            }
        }

        let time = self.time;
        delegate.on_frame(self, time);
    }

    /// Deliver a pointer-moved event
    pub fn pointer_moved(&mut self, point: Option<Vec2>, delegate: &mut dyn SceneDelegate) {
        delegate.on_pointer_moved(self, point);
    }

    /// Recompute overlapping pairs and return the ones that were not
    /// overlapping on the previous pass.
    fn begin_contacts(&mut self) -> Vec<Pair> {
        let bodies: Vec<&Sprite> = self.sprites.values().collect();

        let mut now = BTreeSet::new();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                if a.wants_contact_with(b) && a.overlaps(b) {
                    now.insert(pair(a.id, b.id));
                }
            }
        }

        let began: Vec<Pair> = now.difference(&self.touching).copied().collect();
        self.touching = now;
        began
    }
}

impl Stage for Scene {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn create_sprite(&mut self, desc: SpriteDesc) -> EntityId {
        let id = EntityId(self.next_raw_id());
        self.sprites.insert(id, Sprite::from_desc(id, desc));
        id
    }

    fn remove_sprite(&mut self, id: EntityId) -> bool {
        if self.sprites.remove(&id).is_none() {
            return false;
        }
        self.touching.retain(|&(a, b)| a != id && b != id);
        true
    }

    fn remove_sprites_in(&mut self, category_mask: u32) -> usize {
        let doomed: Vec<EntityId> = self
            .sprites
            .values()
            .filter(|s| s.category_mask & category_mask != 0)
            .map(|s| s.id)
            .collect();
        for id in &doomed {
            self.remove_sprite(*id);
        }
        doomed.len()
    }

    fn sprite(&self, id: EntityId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    fn set_position(&mut self, id: EntityId, position: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.position = position;
        }
    }

    fn run_motion(&mut self, id: EntityId, mut motion: Motion) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            motion.begin(sprite.position.y);
            sprite.motion = Some(motion);
        }
    }

    fn create_label(&mut self, desc: LabelDesc) -> LabelId {
        let id = LabelId(self.next_raw_id());
        self.labels.insert(id, LabelNode::from_desc(id, desc));
        id
    }

    fn set_label_text(&mut self, id: LabelId, text: &str) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.text.clear();
            label.text.push_str(text);
        }
    }

    fn set_label_visible(&mut self, id: LabelId, visible: bool) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.visible = visible;
        }
    }

    fn label(&self, id: LabelId) -> Option<&LabelNode> {
        self.labels.get(&id)
    }

    fn schedule_repeating(&mut self, interval: f32) -> TimerId {
        let id = TimerId(self.next_raw_id());
        self.timers.push(RepeatingTimer::new(id, interval));
        id
    }
}
