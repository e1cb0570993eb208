//! Headless scene host
//!
//! Owns everything the game controller must not: the sprite and label
//! nodes, scripted motions, repeating timers, and contact detection.
//! The controller sees it only through the [`Stage`] primitives and
//! receives callbacks through the listener traits below.

pub mod action;
pub mod node;
pub mod scene;

pub use action::{Motion, RepeatingTimer};
pub use node::{Color, LabelDesc, LabelNode, Rect, Shape, Sprite, SpriteDesc};
pub use scene::Scene;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprite handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Label handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelId(pub u32);

/// Repeating timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Drawing and scheduling primitives offered to the controller
pub trait Stage {
    /// Scene size; the origin is at the center
    fn size(&self) -> Vec2;

    fn create_sprite(&mut self, desc: SpriteDesc) -> EntityId;
    /// Returns false if the sprite was already gone
    fn remove_sprite(&mut self, id: EntityId) -> bool;
    /// Remove every sprite whose category intersects `category_mask`
    fn remove_sprites_in(&mut self, category_mask: u32) -> usize;
    fn sprite(&self, id: EntityId) -> Option<&Sprite>;
    fn set_position(&mut self, id: EntityId, position: Vec2);
    fn run_motion(&mut self, id: EntityId, motion: Motion);

    fn create_label(&mut self, desc: LabelDesc) -> LabelId;
    fn set_label_text(&mut self, id: LabelId, text: &str);
    fn set_label_visible(&mut self, id: LabelId, visible: bool);
    fn label(&self, id: LabelId) -> Option<&LabelNode>;
    fn label_frame(&self, id: LabelId) -> Option<Rect> {
        self.label(id).map(LabelNode::frame)
    }

    /// Start a timer that fires every `interval` seconds, first after one interval
    fn schedule_repeating(&mut self, interval: f32) -> TimerId;
}

/// Receives contact-begin events (edge-triggered)
pub trait ContactListener {
    fn on_contact_begin(&mut self, stage: &mut dyn Stage, a: EntityId, b: EntityId);
}

/// Receives pointer movement; `None` when the event carried no touch point
pub trait InputListener {
    fn on_pointer_moved(&mut self, stage: &mut dyn Stage, point: Option<Vec2>);
}

/// Full set of callbacks a scene drives
pub trait SceneDelegate: ContactListener + InputListener {
    /// Called once when the scene is presented
    fn on_scene_start(&mut self, stage: &mut dyn Stage);

    /// Called at the end of every frame
    fn on_frame(&mut self, _stage: &mut dyn Stage, _time_since_start: f32) {}

    /// Called each time a repeating timer fires
    fn on_timer(&mut self, stage: &mut dyn Stage, timer: TimerId);
}
