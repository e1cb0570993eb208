//! Scene nodes: sprites with collision bodies, and text labels

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::Motion;
use super::{EntityId, LabelId};

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Axis-aligned rectangle in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Closest point inside the rectangle to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Collision body shape, sized from the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    /// Rectangle covering the sprite's size
    #[default]
    Rect,
    /// Circle with radius = half the sprite's width
    Circle,
}

/// Everything needed to create a sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDesc {
    /// Image asset name (resolved by the renderer)
    pub image: &'static str,
    pub position: Vec2,
    pub size: Vec2,
    pub shape: Shape,
    /// Categories this body belongs to
    pub category_mask: u32,
    /// Categories whose contacts this body wants reported
    pub contact_mask: u32,
}

/// A sprite node living in the scene
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: EntityId,
    pub image: &'static str,
    pub position: Vec2,
    pub size: Vec2,
    pub shape: Shape,
    pub category_mask: u32,
    pub contact_mask: u32,
    /// Scripted motion, if one is running
    pub motion: Option<Motion>,
}

impl Sprite {
    pub fn from_desc(id: EntityId, desc: SpriteDesc) -> Self {
        Self {
            id,
            image: desc.image,
            position: desc.position,
            size: desc.size,
            shape: desc.shape,
            category_mask: desc.category_mask,
            contact_mask: desc.contact_mask,
            motion: None,
        }
    }

    /// Bounding rectangle
    pub fn frame(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }

    pub fn radius(&self) -> f32 {
        self.size.x * 0.5
    }

    /// Whether the contact masks ask for this pair to be tested
    pub fn wants_contact_with(&self, other: &Sprite) -> bool {
        self.contact_mask & other.category_mask != 0 || other.contact_mask & self.category_mask != 0
    }

    /// Body overlap test
    pub fn overlaps(&self, other: &Sprite) -> bool {
        match (self.shape, other.shape) {
            (Shape::Rect, Shape::Rect) => self.frame().intersects(&other.frame()),
            (Shape::Circle, Shape::Circle) => {
                let reach = self.radius() + other.radius();
                self.position.distance_squared(other.position) < reach * reach
            }
            (Shape::Circle, Shape::Rect) => circle_rect_overlap(self.position, self.radius(), &other.frame()),
            (Shape::Rect, Shape::Circle) => circle_rect_overlap(other.position, other.radius(), &self.frame()),
        }
    }
}

/// Circle vs axis-aligned rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Everything needed to create a label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDesc {
    pub text: String,
    pub position: Vec2,
    pub color: Color,
    pub font_size: f32,
    pub visible: bool,
}

/// A text node
#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    pub id: LabelId,
    pub text: String,
    pub position: Vec2,
    pub color: Color,
    pub font_size: f32,
    pub visible: bool,
}

/// Average glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f32 = 0.6;
/// Descender depth below the baseline as a fraction of the font size
const DESCENDER: f32 = 0.2;

impl LabelNode {
    pub fn from_desc(id: LabelId, desc: LabelDesc) -> Self {
        Self {
            id,
            text: desc.text,
            position: desc.position,
            color: desc.color,
            font_size: desc.font_size,
            visible: desc.visible,
        }
    }

    /// Approximate text frame: horizontally centered on `position`,
    /// baseline at `position.y`.
    pub fn frame(&self) -> Rect {
        let width = self.text.chars().count() as f32 * self.font_size * GLYPH_ADVANCE;
        let bottom = self.position.y - self.font_size * DESCENDER;
        Rect {
            min: Vec2::new(self.position.x - width * 0.5, bottom),
            max: Vec2::new(self.position.x + width * 0.5, bottom + self.font_size),
        }
    }
}
