//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::engine::{Scene, Sprite};
use crate::sim::Category;

/// Segments used for round sprites
const CIRCLE_SEGMENTS: u32 = 24;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let half = size * 0.5;
    let (x0, y0) = (center.x - half.x, center.y - half.y);
    let (x1, y1) = (center.x + half.x, center.y + half.y);

    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y1, color),
        Vertex::new(x0, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for one sprite, styled by category
pub fn sprite(sprite: &Sprite) -> Vec<Vertex> {
    let center = sprite.position;
    let size = sprite.size;

    match Category::from_mask(sprite.category_mask) {
        Some(Category::Player) => {
            let mut v = rect(center, size, colors::PLAYER);
            v.extend(rect(
                center + Vec2::new(0.0, size.y * 0.15),
                size * 0.3,
                colors::PLAYER_COCKPIT,
            ));
            v
        }
        Some(Category::Enemy) => {
            let radius = sprite.radius();
            let mut v = circle(center, radius, colors::ENEMY, CIRCLE_SEGMENTS);
            v.extend(circle(center, radius * 0.4, colors::ENEMY_CORE, CIRCLE_SEGMENTS));
            v
        }
        Some(Category::Coin) => {
            let radius = size.x.min(size.y) * 0.5;
            let mut v = circle(center, radius, colors::COIN_RIM, CIRCLE_SEGMENTS);
            v.extend(circle(center, radius * 0.8, colors::COIN, CIRCLE_SEGMENTS));
            v
        }
        None => rect(center, size, colors::UNKNOWN),
    }
}

/// All sprites, player drawn last so it stays on top
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let player_bit = Category::Player.bit();

    let mut vertices = Vec::new();
    for s in scene.sprites().filter(|s| s.category_mask != player_bit) {
        vertices.extend(sprite(s));
    }
    for s in scene.sprites().filter(|s| s.category_mask == player_bit) {
        vertices.extend(sprite(s));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SpriteDesc, Stage};

    #[test]
    fn test_rect_two_triangles() {
        let v = rect(Vec2::ZERO, Vec2::new(4.0, 2.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [-2.0, -1.0]);
        assert_eq!(v[2].position, [2.0, 1.0]);
    }

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::ZERO, 1.0, [1.0; 4], 8);
        assert_eq!(v.len(), 24);
        for vertex in &v {
            let r = Vec2::from(vertex.position).length();
            assert!(r <= 1.0001);
        }
    }

    #[test]
    fn test_scene_vertices_player_drawn_last() {
        let mut scene = Scene::new(Vec2::new(750.0, 1334.0));
        let desc = |category: Category, x: f32| SpriteDesc {
            image: category.image(),
            position: Vec2::new(x, 0.0),
            size: Vec2::splat(40.0),
            shape: category.shape(),
            category_mask: category.bit(),
            contact_mask: category.contact_mask(),
        };
        scene.create_sprite(desc(Category::Player, 0.0));
        scene.create_sprite(desc(Category::Enemy, 100.0));

        let v = scene_vertices(&scene);
        let enemy_count = (CIRCLE_SEGMENTS * 3 * 2) as usize;
        assert_eq!(v.len(), enemy_count + 12);
        // Last vertices belong to the player's cockpit
        assert_eq!(v.last().map(|v| v.color), Some(colors::PLAYER_COCKPIT));
    }
}
