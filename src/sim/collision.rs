//! Entity categories and contact resolution
//!
//! The engine reports raw body pairs; this module decides what a pair
//! means for the session. Resolution never depends on argument order.

use serde::{Deserialize, Serialize};

use crate::engine::{EntityId, Shape};

/// Collision category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    Coin,
}

impl Category {
    /// Category bit used in engine masks
    pub const fn bit(self) -> u32 {
        match self {
            Category::Player => 1 << 0,
            Category::Enemy => 1 << 1,
            Category::Coin => 1 << 2,
        }
    }

    /// Categories whose contacts this entity reports
    pub const fn contact_mask(self) -> u32 {
        match self {
            Category::Player => Category::Enemy.bit() | Category::Coin.bit(),
            Category::Enemy | Category::Coin => Category::Player.bit(),
        }
    }

    /// Body shape: enemies are round, everything else is boxed
    pub const fn shape(self) -> Shape {
        match self {
            Category::Enemy => Shape::Circle,
            Category::Player | Category::Coin => Shape::Rect,
        }
    }

    /// Image asset name
    pub const fn image(self) -> &'static str {
        match self {
            Category::Player => "player",
            Category::Enemy => "enemy",
            Category::Coin => "coins",
        }
    }

    /// Exact reverse of [`Category::bit`]
    pub fn from_mask(mask: u32) -> Option<Self> {
        [Category::Player, Category::Enemy, Category::Coin]
            .into_iter()
            .find(|c| c.bit() == mask)
    }
}

/// One participant of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub id: EntityId,
    pub category_mask: u32,
}

impl Body {
    pub fn new(id: EntityId, category_mask: u32) -> Self {
        Self { id, category_mask }
    }
}

/// What a contact means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// An enemy reached the player
    EnemyHit { enemy: EntityId },
    /// The player picked up a coin
    CoinCollected { coin: EntityId },
    /// Any other pairing
    Ignored,
}

/// Classify a contact between two bodies
pub fn resolve_contact(a: Body, b: Body) -> Contact {
    let cat_a = Category::from_mask(a.category_mask);
    let cat_b = Category::from_mask(b.category_mask);

    match (cat_a, cat_b) {
        (Some(Category::Player), Some(Category::Enemy)) => Contact::EnemyHit { enemy: b.id },
        (Some(Category::Enemy), Some(Category::Player)) => Contact::EnemyHit { enemy: a.id },
        (Some(Category::Player), Some(Category::Coin)) => Contact::CoinCollected { coin: b.id },
        (Some(Category::Coin), Some(Category::Player)) => Contact::CoinCollected { coin: a.id },
        _ => Contact::Ignored,
    }
}
