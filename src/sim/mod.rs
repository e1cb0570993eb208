//! Game session logic
//!
//! Everything here is engine-agnostic: it talks to the scene only through
//! the `engine::Stage` primitives and the listener traits.
//! - Seeded RNG only
//! - State changes only inside scene callbacks
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod hud;
pub mod input;
pub mod spawner;
pub mod state;

pub use collision::{Body, Category, Contact, resolve_contact};
pub use controller::GameController;
pub use hud::{Hud, HudLayout, coins_text, lives_text};
pub use input::{PointerResponse, resolve_pointer};
pub use spawner::Spawner;
pub use state::{HitOutcome, SessionPhase, SessionState};
