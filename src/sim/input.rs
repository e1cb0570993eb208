//! Pointer input rules
//!
//! While the session is active the player's x follows the pointer. Once
//! it has ended the pointer only matters if it lands on the restart
//! control.

use glam::Vec2;

use super::state::SessionState;
use crate::engine::Rect;

/// What a pointer-moved event should do
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerResponse {
    /// New player x, if the player should move
    pub player_x: Option<f32>,
    /// Restart the session
    pub restart: bool,
}

/// Decide the effect of a pointer-moved event.
///
/// `restart_frame` is the restart control's hit region; it is only tested
/// while the session is ended.
pub fn resolve_pointer(
    state: &SessionState,
    point: Option<Vec2>,
    restart_frame: Option<Rect>,
) -> PointerResponse {
    let Some(point) = point else {
        return PointerResponse::default();
    };

    if !state.is_ended() {
        return PointerResponse {
            player_x: Some(point.x),
            restart: false,
        };
    }

    PointerResponse {
        player_x: None,
        restart: restart_frame.is_some_and(|frame| frame.contains(point)),
    }
}
