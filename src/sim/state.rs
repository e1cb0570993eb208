//! Session state and its transitions
//!
//! Lives, coins and the ended flag change only through the named
//! transitions on [`SessionState`].

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player moves, spawners produce entities
    #[default]
    Active,
    /// Lives ran out; waiting for restart
    Ended,
}

/// Result of an enemy hitting the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Lost a life, still playing
    Damaged { lives_left: u32 },
    /// Lost the last life; the session is now ended
    Ended,
    /// Session had already ended, nothing changed
    Ignored,
}

/// Lives, coins and phase of one play-through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    lives: u32,
    coins: u32,
    phase: SessionPhase,
    /// Lives restored on restart
    starting_lives: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl SessionState {
    /// Fresh active session. A session always starts with at least one life.
    pub fn new(starting_lives: u32) -> Self {
        let starting_lives = starting_lives.max(1);
        Self {
            lives: starting_lives,
            coins: 0,
            phase: SessionPhase::Active,
            starting_lives,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Enemy touched the player: one life lost, ending the session at zero
    pub fn apply_enemy_hit(&mut self) -> HitOutcome {
        if self.is_ended() {
            return HitOutcome::Ignored;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = SessionPhase::Ended;
            HitOutcome::Ended
        } else {
            HitOutcome::Damaged {
                lives_left: self.lives,
            }
        }
    }

    /// Coin touched the player. Returns the new total, or `None` if ended.
    pub fn apply_coin_collect(&mut self) -> Option<u32> {
        if self.is_ended() {
            return None;
        }
        self.coins = self.coins.saturating_add(1);
        Some(self.coins)
    }

    /// Back to a fresh active session, whatever the prior state
    pub fn restart(&mut self) {
        self.lives = self.starting_lives;
        self.coins = 0;
        self.phase = SessionPhase::Active;
    }
}
