//! Timed actions: scripted motions and repeating timers

use crate::consts::TIME_EPSILON;

use super::TimerId;

/// Linear vertical move to `target_y` over `duration` seconds.
///
/// The start height is captured when the motion is attached to a sprite.
/// When `remove_on_finish` is set the sprite is removed from the scene on
/// the frame the motion completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub target_y: f32,
    pub duration: f32,
    pub remove_on_finish: bool,
    start_y: Option<f32>,
    elapsed: f32,
}

impl Motion {
    /// Move to `target_y` and then remove the sprite
    pub fn descend_and_remove(target_y: f32, duration: f32) -> Self {
        Self {
            target_y,
            duration,
            remove_on_finish: true,
            start_y: None,
            elapsed: 0.0,
        }
    }

    /// Move to `target_y` and stay there
    pub fn move_to_y(target_y: f32, duration: f32) -> Self {
        Self {
            remove_on_finish: false,
            ..Self::descend_and_remove(target_y, duration)
        }
    }

    /// Capture the start height (first attach wins)
    pub fn begin(&mut self, current_y: f32) {
        if self.start_y.is_none() {
            self.start_y = Some(current_y);
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.duration
    }

    /// Advance by `dt` and return the new height
    pub fn step(&mut self, current_y: f32, dt: f32) -> f32 {
        self.begin(current_y);
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));

        if self.is_finished() {
            return self.target_y;
        }

        let start = self.start_y.unwrap_or(current_y);
        let t = self.elapsed / self.duration;
        start + (self.target_y - start) * t
    }
}

/// Fires every `interval` seconds, forever
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTimer {
    pub id: TimerId,
    pub interval: f32,
    elapsed: f32,
    fired: u64,
}

impl RepeatingTimer {
    pub fn new(id: TimerId, interval: f32) -> Self {
        Self {
            id,
            interval,
            elapsed: 0.0,
            fired: 0,
        }
    }

    /// Total number of times this timer has fired
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Advance by `dt`, returning how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }

        self.elapsed += dt;
        let mut count = 0;
        while self.elapsed + TIME_EPSILON >= self.interval {
            self.elapsed -= self.interval;
            count += 1;
        }
        self.fired += count as u64;
        count
    }
}
