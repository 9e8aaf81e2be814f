//! Held-key tracking for terminal environments.
//!
//! The simulation wants "held" states for left, right and down and a
//! "pressed this tick" flag for rotate. Terminals report presses (and
//! auto-repeats) but often no releases, so a key that has not been seen for
//! the release timeout counts as released.

use std::time::{Duration, Instant};

use log::trace;

use fallblock_types::InputFrame;

use crate::map::Key;

// Keys with no release or repeat event within this window count as released.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Tracks which game keys are currently down.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    left: Option<Instant>,
    right: Option<Instant>,
    down: Option<Instant>,
    up: Option<Instant>,
    rotate_pending: bool,
    key_release_timeout: Duration,
    reported_event_types: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            down: None,
            up: None,
            rotate_pending: false,
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            reported_event_types: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// The terminal tags auto-repeats as repeats, so every press is a real
    /// key-down and each press of Up rotates.
    pub fn with_reported_event_types(mut self, reported: bool) -> Self {
        self.reported_event_types = reported;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u64 {
        self.key_release_timeout.as_millis() as u64
    }

    fn slot(&mut self, key: Key) -> Option<&mut Option<Instant>> {
        match key {
            Key::Left => Some(&mut self.left),
            Key::Right => Some(&mut self.right),
            Key::Down => Some(&mut self.down),
            Key::Up => Some(&mut self.up),
            Key::A | Key::B => None,
        }
    }

    /// Record a press or auto-repeat. Returns true for a fresh press.
    pub fn handle_key_press(&mut self, key: Key) -> bool {
        let now = Instant::now();
        let Some(slot) = self.slot(key) else {
            return true;
        };
        let fresh = slot.is_none();
        *slot = Some(now);
        if key == Key::Up && (fresh || self.reported_event_types) {
            self.rotate_pending = true;
        }
        fresh
    }

    /// Record a terminal auto-repeat: keeps the key held, never rotates.
    pub fn handle_key_repeat(&mut self, key: Key) {
        let now = Instant::now();
        if let Some(slot) = self.slot(key) {
            *slot = Some(now);
        }
    }

    pub fn handle_key_release(&mut self, key: Key) {
        if let Some(slot) = self.slot(key) {
            *slot = None;
        }
    }

    /// Expire stale keys and build this tick's frame. Consumes a pending rotate.
    pub fn sample(&mut self) -> InputFrame {
        let timeout = self.key_release_timeout;
        for (name, slot) in [
            ("left", &mut self.left),
            ("right", &mut self.right),
            ("down", &mut self.down),
            ("up", &mut self.up),
        ] {
            if slot.is_some_and(|at| at.elapsed() > timeout) {
                trace!("auto-release {}", name);
                *slot = None;
            }
        }

        InputFrame {
            left: self.left.is_some(),
            right: self.right.is_some(),
            down: self.down.is_some(),
            rotate: std::mem::take(&mut self.rotate_pending),
        }
    }

    pub fn reset(&mut self) {
        self.left = None;
        self.right = None;
        self.down = None;
        self.up = None;
        self.rotate_pending = false;
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}
