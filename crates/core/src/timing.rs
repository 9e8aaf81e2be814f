//! Input timing controller - held/pressed signals to discrete actions
//!
//! Each axis fires once on the tick the key goes down, waits
//! [`REPEAT_WAIT_MS`], then repeats at its interval while the key stays held.
//! Releasing the key resets the axis.

use arrayvec::ArrayVec;

use fallblock_types::{
    GameAction, InputFrame, HORIZONTAL_REPEAT_MS, REPEAT_WAIT_MS, SOFT_DROP_REPEAT_MS,
};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    /// Exactly one of left/right held gives a direction; both or neither give none.
    pub fn from_frame(frame: &InputFrame) -> Self {
        match (frame.left, frame.right) {
            (true, false) => HorizontalDirection::Left,
            (false, true) => HorizontalDirection::Right,
            _ => HorizontalDirection::None,
        }
    }
}

/// Repeat state for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRepeat {
    moved_immediate: bool,
    repeat_wait_ms: u32,
    repeat_ms: u32,
    interval_ms: u32,
}

impl AxisRepeat {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            moved_immediate: false,
            repeat_wait_ms: 0,
            repeat_ms: 0,
            interval_ms,
        }
    }

    /// Advance by one tick; returns true when the axis fires.
    pub fn update(&mut self, held: bool, elapsed_ms: u32) -> bool {
        if !held {
            self.reset();
            return false;
        }

        if !self.moved_immediate {
            self.moved_immediate = true;
            self.repeat_wait_ms = 0;
            self.repeat_ms = 0;
            return true;
        }

        if self.repeat_wait_ms < REPEAT_WAIT_MS {
            self.repeat_wait_ms = self.repeat_wait_ms.saturating_add(elapsed_ms);
            return false;
        }

        if self.repeat_ms < self.interval_ms {
            self.repeat_ms = self.repeat_ms.saturating_add(elapsed_ms);
            return false;
        }

        self.repeat_ms = 0;
        true
    }

    pub fn reset(&mut self) {
        self.moved_immediate = false;
        self.repeat_wait_ms = 0;
        self.repeat_ms = 0;
    }

    pub fn is_active(&self) -> bool {
        self.moved_immediate
    }
}

/// Per-tick action list: at most one horizontal move, one rotate, one soft drop.
pub type TickActions = ArrayVec<GameAction, 3>;

/// Converts sampled input frames into discrete actions.
#[derive(Debug, Clone)]
pub struct InputTiming {
    direction: HorizontalDirection,
    horizontal: AxisRepeat,
    soft_drop: AxisRepeat,
}

impl InputTiming {
    pub fn new() -> Self {
        Self {
            direction: HorizontalDirection::None,
            horizontal: AxisRepeat::new(HORIZONTAL_REPEAT_MS),
            soft_drop: AxisRepeat::new(SOFT_DROP_REPEAT_MS),
        }
    }

    /// Produce this tick's actions in application order:
    /// horizontal move, rotate, soft drop.
    pub fn update(&mut self, frame: &InputFrame, elapsed_ms: u32) -> TickActions {
        let mut actions = TickActions::new();

        let direction = HorizontalDirection::from_frame(frame);
        if direction != self.direction {
            // switching sides while a key is still down is a fresh press
            self.horizontal.reset();
            self.direction = direction;
        }
        if self
            .horizontal
            .update(direction != HorizontalDirection::None, elapsed_ms)
        {
            match direction {
                HorizontalDirection::Left => actions.push(GameAction::MoveLeft),
                HorizontalDirection::Right => actions.push(GameAction::MoveRight),
                HorizontalDirection::None => {}
            }
        }

        if frame.rotate {
            actions.push(GameAction::Rotate);
        }

        if self.soft_drop.update(frame.down, elapsed_ms) {
            actions.push(GameAction::SoftDrop);
        }

        actions
    }

    /// Forget all held state (new piece sessions, restarts)
    pub fn reset(&mut self) {
        self.direction = HorizontalDirection::None;
        self.horizontal.reset();
        self.soft_drop.reset();
    }

    pub fn direction(&self) -> HorizontalDirection {
        self.direction
    }
}

impl Default for InputTiming {
    fn default() -> Self {
        Self::new()
    }
}
