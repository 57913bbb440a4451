//! What the pet currently shows and where.
//!
//! Owned by the coordination thread and mutated only while it applies worker
//! events, so no locking is involved.

use crate::components::action::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    /// Frame on screen now.
    pub frame: Option<Frame>,
    /// Frame shown before the last change.
    pub previous_frame: Option<Frame>,
    pub placement: Placement,
    /// Set while the pet rests on the floor line.
    pub on_floor: bool,
    /// Text in the dialogue bubble, if visible.
    pub dialogue: Option<String>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new frame, remembering the old one.
    pub fn set_frame(&mut self, frame: Frame) {
        self.previous_frame = self.frame.replace(frame);
    }

    /// Forget everything tied to the previous pet.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
