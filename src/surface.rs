//! Host window abstraction driven by the pet controller.
//!
//! The controller never talks to a windowing toolkit directly. Whatever
//! hosts the pet (a desktop overlay, a test harness, the headless runner)
//! implements [`PetSurface`].

use log::{debug, info, trace};

use crate::components::action::Frame;

pub trait PetSurface {
    /// Display `frame` as the pet image.
    fn set_frame(&mut self, frame: &Frame);
    /// Move the window's top-left corner to `(x, y)`.
    fn move_to(&mut self, x: i32, y: i32);
    fn resize(&mut self, width: u32, height: u32);
    fn repaint(&mut self);
    /// Show `text` in the dialogue bubble.
    fn set_dialogue(&mut self, text: &str);
    fn clear_dialogue(&mut self);
    fn show(&mut self);
    fn hide(&mut self);
}

/// Surface that only logs what it is asked to do.
#[derive(Debug, Default)]
pub struct LogSurface {
    visible: bool,
    position: (i32, i32),
    repaints: u64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn repaints(&self) -> u64 {
        self.repaints
    }
}

impl PetSurface for LogSurface {
    fn set_frame(&mut self, frame: &Frame) {
        trace!(target: "surface", "frame {}x{}", frame.width(), frame.height());
    }

    fn move_to(&mut self, x: i32, y: i32) {
        trace!(target: "surface", "move to ({}, {})", x, y);
        self.position = (x, y);
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!(target: "surface", "resize to {}x{}", width, height);
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn set_dialogue(&mut self, text: &str) {
        info!(target: "surface", "says: {}", text.replace('\n', " "));
    }

    fn clear_dialogue(&mut self) {
        debug!(target: "surface", "dialogue cleared");
    }

    fn show(&mut self) {
        info!(target: "surface", "pet window shown");
        self.visible = true;
    }

    fn hide(&mut self) {
        info!(target: "surface", "pet window hidden");
        self.visible = false;
    }
}

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// Dimensions of the frame that was set.
    SetFrame(u32, u32),
    MoveTo(i32, i32),
    Resize(u32, u32),
    Repaint,
    SetDialogue(String),
    ClearDialogue,
    Show,
    Hide,
}

/// Surface that records every call, for harnesses that inspect the output.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub visible: bool,
    pub frame: Option<Frame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PetSurface for RecordingSurface {
    fn set_frame(&mut self, frame: &Frame) {
        self.calls.push(SurfaceCall::SetFrame(frame.width(), frame.height()));
        self.frame = Some(Frame::clone(frame));
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.calls.push(SurfaceCall::MoveTo(x, y));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(SurfaceCall::Resize(width, height));
    }

    fn repaint(&mut self) {
        self.calls.push(SurfaceCall::Repaint);
    }

    fn set_dialogue(&mut self, text: &str) {
        self.calls.push(SurfaceCall::SetDialogue(text.to_string()));
    }

    fn clear_dialogue(&mut self) {
        self.calls.push(SurfaceCall::ClearDialogue);
    }

    fn show(&mut self) {
        self.calls.push(SurfaceCall::Show);
        self.visible = true;
    }

    fn hide(&mut self) {
        self.calls.push(SurfaceCall::Hide);
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Arc;

    #[test]
    fn test_log_surface_tracks_visibility_and_position() {
        let mut surface = LogSurface::new();
        surface.show();
        surface.move_to(4, 5);
        surface.repaint();
        assert!(surface.is_visible());
        assert_eq!(surface.position(), (4, 5));
        assert_eq!(surface.repaints(), 1);
        surface.hide();
        assert!(!surface.is_visible());
    }

    #[test]
    fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.set_frame(&Arc::new(RgbaImage::new(3, 2)));
        surface.set_dialogue("hi");
        surface.clear_dialogue();
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::SetFrame(3, 2),
                SurfaceCall::SetDialogue("hi".to_string()),
                SurfaceCall::ClearDialogue,
            ]
        );
    }
}
