//! Events sent *from* the workers to the coordination thread.
//!
//! Emission is fire-and-forget over an unbounded channel: producers never
//! block on the consumer. Within one worker the events arrive in the order
//! the frames advanced; across workers the consumer applies them in arrival
//! order.

use crate::components::action::Frame;
use crate::error::WorkerKind;

/// Text shown in the dialogue bubble, or the sentinel that hides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueText {
    Show(String),
    Clear,
}

#[derive(Debug, Clone)]
pub enum PetEvent {
    /// The displayed frame should become `frame`.
    FrameChanged { source: WorkerKind, frame: Frame },
    /// Move the pet window by a relative offset.
    MoveBy { source: WorkerKind, dx: f64, dy: f64 },
    RepaintRequested,
    /// The active interaction routine played its whole group.
    RoutineFinished { group: String },
    DialogueTextChanged(DialogueText),
}

impl PetEvent {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PetEvent::FrameChanged { .. } => "frame_changed",
            PetEvent::MoveBy { .. } => "move_by",
            PetEvent::RepaintRequested => "repaint",
            PetEvent::RoutineFinished { .. } => "routine_finished",
            PetEvent::DialogueTextChanged(_) => "dialogue_text",
        }
    }
}
