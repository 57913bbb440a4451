//! Commands sent *to* the interaction worker.

/// Interactive routines the interaction worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    /// Play a named action group once, frame-expanded onto the tick.
    Animate,
    /// Reserved for pointer dragging; clears itself on the next tick.
    MouseDrag,
    /// Reserved for the post-drag fall; clears itself on the next tick.
    Drop,
}

impl Routine {
    /// Resolve a routine by its wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "animate" => Some(Routine::Animate),
            "mousedrag" => Some(Routine::MouseDrag),
            "drop" => Some(Routine::Drop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Routine::Animate => "animate",
            Routine::MouseDrag => "mousedrag",
            Routine::Drop => "drop",
        }
    }
}

#[derive(Debug, Clone)]
pub enum InteractionCmd {
    /// Select the active routine and its target group.
    Start { routine: Routine, group: String },
    /// Set the paused flag and stop the tick source.
    Pause,
    /// Clear the paused flag. Does not restart the tick source.
    Resume,
    /// Restart the tick source at the catalog's interval.
    RestartTicks,
    Shutdown,
}
