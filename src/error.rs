//! Error types.
//!
//! Activation-time failures ([`ResourceError`], [`CatalogError`]) are returned
//! synchronously to whoever activates or switches a pet, wrapped in
//! [`ActivationError`]. Runtime failures inside a running worker become a
//! [`WorkerFault`] delivered on the controller's fault channel.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Missing or unreadable configuration and image assets.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("malformed document '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("cannot start worker thread: {0}")]
    Thread(#[source] std::io::Error),
}

/// Inconsistency between a pet's configuration documents and its frames.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("action '{action}' has no frames named '{base}_<n>.png'")]
    MissingFrames { action: String, base: String },
    #[error("action '{action}' is missing frame '{base}_{index}'")]
    FrameGap {
        action: String,
        base: String,
        index: usize,
    },
    #[error("idle group {group} references undefined action '{action}'")]
    UnknownAction { group: usize, action: String },
    #[error("core role '{role}' names undefined action '{action}'")]
    UnknownCoreAction { role: &'static str, action: String },
    #[error("idle group {0} is empty")]
    EmptyGroup(usize),
    #[error("pet declares no idle action groups")]
    NoIdleGroups,
    #[error("group probability {index} is invalid ({value})")]
    InvalidProbability { index: usize, value: f64 },
    #[error("action '{0}' must repeat at least once")]
    InvalidRepeat(String),
    #[error("'{0}' must be a finite, non-negative duration")]
    InvalidTiming(String),
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
}

/// Any failure that aborts a pet activation.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Which background worker a fault or command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    Animation,
    Interaction,
    Dialogue,
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerKind::Animation => "animation",
            WorkerKind::Interaction => "interaction",
            WorkerKind::Dialogue => "dialogue",
        };
        f.write_str(name)
    }
}

/// A worker loop terminated abnormally.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{worker} worker for pet '{pet}' failed: {message}")]
pub struct WorkerFault {
    pub worker: WorkerKind,
    pub pet: String,
    pub message: String,
}

impl WorkerFault {
    /// Build a fault from a panic payload caught at the worker boundary.
    pub fn from_panic(
        worker: WorkerKind,
        pet: impl Into<String>,
        payload: Box<dyn std::any::Any + Send>,
    ) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "worker panicked".to_string()
        };
        Self {
            worker,
            pet: pet.into(),
            message,
        }
    }
}
