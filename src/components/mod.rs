//! Plain data shared between the workers and the controller.
//!
//! Submodules overview:
//! - [`action`] – immutable actions, their frames and action groups
//! - [`workercontrol`] – pause/kill flags and interruptible sleeps for a worker

pub mod action;
pub mod workercontrol;
