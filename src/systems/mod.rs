//! Worker loops and the pure update logic they run.
//!
//! Submodules overview
//! - [`animation`] – idle animation loop drawing weighted idle groups
//! - [`interaction`] – tick-driven routine playback with frame expansion
//! - [`dialogue`] – greeting and idle chatter behind the dialogue gate
//! - [`movement`] – window wrap-around and floor clamping
//! - [`worker`] – thread spawning, fault capture and the common worker trait

pub mod animation;
pub mod dialogue;
pub mod interaction;
pub mod movement;
pub mod worker;
