//! Petaler library.
//!
//! Drives an animated desktop pet: three background workers (idle
//! animation, interaction routines, dialogue) emit events that a
//! single-threaded [`controller::PetController`] applies to a host
//! [`surface::PetSurface`].

pub mod components;
pub mod controller;
pub mod error;
pub mod events;
pub mod resources;
pub mod surface;
pub mod systems;
