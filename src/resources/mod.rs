//! Long-lived stores, configuration and shared state.
//!
//! Overview
//! - `actioncatalog` – validated actions, idle groups and weighted selection for one pet
//! - `appconfig` – application settings loaded from INI
//! - `dialoguegate` – process-wide "a dialogue bubble is visible" flag
//! - `displaystate` – current frame, window placement and floor contact
//! - `framestore` – decoded sprite frames keyed by file stem
//! - `geometry` – screen and pet-window layout
//! - `petconfig` – per-pet JSON documents and the pet roster
pub mod actioncatalog;
pub mod appconfig;
pub mod dialoguegate;
pub mod displaystate;
pub mod framestore;
pub mod geometry;
pub mod petconfig;
