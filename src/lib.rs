//! dexbook - ability and move reference viewer
//!
//! The library holds everything but terminal wiring so tests can drive it.

pub mod action;
pub mod classify;
pub mod detail;
pub mod effect;
pub mod error;
pub mod favorites;
pub mod loader;
pub mod logging;
pub mod record;
pub mod reducer;
pub mod state;
pub mod ui;
