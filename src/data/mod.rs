//! Data layer - Pure state without UI coupling
//!
//! Structures the frontend reads to present the core's state.
//! NO imports from frontend/ or any terminal code.

pub mod ui_state;

pub use ui_state::*;
