//! Core business logic layer
//!
//! Connection lifecycle, referee command dispatch, display state and input routing.
//! NO imports from frontend/ or rendering code.
//! Core updates the display state, frontends read and render it.

pub mod app_core;
pub mod auto_quit;
pub mod connection;
pub mod dispatcher;
pub mod input_result;
pub mod input_router;
pub mod menu_actions;
pub mod player;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use app_core::AppCore;
pub use input_result::InputResult;
