//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements.
//! It provides a unified interface for event polling, rendering, and cleanup.

pub mod events;
pub mod prompt;
pub mod tui;

use crate::core::AppCore;
use crate::network::Connector;
use anyhow::Result;
pub use events::FrontendEvent;
pub use prompt::Overlay;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// Separates rendering concerns from business logic. The frontend reads the
/// core's state and the open overlay; it never changes either.
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events converted to `FrontendEvent` (empty if none).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the field, the status line and the overlay, if any
    fn render<C: Connector>(&mut self, core: &AppCore<C>, overlay: &Overlay) -> Result<()>;

    /// Restore the terminal
    fn cleanup(&mut self) -> Result<()>;

    /// Size of the field area in cells
    fn size(&self) -> (u16, u16);
}
