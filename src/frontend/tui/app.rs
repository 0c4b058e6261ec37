use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent, Overlay};
use crate::network::Connector;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use std::io;
use std::time::Duration;

/// Rows below the field
pub const STATUS_ROWS: u16 = 1;

/// TUI Frontend using ratatui
///
/// Draws the pitch over the whole terminal except the bottom status line, and
/// handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture and bracketed paste,
    /// and enters alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )
        .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(16), // ~60 FPS
            restored: false,
        })
    }

    /// Field area for a terminal of `width` x `height`
    pub fn field_size(width: u16, height: u16) -> (u16, u16) {
        (width, height.saturating_sub(STATUS_ROWS))
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Wait up to one frame for the first event, then drain without blocking
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            let ev = event::read()?;
            if let Some(frontend_event) = FrontendEvent::from_crossterm(ev) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render<C: Connector>(&mut self, core: &AppCore<C>, overlay: &Overlay) -> Result<()> {
        let menus = core.menus();
        let status = core.status_line();
        let transform = core.config.field;

        self.terminal.draw(|f| {
            let [field_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_ROWS)])
                    .areas(f.area());

            super::field::render(f, field_area, &transform);
            f.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::Gray)),
                status_area,
            );
            super::popup::render(f, field_area, overlay, &menus);
        })?;

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        Self::field_size(size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
