//! Frontend-agnostic input events.
//!
//! The terminal frontend translates crossterm's event stream into this enum so
//! the event loop only handles one event shape.

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Key press (repeats and releases are dropped)
    Key(KeyEvent),
    /// Mouse input, in terminal cells
    Mouse(MouseEvent),
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Bracketed paste
    Paste { text: String },
}

impl FrontendEvent {
    /// Convert a crossterm event; `None` for events the monitor ignores
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::Key(key))
            }
            Event::Mouse(mouse) => Some(FrontendEvent::Mouse(mouse)),
            Event::Resize(width, height) => Some(FrontendEvent::Resize { width, height }),
            Event::Paste(text) => Some(FrontendEvent::Paste { text }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_event_conversion() {
        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(
            FrontendEvent::from_crossterm(Event::Key(key)),
            Some(FrontendEvent::Key(key))
        );

        let mut release = key;
        release.kind = KeyEventKind::Release;
        assert_eq!(FrontendEvent::from_crossterm(Event::Key(release)), None);

        assert_eq!(
            FrontendEvent::from_crossterm(Event::Resize(120, 40)),
            Some(FrontendEvent::Resize {
                width: 120,
                height: 40
            })
        );
        assert_eq!(FrontendEvent::from_crossterm(Event::FocusGained), None);
    }
}
