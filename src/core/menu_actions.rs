//! Shared action vocabulary for menus and keybinds.
//!
//! Every user-triggerable command of the monitor is a `MonitorAction`.
//! Keybinds name actions by their config string, menus list them, and the
//! `ActionSet` says which of them are currently enabled.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashSet;

/// All actions a user can trigger from a keybind or menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorAction {
    // Monitor
    Connect,
    ConnectTo,
    Disconnect,
    Quit,

    // Referee
    KickOff,
    YellowCard,
    RedCard,

    // View
    ZoomIn,
    ZoomOut,
    FitField,
    Help,
}

impl MonitorAction {
    pub const ALL: [MonitorAction; 11] = [
        MonitorAction::Connect,
        MonitorAction::ConnectTo,
        MonitorAction::Disconnect,
        MonitorAction::Quit,
        MonitorAction::KickOff,
        MonitorAction::YellowCard,
        MonitorAction::RedCard,
        MonitorAction::ZoomIn,
        MonitorAction::ZoomOut,
        MonitorAction::FitField,
        MonitorAction::Help,
    ];

    /// Name used in `[keybinds]`
    pub fn name(self) -> &'static str {
        match self {
            MonitorAction::Connect => "connect",
            MonitorAction::ConnectTo => "connect_to",
            MonitorAction::Disconnect => "disconnect",
            MonitorAction::Quit => "quit",
            MonitorAction::KickOff => "kick_off",
            MonitorAction::YellowCard => "yellow_card",
            MonitorAction::RedCard => "red_card",
            MonitorAction::ZoomIn => "zoom_in",
            MonitorAction::ZoomOut => "zoom_out",
            MonitorAction::FitField => "fit_field",
            MonitorAction::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            MonitorAction::Connect => "Connect",
            MonitorAction::ConnectTo => "Connect to ...",
            MonitorAction::Disconnect => "Disconnect",
            MonitorAction::Quit => "Quit",
            MonitorAction::KickOff => "KickOff",
            MonitorAction::YellowCard => "Yellow Card",
            MonitorAction::RedCard => "Red Card",
            MonitorAction::ZoomIn => "Zoom In",
            MonitorAction::ZoomOut => "Zoom Out",
            MonitorAction::FitField => "Fit Field Size",
            MonitorAction::Help => "Help",
        }
    }

    pub fn status_tip(self) -> &'static str {
        match self {
            MonitorAction::Connect => "Connect to the rcssserver on the configured host.",
            MonitorAction::ConnectTo => "Connect to the rcssserver on a remote host.",
            MonitorAction::Disconnect => "Disconnect from rcssserver.",
            MonitorAction::Quit => "Exit the application.",
            MonitorAction::KickOff => "Send kick-off command.",
            MonitorAction::YellowCard => "Call yellow card.",
            MonitorAction::RedCard => "Call red card.",
            MonitorAction::ZoomIn => "Zoom in.",
            MonitorAction::ZoomOut => "Zoom out.",
            MonitorAction::FitField => "Fit field size to the screen.",
            MonitorAction::Help => "Show menus and shortcuts.",
        }
    }
}

/// Which actions may currently be triggered
#[derive(Debug, Clone)]
pub struct ActionSet {
    enabled: HashSet<MonitorAction>,
}

impl ActionSet {
    /// Initial set: nothing connected yet
    pub fn new() -> Self {
        let mut set = Self {
            enabled: HashSet::new(),
        };
        set.sync_connection(false);
        set
    }

    pub fn is_enabled(&self, action: MonitorAction) -> bool {
        self.enabled.contains(&action)
    }

    pub fn set_enabled(&mut self, action: MonitorAction, enabled: bool) {
        if enabled {
            self.enabled.insert(action);
        } else {
            self.enabled.remove(&action);
        }
    }

    /// Enable or disable everything that depends on the connection state
    pub fn sync_connection(&mut self, connected: bool) {
        for action in MonitorAction::ALL {
            let enabled = match action {
                MonitorAction::Connect | MonitorAction::ConnectTo => !connected,
                MonitorAction::Disconnect
                | MonitorAction::KickOff
                | MonitorAction::YellowCard
                | MonitorAction::RedCard => connected,
                _ => true,
            };
            self.set_enabled(action, enabled);
        }
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert KeyEvent to string representation for matching against keybinds
///
/// Produces lowercase `ctrl+alt+shift+key` strings, the same form
/// `normalize_keybind` turns config entries into.
pub fn key_event_to_string(key: KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("ctrl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("alt".to_string());
    }

    let key_str = match key.code {
        KeyCode::Char(c) => {
            // Uppercase letters already carry shift
            c.to_ascii_lowercase().to_string()
        }
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return String::new(), // Unrecognized key
    };

    let shifted = key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase());
    if shifted {
        parts.push("shift".to_string());
    }

    parts.push(key_str);
    parts.join("+")
}

/// Normalize a keybind string from the config into `key_event_to_string` form.
/// Returns `None` when the string has no key or an unknown modifier.
pub fn normalize_keybind(s: &str) -> Option<String> {
    let mut ctrl = false;
    let mut alt = false;
    let mut shift = false;
    let mut key = None;

    for part in s.split('+').map(|p| p.trim().to_ascii_lowercase()) {
        match part.as_str() {
            "ctrl" | "control" => ctrl = true,
            "alt" => alt = true,
            "shift" => shift = true,
            "" => return None,
            k if key.is_none() => key = Some(k.to_string()),
            _ => return None,
        }
    }

    let key = key?;
    if !is_known_key(&key) {
        return None;
    }

    let mut parts = Vec::new();
    if ctrl {
        parts.push("ctrl".to_string());
    }
    if alt {
        parts.push("alt".to_string());
    }
    if shift {
        parts.push("shift".to_string());
    }
    parts.push(key);
    Some(parts.join("+"))
}

fn is_known_key(key: &str) -> bool {
    if key.chars().count() == 1 {
        return true;
    }
    if let Some(n) = key.strip_prefix('f') {
        return n.parse::<u8>().is_ok_and(|n| (1..=12).contains(&n));
    }
    matches!(
        key,
        "up" | "down"
            | "left"
            | "right"
            | "enter"
            | "esc"
            | "tab"
            | "backspace"
            | "delete"
            | "home"
            | "end"
            | "pageup"
            | "pagedown"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_roundtrip() {
        for action in MonitorAction::ALL {
            assert_eq!(MonitorAction::from_name(action.name()), Some(action));
        }
        assert_eq!(MonitorAction::from_name("launch_missiles"), None);
    }

    #[test]
    fn test_action_set_follows_connection() {
        let mut set = ActionSet::new();
        assert!(set.is_enabled(MonitorAction::Connect));
        assert!(set.is_enabled(MonitorAction::ConnectTo));
        assert!(!set.is_enabled(MonitorAction::Disconnect));
        assert!(!set.is_enabled(MonitorAction::KickOff));
        assert!(set.is_enabled(MonitorAction::Quit));

        set.sync_connection(true);
        assert!(!set.is_enabled(MonitorAction::Connect));
        assert!(set.is_enabled(MonitorAction::Disconnect));
        assert!(set.is_enabled(MonitorAction::RedCard));
        assert!(set.is_enabled(MonitorAction::ZoomIn));
    }

    #[test]
    fn test_key_event_to_string() {
        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(key_event_to_string(key), "ctrl+k");

        let key = KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT);
        assert_eq!(key_event_to_string(key), "shift+z");

        let key = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(key_event_to_string(key), "f1");

        let key = KeyEvent::new(KeyCode::Insert, KeyModifiers::NONE);
        assert_eq!(key_event_to_string(key), "");
    }

    #[test]
    fn test_normalize_keybind() {
        assert_eq!(normalize_keybind("Ctrl+K").as_deref(), Some("ctrl+k"));
        assert_eq!(normalize_keybind("shift+ctrl+z").as_deref(), Some("ctrl+shift+z"));
        assert_eq!(normalize_keybind("Control+q").as_deref(), Some("ctrl+q"));
        assert_eq!(normalize_keybind("F1").as_deref(), Some("f1"));
        assert_eq!(normalize_keybind("ctrl+"), None);
        assert_eq!(normalize_keybind("ctrl+a+b"), None);
        assert_eq!(normalize_keybind("hyper+k"), None);
        assert_eq!(normalize_keybind("f13"), None);
    }

    #[test]
    fn test_normalized_keybind_matches_event() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            normalize_keybind("Ctrl+C"),
            Some(key_event_to_string(key))
        );
    }
}
