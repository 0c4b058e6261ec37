//! UI state shared between the core and the frontend: the menu bar model.
//!
//! Menus are plain data. Their items carry the action they trigger, the key
//! bound to it (if any) and whether the action is currently enabled.

use crate::core::menu_actions::{ActionSet, MonitorAction};
use std::collections::HashMap;

/// A single menu item
#[derive(Clone, Debug, PartialEq)]
pub struct PopupMenuItem {
    pub text: String,
    pub action: MonitorAction,
    pub shortcut: Option<String>,
    pub tip: &'static str,
    pub disabled: bool,
}

/// One menu of the menu bar
#[derive(Clone, Debug)]
pub struct Menu {
    pub title: &'static str,
    pub items: Vec<PopupMenuItem>,
}

const MENU_LAYOUT: [(&str, &[MonitorAction]); 3] = [
    (
        "Monitor",
        &[
            MonitorAction::Connect,
            MonitorAction::ConnectTo,
            MonitorAction::Disconnect,
            MonitorAction::Quit,
        ],
    ),
    (
        "Referee",
        &[
            MonitorAction::KickOff,
            MonitorAction::YellowCard,
            MonitorAction::RedCard,
        ],
    ),
    (
        "View",
        &[
            MonitorAction::ZoomIn,
            MonitorAction::ZoomOut,
            MonitorAction::FitField,
            MonitorAction::Help,
        ],
    ),
];

/// Build the menu bar for the current enable set
///
/// `shortcuts` maps an action to the key string bound to it.
pub fn build_menus(actions: &ActionSet, shortcuts: &HashMap<MonitorAction, String>) -> Vec<Menu> {
    MENU_LAYOUT
        .iter()
        .map(|(title, entries)| Menu {
            title: *title,
            items: entries
                .iter()
                .map(|action| PopupMenuItem {
                    text: action.label().to_string(),
                    action: *action,
                    shortcut: shortcuts.get(action).cloned(),
                    tip: action.status_tip(),
                    disabled: !actions.is_enabled(*action),
                })
                .collect(),
        })
        .collect()
}

/// Text rendering of the menus, one line per entry
pub fn format_menus(menus: &[Menu]) -> Vec<String> {
    let mut lines = Vec::new();
    for menu in menus {
        lines.push(format!("[{}]", menu.title));
        for item in &menu.items {
            let marker = if item.disabled { "-" } else { " " };
            let shortcut = item.shortcut.as_deref().unwrap_or("");
            lines.push(format!(
                "  {} {:<16} {:<8} {}",
                marker, item.text, shortcut, item.tip
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menus_reflect_enable_set() {
        let mut shortcuts = HashMap::new();
        shortcuts.insert(MonitorAction::KickOff, "ctrl+k".to_string());

        let actions = ActionSet::new();
        let menus = build_menus(&actions, &shortcuts);
        assert_eq!(menus.len(), 3);
        assert_eq!(menus[0].title, "Monitor");

        let kick_off = &menus[1].items[0];
        assert_eq!(kick_off.action, MonitorAction::KickOff);
        assert_eq!(kick_off.shortcut.as_deref(), Some("ctrl+k"));
        assert!(kick_off.disabled);

        let connect = &menus[0].items[0];
        assert!(!connect.disabled);
        assert_eq!(connect.shortcut, None);
    }

    #[test]
    fn test_format_menus_marks_disabled() {
        let menus = build_menus(&ActionSet::new(), &HashMap::new());
        let lines = format_menus(&menus);

        assert_eq!(lines[0], "[Monitor]");
        assert!(lines[1].starts_with("    Connect"));
        assert!(lines[3].starts_with("  - Disconnect"));
        assert!(lines[3].ends_with("Disconnect from rcssserver."));
    }
}
