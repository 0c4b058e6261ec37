//! Input routing
//!
//! Keys resolve to a `MonitorAction` through the keybind map. Mouse events on
//! the field become pointer moves or referee commands:
//! - left click drops the ball
//! - right click gives a free kick to the left team
//! - middle click gives a free kick to the right team

use crate::core::dispatcher::UiPoint;
use crate::core::menu_actions::{key_event_to_string, MonitorAction};
use crate::core::player::Side;
use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::collections::HashMap;

/// What a mouse event on the field asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerCommand {
    Move(UiPoint),
    DropBall(UiPoint),
    FreeKick(Side, UiPoint),
}

/// Route a key event to the action bound to it
pub fn route_key(key: KeyEvent, keybinds: &HashMap<String, MonitorAction>) -> Option<MonitorAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let key_str = key_event_to_string(key);
    if key_str.is_empty() {
        return None;
    }
    keybinds.get(&key_str).copied()
}

/// Route a mouse event to a pointer command
pub fn route_mouse(mouse: &MouseEvent) -> Option<PointerCommand> {
    let point = UiPoint::new(mouse.column as i32, mouse.row as i32);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(PointerCommand::Move(point)),
        MouseEventKind::Down(MouseButton::Left) => Some(PointerCommand::DropBall(point)),
        MouseEventKind::Down(MouseButton::Right) => Some(PointerCommand::FreeKick(Side::Left, point)),
        MouseEventKind::Down(MouseButton::Middle) => {
            Some(PointerCommand::FreeKick(Side::Right, point))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_default_keys() {
        let keybinds = Config::default().keybind_map();

        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(route_key(ctrl_k, &keybinds), Some(MonitorAction::KickOff));

        let z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(route_key(z, &keybinds), Some(MonitorAction::ZoomIn));

        let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(route_key(ctrl_z, &keybinds), Some(MonitorAction::ZoomOut));

        let f1 = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(route_key(f1, &keybinds), Some(MonitorAction::Help));
    }

    #[test]
    fn test_unbound_and_released_keys() {
        let keybinds = Config::default().keybind_map();

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(route_key(q, &keybinds), None);

        let insert = KeyEvent::new(KeyCode::Insert, KeyModifiers::NONE);
        assert_eq!(route_key(insert, &keybinds), None);

        let mut release = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        release.kind = KeyEventKind::Release;
        assert_eq!(route_key(release, &keybinds), None);
    }

    #[test]
    fn test_mouse_buttons() {
        let point = UiPoint::new(12, 5);

        assert_eq!(
            route_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 5)),
            Some(PointerCommand::DropBall(point))
        );
        assert_eq!(
            route_mouse(&mouse(MouseEventKind::Down(MouseButton::Right), 12, 5)),
            Some(PointerCommand::FreeKick(Side::Left, point))
        );
        assert_eq!(
            route_mouse(&mouse(MouseEventKind::Down(MouseButton::Middle), 12, 5)),
            Some(PointerCommand::FreeKick(Side::Right, point))
        );
        assert_eq!(
            route_mouse(&mouse(MouseEventKind::Moved, 12, 5)),
            Some(PointerCommand::Move(point))
        );
        assert_eq!(
            route_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 12, 5)),
            None
        );
        assert_eq!(route_mouse(&mouse(MouseEventKind::ScrollUp, 12, 5)), None);
    }
}
