//! Modal overlays: the help screen and the two prompts.
//!
//! The host prompt is a one-line text field pre-filled with the current host;
//! the card prompt is a list of player labels. Enter accepts, Esc cancels.

use crate::core::input_router::route_key;
use crate::core::menu_actions::MonitorAction;
use crate::core::player::{player_choices, CardKind};
use crate::core::{AppCore, InputResult};
use crate::network::Connector;
use crossterm::event::{KeyCode, KeyEvent};
use tui_textarea::{CursorMove, TextArea};

/// Result of feeding a key to a prompt
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    Pending,
    Accepted(String),
    Cancelled,
}

/// Text prompt for "Connect to..."
pub struct HostPrompt {
    pub textarea: TextArea<'static>,
}

impl HostPrompt {
    pub fn new(initial: &str) -> Self {
        let mut textarea = TextArea::new(vec![initial.to_string()]);
        textarea.move_cursor(CursorMove::End);
        Self { textarea }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Enter => PromptOutcome::Accepted(self.text().trim().to_string()),
            KeyCode::Esc => PromptOutcome::Cancelled,
            _ => {
                self.textarea.input(key);
                PromptOutcome::Pending
            }
        }
    }

    pub fn paste(&mut self, text: &str) {
        let line: String = text.chars().filter(|c| !c.is_control()).collect();
        self.textarea.insert_str(line);
    }
}

/// Choice prompt for a card
pub struct CardPrompt {
    pub kind: CardKind,
    pub choices: Vec<String>,
    pub selected: usize,
}

impl CardPrompt {
    pub fn new(kind: CardKind) -> Self {
        Self {
            kind,
            choices: player_choices(),
            selected: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        let last = self.choices.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => {
                PromptOutcome::Accepted(self.choices.get(self.selected).cloned().unwrap_or_default())
            }
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PromptOutcome::Pending
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(last);
                PromptOutcome::Pending
            }
            KeyCode::Home => {
                self.selected = 0;
                PromptOutcome::Pending
            }
            KeyCode::End => {
                self.selected = last;
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }
}

/// Whatever is drawn on top of the field
#[derive(Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Host(HostPrompt),
    Card(CardPrompt),
}

impl Overlay {
    pub fn is_active(&self) -> bool {
        !matches!(self, Overlay::None)
    }

    /// Open the overlay an action result asks for
    pub fn open(&mut self, result: &InputResult) {
        match result {
            InputResult::PromptHost { initial } => *self = Overlay::Host(HostPrompt::new(initial)),
            InputResult::PromptCard(kind) => *self = Overlay::Card(CardPrompt::new(*kind)),
            InputResult::ShowHelp => *self = Overlay::Help,
            InputResult::Continue | InputResult::Ignored | InputResult::Quit => {}
        }
    }

    /// Feed a key to the open overlay. Returns false when no overlay is open.
    pub fn handle_key<C: Connector>(&mut self, key: KeyEvent, core: &mut AppCore<C>) -> bool {
        match std::mem::take(self) {
            Overlay::None => return false,
            Overlay::Help => {
                // Quit stays reachable from the help screen
                if route_key(key, &core.keybind_map) == Some(MonitorAction::Quit) {
                    core.trigger(MonitorAction::Quit);
                }
            }
            Overlay::Host(mut prompt) => match prompt.handle_key(key) {
                PromptOutcome::Pending => *self = Overlay::Host(prompt),
                PromptOutcome::Accepted(host) => {
                    core.connect_to(&host);
                }
                PromptOutcome::Cancelled => {}
            },
            Overlay::Card(mut prompt) => match prompt.handle_key(key) {
                PromptOutcome::Pending => *self = Overlay::Card(prompt),
                PromptOutcome::Accepted(label) => {
                    core.card_from_label(prompt.kind, Some(&label));
                }
                PromptOutcome::Cancelled => {
                    core.card_from_label(prompt.kind, None);
                }
            },
        }

        core.needs_render = true;
        true
    }

    /// Paste goes to the host prompt only
    pub fn handle_paste(&mut self, text: &str) -> bool {
        if let Overlay::Host(prompt) = self {
            prompt.paste(text);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::player::{PlayerRef, Side};
    use crate::core::testing::FakeConnector;
    use crate::protocol::MonitorCommand;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn core() -> (AppCore<FakeConnector>, FakeConnector) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let connector = FakeConnector::new();
        (AppCore::new(Config::default(), connector.clone(), tx), connector)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(overlay: &mut Overlay, core: &mut AppCore<FakeConnector>, text: &str) {
        for c in text.chars() {
            overlay.handle_key(key(KeyCode::Char(c)), core);
        }
    }

    #[test]
    fn test_host_prompt_prefilled() {
        let prompt = HostPrompt::new("127.0.0.1");
        assert_eq!(prompt.text(), "127.0.0.1");
    }

    #[test]
    fn test_host_prompt_connects() {
        let (mut core, connector) = core();
        let mut overlay = Overlay::default();

        let result = core.trigger(MonitorAction::ConnectTo);
        overlay.open(&result);
        assert!(overlay.is_active());

        for _ in 0.."127.0.0.1".len() {
            overlay.handle_key(key(KeyCode::Backspace), &mut core);
        }
        type_text(&mut overlay, &mut core, "sserver");
        assert!(overlay.handle_key(key(KeyCode::Enter), &mut core));

        assert!(!overlay.is_active());
        assert!(core.connection.is_connected());
        assert_eq!(connector.log.borrow().opened[0].0.host, "sserver");
    }

    #[test]
    fn test_host_prompt_cancel() {
        let (mut core, connector) = core();
        let mut overlay = Overlay::default();

        overlay.open(&core.trigger(MonitorAction::ConnectTo));
        overlay.handle_key(key(KeyCode::Esc), &mut core);

        assert!(!overlay.is_active());
        assert_eq!(connector.opened(), 0);
    }

    #[test]
    fn test_host_prompt_paste() {
        let mut overlay = Overlay::Host(HostPrompt::new(""));
        assert!(overlay.handle_paste("10.0.0.5\n"));

        match &overlay {
            Overlay::Host(prompt) => assert_eq!(prompt.text(), "10.0.0.5"),
            _ => panic!("host prompt closed"),
        }
        assert!(!Overlay::Help.handle_paste("x"));
    }

    #[test]
    fn test_card_prompt_selects_player() {
        let (mut core, connector) = core();
        core.connect();
        let mut overlay = Overlay::default();

        overlay.open(&core.trigger(MonitorAction::YellowCard));
        for _ in 0..7 {
            overlay.handle_key(key(KeyCode::Down), &mut core);
        }
        overlay.handle_key(key(KeyCode::Enter), &mut core);

        assert_eq!(
            connector.sent().last(),
            Some(&MonitorCommand::Card {
                player: PlayerRef {
                    side: Side::Left,
                    unum: 7
                },
                kind: CardKind::Yellow,
            })
        );
    }

    #[test]
    fn test_card_prompt_blank_or_cancel_sends_nothing() {
        let (mut core, connector) = core();
        core.connect();
        let before = connector.sent().len();
        let mut overlay = Overlay::default();

        overlay.open(&core.trigger(MonitorAction::RedCard));
        overlay.handle_key(key(KeyCode::Enter), &mut core);

        overlay.open(&core.trigger(MonitorAction::RedCard));
        overlay.handle_key(key(KeyCode::End), &mut core);
        overlay.handle_key(key(KeyCode::Esc), &mut core);

        assert_eq!(connector.sent().len(), before);
    }

    #[test]
    fn test_card_prompt_bounds() {
        let mut prompt = CardPrompt::new(CardKind::Red);
        prompt.handle_key(key(KeyCode::Up));
        assert_eq!(prompt.selected, 0);

        prompt.handle_key(key(KeyCode::End));
        prompt.handle_key(key(KeyCode::Down));
        assert_eq!(prompt.selected, 22);
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptOutcome::Accepted("Right 11".to_string())
        );
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (mut core, _) = core();
        let mut overlay = Overlay::default();

        overlay.open(&core.trigger(MonitorAction::Help));
        assert!(overlay.handle_key(key(KeyCode::Char('a')), &mut core));
        assert!(!overlay.is_active());
        assert!(core.running);
        assert!(!overlay.handle_key(key(KeyCode::Char('a')), &mut core));
    }
}
