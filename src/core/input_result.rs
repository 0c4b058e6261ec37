//! Unified enum describing what the frontend should do after the core handled an action.
//!
//! The core never opens prompts or windows itself; it returns an `InputResult`
//! and the frontend applies the requested side effect.

use crate::core::player::CardKind;

#[derive(Debug, Clone, PartialEq)]
pub enum InputResult {
    /// Handled, nothing left for the frontend
    Continue,

    /// Unbound, or the action is disabled right now
    Ignored,

    /// Ask for a host name, pre-filled with `initial`
    PromptHost { initial: String },

    /// Ask which player gets the card
    PromptCard(CardKind),

    /// Show the menus and their shortcuts
    ShowHelp,

    /// Leave the event loop
    Quit,
}
