//! Player selection for referee commands.
//!
//! The card prompt offers labels such as `"Left 7"`; this module turns those
//! labels into a structured [`PlayerRef`] and rejects anything else.

use std::fmt;
use thiserror::Error;

/// Highest uniform number on a team
pub const MAX_UNUM: u8 = 11;

/// Team side as used by the monitor protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Neutral,
}

impl Side {
    /// Integer form used by `(dispfoul x y side)`
    pub fn as_protocol_int(self) -> i8 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
            Side::Neutral => 0,
        }
    }

    /// Single-letter form used by `(dispcard side unum card)`
    pub fn as_protocol_char(self) -> Option<char> {
        match self {
            Side::Left => Some('l'),
            Side::Right => Some('r'),
            Side::Neutral => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
            Side::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Yellow,
    Red,
}

impl CardKind {
    pub fn as_protocol_str(self) -> &'static str {
        match self {
            CardKind::Yellow => "yellow",
            CardKind::Red => "red",
        }
    }

    /// Title shown on the selection prompt
    pub fn title(self) -> &'static str {
        match self {
            CardKind::Yellow => "Yellow Card",
            CardKind::Red => "Red Card",
        }
    }
}

/// A player (or, with `unum == 0`, a whole team) on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRef {
    pub side: Side,
    pub unum: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no player selected")]
    Empty,

    #[error("unknown side in selection '{0}'")]
    UnknownSide(String),

    #[error("missing uniform number in selection '{0}'")]
    MissingNumber(String),

    #[error("invalid uniform number '{0}'")]
    InvalidNumber(String),

    #[error("uniform number {0} out of range 0..=11")]
    OutOfRange(i64),

    #[error("field point {0} is not a finite position")]
    NonFinitePoint(String),
}

impl PlayerRef {
    pub fn new(side: Side, unum: u8) -> Result<Self, SelectionError> {
        if unum > MAX_UNUM {
            return Err(SelectionError::OutOfRange(unum as i64));
        }
        Ok(Self { side, unum })
    }

    /// Parse a selection label of the form `"<Side> <Number>"`.
    ///
    /// Only the first character of the side word is looked at, case-sensitively:
    /// `L` is left, `R` is right. Leading and trailing whitespace is ignored.
    pub fn from_label(label: &str) -> Result<Self, SelectionError> {
        let mut parts = label.split_whitespace();

        let side_word = parts.next().ok_or(SelectionError::Empty)?;
        let number = parts
            .next()
            .ok_or_else(|| SelectionError::MissingNumber(label.to_string()))?;

        let side = match side_word.chars().next() {
            Some('L') => Side::Left,
            Some('R') => Side::Right,
            _ => return Err(SelectionError::UnknownSide(side_word.to_string())),
        };

        let unum: i64 = number
            .parse()
            .map_err(|_| SelectionError::InvalidNumber(number.to_string()))?;
        let unum = u8::try_from(unum).map_err(|_| SelectionError::OutOfRange(unum))?;

        Self::new(side, unum)
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.unum)
    }
}

/// Labels offered by the card prompt: none, then every left and right player
pub fn player_choices() -> Vec<String> {
    let mut players = vec![String::new()];
    players.extend((1..=MAX_UNUM).map(|i| format!("Left {}", i)));
    players.extend((1..=MAX_UNUM).map(|i| format!("Right {}", i)));
    players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_labels() {
        assert_eq!(
            PlayerRef::from_label("Left 7"),
            Ok(PlayerRef {
                side: Side::Left,
                unum: 7
            })
        );
        assert_eq!(
            PlayerRef::from_label("Right 11"),
            Ok(PlayerRef {
                side: Side::Right,
                unum: 11
            })
        );
        // Surrounding whitespace is ignored and only the first letter of the side matters
        assert_eq!(
            PlayerRef::from_label("  Lft 3 "),
            Ok(PlayerRef {
                side: Side::Left,
                unum: 3
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(PlayerRef::from_label(""), Err(SelectionError::Empty));
        assert_eq!(PlayerRef::from_label("   "), Err(SelectionError::Empty));
        assert!(matches!(
            PlayerRef::from_label("Nonsense"),
            Err(SelectionError::MissingNumber(_))
        ));
        assert!(matches!(
            PlayerRef::from_label("left 7"),
            Err(SelectionError::UnknownSide(_))
        ));
        assert!(matches!(
            PlayerRef::from_label("Neutral 7"),
            Err(SelectionError::UnknownSide(_))
        ));
        assert!(matches!(
            PlayerRef::from_label("Left 7x"),
            Err(SelectionError::InvalidNumber(_))
        ));
        assert_eq!(
            PlayerRef::from_label("Right 12"),
            Err(SelectionError::OutOfRange(12))
        );
        assert_eq!(
            PlayerRef::from_label("Right -1"),
            Err(SelectionError::OutOfRange(-1))
        );
    }

    #[test]
    fn test_team_level_reference() {
        let team = PlayerRef::from_label("Left 0").unwrap();
        assert_eq!(team.unum, 0);
        assert!(PlayerRef::new(Side::Right, 12).is_err());
    }

    #[test]
    fn test_player_choices_roundtrip() {
        let choices = player_choices();
        assert_eq!(choices.len(), 23);
        assert_eq!(choices[0], "");
        assert_eq!(choices[1], "Left 1");
        assert_eq!(choices[22], "Right 11");

        for label in &choices[1..] {
            let player = PlayerRef::from_label(label).unwrap();
            assert_eq!(&player.to_string(), label);
        }
    }

    #[test]
    fn test_protocol_forms() {
        assert_eq!(Side::Left.as_protocol_int(), 1);
        assert_eq!(Side::Right.as_protocol_int(), -1);
        assert_eq!(Side::Neutral.as_protocol_int(), 0);
        assert_eq!(Side::Neutral.as_protocol_char(), None);
        assert_eq!(CardKind::Red.as_protocol_str(), "red");
    }
}
