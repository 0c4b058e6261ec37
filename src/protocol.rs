//! Monitor protocol strings.
//!
//! Outbound referee/administrative commands are plain s-expressions sent one per
//! datagram. Inbound packets are only decoded as far as the display state needs:
//! the header of `(show ...)` frames. Everything else is reported by kind.

use crate::core::player::{CardKind, PlayerRef, Side};
use crate::core::state::{PlayMode, TeamInfo};
use regex::Regex;
use std::fmt;

/// Commands a monitor sends to the server
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorCommand {
    /// Register as a monitor speaking protocol `version`
    DispInit { version: u32 },
    /// Unregister
    DispBye,
    /// Kick off
    KickOff,
    /// Drop ball (`side == Neutral`) or free kick for `side` at field point (x, y)
    Foul { x: f64, y: f64, side: Side },
    /// Show a card to a player; the side is never neutral
    Card { player: PlayerRef, kind: CardKind },
}

impl MonitorCommand {
    /// Encode as the text sent over the wire
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonitorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorCommand::DispInit { version } => write!(f, "(dispinit version {})", version),
            MonitorCommand::DispBye => write!(f, "(dispbye)"),
            MonitorCommand::KickOff => write!(f, "(dispstart)"),
            MonitorCommand::Foul { x, y, side } => {
                write!(f, "(dispfoul {:.4} {:.4} {})", x, y, side.as_protocol_int())
            }
            MonitorCommand::Card { player, kind } => write!(
                f,
                "(dispcard {} {} {})",
                player.side.as_protocol_char().unwrap_or('n'),
                player.unum,
                kind.as_protocol_str()
            ),
        }
    }
}

/// Header of a `(show ...)` frame
#[derive(Debug, Clone, PartialEq)]
pub struct ShowFrame {
    pub time: u32,
    pub playmode: PlayMode,
    /// `(tm ...)` block, when present
    pub teams: Option<(TeamInfo, TeamInfo)>,
}

/// A decoded inbound datagram
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorPacket {
    Show(ShowFrame),
    /// Any other message, by its leading keyword (`server_param`, `msg`, ...)
    Other(String),
}

/// Decoder for inbound monitor datagrams
#[derive(Debug, Clone)]
pub struct MonitorParser {
    show_re: Regex,
    playmode_re: Regex,
    team_re: Regex,
    kind_re: Regex,
}

impl MonitorParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            show_re: Regex::new(r"^\(show\s+(\d+)")?,
            playmode_re: Regex::new(r"\(pm\s+(\d+)\)")?,
            team_re: Regex::new(r"\(tm\s+(\S+)\s+(\S+)\s+(\d+)\s+(\d+)")?,
            kind_re: Regex::new(r"^\(\s*([A-Za-z_]+)")?,
        })
    }

    /// Decode one datagram; `None` when it is not a monitor message at all
    pub fn parse(&self, data: &[u8]) -> Option<MonitorPacket> {
        // The server terminates text packets with a NUL
        let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
        let text = std::str::from_utf8(&data[..end]).ok()?.trim();

        if let Some(caps) = self.show_re.captures(text) {
            let time = caps[1].parse().ok()?;
            let playmode = self
                .playmode_re
                .captures(text)
                .and_then(|c| c[1].parse::<u8>().ok())
                .map(PlayMode::from_index)
                .unwrap_or_default();
            let teams = self.team_re.captures(text).map(|c| {
                (
                    team_info(&c[1], &c[3]),
                    team_info(&c[2], &c[4]),
                )
            });

            return Some(MonitorPacket::Show(ShowFrame {
                time,
                playmode,
                teams,
            }));
        }

        self.kind_re
            .captures(text)
            .map(|c| MonitorPacket::Other(c[1].to_string()))
    }
}

fn team_info(name: &str, score: &str) -> TeamInfo {
    TeamInfo {
        // Empty team slots are sent as "null"
        name: (name != "null").then(|| name.to_string()),
        score: score.parse().unwrap_or(0),
    }
}
