//! Referee command dispatch.
//!
//! Validates user-level arguments (screen points, player selections) and turns
//! them into protocol commands for the live connection. Every command is a
//! silent no-op while disconnected.

use crate::config::FieldTransform;
use crate::core::connection::ConnectionManager;
use crate::core::player::{CardKind, PlayerRef, SelectionError, Side};
use crate::network::Connector;
use crate::protocol::MonitorCommand;
use std::io;
use tracing::{debug, info, warn};

/// A point on the screen, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPoint {
    pub x: i32,
    pub y: i32,
}

impl UiPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What happened to a command
#[derive(Debug)]
pub enum Dispatch {
    Sent,
    /// No live connection; nothing was sent
    NotConnected,
    /// The arguments were invalid; nothing was sent
    Rejected(SelectionError),
    /// The session refused the datagram
    Failed(io::Error),
}

#[cfg(test)]
impl Dispatch {
    pub fn is_sent(&self) -> bool {
        matches!(self, Dispatch::Sent)
    }
}

/// Borrows the connection and the current field transform for one command
pub struct CommandDispatcher<'a, C> {
    connection: &'a mut ConnectionManager<C>,
    transform: &'a FieldTransform,
}

impl<'a, C: Connector> CommandDispatcher<'a, C> {
    pub fn new(connection: &'a mut ConnectionManager<C>, transform: &'a FieldTransform) -> Self {
        Self {
            connection,
            transform,
        }
    }

    pub fn kick_off(&mut self) -> Dispatch {
        self.forward(MonitorCommand::KickOff)
    }

    /// Drop the ball at a screen point. The field point is logged even when disconnected.
    pub fn drop_ball(&mut self, point: UiPoint) -> Dispatch {
        let (x, y) = self.to_field(point);
        info!("drop ball to ({:.2}, {:.2})", x, y);

        self.forward(MonitorCommand::Foul {
            x,
            y,
            side: Side::Neutral,
        })
    }

    /// Award a free kick to `side` at a screen point
    pub fn free_kick(&mut self, side: Side, point: UiPoint) -> Dispatch {
        if side == Side::Neutral {
            warn!("Free kick needs a team side");
            return Dispatch::Rejected(SelectionError::UnknownSide(side.to_string()));
        }
        if !self.connection.is_connected() {
            return Dispatch::NotConnected;
        }

        let (x, y) = self.to_field(point);
        info!("free kick {} at ({:.2}, {:.2})", side, x, y);

        self.forward(MonitorCommand::Foul { x, y, side })
    }

    pub fn card(&mut self, kind: CardKind, player: PlayerRef) -> Dispatch {
        if player.side == Side::Neutral {
            warn!("{} needs a team side", kind.title());
            return Dispatch::Rejected(SelectionError::UnknownSide(player.side.to_string()));
        }
        if self.connection.is_connected() {
            info!("{} : {}", kind.as_protocol_str(), player);
        }

        self.forward(MonitorCommand::Card { player, kind })
    }

    /// Card for a label picked from the selection prompt; `None` means the prompt was cancelled
    pub fn card_from_label(&mut self, kind: CardKind, label: Option<&str>) -> Dispatch {
        let Some(label) = label else {
            return Dispatch::Rejected(SelectionError::Empty);
        };

        match PlayerRef::from_label(label) {
            Ok(player) => self.card(kind, player),
            Err(e) => {
                debug!("Ignoring {} selection '{}': {}", kind.title(), label, e);
                Dispatch::Rejected(e)
            }
        }
    }

    fn to_field(&self, point: UiPoint) -> (f64, f64) {
        (
            self.transform.field_x(point.x),
            self.transform.field_y(point.y),
        )
    }

    fn forward(&mut self, command: MonitorCommand) -> Dispatch {
        if let MonitorCommand::Foul { x, y, .. } = &command {
            if !x.is_finite() || !y.is_finite() {
                warn!("Refusing {}: field transform gave a non-finite point", command);
                return Dispatch::Rejected(SelectionError::NonFinitePoint(format!(
                    "({}, {})",
                    x, y
                )));
            }
        }

        match self.connection.send(&command) {
            None => {
                debug!("Not connected, dropping {}", command);
                Dispatch::NotConnected
            }
            Some(Ok(())) => {
                debug!("Forwarded {}", command);
                Dispatch::Sent
            }
            Some(Err(e)) => {
                warn!("Failed to send {}: {}", command, e);
                Dispatch::Failed(e)
            }
        }
    }
}
