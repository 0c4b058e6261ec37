//! Monitor connection lifecycle.
//!
//! `ConnectionManager` owns at most one live [`Connection`]. It refuses to open a
//! second one, resets the display state when a new session starts, and keeps the
//! set of enabled actions in step with the connection state.

use crate::config::Config;
use crate::core::menu_actions::ActionSet;
use crate::core::state::DisplayState;
use crate::network::{Connector, MonitorSession, ServerTarget, SessionId, SessionMessage};
use crate::protocol::MonitorCommand;
use std::io;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("empty host name")]
    EmptyHost,

    #[error("already connected to {host}")]
    AlreadyConnected { host: String },

    #[error("connection to {host} failed: {source}")]
    Open {
        host: String,
        #[source]
        source: io::Error,
    },
}

/// A live session to one server
pub struct Connection {
    pub id: SessionId,
    pub host: String,
    pub port: u16,
    pub version: u32,
    session: Box<dyn MonitorSession>,
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn send(&mut self, command: &MonitorCommand) -> io::Result<()> {
        self.session.send(command)
    }
}

pub struct ConnectionManager<C> {
    connector: C,
    /// Handed to every new session; messages carry the session id
    events: mpsc::UnboundedSender<SessionMessage>,
    active: Option<Connection>,
    next_id: SessionId,
    actions: ActionSet,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, events: mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self {
            connector,
            events,
            active: None,
            next_id: 1,
            actions: ActionSet::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.active.as_ref().is_some_and(|c| c.is_connected())
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.active.as_ref()
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// True if `session` is the live one; anything else is stale
    pub fn is_current(&self, session: SessionId) -> bool {
        self.active.as_ref().is_some_and(|c| c.id == session)
    }

    /// Connect to the configured host, or `127.0.0.1` if none is set
    pub fn connect(
        &mut self,
        config: &mut Config,
        display: &mut DisplayState,
    ) -> Result<(), ConnectError> {
        let host = config.server_host().to_string();
        self.connect_to(&host, config, display)
    }

    /// Connect to `host` on the configured port
    ///
    /// On success the display state is cleared, the init request is sent and the
    /// host is remembered in `config`. On failure nothing changes.
    pub fn connect_to(
        &mut self,
        host: &str,
        config: &mut Config,
        display: &mut DisplayState,
    ) -> Result<(), ConnectError> {
        if host.is_empty() {
            warn!("Empty host name! Connection failed!");
            return Err(ConnectError::EmptyHost);
        }

        if let Some(active) = &self.active {
            warn!("Already connected to [{}], ignoring connect", active.host);
            return Err(ConnectError::AlreadyConnected {
                host: active.host.clone(),
            });
        }

        info!("Connect to [{}] ...", host);

        let id = self.next_id;
        self.next_id += 1;

        let target = ServerTarget {
            host: host.to_string(),
            port: config.connection.port,
            version: config.connection.client_version,
        };

        let session = self
            .connector
            .open(&target, id, self.events.clone())
            .and_then(|session| {
                if session.is_connected() {
                    Ok(session)
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::NotConnected,
                        "session did not come up",
                    ))
                }
            })
            .map_err(|source| {
                warn!("Connection failed: {}", source);
                ConnectError::Open {
                    host: host.to_string(),
                    source,
                }
            })?;

        display.clear();
        config.set_server_host(host);

        let mut connection = Connection {
            id,
            host: target.host,
            port: target.port,
            version: target.version,
            session,
        };

        if let Err(e) = connection.send(&MonitorCommand::DispInit {
            version: target.version,
        }) {
            warn!("Failed to send dispinit: {}", e);
        }

        info!(
            "Connected to {}:{} (session {}, version {})",
            connection.host, connection.port, connection.id, connection.version
        );
        self.active = Some(connection);
        self.actions.sync_connection(true);
        Ok(())
    }

    /// Close the live session, if any. Returns whether there was one.
    pub fn disconnect(&mut self) -> bool {
        let Some(mut connection) = self.active.take() else {
            return false;
        };

        connection.session.close();
        info!(
            "Disconnected from {}:{} (session {})",
            connection.host, connection.port, connection.id
        );

        self.actions.sync_connection(false);
        true
    }

    /// Forward a command to the live session; `None` when not connected
    pub fn send(&mut self, command: &MonitorCommand) -> Option<io::Result<()>> {
        let connection = self.active.as_mut().filter(|c| c.is_connected())?;
        Some(connection.send(command))
    }
}
