//! Monitor session transport.
//!
//! A session is one UDP link to the simulation server's monitor port. The
//! event loop talks to it through [`MonitorSession`]; inbound datagrams are read
//! by a background task and posted as [`SessionMessage`]s on a channel, tagged
//! with the id of the session that produced them.

use crate::protocol::{MonitorCommand, MonitorPacket, MonitorParser};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Largest datagram the server sends to monitors
const MAX_DATAGRAM: usize = 8192;

/// Identifies one connection attempt; messages from older sessions are stale
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A datagram was received and decoded
    Packet(MonitorPacket),
    /// The session failed or timed out and will deliver nothing more
    Closed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMessage {
    pub session: SessionId,
    pub event: SessionEvent,
}

/// Where to connect
#[derive(Debug, Clone, PartialEq)]
pub struct ServerTarget {
    pub host: String,
    pub port: u16,
    pub version: u32,
}

/// An open link to the server
pub trait MonitorSession {
    fn is_connected(&self) -> bool;

    /// Transmit one command
    fn send(&mut self, command: &MonitorCommand) -> io::Result<()>;

    /// Say goodbye to the server and stop reading. Idempotent.
    fn close(&mut self);
}

/// Opens sessions. The UDP implementation is used by the binary; tests plug in fakes.
pub trait Connector {
    fn open(
        &mut self,
        target: &ServerTarget,
        session: SessionId,
        events: mpsc::UnboundedSender<SessionMessage>,
    ) -> io::Result<Box<dyn MonitorSession>>;
}

/// Opens [`UdpMonitorClient`] sessions
pub struct UdpConnector {
    parser: MonitorParser,
    timeout: Option<Duration>,
}

impl UdpConnector {
    /// `timeout`: report the session closed when the server stays silent this long
    pub fn new(timeout: Option<Duration>) -> Result<Self, regex::Error> {
        Ok(Self {
            parser: MonitorParser::new()?,
            timeout,
        })
    }
}

impl Connector for UdpConnector {
    fn open(
        &mut self,
        target: &ServerTarget,
        session: SessionId,
        events: mpsc::UnboundedSender<SessionMessage>,
    ) -> io::Result<Box<dyn MonitorSession>> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "monitor sessions need a tokio runtime",
            ));
        }

        let addr = resolve(&target.host, target.port)?;
        let bind_addr: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let std_socket = std::net::UdpSocket::bind(bind_addr)?;
        std_socket.set_nonblocking(true)?;
        let socket = Arc::new(UdpSocket::from_std(std_socket)?);
        let peer = Arc::new(Mutex::new(addr));

        info!(
            "Opened monitor session {} to {} (local {})",
            session,
            addr,
            socket.local_addr()?
        );

        let reader = tokio::spawn(read_loop(
            socket.clone(),
            peer.clone(),
            self.parser.clone(),
            session,
            events,
            self.timeout,
        ));

        Ok(Box::new(UdpMonitorClient {
            socket,
            peer,
            reader,
            connected: true,
        }))
    }
}

fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no address found for {}", host),
        )
    })
}

/// One UDP session to the server's monitor port
pub struct UdpMonitorClient {
    socket: Arc<UdpSocket>,
    /// Shared with the reader, which adopts the server's reply port
    peer: Arc<Mutex<SocketAddr>>,
    reader: JoinHandle<()>,
    connected: bool,
}

impl UdpMonitorClient {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.peer
            .lock()
            .map(|addr| *addr)
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "peer address lock poisoned"))
    }
}

impl MonitorSession for UdpMonitorClient {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, command: &MonitorCommand) -> io::Result<()> {
        if !self.connected {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "monitor session is closed",
            ));
        }

        let addr = self.peer_addr()?;
        let wire = command.to_wire();
        self.socket.try_send_to(wire.as_bytes(), addr)?;
        debug!("Sent to {}: {}", addr, wire);
        Ok(())
    }

    fn close(&mut self) {
        if !self.connected {
            return;
        }

        if let Err(e) = self.send(&MonitorCommand::DispBye) {
            warn!("Failed to send dispbye: {}", e);
        }
        self.reader.abort();
        self.connected = false;
    }
}

impl Drop for UdpMonitorClient {
    fn drop(&mut self) {
        self.close();
    }
}

async fn read_loop(
    socket: Arc<UdpSocket>,
    peer: Arc<Mutex<SocketAddr>>,
    parser: MonitorParser,
    session: SessionId,
    events: mpsc::UnboundedSender<SessionMessage>,
    timeout: Option<Duration>,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM];

    loop {
        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, socket.recv_from(&mut buf)).await {
                Ok(r) => r,
                Err(_) => {
                    let reason = format!("no data from server for {} ms", limit.as_millis());
                    warn!("Monitor session {}: {}", session, reason);
                    let _ = events.send(SessionMessage {
                        session,
                        event: SessionEvent::Closed(reason),
                    });
                    break;
                }
            },
            None => socket.recv_from(&mut buf).await,
        };

        let (len, from) = match received {
            Ok(r) => r,
            Err(e) => {
                error!("Monitor session {} read error: {}", session, e);
                let _ = events.send(SessionMessage {
                    session,
                    event: SessionEvent::Closed(e.to_string()),
                });
                break;
            }
        };

        if !adopt_peer(&peer, from) {
            debug!("Ignoring datagram from unexpected host {}", from);
            continue;
        }

        let Some(packet) = parser.parse(&buf[..len]) else {
            debug!("Ignoring undecodable datagram ({} bytes)", len);
            continue;
        };

        let message = SessionMessage {
            session,
            event: SessionEvent::Packet(packet),
        };
        if events.send(message).is_err() {
            // Nobody is listening any more
            break;
        }
    }
}

/// Accept datagrams from the server host only; follow it if it answers from another port
fn adopt_peer(peer: &Mutex<SocketAddr>, from: SocketAddr) -> bool {
    let Ok(mut current) = peer.lock() else {
        return false;
    };

    if current.ip() != from.ip() {
        return false;
    }

    if current.port() != from.port() {
        info!("Server answered from {}, switching peer port", from);
        *current = from;
    }
    true
}
