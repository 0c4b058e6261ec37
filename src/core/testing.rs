//! Recording fake transport for core tests

use crate::network::{Connector, MonitorSession, ServerTarget, SessionId, SessionMessage};
use crate::protocol::MonitorCommand;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use tokio::sync::mpsc;

#[derive(Debug, Default)]
pub struct Log {
    pub opened: Vec<(ServerTarget, SessionId)>,
    pub sent: Vec<MonitorCommand>,
    pub closed: usize,
    pub fail_open: bool,
}

/// Connector whose sessions write everything into a shared log
#[derive(Clone, Default)]
pub struct FakeConnector {
    pub log: Rc<RefCell<Log>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<MonitorCommand> {
        self.log.borrow().sent.clone()
    }

    pub fn opened(&self) -> usize {
        self.log.borrow().opened.len()
    }

    pub fn fail_next_open(&self, fail: bool) {
        self.log.borrow_mut().fail_open = fail;
    }
}

impl Connector for FakeConnector {
    fn open(
        &mut self,
        target: &ServerTarget,
        session: SessionId,
        _events: mpsc::UnboundedSender<SessionMessage>,
    ) -> io::Result<Box<dyn MonitorSession>> {
        let mut log = self.log.borrow_mut();
        log.opened.push((target.clone(), session));
        if log.fail_open {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "refused by test",
            ));
        }

        Ok(Box::new(FakeSession {
            log: self.log.clone(),
            connected: true,
        }))
    }
}

struct FakeSession {
    log: Rc<RefCell<Log>>,
    connected: bool,
}

impl MonitorSession for FakeSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, command: &MonitorCommand) -> io::Result<()> {
        if !self.connected {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "closed"));
        }
        self.log.borrow_mut().sent.push(command.clone());
        Ok(())
    }

    fn close(&mut self) {
        if self.connected {
            self.connected = false;
            self.log.borrow_mut().closed += 1;
        }
    }
}
