use crate::config::Config;
use crate::core::auto_quit::{quit_delay, QuitTimer};
use crate::core::connection::{ConnectError, ConnectionManager};
use crate::core::dispatcher::{CommandDispatcher, Dispatch, UiPoint};
use crate::core::input_result::InputResult;
use crate::core::input_router::{route_key, route_mouse, PointerCommand};
use crate::core::menu_actions::MonitorAction;
use crate::core::player::{CardKind, Side};
use crate::core::state::DisplayState;
use crate::data::{build_menus, Menu};
use crate::network::{Connector, SessionEvent, SessionMessage};
use crossterm::event::{KeyEvent, MouseEvent};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Core application state (frontend-agnostic)
///
/// AppCore owns the configuration, the display state and the connection. It
/// turns user actions into referee commands and folds session messages into the
/// display state. Everything here runs on the event-loop thread.
pub struct AppCore<C> {
    /// Application configuration
    pub config: Config,

    /// What the last show frame said about the match
    pub display: DisplayState,

    /// The monitor connection and the enabled actions
    pub connection: ConnectionManager<C>,

    /// Pending quit after time over
    pub auto_quit: QuitTimer,

    /// Application running flag
    pub running: bool,

    /// Set whenever something visible changed
    pub needs_render: bool,

    /// Last user-facing status message
    pub status: Option<String>,

    /// Parsed keybindings map (key combo -> action)
    pub keybind_map: HashMap<String, MonitorAction>,

    /// Last pointer position over the field
    pub pointer: Option<UiPoint>,

    /// Terminal size in cells
    pub screen: (u16, u16),

    /// Host of the last successful connection
    pub last_connected_host: Option<String>,
}

impl<C: Connector> AppCore<C> {
    pub fn new(config: Config, connector: C, events: mpsc::UnboundedSender<SessionMessage>) -> Self {
        let keybind_map = config.keybind_map();

        Self {
            config,
            display: DisplayState::new(),
            connection: ConnectionManager::new(connector, events),
            auto_quit: QuitTimer::new(),
            running: true,
            needs_render: true,
            status: None,
            keybind_map,
            pointer: None,
            screen: (80, 24),
            last_connected_host: None,
        }
    }

    /// Show a status message and log it
    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("Status: {}", message);
        self.status = Some(message);
        self.needs_render = true;
    }

    /// Connect to the configured host
    pub fn connect(&mut self) -> bool {
        let result = self.connection.connect(&mut self.config, &mut self.display);
        self.finish_connect(result)
    }

    /// Connect to a user-supplied host
    pub fn connect_to(&mut self, host: &str) -> bool {
        let result = self
            .connection
            .connect_to(host.trim(), &mut self.config, &mut self.display);
        self.finish_connect(result)
    }

    fn finish_connect(&mut self, result: Result<(), ConnectError>) -> bool {
        match result {
            Ok(()) => {
                if self.config.field.auto_fit {
                    self.config.field.fit(self.screen.0, self.screen.1);
                }
                let host = self.config.server_host().to_string();
                self.set_status(format!("Connected to {}", host));
                self.last_connected_host = Some(host);
                true
            }
            Err(e) => {
                self.set_status(format!("Connect failed: {}", e));
                false
            }
        }
    }

    pub fn disconnect(&mut self) {
        if self.connection.disconnect() {
            self.set_status("Disconnected");
        }
    }

    pub fn kick_off(&mut self) -> Dispatch {
        let result = CommandDispatcher::new(&mut self.connection, &self.config.field).kick_off();
        self.report("Kick off", result)
    }

    pub fn drop_ball(&mut self, point: UiPoint) -> Dispatch {
        let result =
            CommandDispatcher::new(&mut self.connection, &self.config.field).drop_ball(point);
        self.report("Drop ball", result)
    }

    pub fn free_kick(&mut self, side: Side, point: UiPoint) -> Dispatch {
        let result =
            CommandDispatcher::new(&mut self.connection, &self.config.field).free_kick(side, point);
        self.report("Free kick", result)
    }

    /// Card for a prompt answer; `None` when the prompt was cancelled
    pub fn card_from_label(&mut self, kind: CardKind, label: Option<&str>) -> Dispatch {
        let result = CommandDispatcher::new(&mut self.connection, &self.config.field)
            .card_from_label(kind, label);
        self.report(kind.title(), result)
    }

    /// Turn a dispatch outcome into a status message
    fn report(&mut self, what: &str, result: Dispatch) -> Dispatch {
        match &result {
            Dispatch::Sent => self.set_status(format!("{} sent", what)),
            Dispatch::NotConnected => {}
            Dispatch::Rejected(e) => debug!("{} not sent: {}", what, e),
            Dispatch::Failed(e) => self.set_status(format!("{} failed: {}", what, e)),
        }
        result
    }

    /// Run an action from a keybind or menu
    pub fn trigger(&mut self, action: MonitorAction) -> InputResult {
        if !self.connection.actions().is_enabled(action) {
            debug!("Action {} is disabled", action.name());
            return InputResult::Ignored;
        }

        match action {
            MonitorAction::Connect => {
                self.connect();
            }
            MonitorAction::ConnectTo => {
                return InputResult::PromptHost {
                    initial: self.config.server_host().to_string(),
                };
            }
            MonitorAction::Disconnect => self.disconnect(),
            MonitorAction::Quit => {
                self.running = false;
                return InputResult::Quit;
            }
            MonitorAction::KickOff => {
                self.kick_off();
            }
            MonitorAction::YellowCard => return InputResult::PromptCard(CardKind::Yellow),
            MonitorAction::RedCard => return InputResult::PromptCard(CardKind::Red),
            MonitorAction::ZoomIn => {
                self.config.field.zoom_in();
                self.needs_render = true;
            }
            MonitorAction::ZoomOut => {
                self.config.field.zoom_out();
                self.needs_render = true;
            }
            MonitorAction::FitField => {
                self.config.field.fit(self.screen.0, self.screen.1);
                self.needs_render = true;
            }
            MonitorAction::Help => return InputResult::ShowHelp,
        }

        InputResult::Continue
    }

    /// Handle a key press outside of any prompt
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        match route_key(key, &self.keybind_map) {
            Some(action) => self.trigger(action),
            None => InputResult::Ignored,
        }
    }

    /// Handle a mouse event; clicks outside the field area are ignored
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let on_field = mouse.column < self.screen.0 && mouse.row < self.screen.1;

        match route_mouse(mouse) {
            Some(PointerCommand::Move(point)) => {
                self.pointer = on_field.then_some(point);
                self.needs_render = true;
            }
            Some(PointerCommand::DropBall(point)) if on_field => {
                self.drop_ball(point);
            }
            Some(PointerCommand::FreeKick(side, point)) if on_field => {
                self.free_kick(side, point);
            }
            Some(_) => debug!(
                "Ignoring click at ({}, {}) outside the {}x{} field",
                mouse.column, mouse.row, self.screen.0, self.screen.1
            ),
            None => {}
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
        if self.config.field.auto_fit {
            self.config.field.fit(width, height);
        }
        self.needs_render = true;
    }

    /// Fold one message from a session reader into the state
    pub fn handle_session_message(&mut self, message: SessionMessage, now: Instant) {
        if !self.connection.is_current(message.session) {
            debug!("Dropping message from stale session {}", message.session);
            return;
        }

        match message.event {
            SessionEvent::Packet(packet) => {
                self.display.apply(&packet);
                self.needs_render = true;

                if self.display.is_time_over() && self.config.monitor.auto_quit {
                    let delay = quit_delay(self.config.monitor.auto_quit_wait_ms);
                    if !self.auto_quit.is_pending() {
                        info!("Time over, quitting in {} ms", delay.as_millis());
                    }
                    self.auto_quit.schedule(now, delay);
                }
            }
            SessionEvent::Closed(reason) => {
                error!("Session {} closed: {}", message.session, reason);
                self.connection.disconnect();
                self.set_status(format!("Connection lost: {}", reason));
            }
        }
    }

    /// Stop running once a scheduled quit is due. Returns whether it fired.
    pub fn check_auto_quit(&mut self, now: Instant) -> bool {
        if self.running && self.auto_quit.is_due(now) {
            info!("Auto-quit");
            self.running = false;
            return true;
        }
        false
    }

    /// Field coordinates under the pointer
    pub fn pointer_field(&self) -> Option<(f64, f64)> {
        self.pointer.map(|p| {
            (
                self.config.field.field_x(p.x),
                self.config.field.field_y(p.y),
            )
        })
    }

    pub fn menus(&self) -> Vec<Menu> {
        build_menus(self.connection.actions(), &self.config.shortcuts())
    }

    /// One-line summary for the bottom of the screen
    pub fn status_line(&self) -> String {
        let link = match self.connection.connection() {
            Some(c) => format!("{}:{}", c.host, c.port),
            None => "disconnected".to_string(),
        };

        let mut line = format!(
            "[{}] {:>5} {} | {}",
            link,
            self.display.time,
            self.display.playmode.label(),
            self.display.scoreboard()
        );

        if let Some((x, y)) = self.pointer_field() {
            line.push_str(&format!(" | ({:.2}, {:.2})", x, y));
        }
        if let Some(status) = &self.status {
            line.push_str(" | ");
            line.push_str(status);
        }
        line
    }

    /// Say goodbye to the server before exiting
    pub fn shutdown(&mut self) {
        if self.connection.disconnect() {
            info!("Closed monitor connection on exit");
        }
        self.running = false;
    }
}
