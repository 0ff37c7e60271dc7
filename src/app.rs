use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::config::MAX_HISTORY;
use crate::error::{FormatError, SendError, UartError};
use crate::format::{self, LineEnding, SendFormat};
use crate::history::CommandHistory;
use crate::persistence::PersistentSettings;
use crate::port::{self, LineSettings, PortInfo};
use crate::quick_commands::QuickCommands;
use crate::terminal::{LogView, TerminalLog};
use crate::uart::{self, UartLink};

#[derive(Resource)]
pub struct AppState {
    pub log: Arc<Mutex<TerminalLog>>,
    pub link: Option<UartLink>,
    pub available_ports: Vec<PortInfo>,
    pub port_name: String,
    pub line: LineSettings,
    pub input: String,
    pub format: SendFormat,
    pub line_ending: LineEnding,
    pub history: CommandHistory,
    pub quick: QuickCommands,
    pub selected_quick: Option<usize>,
    pub view: LogView,
    pub auto_scroll: bool,
    pub log_path: String,
    pub commands_path: String,
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_settings(PersistentSettings::default(), QuickCommands::default())
    }
}

impl AppState {
    pub fn from_settings(settings: PersistentSettings, quick: QuickCommands) -> Self {
        Self {
            log: Arc::new(Mutex::new(TerminalLog::new())),
            link: None,
            available_ports: Vec::new(),
            port_name: settings.last_port,
            line: settings.line,
            input: String::new(),
            format: settings.format,
            line_ending: settings.line_ending,
            history: CommandHistory::from_entries(settings.history, MAX_HISTORY),
            quick,
            selected_quick: None,
            view: settings.view,
            auto_scroll: settings.auto_scroll,
            log_path: "uart_log.txt".to_string(),
            commands_path: "quick_commands.json".to_string(),
            status: "Disconnected".to_string(),
        }
    }

    pub fn to_settings(&self) -> PersistentSettings {
        PersistentSettings {
            last_port: self.port_name.clone(),
            line: self.line.clone(),
            format: self.format,
            line_ending: self.line_ending,
            view: self.view,
            auto_scroll: self.auto_scroll,
            history: self.history.entries().to_vec(),
        }
    }

    fn with_log(&self, f: impl FnOnce(&mut TerminalLog)) {
        if let Ok(mut log) = self.log.lock() {
            f(&mut log);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(UartLink::is_alive)
    }

    /// Re-list ports and select the first CH341 adapter.
    pub fn refresh_ports(&mut self) {
        self.scan_ports(false);
    }

    /// Startup scan: the saved port stays selected while it is attached.
    pub fn restore_ports(&mut self) {
        self.scan_ports(true);
    }

    fn scan_ports(&mut self, keep_saved: bool) {
        match port::available_ports() {
            Ok(ports) => self.set_ports(ports, keep_saved),
            Err(e) => {
                warn!("{e}");
                self.with_log(|l| l.push_error(e.to_string()));
            }
        }
    }

    pub fn set_ports(&mut self, ports: Vec<PortInfo>, keep_saved: bool) {
        let keep = keep_saved && ports.iter().any(|p| p.name == self.port_name);
        if !keep && let Some(preferred) = port::preferred_port(&ports) {
            self.port_name = preferred.name.clone();
        }
        info!(
            "Found {} serial ports ({} CH341)",
            ports.len(),
            port::ch341_ports(&ports).len()
        );
        self.available_ports = ports;
    }

    pub fn connect(&mut self) -> Result<(), UartError> {
        if self.is_connected() {
            return Ok(());
        }
        let link = uart::start_uart_thread(&self.port_name, &self.line, Arc::clone(&self.log))?;
        self.attach_link(link);
        Ok(())
    }

    pub fn attach_link(&mut self, link: UartLink) {
        self.status = format!("Connected to {}", link.port_name());
        self.link = Some(link);
    }

    pub fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.disconnect();
        }
        self.status = "Disconnected".to_string();
    }

    pub fn toggle_connection(&mut self) {
        if self.is_connected() {
            self.disconnect();
        } else if let Err(e) = self.connect() {
            warn!("Serial connection failed: {e}");
            self.status = "Connection failed".to_string();
            self.with_log(|l| l.push_error(format!("Connection failed: {e}")));
        }
    }

    /// Drop a link whose reader thread has already stopped.
    pub fn check_link(&mut self) {
        if self.link.as_ref().is_some_and(|link| !link.is_alive()) {
            warn!("Serial link closed unexpectedly");
            self.disconnect();
        }
    }

    /// Encode and queue a command. The Sent log line is written by the
    /// reader thread once the bytes are on the wire.
    pub fn send_text(&mut self, text: &str) -> Result<(), SendError> {
        let link = self.link.as_ref().ok_or(UartError::NotConnected)?;
        let data = format::encode_command(text, self.format, self.line_ending)?;
        let display = match self.format {
            SendFormat::Hex => format!("HEX: {text}"),
            SendFormat::Ascii => text.to_string(),
        };
        self.history.add(text);
        link.send(data, display)?;
        Ok(())
    }

    fn report_send_error(&self, e: &SendError) {
        let message = match e {
            SendError::Uart(UartError::NotConnected) => "Not connected to any port".to_string(),
            other => other.to_string(),
        };
        warn!("{message}");
        self.with_log(|l| l.push_error(message));
    }

    pub fn send_input(&mut self) {
        let text = self.input.clone();
        match self.send_text(&text) {
            Ok(()) => self.input.clear(),
            Err(SendError::Format(FormatError::Empty)) => {}
            Err(e) => self.report_send_error(&e),
        }
    }

    pub fn send_quick(&mut self, index: usize) {
        let Some(command) = self.quick.get(index).map(str::to_string) else {
            return;
        };
        if let Err(e) = self.send_text(&command) {
            self.report_send_error(&e);
        }
    }

    pub fn history_up(&mut self) {
        if let Some(previous) = self.history.older() {
            self.input = previous.to_string();
        }
    }

    pub fn history_down(&mut self) {
        if let Some(next) = self.history.newer() {
            self.input = next.to_string();
        }
    }

    pub fn add_input_to_quick(&mut self) {
        if self.quick.add(&self.input) {
            let added = self.input.trim().to_string();
            self.with_log(|l| l.push_info(format!("Added quick command '{added}'")));
        }
    }

    pub fn remove_selected_quick(&mut self) {
        if let Some(index) = self.selected_quick.take() {
            self.quick.remove_at(index);
        }
    }

    pub fn clear_log(&self) {
        self.with_log(TerminalLog::clear);
    }

    pub fn save_log(&self) {
        let result = match self.log.lock() {
            Ok(log) => log.save_to_file(&self.log_path, self.view),
            Err(_) => return,
        };
        match result {
            Ok(()) => self.with_log(|l| l.push_info(format!("Log saved to {}", self.log_path))),
            Err(e) => self.with_log(|l| l.push_error(e.to_string())),
        }
    }

    pub fn save_quick_commands(&self) {
        match self.quick.save_to_file(&self.commands_path) {
            Ok(()) => self.with_log(|l| {
                l.push_info(format!("Commands saved to {}", self.commands_path))
            }),
            Err(e) => self.with_log(|l| l.push_error(e.to_string())),
        }
    }

    pub fn load_quick_commands(&mut self) {
        match self.quick.load_from_file(&self.commands_path) {
            Ok(()) => {
                self.selected_quick = None;
                self.with_log(|l| {
                    l.push_info(format!("Commands loaded from {}", self.commands_path))
                });
            }
            Err(e) => self.with_log(|l| l.push_error(e.to_string())),
        }
    }
}

/// Notices links whose reader died (unplugged adapter, read error)
pub fn link_watch_system(mut state: ResMut<AppState>) {
    if state.link.as_ref().is_some_and(|link| !link.is_alive()) {
        state.check_link();
    }
}
