use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::config::MAX_LOG_ENTRIES;
use crate::error::StoreError;
use crate::format::{decode_text, to_hex_string};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Received,
    Sent,
    System,
    Error,
    Info,
}

impl EntryKind {
    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::Received => "RECEIVED",
            EntryKind::Sent => "SENT",
            EntryKind::System => "SYSTEM",
            EntryKind::Error => "ERROR",
            EntryKind::Info => "INFO",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub clock_time: DateTime<Local>,
    pub kind: EntryKind,
    pub data: Vec<u8>,
}

/// How received bytes are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    Text,
    Hex,
    #[default]
    Both,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Text, DisplayMode::Hex, DisplayMode::Both];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Text => "Text",
            DisplayMode::Hex => "Hex",
            DisplayMode::Both => "Text + Hex",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogView {
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LogView {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Both,
            show_timestamps: true,
        }
    }
}

/// Bounded terminal history shared between the reader thread and the UI
pub struct TerminalLog {
    pub entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, kind: EntryKind, data: Vec<u8>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            clock_time: Local::now(),
            kind,
            data,
        });
    }

    pub fn push_received(&mut self, bytes: &[u8]) {
        self.push(EntryKind::Received, bytes.to_vec());
    }

    pub fn push_sent(&mut self, display: impl Into<String>) {
        self.push(EntryKind::Sent, display.into().into_bytes());
    }

    pub fn push_system(&mut self, message: impl Into<String>) {
        self.push(EntryKind::System, message.into().into_bytes());
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.push(EntryKind::Error, message.into().into_bytes());
    }

    pub fn push_info(&mut self, message: impl Into<String>) {
        self.push(EntryKind::Info, message.into().into_bytes());
    }

    pub fn payload(entry: &LogEntry, mode: DisplayMode) -> String {
        if entry.kind != EntryKind::Received {
            return decode_text(&entry.data);
        }
        let text = || decode_text(&entry.data).trim_end_matches(['\r', '\n']).to_string();
        match mode {
            DisplayMode::Text => text(),
            DisplayMode::Hex => to_hex_string(&entry.data),
            DisplayMode::Both => format!("TEXT: {} | HEX: {}", text(), to_hex_string(&entry.data)),
        }
    }

    pub fn render_line(entry: &LogEntry, view: LogView) -> String {
        let payload = Self::payload(entry, view.mode);
        if view.show_timestamps {
            format!(
                "[{}] [{}] {}",
                entry.clock_time.format("%H:%M:%S%.3f"),
                entry.kind.tag(),
                payload
            )
        } else {
            payload
        }
    }

    /// Rendered lines for a window of entries; rows past the end are skipped.
    pub fn render_rows(&self, rows: Range<usize>, view: LogView) -> Vec<(EntryKind, String)> {
        self.entries
            .iter()
            .skip(rows.start)
            .take(rows.end.saturating_sub(rows.start))
            .map(|entry| (entry.kind, Self::render_line(entry, view)))
            .collect()
    }

    pub fn export(&self, view: LogView) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&Self::render_line(entry, view));
            out.push('\n');
        }
        out
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, view: LogView) -> Result<(), StoreError> {
        let path = path.as_ref();
        fs::write(path, self.export(view)).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: LogView = LogView {
        mode: DisplayMode::Both,
        show_timestamps: false,
    };

    #[test]
    fn evicts_oldest_entries_past_capacity() {
        let mut log = TerminalLog::with_capacity(3);
        for i in 0..5 {
            log.push_info(format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(TerminalLog::render_line(&log.entries[0], PLAIN), "line 2");
    }

    #[test]
    fn received_bytes_render_per_mode() {
        let mut log = TerminalLog::new();
        log.push_received(b"OK\r\n");
        let entry = &log.entries[0];

        assert_eq!(TerminalLog::payload(entry, DisplayMode::Text), "OK");
        assert_eq!(TerminalLog::payload(entry, DisplayMode::Hex), "4F 4B 0D 0A");
        assert_eq!(
            TerminalLog::payload(entry, DisplayMode::Both),
            "TEXT: OK | HEX: 4F 4B 0D 0A"
        );
    }

    #[test]
    fn timestamped_lines_carry_kind_tag() {
        let mut log = TerminalLog::new();
        log.push_error("Read error: broken pipe");
        let line = TerminalLog::render_line(&log.entries[0], LogView::default());

        let (stamp, rest) = line.split_at(14);
        assert!(stamp.starts_with('[') && stamp.ends_with(']'));
        assert!(chrono::NaiveTime::parse_from_str(&stamp[1..13], "%H:%M:%S%.3f").is_ok());
        assert_eq!(rest, " [ERROR] Read error: broken pipe");
    }

    #[test]
    fn default_log_keeps_five_thousand_entries() {
        let mut log = TerminalLog::new();
        for i in 0..=MAX_LOG_ENTRIES {
            log.push_info(format!("{i}"));
        }
        assert_eq!(MAX_LOG_ENTRIES, 5000);
        assert_eq!(log.len(), 5000);
        assert_eq!(TerminalLog::render_line(&log.entries[0], PLAIN), "1");
    }

    #[test]
    fn render_rows_returns_only_the_requested_window() {
        let mut log = TerminalLog::new();
        for i in 0..10 {
            log.push_info(format!("line {i}"));
        }
        log.push_received(b"OK");

        let rows = log.render_rows(8..20, PLAIN);
        let lines: Vec<&str> = rows.iter().map(|(_, line)| line.as_str()).collect();
        assert_eq!(lines, ["line 8", "line 9", "TEXT: OK | HEX: 4F 4B"]);
        assert_eq!(rows[2].0, EntryKind::Received);
        assert!(log.render_rows(30..40, PLAIN).is_empty());
    }

    #[test]
    fn export_writes_one_line_per_entry() {
        let mut log = TerminalLog::new();
        log.push_system("Connected to COM3");
        log.push_sent("AT");
        let path = std::env::temp_dir().join(format!("ch341_log_{}.txt", std::process::id()));

        log.save_to_file(&path, PLAIN).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(contents, "Connected to COM3\nAT\n");
    }

    #[test]
    fn clear_empties_log() {
        let mut log = TerminalLog::new();
        log.push_received(&[0x01]);
        log.clear();
        assert!(log.is_empty());
    }
}
