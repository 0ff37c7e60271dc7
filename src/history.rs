use crate::config::MAX_HISTORY;

/// Sent-command history with shell-style Up/Down navigation.
///
/// The cursor sits one past the newest entry when idle; Up walks towards the
/// oldest entry and Down walks back, clearing the input once it passes the end.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn from_entries(entries: Vec<String>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        for entry in entries {
            history.add(&entry);
        }
        history
    }

    /// Commands already present are not recorded again.
    pub fn add(&mut self, command: &str) {
        if !command.is_empty() && !self.entries.iter().any(|c| c == command) {
            self.entries.push(command.to_string());
            if self.entries.len() > self.limit {
                let excess = self.entries.len() - self.limit;
                self.entries.drain(..excess);
            }
        }
        self.reset_cursor();
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// `Some("")` means the cursor walked past the newest entry.
    pub fn newer(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            Some("")
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_duplicates_and_trims_to_limit() {
        let mut history = CommandHistory::new(3);
        for cmd in ["a", "b", "a", "c", "d"] {
            history.add(cmd);
        }
        assert_eq!(history.entries(), ["b", "c", "d"]);
    }

    #[test]
    fn default_limit_is_one_hundred() {
        let mut history = CommandHistory::default();
        for i in 0..=MAX_HISTORY {
            history.add(&format!("cmd {i}"));
        }
        assert_eq!(MAX_HISTORY, 100);
        assert_eq!(history.entries().len(), 100);
        assert_eq!(history.entries()[0], "cmd 1");
    }

    #[test]
    fn navigates_up_and_down() {
        let mut history = CommandHistory::default();
        history.add("AT");
        history.add("AT+GMR");

        assert_eq!(history.older(), Some("AT+GMR"));
        assert_eq!(history.older(), Some("AT"));
        assert_eq!(history.older(), None);
        assert_eq!(history.newer(), Some("AT+GMR"));
        assert_eq!(history.newer(), Some(""));
        assert_eq!(history.older(), Some("AT+GMR"));
    }

    #[test]
    fn sending_resets_cursor() {
        let mut history = CommandHistory::default();
        history.add("one");
        history.add("two");
        history.older();
        history.older();
        history.add("one");
        assert_eq!(history.older(), Some("two"));
    }

    #[test]
    fn empty_history_does_nothing() {
        let mut history = CommandHistory::default();
        assert_eq!(history.older(), None);
        assert_eq!(history.newer(), None);
    }
}
