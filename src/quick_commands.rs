use std::fs;
use std::path::Path;

use crate::config::DEFAULT_QUICK_COMMANDS;
use crate::error::StoreError;

/// User presets, persisted as a flat JSON array of strings
#[derive(Debug, Clone, PartialEq)]
pub struct QuickCommands {
    commands: Vec<String>,
}

impl Default for QuickCommands {
    fn default() -> Self {
        Self {
            commands: DEFAULT_QUICK_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl QuickCommands {
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.commands.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns false for blank or already present commands.
    pub fn add(&mut self, command: &str) -> bool {
        let command = command.trim();
        if command.is_empty() || self.commands.iter().any(|c| c == command) {
            return false;
        }
        self.commands.push(command.to_string());
        true
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index < self.commands.len() {
            self.commands.remove(index);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.commands)?;
        fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The current list is kept when the file cannot be read or parsed.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let commands: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        self.commands = commands;
        Ok(())
    }
}
