use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::app::AppState;
use crate::config::{APP_DIR_NAME, QUICK_COMMANDS_FILE, SETTINGS_FILE};
use crate::error::StoreError;
use crate::format::{LineEnding, SendFormat};
use crate::port::LineSettings;
use crate::quick_commands::QuickCommands;
use crate::terminal::LogView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentSettings {
    #[serde(default)]
    pub last_port: String,
    #[serde(default)]
    pub line: LineSettings,
    #[serde(default)]
    pub format: SendFormat,
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default)]
    pub view: LogView,
    #[serde(default = "default_auto_scroll")]
    pub auto_scroll: bool,
    #[serde(default)]
    pub history: Vec<String>,
}

fn default_auto_scroll() -> bool {
    true
}

impl Default for PersistentSettings {
    fn default() -> Self {
        Self {
            last_port: String::new(),
            line: LineSettings::default(),
            format: SendFormat::Ascii,
            line_ending: LineEnding::CrLf,
            view: LogView::default(),
            auto_scroll: true,
            history: Vec::new(),
        }
    }
}

impl PersistentSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Self =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.line.normalize();
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Location of the settings and quick command files
#[derive(Resource, Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Uses the user's config directory unless a directory is given.
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        });

        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Failed to create config directory {:?}: {}", dir, e);
        }

        Self { dir }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn quick_commands_path(&self) -> PathBuf {
        self.dir.join(QUICK_COMMANDS_FILE)
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_settings(&self) -> PersistentSettings {
        let path = self.settings_path();
        match PersistentSettings::load_from_file(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(StoreError::Read { .. }) => {
                info!("No settings file found, using defaults");
                PersistentSettings::default()
            }
            Err(e) => {
                warn!("{e}");
                PersistentSettings::default()
            }
        }
    }

    pub fn load_quick_commands(&self) -> QuickCommands {
        let path = self.quick_commands_path();
        let mut quick = QuickCommands::default();
        match quick.load_from_file(&path) {
            Ok(()) => info!("Loaded {} quick commands from {:?}", quick.len(), path),
            Err(StoreError::Read { .. }) => info!("No quick commands file, using presets"),
            Err(e) => warn!("{e}"),
        }
        quick
    }

    pub fn save(
        &self,
        settings: &PersistentSettings,
        quick: &QuickCommands,
    ) -> Result<(), StoreError> {
        settings.save_to_file(self.settings_path())?;
        quick.save_to_file(self.quick_commands_path())
    }
}

/// System that saves settings and quick commands whenever they differ from
/// the last saved snapshot
pub fn auto_save_system(
    state: Res<AppState>,
    store: Res<SettingsStore>,
    mut last_saved: Local<Option<(PersistentSettings, QuickCommands)>>,
) {
    let current = (state.to_settings(), state.quick.clone());

    match last_saved.as_ref() {
        None => *last_saved = Some(current),
        Some(previous) if *previous == current => {}
        Some(_) => {
            if let Err(e) = store.save(&current.0, &current.1) {
                warn!("Failed to auto-save settings: {}", e);
            }
            *last_saved = Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_SERIAL_TIMEOUT_MS;

    fn temp_store(name: &str) -> SettingsStore {
        let dir = std::env::temp_dir().join(format!("ch341_store_{}_{}", name, std::process::id()));
        SettingsStore::new(Some(dir))
    }

    #[test]
    fn missing_files_give_defaults() {
        let store = temp_store("missing");
        assert_eq!(store.load_settings(), PersistentSettings::default());
        assert_eq!(store.load_quick_commands(), QuickCommands::default());
        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn saved_settings_load_back() {
        let store = temp_store("roundtrip");
        let mut settings = PersistentSettings::default();
        settings.last_port = "/dev/ttyUSB0".to_string();
        settings.line.baud_rate = 9600;
        settings.format = SendFormat::Hex;
        settings.history = vec!["AT".to_string()];
        let mut quick = QuickCommands::default();
        quick.add("AT+RST");

        store.save(&settings, &quick).unwrap();

        assert_eq!(store.load_settings(), settings);
        assert_eq!(store.load_quick_commands(), quick);
        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let store = temp_store("corrupt");
        fs::write(store.settings_path(), "not json").unwrap();
        assert_eq!(store.load_settings(), PersistentSettings::default());
        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn auto_save_writes_only_after_a_change() {
        let store = temp_store("auto");
        let mut app = App::new();
        app.insert_resource(AppState::default())
            .insert_resource(store.clone())
            .add_systems(Update, auto_save_system);

        app.update();
        app.update();
        assert!(!store.settings_path().exists());

        app.world_mut().resource_mut::<AppState>().port_name = "COM9".to_string();
        app.update();

        assert_eq!(store.load_settings().last_port, "COM9");
        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn loaded_line_settings_are_clamped() {
        let store = temp_store("clamp");
        fs::write(
            store.settings_path(),
            r#"{"line": {"data_bits": 9, "timeout_ms": 0}}"#,
        )
        .unwrap();

        let settings = store.load_settings();
        let _ = fs::remove_dir_all(&store.dir);

        assert_eq!(settings.line.data_bits, 8);
        assert_eq!(settings.line.timeout_ms, MIN_SERIAL_TIMEOUT_MS);
    }

    #[test]
    fn partial_settings_keep_defaults_for_missing_keys() {
        let settings: PersistentSettings =
            serde_json::from_str(r#"{"last_port": "COM3"}"#).unwrap();
        assert_eq!(settings.last_port, "COM3");
        assert!(settings.auto_scroll);
        assert_eq!(settings.line_ending, LineEnding::CrLf);
    }
}
