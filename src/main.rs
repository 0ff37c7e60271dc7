use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::EguiPlugin;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

mod app;
mod config;
mod error;
mod format;
mod history;
mod persistence;
mod port;
mod quick_commands;
mod terminal;
mod uart;
mod ui;

use app::AppState;
use persistence::SettingsStore;
use port::{Parity, StopBits};

/// Send and receive UART commands through a CH341 USB-to-serial adapter
#[derive(Parser, Debug, Resource, Clone)]
#[command(version, about)]
struct Args {
    /// Serial port to select on startup (e.g. /dev/ttyUSB0 or COM3)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate override
    #[arg(short, long)]
    baud: Option<u32>,

    /// Data bits override (5-8)
    #[arg(long)]
    data_bits: Option<u8>,

    /// Parity: None, Even or Odd
    #[arg(long, value_parser = |s: &str| Ok::<_, String>(Parity::parse(s)))]
    parity: Option<Parity>,

    /// Stop bits: 1 or 2
    #[arg(long, value_parser = |s: &str| Ok::<_, String>(StopBits::parse(s)))]
    stop_bits: Option<StopBits>,

    /// Open the port immediately
    #[arg(short, long)]
    connect: bool,

    /// Directory holding settings.json and quick_commands.json
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let store = SettingsStore::new(args.config_dir.clone());
    let state = AppState::from_settings(store.load_settings(), store.load_quick_commands());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "UART Command Sender".to_string(),
                resolution: WindowResolution::new(1280.0, 800.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(state)
        .insert_resource(store)
        .insert_resource(args)
        .add_systems(Startup, startup_system)
        .add_systems(
            Update,
            (
                ui::theme::apply_theme_system,
                app::link_watch_system,
                ui::ui_system,
                persistence::auto_save_system,
            )
                .chain(),
        )
        .add_systems(Last, shutdown_system)
        .run();
}

/// Lists ports, then applies command-line overrides on top of saved settings
fn startup_system(mut state: ResMut<AppState>, args: Res<Args>) {
    state.restore_ports();
    apply_overrides(&mut state, &args);

    if args.connect {
        state.toggle_connection();
    }
    info!("Selected port '{}' at {}", state.port_name, state.line);
}

fn apply_overrides(state: &mut AppState, args: &Args) {
    if let Some(port) = &args.port {
        state.port_name = port.clone();
    }
    if let Some(baud) = args.baud {
        state.line.baud_rate = baud;
    }
    if let Some(data_bits) = args.data_bits {
        state.line.data_bits = data_bits;
    }
    if let Some(parity) = args.parity {
        state.line.parity = parity;
    }
    if let Some(stop_bits) = args.stop_bits {
        state.line.stop_bits = stop_bits;
    }
    state.line.normalize();
}

/// Releases the port and flushes settings when the window closes
fn shutdown_system(
    mut exits: EventReader<AppExit>,
    mut state: ResMut<AppState>,
    store: Res<SettingsStore>,
) {
    if exits.read().next().is_none() {
        return;
    }
    state.disconnect();
    if let Err(e) = store.save(&state.to_settings(), &state.quick) {
        error!("Failed to save settings: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_saved_line_settings() {
        let args = Args::try_parse_from([
            "ch341_terminal",
            "--port",
            "COM5",
            "--baud",
            "9600",
            "--data-bits",
            "7",
            "--parity",
            "Even",
            "--stop-bits",
            "2",
        ])
        .unwrap();
        let mut state = AppState::default();

        apply_overrides(&mut state, &args);

        assert_eq!(state.port_name, "COM5");
        assert_eq!(state.line.to_string(), "9600 7E2");
    }

    #[test]
    fn unsupported_framing_falls_back_to_defaults() {
        let args = Args::try_parse_from([
            "ch341_terminal",
            "--data-bits",
            "9",
            "--parity",
            "Mark",
            "--stop-bits",
            "1.5",
        ])
        .unwrap();
        let mut state = AppState::default();

        apply_overrides(&mut state, &args);

        assert_eq!(state.line.data_bits, 8);
        assert_eq!(state.line.parity, Parity::None);
        assert_eq!(state.line.stop_bits, StopBits::One);
    }

    #[test]
    fn no_flags_keep_saved_settings() {
        let args = Args::try_parse_from(["ch341_terminal"]).unwrap();
        let mut state = AppState::default();
        state.port_name = "/dev/ttyUSB0".to_string();
        let before = state.to_settings();

        apply_overrides(&mut state, &args);

        assert_eq!(state.to_settings(), before);
    }
}
