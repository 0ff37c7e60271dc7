pub mod panels;
pub mod theme;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::app::AppState;

/// Main UI system that renders all the egui panels
pub fn ui_system(mut contexts: EguiContexts, mut state: ResMut<AppState>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    // New serial data arrives from another thread
    ctx.request_repaint_after(std::time::Duration::from_millis(50));

    render_top_panel(ctx, &mut state);
    render_bottom_panel(ctx, &mut state);
    render_quick_commands_panel(ctx, &mut state);
    render_central_panel(ctx, &mut state);
}

fn panel_frame(ctx: &egui::Context) -> egui::Frame {
    egui::Frame {
        inner_margin: egui::Margin::same(8.0),
        fill: ctx.style().visuals.panel_fill,
        ..Default::default()
    }
}

/// Renders the top connection panel
fn render_top_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("connection_panel")
        .frame(panel_frame(ctx))
        .show(ctx, |ui| {
            panels::render_connection_panel(ui, state);
        });
}

/// Renders the command entry bar
fn render_bottom_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("command_panel")
        .frame(panel_frame(ctx))
        .show(ctx, |ui| {
            panels::render_command_bar(ui, state);
        });
}

fn render_quick_commands_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::right("quick_commands_panel")
        .resizable(true)
        .default_width(240.0)
        .frame(panel_frame(ctx))
        .show(ctx, |ui| {
            panels::render_quick_commands(ui, state);
        });
}

/// Renders the terminal log filling the remaining space
fn render_central_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default()
        .frame(egui::Frame {
            inner_margin: egui::Margin::same(8.0),
            fill: theme::TERMINAL_BG,
            ..Default::default()
        })
        .show(ctx, |ui| {
            panels::render_terminal(ui, state);
        });
}
