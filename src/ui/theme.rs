use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use egui::Color32;

use crate::terminal::EntryKind;

pub const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 34);
pub const SURFACE: Color32 = Color32::from_rgb(40, 40, 46);
pub const TERMINAL_BG: Color32 = Color32::from_rgb(18, 18, 20);
pub const BORDER: Color32 = Color32::from_rgb(62, 62, 70);
pub const TEXT: Color32 = Color32::from_rgb(220, 220, 220);
pub const ACCENT: Color32 = Color32::from_rgb(0, 122, 204);

pub const CONNECTED: Color32 = Color32::from_rgb(80, 200, 120);
pub const DISCONNECTED: Color32 = Color32::from_rgb(230, 80, 80);
pub const DISCONNECT_BUTTON: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);

pub fn entry_color(kind: EntryKind) -> Color32 {
    match kind {
        EntryKind::Received => Color32::from_rgb(110, 220, 110),
        EntryKind::Sent => Color32::from_rgb(90, 170, 255),
        EntryKind::Error => Color32::from_rgb(255, 95, 95),
        EntryKind::System => Color32::from_rgb(200, 130, 230),
        EntryKind::Info => TEXT,
    }
}

pub fn dark_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(TEXT);
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = SURFACE;
    visuals.extreme_bg_color = TERMINAL_BG;
    visuals.faint_bg_color = SURFACE;
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;

    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = SURFACE;
    visuals.widgets.inactive.bg_fill = SURFACE;
    visuals.widgets.hovered.weak_bg_fill = Color32::from_rgb(55, 55, 64);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals
}

/// Applies the dark theme once the egui context exists
pub fn apply_theme_system(mut contexts: EguiContexts, mut applied: Local<bool>) {
    if *applied {
        return;
    }
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    ctx.set_visuals(dark_visuals());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 4.0);
    });
    *applied = true;
}
