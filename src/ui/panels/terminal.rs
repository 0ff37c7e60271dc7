use bevy_egui::egui;
use crate::app::AppState;
use crate::terminal::DisplayMode;
use crate::ui::theme;

/// Renders the terminal toolbar and the coloured log.
///
/// Only the rows in view are formatted, and the log lock is released before
/// any layout so the reader thread is never held up by a repaint.
pub fn render_terminal(ui: &mut egui::Ui, state: &mut AppState) {
    render_toolbar(ui, state);
    ui.separator();

    let total_rows = state.log.lock().map(|log| log.len()).unwrap_or(0);
    let row_height = ui.text_style_height(&egui::TextStyle::Monospace);
    let view = state.view;
    let log = &state.log;

    egui::ScrollArea::both()
        .id_salt("terminal_log")
        .auto_shrink([false; 2])
        .stick_to_bottom(state.auto_scroll)
        .show_rows(ui, row_height, total_rows, |ui, rows| {
            let lines = log
                .lock()
                .map(|log| log.render_rows(rows, view))
                .unwrap_or_default();
            for (kind, line) in lines {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(line)
                            .monospace()
                            .color(theme::entry_color(kind)),
                    )
                    .extend(),
                );
            }
        });
}

fn render_toolbar(ui: &mut egui::Ui, state: &mut AppState) {
    let count = state.log.lock().map(|log| log.len()).unwrap_or(0);

    ui.horizontal_wrapped(|ui| {
        ui.label(format!("Terminal ({count} lines)"));
        ui.separator();

        ui.checkbox(&mut state.auto_scroll, "Auto-scroll");
        ui.checkbox(&mut state.view.show_timestamps, "Timestamps");

        egui::ComboBox::from_id_salt("display_mode_select")
            .selected_text(state.view.mode.label())
            .show_ui(ui, |ui| {
                for mode in DisplayMode::ALL {
                    ui.selectable_value(&mut state.view.mode, mode, mode.label());
                }
            });

        ui.separator();
        if ui.button("Clear").clicked() {
            state.clear_log();
        }

        ui.separator();
        ui.add(egui::TextEdit::singleline(&mut state.log_path).desired_width(160.0));
        if ui.button("Save Log").clicked() {
            state.save_log();
        }
    });
}
