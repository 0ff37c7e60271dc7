use bevy_egui::egui;
use crate::app::AppState;
use crate::format::{LineEnding, SendFormat};

/// Renders the command entry line with format and line ending selectors.
/// Enter sends; Up/Down walk the command history.
pub fn render_command_bar(ui: &mut egui::Ui, state: &mut AppState) {
    let connected = state.is_connected();

    ui.horizontal(|ui| {
        ui.label("Command:");

        let controls_width = 440.0;
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.input)
                .hint_text("Type a command and press Enter")
                .font(egui::TextStyle::Monospace)
                .desired_width((ui.available_width() - controls_width).max(120.0)),
        );

        if input.has_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                state.history_up();
            } else if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                state.history_down();
            }
        }

        let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        egui::ComboBox::from_id_salt("format_select")
            .selected_text(state.format.label())
            .width(70.0)
            .show_ui(ui, |ui| {
                for format in SendFormat::ALL {
                    ui.selectable_value(&mut state.format, format, format.label());
                }
            });

        // Line endings only apply to ASCII
        ui.add_enabled_ui(state.format == SendFormat::Ascii, |ui| {
            egui::ComboBox::from_id_salt("line_ending_select")
                .selected_text(state.line_ending.label())
                .width(60.0)
                .show_ui(ui, |ui| {
                    for ending in LineEnding::ALL {
                        ui.selectable_value(&mut state.line_ending, ending, ending.label());
                    }
                });
        });

        let send = ui.add_enabled(connected, egui::Button::new("Send")).clicked();
        if enter || send {
            state.send_input();
            input.request_focus();
        }

        if ui
            .add_enabled(!state.history.entries().is_empty(), egui::Button::new("Clear History"))
            .clicked()
        {
            state.history.clear();
        }
    });
}
