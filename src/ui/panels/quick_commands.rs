use bevy_egui::egui;
use crate::app::AppState;

/// Renders the quick command list. Double-click sends a preset.
pub fn render_quick_commands(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Quick Commands");
    ui.separator();

    let mut send_index = None;

    egui::ScrollArea::vertical()
        .id_salt("quick_commands")
        .max_height((ui.available_height() - 150.0).max(80.0))
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for (index, command) in state.quick.commands().iter().enumerate() {
                let selected = state.selected_quick == Some(index);
                let response = ui.selectable_label(
                    selected,
                    egui::RichText::new(command).monospace(),
                );
                if response.clicked() {
                    state.selected_quick = Some(index);
                }
                if response.double_clicked() {
                    send_index = Some(index);
                }
            }
        });

    if let Some(index) = send_index {
        state.send_quick(index);
    }

    ui.separator();
    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(state.selected_quick.is_some(), egui::Button::new("Send Selected"))
            .clicked()
            && let Some(index) = state.selected_quick
        {
            state.send_quick(index);
        }
        if ui.button("Add Current").clicked() {
            state.add_input_to_quick();
        }
        if ui
            .add_enabled(state.selected_quick.is_some(), egui::Button::new("Remove"))
            .clicked()
        {
            state.remove_selected_quick();
        }
        if ui.button("Defaults").clicked() {
            state.quick.reset_to_defaults();
            state.selected_quick = None;
        }
    });

    ui.separator();
    ui.label("Commands file:");
    ui.text_edit_singleline(&mut state.commands_path);
    ui.horizontal(|ui| {
        if ui.button("Load Commands").clicked() {
            state.load_quick_commands();
        }
        if ui.button("Save Commands").clicked() {
            state.save_quick_commands();
        }
    });
}
