use bevy_egui::egui;
use crate::app::AppState;
use crate::config::{BAUD_RATES, DATA_BITS};
use crate::port::{Parity, StopBits};
use crate::ui::theme;

/// Renders the top connection panel with port selection and line settings
pub fn render_connection_panel(ui: &mut egui::Ui, state: &mut AppState) {
    let connected = state.is_connected();

    ui.horizontal_wrapped(|ui| {
        ui.heading("UART Command Sender");
        ui.separator();

        // Port selection is locked while a port is open
        ui.add_enabled_ui(!connected, |ui| {
            render_port_select(ui, state);
            if ui.button("Refresh").clicked() {
                state.refresh_ports();
            }
            ui.separator();
            render_line_settings(ui, state);
        });

        ui.separator();

        let button = if connected {
            egui::Button::new(egui::RichText::new("Disconnect").strong())
                .fill(theme::DISCONNECT_BUTTON)
        } else {
            egui::Button::new(egui::RichText::new("Connect").strong())
        };
        if ui.add(button).clicked() {
            state.toggle_connection();
        }

        let color = if connected {
            theme::CONNECTED
        } else {
            theme::DISCONNECTED
        };
        ui.label(egui::RichText::new(&state.status).color(color).strong());
    });
}

fn render_port_select(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Port:");
    let selected = state
        .available_ports
        .iter()
        .find(|p| p.name == state.port_name)
        .map(|p| p.to_string())
        .unwrap_or_else(|| state.port_name.clone());

    egui::ComboBox::from_id_salt("serial_port_select")
        .selected_text(selected)
        .width(260.0)
        .show_ui(ui, |ui| {
            let available = state.available_ports.clone();
            for port in &available {
                ui.selectable_value(&mut state.port_name, port.name.clone(), port.to_string());
            }
            // Allow manual entry if not in list
            ui.separator();
            ui.label("Or enter manually:");
            ui.text_edit_singleline(&mut state.port_name);
        });
}

fn render_line_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Baud:");
    egui::ComboBox::from_id_salt("baud_select")
        .selected_text(state.line.baud_rate.to_string())
        .show_ui(ui, |ui| {
            for &baud in BAUD_RATES {
                ui.selectable_value(&mut state.line.baud_rate, baud, baud.to_string());
            }
        });

    ui.label("Data:");
    egui::ComboBox::from_id_salt("data_bits_select")
        .selected_text(state.line.data_bits.to_string())
        .width(40.0)
        .show_ui(ui, |ui| {
            for bits in DATA_BITS {
                ui.selectable_value(&mut state.line.data_bits, bits, bits.to_string());
            }
        });

    ui.label("Parity:");
    egui::ComboBox::from_id_salt("parity_select")
        .selected_text(state.line.parity.label())
        .width(60.0)
        .show_ui(ui, |ui| {
            for parity in Parity::ALL {
                ui.selectable_value(&mut state.line.parity, parity, parity.label());
            }
        });

    ui.label("Stop:");
    egui::ComboBox::from_id_salt("stop_bits_select")
        .selected_text(state.line.stop_bits.label())
        .width(40.0)
        .show_ui(ui, |ui| {
            for stop_bits in StopBits::ALL {
                ui.selectable_value(&mut state.line.stop_bits, stop_bits, stop_bits.label());
            }
        });
}
