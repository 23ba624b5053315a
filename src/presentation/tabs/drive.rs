use crate::domain::joystick::Axis;
use crate::domain::models::{ConnectionStatus, MessageSeverity};
use crate::presentation::app::RcCarApp;
use crate::presentation::components::Components;
use crate::presentation::joystick::Joystick;
use eframe::egui;

pub fn render(app: &mut RcCarApp, ui: &mut egui::Ui) {
    ui.label(egui::RichText::new("RC Car Remote").heading().strong());
    ui.add_space(16.0);

    ui_connection_panel(app, ui);
    ui.add_space(12.0);

    ui_status_panel(app, ui);
    ui.add_space(12.0);

    ui_drive_panel(app, ui);
}

fn ui_connection_panel(app: &mut RcCarApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Connection", |ui| {
        Components::connection_banner(ui, app.connection_status);

        if let Some(device) = &app.connected_device {
            ui.label(format!("{} ({})", device.name, device.id));
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if app.connection_status == ConnectionStatus::Connected {
                if ui.button("Disconnect").clicked() {
                    app.disconnect();
                }
            } else if ui.button("Paired devices…").clicked() {
                app.open_device_list();
            }
        });
    });
}

fn ui_status_panel(app: &mut RcCarApp, ui: &mut egui::Ui) {
    let current_msg = app.status_message.clone();
    if let Some(msg) = current_msg {
        Components::brutalist_card(ui, "Status", |ui| {
            let color = match msg.severity {
                MessageSeverity::Info => egui::Color32::BLUE,
                MessageSeverity::Success => egui::Color32::from_rgb(0, 150, 0),
                MessageSeverity::Warning => egui::Color32::from_rgb(200, 150, 0),
                MessageSeverity::Error => egui::Color32::RED,
            };
            ui.label(egui::RichText::new(&msg.message).color(color).strong());
        });
    }
}

fn ui_drive_panel(app: &mut RcCarApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Drive", |ui| {
        let track = app.settings.get().joystick_track_size;
        let knob = app.settings.get().joystick_knob_size;

        ui.columns(2, |cols| {
            let steer_change =
                Joystick::new(&mut app.steering, track, knob, "Left / Right").show(&mut cols[0]);
            let throttle_change =
                Joystick::new(&mut app.throttle, track, knob, "Forward / Back").show(&mut cols[1]);

            if let Some(value) = steer_change {
                app.handle_joystick_change(Axis::Horizontal, value);
            }
            if let Some(value) = throttle_change {
                app.handle_joystick_change(Axis::Vertical, value);
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .selectable_label(app.front_lights_on, "💡 Front lights")
                .clicked()
            {
                app.toggle_front_lights();
            }
            if ui
                .selectable_label(app.rear_lights_on, "🔴 Rear lights")
                .clicked()
            {
                app.toggle_rear_lights();
            }
            if ui.selectable_label(app.motors_on, "⚡ Motors").clicked() {
                app.toggle_motors();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("Speed: {:.2}", app.speed))
                        .strong()
                        .size(18.0),
                );
            });
        });
    });
}

/// Modal-style window listing bonded devices. Entries are disabled while a
/// connect for them is in flight so only one attempt can be pending.
pub fn render_device_list(app: &mut RcCarApp, ctx: &egui::Context) {
    if !app.show_device_list {
        return;
    }

    let mut open = app.show_device_list;
    let mut picked = None;

    egui::Window::new("Paired devices")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            if app.bonded_devices.is_empty() {
                ui.label("No paired devices found");
                return;
            }

            let last_used = app.settings.get().last_device_id.clone();
            for device in &app.bonded_devices {
                let connecting = app
                    .connecting_device
                    .as_ref()
                    .is_some_and(|d| d.id == device.id);
                ui.horizontal(|ui| {
                    let label = format!("{}\n{}", device.name, device.id);
                    let button = ui.add_enabled(!connecting, egui::Button::new(label));
                    if button.clicked() {
                        picked = Some(device.clone());
                    }
                    if last_used.as_deref() == Some(device.id.as_str()) {
                        ui.label(egui::RichText::new("★ last used").weak());
                    }
                    if connecting {
                        ui.spinner();
                        ui.label("Connecting…");
                    }
                });
            }
        });

    app.show_device_list = open;
    if let Some(device) = picked {
        app.connect_to(device);
    }
}
