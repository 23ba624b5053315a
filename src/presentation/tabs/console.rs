use crate::domain::console::Direction;
use crate::presentation::app::RcCarApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut RcCarApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Serial Console", |ui| {
        egui::ScrollArea::vertical()
            .id_salt("console_output")
            .max_height(300.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.console.is_empty() {
                    ui.label(egui::RichText::new("Waiting for data…").weak());
                }
                for line in app.console.iter() {
                    let (prefix, color) = match line.direction {
                        Direction::Sent => ("→", egui::Color32::from_rgb(0, 150, 0)),
                        Direction::Received => ("←", egui::Color32::from_rgb(0, 120, 200)),
                    };
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(prefix).color(color).monospace());
                        ui.label(egui::RichText::new(&line.text).monospace());
                    });
                }
            });

        ui.separator();

        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut app.command_input)
                    .hint_text("Type a command")
                    .desired_width(ui.available_width() - 90.0),
            );
            let submitted =
                input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Send").clicked() || submitted {
                app.send_console_command();
                input.request_focus();
            }
        });
    });
}
