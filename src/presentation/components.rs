use crate::domain::models::ConnectionStatus;
use eframe::egui;

pub struct Components;

impl Components {
    /// Bordered panel used by the Connection, Status, Drive and Console
    /// cards.
    pub fn brutalist_card<R>(
        ui: &mut egui::Ui,
        title: &str,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        let stroke = ui.style().visuals.widgets.noninteractive.bg_stroke;
        let bg = ui.style().visuals.widgets.noninteractive.bg_fill;

        egui::Frame::none()
            .inner_margin(egui::Margin::same(14.0))
            .stroke(stroke)
            .fill(bg)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong().size(18.0));
                    ui.separator();
                    ui.add_space(4.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
    }

    /// Full-width strip announcing the session state in its status color.
    pub fn connection_banner(ui: &mut egui::Ui, status: ConnectionStatus) {
        let (text, bg_color, text_color) = match status {
            ConnectionStatus::Connected => (
                "CONNECTED",
                egui::Color32::from_rgb(0, 200, 0),
                egui::Color32::BLACK,
            ),
            ConnectionStatus::Connecting => (
                "CONNECTING...",
                egui::Color32::from_rgb(255, 200, 0),
                egui::Color32::BLACK,
            ),
            ConnectionStatus::Disconnected => (
                "DISCONNECTED",
                egui::Color32::from_gray(100),
                egui::Color32::WHITE,
            ),
            ConnectionStatus::Error => (
                "ERROR",
                egui::Color32::from_rgb(255, 50, 50),
                egui::Color32::WHITE,
            ),
        };

        ui.add_sized(
            [ui.available_width(), 35.0],
            egui::Label::new(
                egui::RichText::new(text)
                    .color(text_color)
                    .background_color(bg_color)
                    .size(16.0)
                    .strong(),
            )
            .wrap_mode(egui::TextWrapMode::Extend),
        );
    }
}
