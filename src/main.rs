mod domain;
mod infrastructure;
mod presentation;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 540.0])
            .with_title("RC Car Remote"),
        ..Default::default()
    };

    eframe::run_native(
        "RC Car Remote",
        options,
        Box::new(|cc| Ok(Box::new(presentation::app::RcCarApp::new(cc)))),
    )
}
