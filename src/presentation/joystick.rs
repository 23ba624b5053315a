//! On-screen joystick widget.
//!
//! Draws a circular track with a draggable knob. While held, the knob
//! follows the pointer inside the track circle and the widget reports the
//! scaled drive value; on release the knob animates back to center and a
//! final 0 is reported.

use crate::domain::joystick::StickTracker;
use eframe::egui::{self, Color32, Sense, Stroke, Vec2};

pub struct Joystick<'a> {
    tracker: &'a mut StickTracker,
    track_size: f32,
    knob_size: f32,
    label: &'a str,
}

impl<'a> Joystick<'a> {
    pub fn new(
        tracker: &'a mut StickTracker,
        track_size: f32,
        knob_size: f32,
        label: &'a str,
    ) -> Self {
        Self {
            tracker,
            track_size,
            knob_size,
            label,
        }
    }

    /// Render the stick. Returns the new drive value when it changed this
    /// frame (including the final 0 on release).
    pub fn show(self, ui: &mut egui::Ui) -> Option<i32> {
        let mut emitted = None;

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(self.label).strong());

            let (rect, response) =
                ui.allocate_exact_size(Vec2::splat(self.track_size), Sense::drag());
            let center = rect.center();

            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let delta = pos - center;
                    emitted = self.tracker.drag(delta.x, delta.y);
                }
            } else if response.drag_stopped() {
                emitted = self.tracker.release();
            }

            // Snap to the pointer while held, spring back when released.
            let anim_time = if self.tracker.is_dragging() { 0.0 } else { 0.15 };
            let (ox, oy) = self.tracker.offset();
            let kx = ui
                .ctx()
                .animate_value_with_time(response.id.with("kx"), ox, anim_time);
            let ky = ui
                .ctx()
                .animate_value_with_time(response.id.with("ky"), oy, anim_time);

            let painter = ui.painter();
            let visuals = ui.style().visuals.clone();

            painter.circle_filled(
                center,
                self.track_size / 2.0,
                visuals.widgets.inactive.bg_fill,
            );
            painter.circle_stroke(
                center,
                self.track_size / 2.0,
                visuals.widgets.noninteractive.bg_stroke,
            );

            let knob_center = center + Vec2::new(kx, ky);
            let knob_fill = if self.tracker.is_dragging() {
                visuals.widgets.active.bg_fill
            } else {
                Color32::from_gray(85)
            };
            painter.circle_filled(knob_center, self.knob_size / 2.0, knob_fill);
            painter.circle_stroke(
                knob_center,
                self.knob_size / 2.0,
                Stroke::new(2.0, visuals.widgets.noninteractive.bg_stroke.color),
            );
        });

        emitted
    }
}
