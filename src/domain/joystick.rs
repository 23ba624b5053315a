//! Joystick input mapping.
//!
//! Turns a 2D drag offset into a scalar drive value in [-1000, 1000]:
//! the offset is locked to the stick's axis, clamped to the track circle,
//! then scaled linearly so the rim maps to ±1000.

/// Which screen axis a stick responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// dy only; positive = pointer dragged down.
    Vertical,
    /// dx only; positive = pointer dragged right.
    Horizontal,
}

/// Full scale of the emitted value (the firmware's `A` command range).
pub const VALUE_RANGE: i32 = 1000;

/// Clamp (dx, dy) to a circle of the given radius, preserving the angle.
/// Offsets already inside the circle pass through untouched.
pub fn clamp_to_circle(dx: f32, dy: f32, radius: f32) -> (f32, f32) {
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= radius {
        (dx, dy)
    } else {
        let angle = dy.atan2(dx);
        (radius * angle.cos(), radius * angle.sin())
    }
}

/// Project a raw drag offset onto the stick's axis.
pub fn lock_to_axis(axis: Axis, dx: f32, dy: f32) -> (f32, f32) {
    match axis {
        Axis::Vertical => (0.0, dy),
        Axis::Horizontal => (dx, 0.0),
    }
}

/// Linear scale of a clamped axis offset into [-VALUE_RANGE, VALUE_RANGE].
pub fn scale_value(offset: f32, radius: f32) -> i32 {
    if radius <= 0.0 {
        return 0;
    }
    (offset / radius * VALUE_RANGE as f32).round() as i32
}

/// Tracks one stick through its Idle/Dragging lifecycle and produces the
/// value stream the screens forward as drive commands. Values are only
/// reported when they change, with a final 0 on release.
#[derive(Debug)]
pub struct StickTracker {
    axis: Axis,
    radius: f32,
    dragging: bool,
    offset: (f32, f32),
    last_value: i32,
}

impl StickTracker {
    pub fn new(axis: Axis, track_size: f32, knob_size: f32) -> Self {
        Self {
            axis,
            radius: (track_size - knob_size) / 2.0,
            dragging: false,
            offset: (0.0, 0.0),
            last_value: 0,
        }
    }

    /// Clamped knob offset from the track center, for rendering.
    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed one pointer movement while the knob is held. Returns the new
    /// value if it changed since the last report.
    pub fn drag(&mut self, dx: f32, dy: f32) -> Option<i32> {
        self.dragging = true;
        let (dx, dy) = lock_to_axis(self.axis, dx, dy);
        let (dx, dy) = clamp_to_circle(dx, dy, self.radius);
        self.offset = (dx, dy);

        let along_axis = match self.axis {
            Axis::Vertical => dy,
            Axis::Horizontal => dx,
        };
        let value = scale_value(along_axis, self.radius);
        if value != self.last_value {
            self.last_value = value;
            Some(value)
        } else {
            None
        }
    }

    /// Drag ended or was cancelled: back to Idle, report 0 if we were away
    /// from center.
    pub fn release(&mut self) -> Option<i32> {
        self.dragging = false;
        self.offset = (0.0, 0.0);
        if self.last_value != 0 {
            self.last_value = 0;
            Some(0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 50.0;

    #[test]
    fn inside_circle_passes_through() {
        let (dx, dy) = clamp_to_circle(10.0, -20.0, RADIUS);
        assert_eq!((dx, dy), (10.0, -20.0));
    }

    #[test]
    fn outside_circle_clamps_magnitude_keeps_angle() {
        let (dx, dy) = clamp_to_circle(80.0, 60.0, RADIUS);
        let mag = (dx * dx + dy * dy).sqrt();
        assert!((mag - RADIUS).abs() < 1e-3);
        assert!((dy.atan2(dx) - 60.0f32.atan2(80.0)).abs() < 1e-5);
    }

    #[test]
    fn center_is_exactly_zero() {
        assert_eq!(scale_value(0.0, RADIUS), 0);
    }

    #[test]
    fn rim_scales_to_full_range() {
        assert_eq!(scale_value(RADIUS, RADIUS), 1000);
        assert_eq!(scale_value(-RADIUS, RADIUS), -1000);
        assert_eq!(scale_value(RADIUS / 2.0, RADIUS), 500);
    }

    #[test]
    fn vertical_drag_past_rim_saturates() {
        // Track 150 / knob 50 -> radius 50; straight down by 2x radius.
        let mut stick = StickTracker::new(Axis::Vertical, 150.0, 50.0);
        assert_eq!(stick.drag(0.0, 100.0), Some(1000));
        assert_eq!(stick.offset(), (0.0, 50.0));
    }

    #[test]
    fn horizontal_drag_ignores_dy() {
        let mut stick = StickTracker::new(Axis::Horizontal, 150.0, 50.0);
        assert_eq!(stick.drag(-25.0, 999.0), Some(-500));
    }

    #[test]
    fn unchanged_value_not_re_reported() {
        let mut stick = StickTracker::new(Axis::Vertical, 150.0, 50.0);
        assert_eq!(stick.drag(0.0, 25.0), Some(500));
        assert_eq!(stick.drag(0.0, 25.0), None);
    }

    #[test]
    fn release_recenters_and_emits_zero_once() {
        let mut stick = StickTracker::new(Axis::Vertical, 150.0, 50.0);
        stick.drag(0.0, 40.0);
        assert_eq!(stick.release(), Some(0));
        assert_eq!(stick.offset(), (0.0, 0.0));
        assert!(!stick.is_dragging());
        // Releasing while already centered stays silent.
        assert_eq!(stick.release(), None);
    }
}
