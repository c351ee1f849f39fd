//! Arc geometry for the gauge dial.
//!
//! Everything in this module is a pure function over the fixed 100x100
//! canvas the widgets draw in: angles are degrees in the SVG convention
//! (0 at 3 o'clock, increasing clockwise), the dial is a circle of radius
//! [`DIAL_RADIUS`] centered at ([`CENTER`], [`CENTER`]), and coordinates are
//! rounded to 3 decimal digits so the emitted path strings stay compact and
//! stable.

/// Horizontal and vertical center of the canvas.
pub const CENTER: f64 = 50.0;

/// Radius of the dial circle before any stroke inset.
pub const DIAL_RADIUS: f64 = 40.0;

/// Side length of the square view box.
pub const VIEW_BOX: f64 = 100.0;

/// Clamp `value` into `[min, max]`.
///
/// Any non-finite input (NaN or either infinity) falls back to `min`.
/// Never panics and never surfaces an error.
pub fn validate(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}

/// Normalized position of `value` inside `[min, max]`, in `[0, 1]`.
///
/// The value is clamped first; a degenerate range (`max <= min`) yields 0.
pub fn fraction_of_range(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !(span > 0.0) {
        return 0.0;
    }
    (validate(value, min, max) - min) / span
}

/// A projected canvas coordinate, rounded to 3 decimal digits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Project `angle_degrees` onto the circle of `radius` around `(cx, cy)`.
pub fn to_cartesian(cx: f64, cy: f64, radius: f64, angle_degrees: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point {
        x: round3(cx + radius * rad.cos()),
        y: round3(cy + radius * rad.sin()),
    }
}

/// Whether an arc of `sweep_degrees` needs the large-arc flag: 0 for sweeps
/// up to 180 degrees, 1 beyond.
pub fn large_arc(sweep_degrees: f64) -> bool {
    sweep_degrees > 180.0
}

/// Path data for a circular arc from `start_angle` to `end_angle` on the
/// dial: a move-to followed by an elliptical arc command with equal radii,
/// no rotation, the given large-arc flag, and the sweep flag fixed to 1
/// (clockwise).
pub fn arc_path(radius: f64, start_angle: f64, end_angle: f64, large_arc: bool) -> String {
    let start = to_cartesian(CENTER, CENTER, radius, start_angle);
    let end = to_cartesian(CENTER, CENTER, radius, end_angle);
    format!(
        "M {} {} A {} {} 0 {} 1 {} {}",
        start.x,
        start.y,
        radius,
        radius,
        u8::from(large_arc),
        end.x,
        end.y
    )
}

/// A stroked arc on the dial circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub large_arc: bool,
}

impl ArcSegment {
    /// Arc covering `fraction` of the dial span, flag chosen by the
    /// resulting sweep. `fraction` is clamped into `[0, 1]`.
    pub fn for_fraction(radius: f64, start_angle: f64, span: f64, fraction: f64) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let sweep = fraction * span;
        Self {
            radius,
            start_angle,
            end_angle: start_angle + sweep,
            large_arc: large_arc(sweep),
        }
    }

    /// Arc covering the whole dial span (the background track).
    pub fn for_span(radius: f64, start_angle: f64, span: f64) -> Self {
        Self::for_fraction(radius, start_angle, span, 1.0)
    }

    /// Angular distance traced by this arc, degrees.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn start_point(&self) -> Point {
        to_cartesian(CENTER, CENTER, self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        to_cartesian(CENTER, CENTER, self.radius, self.end_angle)
    }

    /// Path data for this arc, see [`arc_path`].
    pub fn to_path(&self) -> String {
        arc_path(self.radius, self.start_angle, self.end_angle, self.large_arc)
    }
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_keeps_in_range_values() {
        for v in 0..=100 {
            let v = f64::from(v);
            assert_eq!(validate(v, 0.0, 100.0), v);
        }
        assert_eq!(validate(62.5, 0.0, 100.0), 62.5);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        assert_eq!(validate(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(validate(-0.001, 0.0, 100.0), 0.0);
        assert_eq!(validate(100.001, 0.0, 100.0), 100.0);
        assert_eq!(validate(250.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn validate_falls_back_to_min_for_non_finite() {
        assert_eq!(validate(f64::NAN, 0.0, 100.0), 0.0);
        assert_eq!(validate(f64::INFINITY, 0.0, 100.0), 0.0);
        assert_eq!(validate(f64::NEG_INFINITY, 0.0, 100.0), 0.0);
        assert_eq!(validate(f64::NAN, 20.0, 80.0), 20.0);
    }

    #[test]
    fn fraction_handles_custom_and_degenerate_ranges() {
        assert_eq!(fraction_of_range(50.0, 0.0, 100.0), 0.5);
        assert_eq!(fraction_of_range(30.0, 20.0, 80.0), 1.0 / 6.0);
        assert_eq!(fraction_of_range(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(fraction_of_range(10.0, 50.0, 50.0), 0.0);
        assert_eq!(fraction_of_range(10.0, 80.0, 20.0), 0.0);
    }

    #[test]
    fn cartesian_projection_stays_on_the_circle() {
        for angle in [0.0, 45.0, 90.0, 157.5, 270.0, 382.5] {
            let p = to_cartesian(50.0, 50.0, 40.0, angle);
            let dist = ((p.x - 50.0).powi(2) + (p.y - 50.0).powi(2)).sqrt();
            assert!((dist - 40.0).abs() < 0.001, "angle {angle}: dist {dist}");
        }
    }

    #[test]
    fn cartesian_projection_rounds_to_three_decimals() {
        // 50 + 40*cos(30deg) = 84.64101615..., rounded to 84.641.
        let p = to_cartesian(50.0, 50.0, 40.0, 30.0);
        assert_eq!(p.x, 84.641);
        assert_eq!(p.y, 70.0);
        // Cardinal angles come out exact despite cos/sin residue.
        assert_eq!(to_cartesian(50.0, 50.0, 40.0, 90.0), Point { x: 50.0, y: 90.0 });
        assert_eq!(to_cartesian(50.0, 50.0, 40.0, 270.0), Point { x: 50.0, y: 10.0 });
    }

    #[test]
    fn sweep_is_monotone_in_fraction() {
        let mut last = -1.0;
        for step in 0..=20 {
            let fraction = f64::from(step) / 20.0;
            let sweep = ArcSegment::for_fraction(40.0, 90.0, 360.0, fraction).sweep();
            assert!(sweep >= last);
            last = sweep;
        }
        assert_eq!(last, 360.0);
    }

    #[test]
    fn zero_fraction_collapses_to_a_point() {
        let arc = ArcSegment::for_fraction(40.0, 90.0, 360.0, 0.0);
        assert_eq!(arc.sweep(), 0.0);
        assert_eq!(arc.start_point(), arc.end_point());
    }

    #[test]
    fn full_fraction_covers_the_configured_span() {
        for span in [180.0, 225.0, 360.0] {
            let arc = ArcSegment::for_fraction(40.0, 90.0, span, 1.0);
            assert_eq!(arc.sweep(), span);
        }
    }

    #[test]
    fn large_arc_flips_past_half_a_turn() {
        assert!(!large_arc(0.0));
        assert!(!large_arc(90.0));
        assert!(!large_arc(180.0));
        assert!(large_arc(180.001));
        assert!(large_arc(360.0));
    }

    #[test]
    fn half_value_on_a_full_circle_lands_opposite_the_start() {
        // value=50 over a 360-degree span from 90 degrees: sweep 180,
        // small-arc flag, end point at 270 degrees.
        let arc = ArcSegment::for_fraction(40.0, 90.0, 360.0, 0.5);
        assert_eq!(arc.sweep(), 180.0);
        assert!(!arc.large_arc);
        assert_eq!(arc.end_point(), Point { x: 50.0, y: 10.0 });
        assert_eq!(arc.to_path(), "M 50 90 A 40 40 0 0 1 50 10");
    }

    #[test]
    fn arc_path_emits_the_large_arc_flag() {
        let arc = ArcSegment::for_fraction(40.0, 90.0, 360.0, 0.75);
        assert!(arc.large_arc);
        assert_eq!(arc.to_path(), "M 50 90 A 40 40 0 1 1 90 50");
    }

    #[test]
    fn non_finite_fraction_draws_nothing() {
        let arc = ArcSegment::for_fraction(40.0, 90.0, 360.0, f64::NAN);
        assert_eq!(arc.sweep(), 0.0);
    }
}
