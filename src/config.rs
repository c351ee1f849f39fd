//! Dial layouts and preview window settings.

/// How the background track behind the value arc is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStyle {
    /// Closed circle around the whole dial.
    FullRing,
    /// Open arc covering the same angular range as a full-scale value.
    SpanArc,
}

/// Angular layout of a gauge on the dial.
///
/// The three presets reproduce the stock gauge shapes; any other
/// combination of span and start angle is equally valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    /// Angular range covered by a full-scale value, in degrees.
    pub span: f64,
    /// Angle at which the value arc starts, in degrees. Angles grow
    /// clockwise from the positive x axis, so 90 is the bottom of the
    /// canvas.
    pub start_angle: f64,
    pub track: TrackStyle,
    /// Clip everything drawn to the upper half of the canvas.
    pub clip_to_upper_half: bool,
    /// Shrink the arc radius by half the widest stroke so the stroke
    /// stays inside the canvas.
    pub inset_by_stroke: bool,
}

impl ArcLayout {
    /// Full turn starting and ending at the bottom of the dial.
    pub fn circle() -> Self {
        Self {
            span: 360.0,
            start_angle: 90.0,
            track: TrackStyle::FullRing,
            clip_to_upper_half: false,
            inset_by_stroke: false,
        }
    }

    /// Half turn across the top, left edge to right edge.
    pub fn curve() -> Self {
        Self {
            span: 180.0,
            start_angle: 180.0,
            track: TrackStyle::SpanArc,
            clip_to_upper_half: false,
            inset_by_stroke: true,
        }
    }

    /// Wide arc dipping below the horizontal, clipped to the upper half.
    pub fn semicircle() -> Self {
        Self {
            span: 225.0,
            start_angle: 157.5,
            track: TrackStyle::SpanArc,
            clip_to_upper_half: true,
            inset_by_stroke: true,
        }
    }
}

impl Default for ArcLayout {
    fn default() -> Self {
        Self::circle()
    }
}

/// Settings for the live preview window.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub title: String,
    pub max_framerate: f64,
    /// Ease the shown value toward the target instead of jumping.
    pub animate: bool,
    pub lerp_factor: f64,
    /// TTF or OTF bytes for label rendering. Labels are skipped when
    /// no font is supplied.
    pub font_data: Option<Vec<u8>>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            title: "Gauge".to_string(),
            max_framerate: 60.0,
            animate: true,
            lerp_factor: 0.1,
            font_data: None,
        }
    }
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }
}
