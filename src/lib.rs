//! Dial gauge widgets rendered as SVG, with an optional live preview window.
//!
//! A [`Gauge`] maps a value in a configured range onto an arc of a fixed
//! 100x100 dial. Three stock shapes are provided (full circle, upper curve,
//! clipped semicircle) and any other span works through [`ArcLayout`].
//!
//! ```
//! use gaugekit::{Gauge, GaugeConfig};
//!
//! let gauge = Gauge::circle(GaugeConfig::builder().value(50.0).build());
//! let svg = gauge.to_svg();
//! assert!(svg.contains(r#"d="M 50 90 A 40 40 0 0 1 50 10""#));
//! ```

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

// External crate imports
use bon::Builder;
use thiserror::Error;

// Standard library imports
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::Receiver;

// ============================================================================
// MODULE LAYOUT
// ============================================================================

pub mod config;
pub mod geom;
pub mod scene;

mod preview;

pub use config::{ArcLayout, PreviewOptions, TrackStyle};
pub use geom::{ArcSegment, Point};
pub use scene::{ClipRect, Element, Gradient, GradientStop, Paint, Scene};

use geom::{CENTER, DIAL_RADIUS};

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Failure to parse a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 3 or 6 hex digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digit {0:?}")]
    BadDigit(char),
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#rgb` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn nibble(b: u8) -> Result<u8, ColorParseError> {
            match b {
                b'0'..=b'9' => Ok(b - b'0'),
                b'a'..=b'f' => Ok(b - b'a' + 10),
                b'A'..=b'F' => Ok(b - b'A' + 10),
                _ => Err(ColorParseError::BadDigit(b as char)),
            }
        }

        let hex = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        match hex.as_bytes() {
            [r, g, b] => Ok(Self::new(
                nibble(*r)? * 17,
                nibble(*g)? * 17,
                nibble(*b)? * 17,
            )),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(
                nibble(*r1)? * 16 + nibble(*r0)?,
                nibble(*g1)? * 16 + nibble(*g0)?,
                nibble(*b1)? * 16 + nibble(*b0)?,
            )),
            other => Err(ColorParseError::BadLength(other.len())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Gradient id referenced by the value arc.
pub const VALUE_GRADIENT_ID: &str = "gauge-value";

/// Font size of the generated centered label, in dial units.
pub const LABEL_FONT_SIZE: f64 = 10.0;

/// Value arc colors used when none are configured.
pub const DEFAULT_VALUE_COLORS: &[Color] = &[Color::new(0x00, 0x00, 0xff)];

/// Command enum for type-safe gauge updates
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetValue(f64),
    SetLabel(Option<String>),
}

/// Main gauge struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    layout: ArcLayout,
}

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    pub value: f64,
    #[builder(default = (0.0, 100.0))]
    pub range: (f64, f64),

    // Stroke colors
    #[builder(default = Color::new(0xff, 0xff, 0x00))]
    pub track_color: Color,
    #[builder(default = DEFAULT_VALUE_COLORS.to_vec())]
    pub value_colors: Vec<Color>,

    // Stroke widths, in dial units
    #[builder(default = 2.0)]
    pub track_stroke: f64,
    #[builder(default = 2.5)]
    pub value_stroke: f64,

    // Centered label
    #[builder(default = Color::new(0x99, 0x99, 0x99))]
    pub label_color: Color,
    pub label: Option<String>,

    /// Rendered width and height in pixels.
    #[builder(default = 150)]
    pub size: u32,
}

impl Gauge {
    pub fn new(layout: ArcLayout, config: GaugeConfig) -> Self {
        Self { config, layout }
    }

    /// Full-circle gauge with a closed background ring.
    pub fn circle(config: GaugeConfig) -> Self {
        Self::new(ArcLayout::circle(), config)
    }

    /// Half-circle gauge across the top of the dial.
    pub fn curve(config: GaugeConfig) -> Self {
        Self::new(ArcLayout::curve(), config)
    }

    /// Wide arc gauge clipped to the upper half of the dial.
    pub fn semicircle(config: GaugeConfig) -> Self {
        Self::new(ArcLayout::semicircle(), config)
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn layout(&self) -> &ArcLayout {
        &self.layout
    }

    /// Clamps into the configured range; non-finite values fall back to
    /// the range minimum.
    pub fn set_value(&mut self, value: f64) {
        self.config.value = geom::validate(value, self.config.range.0, self.config.range.1);
    }

    /// Replaces the generated percentage label, or restores it with `None`.
    pub fn set_label(&mut self, label: Option<String>) {
        self.config.label = label;
    }

    /// Builds the scene for the current value.
    pub fn render(&self) -> Scene {
        render_gauge(&self.config, &self.layout)
    }

    /// Renders the current value to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.render().to_svg()
    }

    /// Opens a preview window showing the gauge until it is closed.
    pub fn show(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_with(PreviewOptions::default(), None)
    }

    /// Opens a preview window fed by a command channel.
    pub fn show_with_commands(
        &self,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.show_with(PreviewOptions::default(), Some(receiver))
    }

    pub fn show_with(
        &self,
        options: PreviewOptions,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        preview::run(self, options, receiver)
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

fn render_gauge(config: &GaugeConfig, layout: &ArcLayout) -> Scene {
    let (min, max) = config.range;
    let value = geom::validate(config.value, min, max);
    let fraction = geom::fraction_of_range(value, min, max);

    let radius = if layout.inset_by_stroke {
        DIAL_RADIUS - config.track_stroke.max(config.value_stroke) / 2.0
    } else {
        DIAL_RADIUS
    };

    let mut scene = Scene::new(config.size);

    let colors: &[Color] = if config.value_colors.is_empty() {
        DEFAULT_VALUE_COLORS
    } else {
        &config.value_colors
    };
    scene.set_gradient(Gradient::from_colors(VALUE_GRADIENT_ID, colors));

    if layout.clip_to_upper_half {
        scene.set_clip(ClipRect::upper_half());
    }

    match layout.track {
        TrackStyle::FullRing => scene.push(Element::Ring {
            cx: CENTER,
            cy: CENTER,
            radius,
            stroke: Paint::Solid(config.track_color),
            stroke_width: config.track_stroke,
        }),
        TrackStyle::SpanArc => scene.push(Element::Arc {
            segment: ArcSegment::for_span(radius, layout.start_angle, layout.span),
            stroke: Paint::Solid(config.track_color),
            stroke_width: config.track_stroke,
            rounded_cap: true,
            clipped: true,
        }),
    }

    scene.push(Element::Arc {
        segment: ArcSegment::for_fraction(radius, layout.start_angle, layout.span, fraction),
        stroke: Paint::Gradient,
        stroke_width: config.value_stroke,
        rounded_cap: true,
        clipped: true,
    });

    let content = match &config.label {
        Some(label) => label.clone(),
        None => format!("{value}%"),
    };
    scene.push(Element::Label {
        x: CENTER,
        y: CENTER,
        content,
        fill: config.label_color,
        font_size: LABEL_FONT_SIZE,
    });

    scene
}
