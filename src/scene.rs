//! Renderer-agnostic description of a rendered gauge.
//!
//! A [`Scene`] is a flat list of stroke/text primitives plus at most one
//! gradient definition and one clip region. The SVG writer lives here; the
//! raster preview interprets the same primitives.

use std::fmt;

use crate::geom::{round3, ArcSegment, CENTER, VIEW_BOX};
use crate::Color;

/// Stroke paint for a track or value arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Solid(Color),
    /// Reference to the scene's gradient definition.
    Gradient,
}

/// One color stop of a linear gradient, offset in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Horizontal linear gradient (left edge to right edge).
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Spread the ordered colors evenly from 0% to 100%. A single color
    /// produces one stop pinned at 0%.
    pub fn from_colors(id: impl Into<String>, colors: &[Color]) -> Self {
        let stops = match colors {
            [] => Vec::new(),
            [only] => vec![GradientStop { offset: 0.0, color: *only }],
            _ => {
                let last = (colors.len() - 1) as f64;
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| GradientStop {
                        offset: round3(i as f64 / last * 100.0),
                        color,
                    })
                    .collect()
            }
        };
        Self { id: id.into(), stops }
    }
}

/// Rectangular clip region.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRect {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRect {
    /// Clip to the upper half of the canvas.
    pub fn upper_half() -> Self {
        Self {
            id: "gauge-clip".to_string(),
            x: 0.0,
            y: 0.0,
            width: VIEW_BOX,
            height: CENTER,
        }
    }
}

/// A single drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Closed background circle (the full-circle gauge track).
    Ring {
        cx: f64,
        cy: f64,
        radius: f64,
        stroke: Paint,
        stroke_width: f64,
    },
    /// Open stroked arc on the dial.
    Arc {
        segment: ArcSegment,
        stroke: Paint,
        stroke_width: f64,
        rounded_cap: bool,
        /// Subject to the scene clip region, when one is set.
        clipped: bool,
    },
    /// Single line of text anchored at its midpoint.
    Label {
        x: f64,
        y: f64,
        content: String,
        fill: Color,
        font_size: f64,
    },
}

/// An ordered collection of primitives making up one gauge drawing.
#[derive(Debug, Clone)]
pub struct Scene {
    size: u32,
    gradient: Option<Gradient>,
    clip: Option<ClipRect>,
    elements: Vec<Element>,
}

impl Scene {
    /// Empty scene rendered at `size` x `size` pixels.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            gradient: None,
            clip: None,
            elements: Vec::new(),
        }
    }

    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.gradient = Some(gradient);
    }

    pub fn set_clip(&mut self, clip: ClipRect) {
        self.clip = Some(clip);
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    pub fn clip(&self) -> Option<&ClipRect> {
        self.clip.as_ref()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    fn write_stroke(&self, f: &mut fmt::Formatter<'_>, paint: &Paint) -> fmt::Result {
        match paint {
            Paint::Solid(color) => write!(f, "{color}"),
            Paint::Gradient => {
                let id = self.gradient.as_ref().map_or("", |g| g.id.as_str());
                write!(f, "url(#{id})")
            }
        }
    }

    fn write_clip_attr(&self, f: &mut fmt::Formatter<'_>, clipped: bool) -> fmt::Result {
        if clipped {
            if let Some(clip) = &self.clip {
                write!(f, r#" clip-path="url(#{})""#, clip.id)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {1} {1}">"#,
            self.size, VIEW_BOX
        )?;

        if self.gradient.is_some() || self.clip.is_some() {
            writeln!(f, "  <defs>")?;
            if let Some(gradient) = &self.gradient {
                writeln!(
                    f,
                    r#"    <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="0%">"#,
                    gradient.id
                )?;
                for stop in &gradient.stops {
                    writeln!(
                        f,
                        r#"      <stop offset="{}%" stop-color="{}"/>"#,
                        stop.offset, stop.color
                    )?;
                }
                writeln!(f, "    </linearGradient>")?;
            }
            if let Some(clip) = &self.clip {
                writeln!(f, r#"    <clipPath id="{}">"#, clip.id)?;
                writeln!(
                    f,
                    r#"      <rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    clip.x, clip.y, clip.width, clip.height
                )?;
                writeln!(f, "    </clipPath>")?;
            }
            writeln!(f, "  </defs>")?;
        }

        for element in &self.elements {
            match element {
                Element::Ring {
                    cx,
                    cy,
                    radius,
                    stroke,
                    stroke_width,
                } => {
                    write!(f, r#"  <circle cx="{cx}" cy="{cy}" r="{radius}" fill="none" stroke=""#)?;
                    self.write_stroke(f, stroke)?;
                    writeln!(f, r#"" stroke-width="{stroke_width}"/>"#)?;
                }
                Element::Arc {
                    segment,
                    stroke,
                    stroke_width,
                    rounded_cap,
                    clipped,
                } => {
                    write!(f, r#"  <path fill="none" stroke=""#)?;
                    self.write_stroke(f, stroke)?;
                    write!(f, r#"" stroke-width="{stroke_width}""#)?;
                    if *rounded_cap {
                        write!(f, r#" stroke-linecap="round""#)?;
                    }
                    self.write_clip_attr(f, *clipped)?;
                    writeln!(f, r#" d="{}"/>"#, segment.to_path())?;
                }
                Element::Label {
                    x,
                    y,
                    content,
                    fill,
                    font_size,
                } => {
                    write!(
                        f,
                        r#"  <text x="{x}" y="{y}" fill="{fill}" text-anchor="middle" font-size="{font_size}">"#
                    )?;
                    write_escaped(f, content)?;
                    writeln!(f, "</text>")?;
                }
            }
        }

        write!(f, "</svg>")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            _ => fmt::Write::write_char(f, ch)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_stops_spread_evenly() {
        let red = Color::new(0xff, 0x00, 0x00);
        let green = Color::new(0x00, 0xff, 0x00);
        let blue = Color::new(0x00, 0x00, 0xff);

        let g = Gradient::from_colors("g", &[red, green, blue]);
        let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 50.0, 100.0]);

        let g = Gradient::from_colors("g", &[red, blue]);
        let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 100.0]);
    }

    #[test]
    fn single_color_gradient_pins_one_stop_at_zero() {
        let g = Gradient::from_colors("g", &[Color::new(0x00, 0x00, 0xff)]);
        assert_eq!(g.stops.len(), 1);
        assert_eq!(g.stops[0].offset, 0.0);
    }

    #[test]
    fn quarter_offsets_round_to_three_decimals() {
        let c = Color::new(0, 0, 0);
        let g = Gradient::from_colors("g", &[c, c, c, c]);
        let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 33.333, 66.667, 100.0]);
    }

    #[test]
    fn empty_scene_is_a_bare_document() {
        let svg = Scene::new(150).to_svg();
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="150" height="150" viewBox="0 0 100 100">"#
        ));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn label_text_is_escaped() {
        let mut scene = Scene::new(100);
        scene.push(Element::Label {
            x: 50.0,
            y: 50.0,
            content: "<a & b>".to_string(),
            fill: Color::new(0x99, 0x99, 0x99),
            font_size: 10.0,
        });
        assert!(scene.to_svg().contains(">&lt;a &amp; b&gt;</text>"));
    }
}
