//! Live preview window backed by a pixel framebuffer.
//!
//! The preview rasterizes the same [`Scene`] the SVG writer serializes, so
//! what the window shows is what the document describes. Values pushed
//! through a command channel ease toward their target between frames.

use log::{debug, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::{point, Font, PositionedGlyph, Scale};

use std::sync::mpsc::Receiver;
use std::time::Instant;

use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::PreviewOptions;
use crate::geom::{round3, validate, CENTER, VIEW_BOX};
use crate::scene::{Element, GradientStop, Paint, Scene};
use crate::{Gauge, GaugeCommand};

// ============================================================================
// WINDOW LOOP
// ============================================================================

pub(crate) fn run(
    gauge: &Gauge,
    options: PreviewOptions,
    receiver: Option<Receiver<GaugeCommand>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = gauge.config().size.max(1);
    debug!("opening {}x{} preview window", size, size);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&options.title)
        .with_inner_size(LogicalSize::new(f64::from(size), f64::from(size)))
        .with_resizable(false)
        .build(&event_loop)?;

    let window = std::sync::Arc::new(window);
    let window_clone = window.clone();

    let inner = window.inner_size();
    let mut fb_width = inner.width as usize;
    let mut fb_height = inner.height as usize;
    let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
    let mut pixels = Pixels::new(inner.width, inner.height, surface_texture)?;

    let font = load_font(options.font_data.clone());
    let mut state = PreviewState::new(gauge.clone(), &options);

    let frame_duration = std::time::Duration::from_secs_f64(1.0 / options.max_framerate.max(1.0));
    let mut last_frame = Instant::now();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    debug!("framebuffer resized to {}x{}", new_size.width, new_size.height);
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    let _ = pixels.resize_buffer(new_size.width, new_size.height);
                    let _ = pixels.resize_surface(new_size.width, new_size.height);
                }
                WindowEvent::RedrawRequested => {
                    if let Some(ref receiver) = receiver {
                        state.drain_commands(receiver);
                    }
                    state.advance();

                    let scene = state.scene();
                    rasterize(&scene, pixels.frame_mut(), fb_width, fb_height, font.as_ref());
                    let _ = pixels.render();
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn load_font(data: Option<Vec<u8>>) -> Option<Font<'static>> {
    let data = data?;
    match Font::try_from_vec(data) {
        Some(font) => Some(font),
        None => {
            warn!("failed to parse preview font, labels disabled");
            None
        }
    }
}

// ============================================================================
// ANIMATION STATE
// ============================================================================

struct PreviewState {
    gauge: Gauge,
    shown: f64,
    target: f64,
    animate: bool,
    lerp_factor: f64,
}

impl PreviewState {
    fn new(gauge: Gauge, options: &PreviewOptions) -> Self {
        let value = gauge.config().value;
        Self {
            gauge,
            shown: value,
            target: value,
            animate: options.animate,
            lerp_factor: options.lerp_factor,
        }
    }

    fn drain_commands(&mut self, receiver: &Receiver<GaugeCommand>) {
        while let Ok(command) = receiver.try_recv() {
            match command {
                GaugeCommand::SetValue(value) => {
                    let (min, max) = self.gauge.config().range;
                    self.target = validate(value, min, max);
                    debug!("gauge target set to {}", self.target);
                }
                GaugeCommand::SetLabel(label) => {
                    self.gauge.set_label(label);
                }
            }
        }
    }

    fn advance(&mut self) {
        if self.animate {
            self.shown = lerp(self.shown, self.target, self.lerp_factor);
            if (self.shown - self.target).abs() < 1e-3 {
                self.shown = self.target;
            }
        } else {
            self.shown = self.target;
        }
    }

    fn scene(&mut self) -> Scene {
        // Round so the generated percentage label stays short mid-animation.
        self.gauge.set_value(round3(self.shown));
        self.gauge.render()
    }
}

fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

// ============================================================================
// SCENE RASTERIZATION
// ============================================================================

fn rasterize(scene: &Scene, frame: &mut [u8], width: usize, height: usize, font: Option<&Font>) {
    clear(frame, (0xff, 0xff, 0xff));
    if width == 0 || height == 0 {
        return;
    }

    let scale = width.min(height) as f64 / VIEW_BOX;
    let clip_max_y = scene.clip().map(|clip| (clip.y + clip.height) * scale);

    for element in scene.elements() {
        match element {
            Element::Ring {
                cx,
                cy,
                radius,
                stroke,
                stroke_width,
            } => {
                let ink = resolve(stroke, scene);
                draw_arc_band(
                    frame,
                    width,
                    height,
                    cx * scale,
                    cy * scale,
                    radius * scale,
                    stroke_width * scale,
                    0.0,
                    360.0,
                    &ink,
                    None,
                );
            }
            Element::Arc {
                segment,
                stroke,
                stroke_width,
                clipped,
                ..
            } => {
                let ink = resolve(stroke, scene);
                let clip = if *clipped { clip_max_y } else { None };
                draw_arc_band(
                    frame,
                    width,
                    height,
                    CENTER * scale,
                    CENTER * scale,
                    segment.radius * scale,
                    stroke_width * scale,
                    segment.start_angle,
                    segment.sweep(),
                    &ink,
                    clip,
                );
            }
            Element::Label {
                x,
                y,
                content,
                fill,
                font_size,
            } => {
                if let Some(font) = font {
                    draw_text(
                        frame,
                        width,
                        height,
                        (x * scale) as i32,
                        (y * scale) as i32,
                        content,
                        font,
                        Scale::uniform((font_size * scale) as f32),
                        fill.as_tuple(),
                    );
                }
            }
        }
    }
}

/// Stroke paint resolved against the scene's gradient definition.
enum Ink<'a> {
    Solid((u8, u8, u8)),
    Gradient(&'a [GradientStop]),
}

impl Ink<'_> {
    fn at(&self, dx: f64, extent: f64) -> (u8, u8, u8) {
        match self {
            Ink::Solid(color) => *color,
            Ink::Gradient(stops) => {
                let t = if extent > 0.0 {
                    (dx + extent) / (2.0 * extent)
                } else {
                    0.0
                };
                sample_gradient(stops, t * 100.0)
            }
        }
    }
}

fn resolve<'a>(paint: &Paint, scene: &'a Scene) -> Ink<'a> {
    match paint {
        Paint::Solid(color) => Ink::Solid(color.as_tuple()),
        Paint::Gradient => match scene.gradient() {
            Some(gradient) => Ink::Gradient(&gradient.stops),
            None => Ink::Solid((0x00, 0x00, 0x00)),
        },
    }
}

/// Interpolate between the surrounding stops at `pct` percent.
fn sample_gradient(stops: &[GradientStop], pct: f64) -> (u8, u8, u8) {
    match stops {
        [] => (0x00, 0x00, 0x00),
        [only] => only.color.as_tuple(),
        _ => {
            let pct = pct.clamp(0.0, 100.0);
            if pct <= stops[0].offset {
                return stops[0].color.as_tuple();
            }
            for pair in stops.windows(2) {
                let (lo, hi) = (pair[0], pair[1]);
                if pct <= hi.offset {
                    let width = hi.offset - lo.offset;
                    let t = if width > 0.0 { (pct - lo.offset) / width } else { 1.0 };
                    return mix(lo.color.as_tuple(), hi.color.as_tuple(), t);
                }
            }
            stops[stops.len() - 1].color.as_tuple()
        }
    }
}

fn mix(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let channel = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    (channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn clear(frame: &mut [u8], color: (u8, u8, u8)) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
    }
}

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: (u8, u8, u8), alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [color.0 as f32, color.1 as f32, color.2 as f32, 255.0 * alpha];
        let dst = [
            frame[idx] as f32,
            frame[idx + 1] as f32,
            frame[idx + 2] as f32,
            frame[idx + 3] as f32,
        ];
        let a = src[3] / 255.0;
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

fn draw_arc_band(
    frame: &mut [u8],
    width: usize,
    height: usize,
    cx: f64,
    cy: f64,
    radius: f64,
    stroke_width: f64,
    start_angle: f64,
    sweep: f64,
    ink: &Ink,
    clip_max_y: Option<f64>,
) {
    if sweep <= 0.0 || stroke_width <= 0.0 {
        return;
    }
    let outer = radius + stroke_width / 2.0;
    let inner = (radius - stroke_width / 2.0).max(0.0);
    let full_turn = sweep >= 360.0;
    let start = start_angle.rem_euclid(360.0);

    for y in 0..height {
        if let Some(max_y) = clip_max_y {
            // Rows are scanned top to bottom.
            if y as f64 >= max_y {
                break;
            }
        }
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > outer + 1.0 || dist < inner - 1.0 {
                continue;
            }
            if !full_turn {
                let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
                if (angle - start).rem_euclid(360.0) > sweep {
                    continue;
                }
            }
            let aa = if dist > outer {
                1.0 - (dist - outer).min(1.0)
            } else if dist < inner {
                1.0 - (inner - dist).min(1.0)
            } else {
                1.0
            };
            if aa > 0.01 {
                set_pixel(frame, width, x, y, ink.at(dx, outer), aa as f32);
            }
        }
    }
}

fn draw_text(
    frame: &mut [u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;

    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && px < width as i32 && py >= 0 && py < height as i32 {
                    set_pixel(frame, width, px as usize, py as usize, color, v);
                }
            });
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Gauge, GaugeConfig};

    #[test]
    fn lerp_moves_toward_the_target() {
        assert_eq!(lerp(0.0, 100.0, 0.1), 10.0);
        assert_eq!(lerp(50.0, 50.0, 0.1), 50.0);
        assert!(lerp(100.0, 0.0, 0.1) < 100.0);
    }

    #[test]
    fn advance_snaps_when_close_enough() {
        let gauge = Gauge::circle(GaugeConfig::builder().value(0.0).build());
        let mut state = PreviewState::new(gauge, &PreviewOptions::default());
        state.target = 60.0;
        for _ in 0..200 {
            state.advance();
        }
        assert_eq!(state.shown, 60.0);
    }

    #[test]
    fn gradient_midpoint_blends_channels() {
        let stops = [
            GradientStop {
                offset: 0.0,
                color: Color::new(0xff, 0x00, 0x00),
            },
            GradientStop {
                offset: 100.0,
                color: Color::new(0x00, 0x00, 0xff),
            },
        ];
        assert_eq!(sample_gradient(&stops, 50.0), (128, 0, 128));
        assert_eq!(sample_gradient(&stops, -10.0), (255, 0, 0));
        assert_eq!(sample_gradient(&stops, 400.0), (0, 0, 255));
    }

    #[test]
    fn single_stop_gradients_are_flat() {
        let stops = [GradientStop {
            offset: 0.0,
            color: Color::new(0x12, 0x34, 0x56),
        }];
        assert_eq!(sample_gradient(&stops, 0.0), (0x12, 0x34, 0x56));
        assert_eq!(sample_gradient(&stops, 100.0), (0x12, 0x34, 0x56));
    }

    #[test]
    fn rasterize_paints_the_dial() {
        let gauge = Gauge::circle(GaugeConfig::builder().value(50.0).build());
        let scene = gauge.render();
        let mut frame = vec![0u8; 40 * 40 * 4];
        rasterize(&scene, &mut frame, 40, 40, None);

        let painted = frame
            .chunks_exact(4)
            .filter(|px| px[0] != 0xff || px[1] != 0xff || px[2] != 0xff)
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn clip_keeps_the_lower_half_empty() {
        let gauge = Gauge::semicircle(GaugeConfig::builder().value(100.0).build());
        let scene = gauge.render();
        let mut frame = vec![0u8; 40 * 40 * 4];
        rasterize(&scene, &mut frame, 40, 40, None);

        for y in 21..40 {
            for x in 0..40 {
                let idx = (y * 40 + x) * 4;
                assert_eq!(&frame[idx..idx + 3], &[0xff, 0xff, 0xff]);
            }
        }
    }
}
