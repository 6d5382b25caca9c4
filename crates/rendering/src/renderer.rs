//! Draws one frame of foam onto a `DrawSurface`.
//!
//! Grid lines first (every row, then every column), glows on top. Points that
//! project too far outside the frame are dropped from their line and the
//! neighbours either side are joined straight across the gap.

use bevy::prelude::*;

use simulation::engine::FoamEngine;
use simulation::projection::{Projector, ScreenPoint};

use crate::style::FoamStyle;
use crate::surface::{DrawSurface, Glow, LineStyle, Stroke};

/// What the last frame put on the surface.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub polylines: usize,
    pub points: usize,
    pub culled: usize,
    pub glows: usize,
}

/// Frame bounds grown by the cull margin.
#[derive(Debug, Clone, Copy)]
struct CullRect {
    min: Vec2,
    max: Vec2,
}

impl CullRect {
    fn contains(&self, p: &ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Reusable scratch buffers for one line.
#[derive(Default)]
struct LineBuffer {
    points: Vec<Vec2>,
    styles: Vec<LineStyle>,
    /// Style of the line's final grid cell, kept or culled.
    tail: Option<LineStyle>,
}

impl LineBuffer {
    fn clear(&mut self) {
        self.points.clear();
        self.styles.clear();
        self.tail = None;
    }
}

pub fn draw_frame<S: DrawSurface + ?Sized>(
    engine: &FoamEngine,
    style: &FoamStyle,
    surface: &mut S,
) -> FrameStats {
    surface.fill_background(style.background_color());

    let projector = engine.projector();
    let heights = engine.heights();
    let dims = heights.dims();
    let viewport = projector.viewport();
    let margin = style.cull_margin.max(0.0);
    let cull = CullRect {
        min: Vec2::splat(-margin),
        max: Vec2::new(viewport.width + margin, viewport.height + margin),
    };
    let reference = engine.profile().amplitude.upper().max(f32::EPSILON);
    let perspective = projector.is_perspective();
    let line_color = style.line_srgba();

    let mut stats = FrameStats::default();
    let mut line = LineBuffer::default();

    let mut trace = |cells: &mut dyn Iterator<Item = (usize, usize)>,
                     surface: &mut S,
                     stats: &mut FrameStats| {
        line.clear();
        for (column, row) in cells {
            let height = heights.get(column, row);
            let p = projector.project(column as f32, row as f32, height);
            let closeness = if perspective {
                1.0 - p.depth_ratio
            } else {
                height / reference
            };
            let vertex_style = style.weight.at(closeness);
            line.tail = Some(vertex_style);
            if !cull.contains(&p) {
                stats.culled += 1;
                continue;
            }
            line.points.push(Vec2::new(p.x, p.y));
            line.styles.push(vertex_style);
        }
        emit_line(surface, &line, perspective, line_color, stats);
    };

    for row in 0..dims.rows {
        trace(&mut (0..dims.columns).map(|c| (c, row)), surface, &mut stats);
    }
    for column in 0..dims.columns {
        trace(&mut (0..dims.rows).map(|r| (column, r)), surface, &mut stats);
    }

    stats.glows = draw_glows(engine, &projector, style, surface);
    stats
}

fn emit_line<S: DrawSurface + ?Sized>(
    surface: &mut S,
    line: &LineBuffer,
    perspective: bool,
    color: Srgba,
    stats: &mut FrameStats,
) {
    if line.points.len() < 2 {
        return;
    }
    // Perspective lines take one weight: that of the last grid cell, which for
    // a column is its farthest row even when that vertex was culled.
    let stroke = match (perspective, line.tail) {
        (true, Some(tail)) => Stroke::Uniform(tail),
        _ => Stroke::PerVertex(line.styles.clone()),
    };
    surface.stroke_polyline(&line.points, &stroke, color);
    stats.polylines += 1;
    stats.points += line.points.len();
}

fn draw_glows<S: DrawSurface + ?Sized>(
    engine: &FoamEngine,
    projector: &Projector,
    style: &FoamStyle,
    surface: &mut S,
) -> usize {
    let base = style.glow_srgba();
    let mut drawn = 0;
    for f in engine.pool().iter() {
        if f.amplitude <= style.glow.threshold {
            continue;
        }
        let p = projector.project(f.x, f.z, f.amplitude);
        let radius = projector.glow_radius(f.amplitude, f.sigma, p.depth_ratio);
        if radius <= 0.0 || !radius.is_finite() {
            continue;
        }
        let intensity = if f.max_amplitude > 0.0 {
            f.amplitude / f.max_amplitude
        } else {
            0.0
        };
        let alpha = (intensity * style.glow.peak_alpha).clamp(0.0, 1.0);
        surface.fill_glow(Glow {
            center: Vec2::new(p.x, p.y),
            radius,
            color: base.with_alpha(base.alpha * alpha),
        });
        drawn += 1;
    }
    drawn
}
