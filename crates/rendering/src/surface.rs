//! Drawing surface abstraction.
//!
//! The renderer only ever talks to a `DrawSurface`, in canvas coordinates:
//! origin top-left, y growing downward, units are pixels.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub alpha: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stroke {
    /// One style for the whole polyline.
    Uniform(LineStyle),
    /// One style per point, same length as the point list.
    PerVertex(Vec<LineStyle>),
}

impl Stroke {
    /// Style governing vertex `index`.
    pub fn style_at(&self, index: usize) -> Option<LineStyle> {
        match self {
            Stroke::Uniform(style) => Some(*style),
            Stroke::PerVertex(styles) => styles.get(index).copied(),
        }
    }
}

/// Soft radial halo: `color` at the center fading out at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    pub radius: f32,
    pub color: Srgba,
}

pub trait DrawSurface {
    fn fill_background(&mut self, color: Color);

    /// Stroke a connected path through `points`. Fewer than two points draws
    /// nothing. The stroke's alpha is multiplied into `color`'s alpha.
    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke, color: Srgba);

    fn fill_glow(&mut self, glow: Glow);
}

/// Surface that records every call, for tests and frame statistics.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub background: Option<Color>,
    pub polylines: Vec<(Vec<Vec2>, Stroke, Srgba)>,
    pub glows: Vec<Glow>,
}

impl DrawSurface for RecordingSurface {
    fn fill_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke, color: Srgba) {
        self.polylines.push((points.to_vec(), stroke.clone(), color));
    }

    fn fill_glow(&mut self, glow: Glow) {
        self.glows.push(glow);
    }
}
