//! Grid-to-screen projection.
//!
//! Screen coordinates follow canvas conventions: origin at the top-left,
//! y growing downward. Depth ratio is 0 for the nearest row and approaches 1
//! toward the horizon.

use serde::{Deserialize, Serialize};

use crate::viewport::{GridDims, Viewport};

/// Projection policy, selected per profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Top-down: screen position is grid position times cell size.
    Orthographic,
    /// Rows interpolate from a near baseline up to a horizon line while
    /// columns converge toward the horizontal center.
    Perspective {
        /// Horizon line as a fraction of viewport height from the top.
        horizon: f32,
        /// Nearest row as a fraction of viewport height from the top.
        baseline: f32,
        /// How much column spread shrinks at full depth.
        convergence: f32,
        /// How much height displacement shrinks at full depth.
        height_falloff: f32,
    },
    /// True perspective: `scale = fov / (fov + depth)`.
    FieldOfView {
        fov: f32,
        /// World units between consecutive rows.
        row_spacing: f32,
        horizon: f32,
        baseline: f32,
    },
}

impl Default for ProjectionKind {
    fn default() -> Self {
        ProjectionKind::Perspective {
            horizon: 0.15,
            baseline: 0.95,
            convergence: 0.7,
            height_falloff: 0.8,
        }
    }
}

impl ProjectionKind {
    pub fn field_of_view() -> Self {
        ProjectionKind::FieldOfView {
            fov: 300.0,
            row_spacing: 30.0,
            horizon: 0.3,
            baseline: 0.95,
        }
    }

    pub fn is_perspective(&self) -> bool {
        !matches!(self, ProjectionKind::Orthographic)
    }
}

/// A projected vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth_ratio: f32,
}

/// Projection bound to a viewport and grid resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    kind: ProjectionKind,
    viewport: Viewport,
    dims: GridDims,
    height_scale: f32,
    /// Amplitude at which orthographic glows reach their nominal size.
    reference_amplitude: f32,
}

impl Projector {
    pub fn new(
        kind: ProjectionKind,
        viewport: Viewport,
        dims: GridDims,
        height_scale: f32,
        reference_amplitude: f32,
    ) -> Self {
        Self {
            kind,
            viewport,
            dims,
            height_scale,
            reference_amplitude: reference_amplitude.max(f32::EPSILON),
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_perspective(&self) -> bool {
        self.kind.is_perspective()
    }

    /// Horizontal cell spacing in pixels.
    pub fn cell_width(&self) -> f32 {
        self.viewport.width / self.dims.columns as f32
    }

    /// Depth ratio of a row: `row / rows`.
    pub fn depth_ratio(&self, row: f32) -> f32 {
        match self.kind {
            ProjectionKind::Orthographic => 0.0,
            _ => row / self.dims.rows as f32,
        }
    }

    pub fn project(&self, column: f32, row: f32, height: f32) -> ScreenPoint {
        let w = self.viewport.width;
        let h = self.viewport.height;
        let depth_ratio = self.depth_ratio(row);
        let centered = column - self.dims.columns as f32 / 2.0;
        match self.kind {
            ProjectionKind::Orthographic => {
                let cell_height = h / self.dims.rows as f32;
                ScreenPoint {
                    x: (column + 0.5) * self.cell_width(),
                    y: (row + 0.5) * cell_height,
                    depth_ratio,
                }
            }
            ProjectionKind::Perspective {
                horizon,
                baseline,
                convergence,
                height_falloff,
            } => {
                let horizon_y = h * horizon;
                let base_y = h * baseline;
                let y = base_y + (horizon_y - base_y) * depth_ratio;
                let spread = 1.0 - depth_ratio * convergence;
                let x = w / 2.0 + centered * self.cell_width() * spread;
                let lift = height * self.height_scale * (1.0 - depth_ratio * height_falloff);
                ScreenPoint {
                    x,
                    y: y - lift,
                    depth_ratio,
                }
            }
            ProjectionKind::FieldOfView {
                fov,
                row_spacing,
                horizon,
                baseline,
            } => {
                let scale = fov_scale(fov, row * row_spacing);
                let horizon_y = h * horizon;
                let floor_height = h * (baseline - horizon);
                let x = w / 2.0 + centered * self.cell_width() * scale;
                let y = horizon_y + floor_height * scale - height * self.height_scale * scale;
                ScreenPoint { x, y, depth_ratio }
            }
        }
    }

    /// Glow halo radius for a fluctuation seen at `depth_ratio`.
    pub fn glow_radius(&self, amplitude: f32, sigma: f32, depth_ratio: f32) -> f32 {
        match self.kind {
            ProjectionKind::Orthographic => {
                (amplitude / self.reference_amplitude) * sigma * self.cell_width() * 1.5
            }
            _ => amplitude * self.height_scale * (1.0 - depth_ratio * 0.5) * 2.0,
        }
    }
}

#[inline]
fn fov_scale(fov: f32, depth: f32) -> f32 {
    let denom = fov + depth;
    if denom <= f32::EPSILON {
        1.0
    } else {
        fov / denom
    }
}
