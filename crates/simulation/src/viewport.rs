//! Viewport geometry, grid dimensions and the host container the foam is
//! mounted into.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Logical size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Negative or non-finite sizes collapse to zero.
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Which responsive profile is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

/// Grid resolution. Never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub columns: usize,
    pub rows: usize,
}

impl GridDims {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    #[inline]
    pub fn index(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }
}

/// Container the drawing surface mounts into, as reported by the host.
///
/// `Absent` means there is nowhere to mount; starting the foam is then a
/// silent no-op.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum HostContainer {
    #[default]
    Absent,
    Present(Viewport),
}

impl HostContainer {
    pub fn viewport(&self) -> Option<Viewport> {
        match self {
            HostContainer::Absent => None,
            HostContainer::Present(viewport) => Some(*viewport),
        }
    }
}

/// Delivered by the host whenever the container changes size.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ViewportResized {
    pub width: f32,
    pub height: f32,
}
