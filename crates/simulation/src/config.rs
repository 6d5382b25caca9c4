//! Simulation tunables.
//!
//! A [`FoamProfile`] carries everything the engine needs for one device class.
//! [`FoamSettings`] pairs the desktop profile with an optional mobile profile,
//! the width breakpoint between them, and the optional intro choreography.
//! The built-in presets are exposed through [`FoamVariant`].

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::intro::IntroConfig;
use crate::projection::ProjectionKind;
use crate::viewport::{DeviceClass, GridDims, Viewport};

/// Viewport width (logical pixels) below which the mobile profile applies.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Smallest sigma a fluctuation may have. Keeps the falloff denominator positive.
pub const MIN_SIGMA: f32 = 0.05;

/// Smallest per-tick growth speed. A zero speed would pin a fluctuation forever.
pub const MIN_SPEED: f32 = 1.0e-4;

/// Seed used when settings do not name one.
pub const DEFAULT_SEED: u64 = 42;

/// Closed interval that random parameters are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw uniformly from the range. Degenerate or inverted ranges yield `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn upper(&self) -> f32 {
        self.min.max(self.max)
    }
}

/// How the grid resolution follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridSizing {
    /// Fixed column/row counts; cell spacing stretches with the viewport.
    Fixed { columns: usize, rows: usize },
    /// Fixed cell spacing; column/row counts follow the viewport.
    CellSize { cell_size: f32 },
}

impl GridSizing {
    pub fn dims_for(&self, viewport: Viewport) -> GridDims {
        match *self {
            GridSizing::Fixed { columns, rows } => GridDims::new(columns, rows),
            GridSizing::CellSize { cell_size } => {
                if cell_size <= 0.0 || !cell_size.is_finite() {
                    return GridDims::new(1, 1);
                }
                let columns = (viewport.width / cell_size).ceil() as usize;
                let rows = (viewport.height / cell_size).ceil() as usize;
                GridDims::new(columns, rows)
            }
        }
    }
}

/// Flavour of the static perturbation field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseKind {
    /// Independent uniform value per cell.
    White,
    /// Coherent OpenSimplex2 noise sampled at cell coordinates.
    Simplex { frequency: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub kind: NoiseKind,
    /// Noise values lie in `[-intensity, intensity]`.
    pub intensity: f32,
    /// Per-fluctuation multiplier applied to the noise term.
    pub scale: ValueRange,
}

/// All simulation tunables for one device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamProfile {
    pub grid: GridSizing,
    pub max_fluctuations: usize,
    pub amplitude: ValueRange,
    pub sigma: ValueRange,
    pub speed: ValueRange,
    /// Fade rate as a fraction of the growth rate.
    pub decay_factor: f32,
    /// Bernoulli probability of a spawn attempt per tick.
    pub spawn_probability: f32,
    /// Band (grid units) along the edges where centers are never placed.
    pub edge_buffer: f32,
    /// Cap heights at 1.0 in addition to the floor at 0.
    pub normalized: bool,
    pub noise: Option<NoiseConfig>,
    pub projection: ProjectionKind,
    /// Screen pixels per unit of height.
    pub height_scale: f32,
}

impl Default for FoamProfile {
    fn default() -> Self {
        Self {
            grid: GridSizing::Fixed {
                columns: 50,
                rows: 25,
            },
            max_fluctuations: 8,
            amplitude: ValueRange::new(80.0, 140.0),
            sigma: ValueRange::new(2.0, 5.0),
            speed: ValueRange::new(0.005, 0.015),
            decay_factor: 0.7,
            spawn_probability: 0.03,
            edge_buffer: 0.0,
            normalized: false,
            noise: None,
            projection: ProjectionKind::default(),
            height_scale: 1.0,
        }
    }
}

impl FoamProfile {
    /// Reduced-resolution perspective profile for narrow viewports.
    pub fn mobile_background() -> Self {
        Self {
            grid: GridSizing::Fixed {
                columns: 30,
                rows: 15,
            },
            max_fluctuations: 4,
            amplitude: ValueRange::new(50.0, 90.0),
            sigma: ValueRange::new(1.5, 3.0),
            spawn_probability: 0.02,
            ..default()
        }
    }

    /// Top-down header strip roughened by white noise.
    pub fn header() -> Self {
        Self {
            grid: GridSizing::CellSize { cell_size: 32.0 },
            max_fluctuations: 12,
            amplitude: ValueRange::new(20.0, 60.0),
            sigma: ValueRange::new(1.5, 3.5),
            speed: ValueRange::new(0.01, 0.025),
            decay_factor: 0.5,
            spawn_probability: 0.08,
            edge_buffer: 2.0,
            normalized: false,
            noise: Some(NoiseConfig {
                kind: NoiseKind::White,
                intensity: 0.35,
                scale: ValueRange::new(0.5, 1.5),
            }),
            projection: ProjectionKind::Orthographic,
            height_scale: 1.0,
        }
    }

    /// Mobile header: coarser cells, fewer fluctuations.
    pub fn mobile_header() -> Self {
        Self {
            grid: GridSizing::CellSize { cell_size: 48.0 },
            max_fluctuations: 5,
            spawn_probability: 0.05,
            ..Self::header()
        }
    }

    /// Field-of-view projection with heights normalized to `[0, 1]`.
    pub fn normalized() -> Self {
        Self {
            grid: GridSizing::Fixed {
                columns: 60,
                rows: 30,
            },
            max_fluctuations: 10,
            amplitude: ValueRange::new(0.4, 1.0),
            sigma: ValueRange::new(2.0, 4.0),
            speed: ValueRange::new(0.006, 0.014),
            decay_factor: 0.35,
            spawn_probability: 0.05,
            edge_buffer: 3.0,
            normalized: true,
            noise: Some(NoiseConfig {
                kind: NoiseKind::Simplex { frequency: 0.35 },
                intensity: 0.25,
                scale: ValueRange::new(0.6, 1.2),
            }),
            projection: ProjectionKind::field_of_view(),
            height_scale: 120.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamSettings {
    pub desktop: FoamProfile,
    pub mobile: Option<FoamProfile>,
    pub breakpoint: f32,
    pub intro: Option<IntroConfig>,
    pub seed: u64,
}

impl Default for FoamSettings {
    fn default() -> Self {
        FoamVariant::Background.settings()
    }
}

impl FoamSettings {
    /// Device class for `viewport`. Without a mobile profile everything is desktop.
    pub fn device_class(&self, viewport: Viewport) -> DeviceClass {
        if self.mobile.is_some() && viewport.width < self.breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn profile_for(&self, class: DeviceClass) -> &FoamProfile {
        match class {
            DeviceClass::Mobile => self.mobile.as_ref().unwrap_or(&self.desktop),
            DeviceClass::Desktop => &self.desktop,
        }
    }
}

/// Built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoamVariant {
    /// Full-page perspective background.
    #[default]
    Background,
    /// Top-down header strip.
    Header,
    /// Perspective background that drops to a lighter profile on narrow viewports.
    Responsive,
    /// Responsive background preceded by the intro choreography.
    Intro,
    /// Field-of-view projection, normalized heights and coherent noise.
    Normalized,
}

impl FoamVariant {
    pub const ALL: [FoamVariant; 5] = [
        FoamVariant::Background,
        FoamVariant::Header,
        FoamVariant::Responsive,
        FoamVariant::Intro,
        FoamVariant::Normalized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FoamVariant::Background => "background",
            FoamVariant::Header => "header",
            FoamVariant::Responsive => "responsive",
            FoamVariant::Intro => "intro",
            FoamVariant::Normalized => "normalized",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }

    pub fn settings(self) -> FoamSettings {
        let (desktop, mobile, intro) = match self {
            FoamVariant::Background => (FoamProfile::default(), None, None),
            FoamVariant::Header => (
                FoamProfile::header(),
                Some(FoamProfile::mobile_header()),
                None,
            ),
            FoamVariant::Responsive => (
                FoamProfile::default(),
                Some(FoamProfile::mobile_background()),
                None,
            ),
            FoamVariant::Intro => (
                FoamProfile::default(),
                Some(FoamProfile::mobile_background()),
                Some(IntroConfig::default()),
            ),
            FoamVariant::Normalized => (FoamProfile::normalized(), None, None),
        };
        FoamSettings {
            desktop,
            mobile,
            breakpoint: MOBILE_BREAKPOINT,
            intro,
            seed: DEFAULT_SEED,
        }
    }
}
