//! Fluctuation pool: bounded set of transient Gaussian bumps.
//!
//! Each fluctuation grows from zero to its max amplitude, flips to fading,
//! and is removed on the tick its amplitude reaches zero. Spawning is a single
//! Bernoulli trial per tick and never pushes the pool past its capacity.

use rand::Rng;

use crate::config::{FoamProfile, ValueRange, MIN_SIGMA, MIN_SPEED};
use crate::sim_rng::FoamRng;
use crate::viewport::GridDims;

/// Stable identifier handed out by the pool, unique for the pool's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FluctuationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Growing,
    Fading,
}

/// Per-instance shape and lifecycle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluctuationParams {
    pub max_amplitude: f32,
    pub sigma: f32,
    pub speed: f32,
    pub noise_scale: f32,
}

impl FluctuationParams {
    /// Draw parameters from the profile's ranges.
    pub fn sample(profile: &FoamProfile, rng: &mut FoamRng) -> Self {
        let noise_scale = profile
            .noise
            .map(|n| n.scale.sample(&mut rng.0))
            .unwrap_or(1.0);
        Self::from_ranges(
            profile.amplitude,
            profile.sigma,
            profile.speed,
            noise_scale,
            rng,
        )
    }

    pub fn from_ranges(
        amplitude: ValueRange,
        sigma: ValueRange,
        speed: ValueRange,
        noise_scale: f32,
        rng: &mut FoamRng,
    ) -> Self {
        Self {
            max_amplitude: amplitude.sample(&mut rng.0),
            sigma: sigma.sample(&mut rng.0),
            speed: speed.sample(&mut rng.0),
            noise_scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fluctuation {
    pub id: FluctuationId,
    /// Center column, continuous grid coordinates.
    pub x: f32,
    /// Center row (depth), continuous grid coordinates.
    pub z: f32,
    pub amplitude: f32,
    pub max_amplitude: f32,
    pub sigma: f32,
    pub phase: Phase,
    pub speed: f32,
    pub noise_scale: f32,
    /// Pinned fluctuations never enter the fading phase.
    pub pinned: bool,
}

impl Fluctuation {
    fn new(id: FluctuationId, x: f32, z: f32, params: FluctuationParams, pinned: bool) -> Self {
        Self {
            id,
            x,
            z,
            amplitude: 0.0,
            max_amplitude: params.max_amplitude.max(0.0),
            sigma: params.sigma.max(MIN_SIGMA),
            phase: Phase::Growing,
            speed: params.speed.max(MIN_SPEED),
            noise_scale: params.noise_scale,
            pinned,
        }
    }

    /// Advance one tick. Returns `false` once the fluctuation has faded out.
    pub fn advance(&mut self, decay_factor: f32) -> bool {
        let step = self.speed * self.max_amplitude;
        if self.pinned {
            self.phase = Phase::Growing;
            self.amplitude = (self.amplitude + step).min(self.max_amplitude);
            return true;
        }
        match self.phase {
            Phase::Growing => {
                self.amplitude += step;
                if self.amplitude >= self.max_amplitude {
                    self.amplitude = self.max_amplitude;
                    self.phase = Phase::Fading;
                }
                true
            }
            Phase::Fading => {
                self.amplitude -= step * decay_factor;
                if self.amplitude <= 0.0 {
                    self.amplitude = 0.0;
                    return false;
                }
                true
            }
        }
    }

    /// Force the fluctuation to its peak.
    pub fn saturate(&mut self) {
        self.amplitude = self.max_amplitude;
    }
}

#[derive(Debug, Clone)]
pub struct FluctuationPool {
    items: Vec<Fluctuation>,
    capacity: usize,
    next_id: u64,
}

impl FluctuationPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fluctuation> {
        self.items.iter()
    }

    pub fn get(&self, id: FluctuationId) -> Option<&Fluctuation> {
        self.items.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: FluctuationId) -> Option<&mut Fluctuation> {
        self.items.iter_mut().find(|f| f.id == id)
    }

    /// Drop every fluctuation and adopt a new capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.items.clear();
        self.capacity = capacity;
    }

    /// Insert a fluctuation at an explicit center. `None` when at capacity.
    pub fn spawn_at(
        &mut self,
        x: f32,
        z: f32,
        params: FluctuationParams,
        pinned: bool,
    ) -> Option<FluctuationId> {
        if self.is_full() {
            return None;
        }
        let id = FluctuationId(self.next_id);
        self.next_id += 1;
        self.items.push(Fluctuation::new(id, x, z, params, pinned));
        Some(id)
    }

    /// Insert a fluctuation with a random center and profile-drawn parameters.
    pub fn spawn(
        &mut self,
        profile: &FoamProfile,
        dims: GridDims,
        rng: &mut FoamRng,
    ) -> Option<FluctuationId> {
        if self.is_full() {
            return None;
        }
        let x = sample_axis(dims.columns as f32, profile.edge_buffer, rng);
        let z = sample_axis(dims.rows as f32, profile.edge_buffer, rng);
        let params = FluctuationParams::sample(profile, rng);
        self.spawn_at(x, z, params, false)
    }

    /// One spawn trial: at most one spawn, with `profile.spawn_probability`.
    pub fn try_spawn(
        &mut self,
        profile: &FoamProfile,
        dims: GridDims,
        rng: &mut FoamRng,
    ) -> Option<FluctuationId> {
        if !rng.chance(profile.spawn_probability) {
            return None;
        }
        self.spawn(profile, dims, rng)
    }

    /// Age every fluctuation once and drop the ones that faded out.
    /// Returns how many were removed.
    pub fn tick(&mut self, decay_factor: f32) -> usize {
        let before = self.items.len();
        self.items.retain_mut(|f| f.advance(decay_factor));
        before - self.items.len()
    }
}

/// Uniform coordinate in `[buffer, extent - buffer)`, or the full extent when
/// the buffer leaves nothing.
fn sample_axis(extent: f32, buffer: f32, rng: &mut FoamRng) -> f32 {
    let buffer = buffer.max(0.0);
    let (lo, hi) = if extent - 2.0 * buffer > 0.0 {
        (buffer, extent - buffer)
    } else {
        (0.0, extent)
    };
    if hi > lo {
        rng.0.gen_range(lo..hi)
    } else {
        lo
    }
}
