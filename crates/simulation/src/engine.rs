//! The foam engine: one owned object holding every piece of animation state.
//!
//! Grid, height field and noise field are always reallocated together so their
//! dimensions agree whenever [`FoamEngine::tick`] reads them.

use bevy::prelude::*;

use crate::config::{FoamProfile, FoamSettings};
use crate::fluctuation::FluctuationPool;
use crate::height_field::HeightField;
use crate::intro::IntroSequence;
use crate::noise_field::StaticNoiseField;
use crate::projection::Projector;
use crate::sim_rng::FoamRng;
use crate::viewport::{DeviceClass, GridDims, Viewport};

/// What a viewport change did to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Same device class and same grid resolution.
    Unchanged,
    /// Grid, height field and noise rebuilt at a new resolution.
    Reallocated,
    /// Device class crossed the breakpoint: new profile, pool cleared.
    Reconfigured(DeviceClass),
}

#[derive(Resource, Debug, Clone)]
pub struct FoamEngine {
    settings: FoamSettings,
    device_class: DeviceClass,
    viewport: Viewport,
    dims: GridDims,
    pool: FluctuationPool,
    heights: HeightField,
    noise: Option<StaticNoiseField>,
    intro: Option<IntroSequence>,
    rng: FoamRng,
    frame: u64,
    pending_reveal: bool,
}

impl FoamEngine {
    pub fn new(settings: FoamSettings, viewport: Viewport) -> Self {
        let device_class = settings.device_class(viewport);
        let profile = settings.profile_for(device_class).clone();
        let dims = profile.grid.dims_for(viewport);
        let mut rng = FoamRng::from_seed_u64(settings.seed);
        let noise = generate_noise(&profile, dims, &mut rng);
        let mut pool = FluctuationPool::new(profile.max_fluctuations);

        let mut pending_reveal = false;
        let intro = match settings.intro.clone() {
            Some(config) => {
                let seq = IntroSequence::begin(config, &mut pool, dims);
                // Without room for the heroes the intro is skipped outright.
                pending_reveal = seq.is_none();
                seq
            }
            None => None,
        };

        Self {
            settings,
            device_class,
            viewport,
            dims,
            pool,
            heights: HeightField::new(dims),
            noise,
            intro,
            rng,
            frame: 0,
            pending_reveal,
        }
    }

    pub fn settings(&self) -> &FoamSettings {
        &self.settings
    }

    pub fn profile(&self) -> &FoamProfile {
        self.settings.profile_for(self.device_class)
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn pool(&self) -> &FluctuationPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut FluctuationPool {
        &mut self.pool
    }

    pub fn heights(&self) -> &HeightField {
        &self.heights
    }

    pub fn noise(&self) -> Option<&StaticNoiseField> {
        self.noise.as_ref()
    }

    pub fn intro(&self) -> Option<&IntroSequence> {
        self.intro.as_ref()
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// True while the intro still owns the choreography.
    pub fn in_intro(&self) -> bool {
        self.intro.as_ref().is_some_and(|i| !i.is_steady())
    }

    /// Drain the reveal request raised by the intro. Returns `true` at most once
    /// per engine.
    pub fn take_reveal(&mut self) -> bool {
        std::mem::take(&mut self.pending_reveal)
    }

    pub fn projector(&self) -> Projector {
        let profile = self.profile();
        Projector::new(
            profile.projection,
            self.viewport,
            self.dims,
            profile.height_scale,
            profile.amplitude.upper(),
        )
    }

    /// One animation step: intro choreography, spawn trial, aging, then a full
    /// height field recompute.
    pub fn tick(&mut self) {
        let profile = self.settings.profile_for(self.device_class).clone();

        if let Some(intro) = self.intro.as_mut() {
            if intro.step(&mut self.pool, self.dims, &mut self.rng).reveal {
                self.pending_reveal = true;
            }
        }
        if !self.in_intro() {
            self.pool.try_spawn(&profile, self.dims, &mut self.rng);
        }
        self.pool.tick(profile.decay_factor);
        self.heights
            .recompute(&self.pool, self.noise.as_ref(), profile.normalized);
        self.frame += 1;
    }

    /// Apply a new viewport. Safe to call between any two ticks.
    pub fn resize(&mut self, viewport: Viewport) -> ResizeOutcome {
        self.viewport = viewport;
        let class = self.settings.device_class(viewport);
        if class != self.device_class {
            self.reconfigure(class);
            return ResizeOutcome::Reconfigured(class);
        }
        let dims = self.profile().grid.dims_for(viewport);
        if dims == self.dims {
            return ResizeOutcome::Unchanged;
        }
        self.reallocate(dims);
        ResizeOutcome::Reallocated
    }

    fn reconfigure(&mut self, class: DeviceClass) {
        info!("Foam: switching to {:?} profile", class);
        self.device_class = class;
        if let Some(intro) = self.intro.as_mut() {
            if intro.finish(&mut self.pool) {
                self.pending_reveal = true;
            }
        }
        let capacity = self.profile().max_fluctuations;
        self.pool.reset(capacity);
        let dims = self.profile().grid.dims_for(self.viewport);
        self.reallocate(dims);
    }

    fn reallocate(&mut self, dims: GridDims) {
        debug!(
            "Foam: grid {}x{} -> {}x{}",
            self.dims.columns, self.dims.rows, dims.columns, dims.rows
        );
        let profile = self.settings.profile_for(self.device_class).clone();
        if let Some(intro) = self.intro.as_mut().filter(|i| !i.is_steady()) {
            intro.rescale(&mut self.pool, self.dims, dims);
        }
        self.dims = dims;
        self.heights = HeightField::new(dims);
        self.noise = generate_noise(&profile, dims, &mut self.rng);
        self.heights
            .recompute(&self.pool, self.noise.as_ref(), profile.normalized);
    }
}

fn generate_noise(
    profile: &FoamProfile,
    dims: GridDims,
    rng: &mut FoamRng,
) -> Option<StaticNoiseField> {
    profile
        .noise
        .as_ref()
        .map(|config| StaticNoiseField::generate(dims, config, rng))
}
