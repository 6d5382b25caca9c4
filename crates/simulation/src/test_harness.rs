//! # TestFoam: headless integration test harness
//!
//! Wraps `bevy::app::App` + `MinimalPlugins` + `SimulationPlugin` so the whole
//! driver/engine loop can be exercised without a window or renderer. The host
//! container is simulated by writing `HostContainer` and sending
//! `ViewportResized` the way the rendering crate does from window events.

use bevy::app::App;
use bevy::prelude::*;

use crate::config::{FoamSettings, FoamVariant};
use crate::driver::{AnimationDriver, FoamCommand, FoamSet, ManualStart, RevealContent};
use crate::engine::FoamEngine;
use crate::viewport::{HostContainer, Viewport, ViewportResized};
use crate::SimulationPlugin;

/// Reveal events observed so far, with the engine frame each arrived on.
#[derive(Resource, Default, Debug)]
pub struct RevealLog {
    pub frames: Vec<u64>,
}

fn record_reveals(
    mut reveals: EventReader<RevealContent>,
    engine: Option<Res<FoamEngine>>,
    mut log: ResMut<RevealLog>,
) {
    for _ in reveals.read() {
        let frame = engine.as_ref().map_or(0, |e| e.frame());
        log.frames.push(frame);
    }
}

pub struct TestFoam {
    app: App,
}

impl TestFoam {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A 1280x720 container running the given built-in variant. The first
    /// update has already run, so the engine has ticked once.
    pub fn new(variant: FoamVariant) -> Self {
        Self::with_settings(variant.settings(), Viewport::new(1280.0, 720.0))
    }

    pub fn with_settings(settings: FoamSettings, viewport: Viewport) -> Self {
        Self::build(settings, HostContainer::Present(viewport), false)
    }

    /// No container at all: `Start` must be a silent no-op.
    pub fn without_container(settings: FoamSettings) -> Self {
        Self::build(settings, HostContainer::Absent, false)
    }

    /// Container present but nothing started until a `Start` is sent.
    pub fn manual(settings: FoamSettings, viewport: Viewport) -> Self {
        Self::build(settings, HostContainer::Present(viewport), true)
    }

    fn build(settings: FoamSettings, host: HostContainer, manual: bool) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert BEFORE SimulationPlugin so init_resource keeps these values.
        app.insert_resource(settings);
        app.insert_resource(host);
        if manual {
            app.insert_resource(ManualStart);
        }
        app.add_plugins(SimulationPlugin);
        app.init_resource::<RevealLog>()
            .add_systems(Update, record_reveals.after(FoamSet::Simulate));

        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Run one app update.
    pub fn tick(&mut self) {
        self.app.update();
    }

    pub fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Queue a lifecycle command and run one update to apply it.
    pub fn send(&mut self, command: FoamCommand) {
        self.app.world_mut().send_event(command);
        self.app.update();
    }

    /// Resize the container and run one update.
    pub fn resize(&mut self, width: f32, height: f32) {
        let world = self.app.world_mut();
        world.insert_resource(HostContainer::Present(Viewport::new(width, height)));
        world.send_event(ViewportResized { width, height });
        self.app.update();
    }

    /// Remove the container, as if the host element went away.
    pub fn remove_container(&mut self) {
        self.app.world_mut().insert_resource(HostContainer::Absent);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn engine(&self) -> Option<&FoamEngine> {
        self.app.world().get_resource::<FoamEngine>()
    }

    /// Panics if no engine is mounted.
    pub fn engine_ref(&self) -> &FoamEngine {
        self.engine().expect("foam engine should be mounted")
    }

    pub fn driver(&self) -> &AnimationDriver {
        self.app.world().resource::<AnimationDriver>()
    }

    /// Engine frame number of every reveal so far.
    pub fn reveals(&self) -> &[u64] {
        &self.app.world().resource::<RevealLog>().frames
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
