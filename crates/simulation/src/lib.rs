use bevy::prelude::*;

pub mod config;
pub mod driver;
pub mod engine;
pub mod fluctuation;
pub mod height_field;
pub mod intro;
pub mod noise_field;
pub mod projection;
pub mod sim_rng;
pub mod viewport;

#[cfg(test)]
pub mod test_harness;

use config::FoamSettings;
use driver::{AnimationDriver, FoamCommand, FoamSet, RevealContent};
use viewport::{HostContainer, ViewportResized};

/// Headless foam engine: settings, driver and engine systems.
///
/// The engine resource itself is created by the first `FoamCommand::Start`
/// that finds a host container, so nothing runs until something mounts.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FoamSettings>()
            .init_resource::<HostContainer>()
            .init_resource::<AnimationDriver>()
            .add_event::<FoamCommand>()
            .add_event::<ViewportResized>()
            .add_event::<RevealContent>()
            .configure_sets(
                Update,
                (FoamSet::Lifecycle, FoamSet::Simulate, FoamSet::Draw).chain(),
            )
            .add_systems(Startup, driver::request_initial_start)
            .add_systems(
                Update,
                (driver::apply_foam_commands, driver::handle_viewport_resize)
                    .chain()
                    .in_set(FoamSet::Lifecycle),
            )
            .add_systems(
                Update,
                (driver::tick_engine, driver::emit_reveal)
                    .chain()
                    .in_set(FoamSet::Simulate),
            );
    }
}
