//! Keyboard lifecycle controls.
//!
//! - Space: start / stop the animation loop
//! - Escape: destroy the foam (surface, listener and pending frame)
//! - Enter: re-initialize after a destroy

use bevy::prelude::*;

use simulation::driver::{AnimationDriver, FoamCommand};

pub fn lifecycle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    driver: Res<AnimationDriver>,
    mut commands: EventWriter<FoamCommand>,
) {
    if keys.just_pressed(KeyCode::Space) {
        commands.send(if driver.is_running() {
            FoamCommand::Stop
        } else {
            FoamCommand::Start
        });
    }
    if keys.just_pressed(KeyCode::Escape) {
        commands.send(FoamCommand::Destroy);
    }
    if keys.just_pressed(KeyCode::Enter) {
        commands.send(FoamCommand::Start);
    }
}
