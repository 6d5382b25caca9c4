//! Mount/resize glue between the host window and the headless engine.
//!
//! The primary window plays the host container: its size feeds
//! `HostContainer`, and its resize events become `ViewportResized`. The
//! `FoamSurface` root entity owns the glow sprites and exists exactly while
//! the driver is mounted.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use simulation::driver::AnimationDriver;
use simulation::viewport::{HostContainer, Viewport, ViewportResized};

/// Root of everything the foam spawns.
#[derive(Component)]
pub struct FoamSurface;

pub fn track_host_container(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut host: ResMut<HostContainer>,
) {
    let next = match windows.get_single() {
        Ok(window) => HostContainer::Present(Viewport::new(window.width(), window.height())),
        Err(_) => HostContainer::Absent,
    };
    host.set_if_neq(next);
}

pub fn forward_window_resize(
    mut resized: EventReader<WindowResized>,
    primary: Query<(), With<PrimaryWindow>>,
    mut out: EventWriter<ViewportResized>,
) {
    for event in resized.read() {
        if primary.contains(event.window) {
            out.send(ViewportResized {
                width: event.width,
                height: event.height,
            });
        }
    }
}

/// Spawn the surface root on mount, despawn it (and every glow under it) on
/// unmount.
pub fn sync_surface(
    mut commands: Commands,
    driver: Res<AnimationDriver>,
    surfaces: Query<Entity, With<FoamSurface>>,
) {
    match (driver.is_mounted(), surfaces.is_empty()) {
        (true, true) => {
            commands.spawn((FoamSurface, Transform::default(), Visibility::default()));
        }
        (false, false) => {
            for entity in &surfaces {
                commands.entity(entity).despawn_recursive();
            }
        }
        _ => {}
    }
}
