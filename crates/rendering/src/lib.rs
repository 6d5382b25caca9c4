use bevy::prelude::*;

pub mod camera;
pub mod gizmo_surface;
pub mod glow_texture;
pub mod mount;
pub mod renderer;
pub mod reveal;
pub mod style;
pub mod surface;

use simulation::driver::FoamSet;

use gizmo_surface::{FarLines, GlowBatch, MidLines, NearLines};
use renderer::FrameStats;
use style::FoamStyle;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FoamStyle>()
            .init_resource::<GlowBatch>()
            .init_resource::<FrameStats>()
            .init_resource::<ClearColor>()
            .init_gizmo_group::<FarLines>()
            .init_gizmo_group::<MidLines>()
            .init_gizmo_group::<NearLines>()
            .add_systems(
                Startup,
                (
                    camera::setup_camera,
                    gizmo_surface::configure_line_groups,
                    glow_texture::setup_glow_texture,
                ),
            )
            .add_systems(
                PreUpdate,
                (mount::track_host_container, mount::forward_window_resize),
            )
            .add_systems(
                Update,
                (
                    mount::sync_surface,
                    gizmo_surface::draw_foam,
                    gizmo_surface::sync_glow_sprites,
                )
                    .chain()
                    .in_set(FoamSet::Draw),
            )
            .add_systems(
                Update,
                (reveal::start_reveal, reveal::animate_reveal)
                    .chain()
                    .after(FoamSet::Simulate),
            );
    }
}
