use bevy::prelude::*;

/// Marker for the single 2D camera that views both the foam and page content.
#[derive(Component)]
pub struct FoamCamera;

/// World units equal logical pixels with the default 2D projection, centered
/// on the window, which is what the canvas-to-world mapping assumes.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, FoamCamera));
}
