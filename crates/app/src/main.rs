use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};
use bevy_egui::EguiPlugin;

mod content;
mod controls;
mod debug_overlay;
mod settings;

use debug_overlay::DebugOverlayVisible;

fn main() {
    let (launch, notes) = settings::from_env();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Quantum Foam".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            #[cfg(target_arch = "wasm32")]
            canvas: Some("#quantum-foam-bg".to_string()),
            #[cfg(target_arch = "wasm32")]
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }));

    // Logging is only up once DefaultPlugins is in.
    for note in &notes {
        note.log(launch.variant);
    }
    info!("Quantum foam: '{}' variant", launch.variant.name());

    app.insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    // Settings and style go in before the plugins so their defaults don't win.
    .insert_resource(launch.settings)
    .insert_resource(launch.style)
    .add_plugins((
        simulation::SimulationPlugin,
        rendering::RenderingPlugin,
        EguiPlugin,
    ))
    .init_resource::<DebugOverlayVisible>()
    .add_systems(Startup, content::spawn_headline)
    .add_systems(
        Update,
        (
            controls::lifecycle_keys.before(simulation::driver::FoamSet::Lifecycle),
            debug_overlay::toggle_debug_overlay,
            debug_overlay::debug_overlay_ui.after(simulation::driver::FoamSet::Draw),
        ),
    );

    app.run();
}
