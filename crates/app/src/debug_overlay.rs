//! Debug overlay (F3): engine and renderer counters in an egui window.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use rendering::renderer::FrameStats;
use simulation::driver::AnimationDriver;
use simulation::engine::FoamEngine;
use simulation::viewport::DeviceClass;

#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

pub fn toggle_debug_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    mut visible: ResMut<DebugOverlayVisible>,
) {
    if keys.just_pressed(KeyCode::F3) {
        visible.0 = !visible.0;
    }
}

/// Label/value rows shown by the overlay.
pub fn overlay_rows(
    driver: &AnimationDriver,
    engine: Option<&FoamEngine>,
    stats: &FrameStats,
) -> Vec<(&'static str, String)> {
    let state = if driver.is_running() {
        "running"
    } else if driver.is_mounted() {
        "stopped"
    } else {
        "destroyed"
    };
    let mut rows = vec![("State", state.to_string())];
    if let Some(engine) = engine {
        let dims = engine.dims();
        let viewport = engine.viewport();
        let device = match engine.device_class() {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
        };
        let intro = match engine.intro() {
            Some(intro) => format!("{:?}", intro.phase()),
            None => "off".to_string(),
        };
        rows.push(("Frame", engine.frame().to_string()));
        rows.push((
            "Viewport",
            format!("{:.0} x {:.0} ({device})", viewport.width, viewport.height),
        ));
        rows.push(("Grid", format!("{} x {}", dims.columns, dims.rows)));
        rows.push((
            "Fluctuations",
            format!("{} / {}", engine.pool().len(), engine.pool().capacity()),
        ));
        rows.push(("Intro", intro));
    }
    rows.push((
        "Lines",
        format!(
            "{} ({} points, {} culled)",
            stats.polylines, stats.points, stats.culled
        ),
    ));
    rows.push(("Glows", stats.glows.to_string()));
    rows
}

pub fn debug_overlay_ui(
    mut contexts: EguiContexts,
    mut visible: ResMut<DebugOverlayVisible>,
    driver: Res<AnimationDriver>,
    engine: Option<Res<FoamEngine>>,
    stats: Res<FrameStats>,
) {
    if !visible.0 {
        return;
    }

    let rows = overlay_rows(&driver, engine.as_deref(), &stats);
    let mut open = true;
    egui::Window::new("Quantum Foam")
        .open(&mut open)
        .resizable(false)
        .default_width(240.0)
        .show(contexts.ctx_mut(), |ui| {
            egui::Grid::new("foam_debug_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in &rows {
                        ui.label(*label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
            ui.separator();
            ui.small("Space: start/stop  Esc: destroy  Enter: re-init");
        });

    if !open {
        visible.0 = false;
    }
}
