//! Animation driver: an explicit tagged loop over Bevy's `Update` schedule.
//!
//! Each frame that finds a pending [`FrameHandle`] consumes it, ticks the
//! engine and schedules the next handle. Stopping simply drops the pending
//! handle, so the loop dies on its own at the next frame boundary.

use bevy::prelude::*;

use crate::config::FoamSettings;
use crate::engine::{FoamEngine, ResizeOutcome};
use crate::viewport::{HostContainer, Viewport, ViewportResized};

/// Token for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

#[derive(Resource, Debug, Default)]
pub struct AnimationDriver {
    mounted: bool,
    listening: bool,
    pending: Option<FrameHandle>,
    next_handle: u64,
    frames_run: u64,
}

impl AnimationDriver {
    /// Mount, attach the resize listener and schedule a frame. Returns `false`
    /// when a frame was already pending.
    pub fn start(&mut self) -> bool {
        self.mounted = true;
        self.listening = true;
        if self.pending.is_some() {
            return false;
        }
        self.schedule_next();
        true
    }

    /// Cancel the pending frame. Returns whether one was cancelled.
    pub fn stop(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Stop, unmount and detach the resize listener.
    pub fn destroy(&mut self) {
        self.stop();
        self.mounted = false;
        self.listening = false;
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames ticked since the driver was created.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Consume the pending handle, if any.
    pub fn begin_frame(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        self.frames_run += 1;
        Some(handle)
    }

    pub fn schedule_next(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(handle);
        handle
    }
}

/// Lifecycle requests from the host page or keyboard.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoamCommand {
    Start,
    Stop,
    Destroy,
}

/// Fired exactly once when the intro reaches its reveal.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RevealContent;

/// Marker resource that suppresses the automatic start at `Startup`.
#[derive(Resource)]
pub struct ManualStart;

/// Ordered phases for the foam systems in `Update`.
///
/// Configured as a chain: `Lifecycle` → `Simulate` → `Draw`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FoamSet {
    /// Start/stop/destroy requests and viewport changes.
    Lifecycle,
    /// Engine tick and reveal signalling.
    Simulate,
    /// Anything that reads the engine to put pixels on screen.
    Draw,
}

pub fn request_initial_start(
    manual: Option<Res<ManualStart>>,
    mut commands_out: EventWriter<FoamCommand>,
) {
    if manual.is_none() {
        commands_out.send(FoamCommand::Start);
    }
}

pub fn apply_foam_commands(
    mut commands: Commands,
    mut requests: EventReader<FoamCommand>,
    mut driver: ResMut<AnimationDriver>,
    host: Res<HostContainer>,
    settings: Res<FoamSettings>,
    mut engine: Option<ResMut<FoamEngine>>,
) {
    for request in requests.read() {
        match request {
            FoamCommand::Start => {
                // No container: nothing to mount into.
                let Some(viewport) = host.viewport() else {
                    continue;
                };
                match engine.as_mut() {
                    Some(engine) => {
                        if engine.viewport() != viewport {
                            engine.resize(viewport);
                        }
                    }
                    None => {
                        commands.insert_resource(FoamEngine::new(settings.clone(), viewport));
                    }
                }
                if driver.start() {
                    info!(
                        "Foam: started at {}x{}",
                        viewport.width as u32, viewport.height as u32
                    );
                }
            }
            FoamCommand::Stop => {
                if driver.stop() {
                    info!("Foam: stopped");
                }
            }
            FoamCommand::Destroy => {
                if driver.is_mounted() {
                    info!("Foam: destroyed");
                }
                driver.destroy();
                // Also drops an engine inserted by a Start earlier this frame.
                engine = None;
                commands.remove_resource::<FoamEngine>();
            }
        }
    }
}

/// Apply the latest resize of the frame, if the listener is attached.
pub fn handle_viewport_resize(
    mut resized: EventReader<ViewportResized>,
    driver: Res<AnimationDriver>,
    engine: Option<ResMut<FoamEngine>>,
) {
    let Some(last) = resized.read().last().copied() else {
        return;
    };
    if !driver.is_listening() {
        return;
    }
    let Some(mut engine) = engine else {
        return;
    };
    let outcome = engine.resize(Viewport::new(last.width, last.height));
    if outcome == ResizeOutcome::Reallocated {
        let dims = engine.dims();
        debug!("Foam: resized grid to {}x{}", dims.columns, dims.rows);
    }
}

pub fn tick_engine(mut driver: ResMut<AnimationDriver>, engine: Option<ResMut<FoamEngine>>) {
    let Some(mut engine) = engine else {
        return;
    };
    if driver.begin_frame().is_none() {
        return;
    }
    engine.tick();
    driver.schedule_next();
}

pub fn emit_reveal(engine: Option<ResMut<FoamEngine>>, mut reveals: EventWriter<RevealContent>) {
    if let Some(mut engine) = engine {
        if engine.take_reveal() {
            debug!("Foam: revealing content at frame {}", engine.frame());
            reveals.send(RevealContent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let mut driver = AnimationDriver::default();
        assert!(driver.start());
        let first = driver.pending();
        assert!(!driver.start());
        assert_eq!(driver.pending(), first);
        assert!(driver.is_mounted());
        assert!(driver.is_listening());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut driver = AnimationDriver::default();
        driver.start();
        assert!(driver.stop());
        assert!(!driver.stop());
        assert!(!driver.is_running());
        assert!(driver.is_mounted(), "stop keeps the surface mounted");
    }

    #[test]
    fn test_frame_consumes_and_reschedules() {
        let mut driver = AnimationDriver::default();
        driver.start();
        let handle = driver.begin_frame().unwrap();
        assert!(driver.pending().is_none());
        let next = driver.schedule_next();
        assert_ne!(handle, next);
        assert_eq!(driver.frames_run(), 1);
    }

    #[test]
    fn test_stopped_driver_runs_no_frames() {
        let mut driver = AnimationDriver::default();
        driver.start();
        driver.stop();
        assert!(driver.begin_frame().is_none());
        assert_eq!(driver.frames_run(), 0);
    }

    #[test]
    fn test_destroy_leaves_nothing_behind() {
        let mut driver = AnimationDriver::default();
        driver.start();
        driver.destroy();
        assert!(driver.pending().is_none());
        assert!(!driver.is_mounted());
        assert!(!driver.is_listening());
    }
}
