//! Page content revealed by the intro.
//!
//! Entities tagged with `RevealTarget` start hidden. The first `RevealContent`
//! makes them visible and they rise into their rest position over a short
//! ease-out. Later reveals are ignored.

use bevy::prelude::*;

use simulation::driver::RevealContent;

/// How far below its rest position a target starts rising from.
const DEFAULT_RISE: f32 = 24.0;
const DEFAULT_DURATION_SECS: f32 = 0.8;

#[derive(Component, Debug, Clone)]
pub struct RevealTarget {
    pub rest: Vec3,
    pub rise: f32,
    pub duration_secs: f32,
    elapsed: Option<f32>,
}

impl RevealTarget {
    pub fn new(rest: Vec3) -> Self {
        Self {
            rest,
            rise: DEFAULT_RISE,
            duration_secs: DEFAULT_DURATION_SECS,
            elapsed: None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed.is_some_and(|e| e >= self.duration_secs)
    }

    fn offset_at(&self, elapsed: f32) -> Vec3 {
        let t = if self.duration_secs > 0.0 {
            (elapsed / self.duration_secs).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - t).powi(3);
        Vec3::new(0.0, -self.rise * (1.0 - eased), 0.0)
    }
}

pub fn start_reveal(
    mut reveals: EventReader<RevealContent>,
    mut targets: Query<(&mut RevealTarget, &mut Visibility, &mut Transform)>,
) {
    if reveals.read().count() == 0 {
        return;
    }
    for (mut target, mut visibility, mut transform) in &mut targets {
        if target.is_revealed() {
            continue;
        }
        target.elapsed = Some(0.0);
        *visibility = Visibility::Inherited;
        transform.translation = target.rest + target.offset_at(0.0);
    }
}

pub fn animate_reveal(time: Res<Time>, mut targets: Query<(&mut RevealTarget, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut target, mut transform) in &mut targets {
        let Some(elapsed) = target.elapsed else {
            continue;
        };
        if elapsed >= target.duration_secs {
            continue;
        }
        let elapsed = (elapsed + dt).min(target.duration_secs);
        target.elapsed = Some(elapsed);
        transform.translation = target.rest + target.offset_at(elapsed);
    }
}
