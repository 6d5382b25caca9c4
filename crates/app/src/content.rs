//! Page content layered over the foam.
//!
//! With an intro configured the headline waits hidden for `RevealContent`;
//! otherwise it is shown straight away.

use bevy::prelude::*;

use rendering::reveal::RevealTarget;
use simulation::config::FoamSettings;

const HEADLINE: &str = "Quantum Foam";
const HEADLINE_SIZE: f32 = 56.0;
const HEADLINE_Z: f32 = 10.0;

#[derive(Component)]
pub struct Headline;

pub fn spawn_headline(mut commands: Commands, settings: Res<FoamSettings>) {
    let rest = Vec3::new(0.0, 0.0, HEADLINE_Z);
    let mut headline = commands.spawn((
        Headline,
        Text2d::new(HEADLINE),
        TextFont {
            font_size: HEADLINE_SIZE,
            ..default()
        },
        TextColor(Color::srgba(0.9, 0.95, 1.0, 0.9)),
        Transform::from_translation(rest),
    ));
    if settings.intro.is_some() {
        headline.insert((RevealTarget::new(rest), Visibility::Hidden));
    } else {
        headline.insert(Visibility::Inherited);
    }
}
