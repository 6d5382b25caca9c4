//! `DrawSurface` backed by Bevy gizmos (lines) and pooled sprites (glows).
//!
//! Gizmo line width is a per-group setting, so strokes are bucketed into three
//! groups whose widths bracket the far/mid/near range of the weight curve.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use simulation::driver::AnimationDriver;
use simulation::engine::FoamEngine;
use simulation::viewport::Viewport;

use crate::glow_texture::GlowTexture;
use crate::mount::FoamSurface;
use crate::renderer::{draw_frame, FrameStats};
use crate::style::FoamStyle;
use crate::surface::{DrawSurface, Glow, Stroke};

/// Z of the glow sprites, above the line gizmos' plane.
const GLOW_Z: f32 = 1.0;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct FarLines;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct MidLines;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct NearLines;

/// Requested stroke width below which a line goes to the far group.
const FAR_MAX_WIDTH: f32 = 1.0;
/// Requested stroke width below which a line goes to the mid group.
const MID_MAX_WIDTH: f32 = 1.5;

pub fn configure_line_groups(mut store: ResMut<GizmoConfigStore>) {
    let (far, _) = store.config_mut::<FarLines>();
    far.line_width = 0.75;
    let (mid, _) = store.config_mut::<MidLines>();
    mid.line_width = 1.25;
    let (near, _) = store.config_mut::<NearLines>();
    near.line_width = 1.75;
}

#[derive(SystemParam)]
pub struct FoamGizmos<'w, 's> {
    far: Gizmos<'w, 's, FarLines>,
    mid: Gizmos<'w, 's, MidLines>,
    near: Gizmos<'w, 's, NearLines>,
}

impl FoamGizmos<'_, '_> {
    fn strip(&mut self, width: f32, points: impl IntoIterator<Item = Vec2>, color: Color) {
        if width < FAR_MAX_WIDTH {
            self.far.linestrip_2d(points, color);
        } else if width < MID_MAX_WIDTH {
            self.mid.linestrip_2d(points, color);
        } else {
            self.near.linestrip_2d(points, color);
        }
    }

    fn segment(&mut self, width: f32, a: Vec2, b: Vec2, color_a: Color, color_b: Color) {
        if width < FAR_MAX_WIDTH {
            self.far.line_gradient_2d(a, b, color_a, color_b);
        } else if width < MID_MAX_WIDTH {
            self.mid.line_gradient_2d(a, b, color_a, color_b);
        } else {
            self.near.line_gradient_2d(a, b, color_a, color_b);
        }
    }
}

/// Glows produced by the last frame, in world coordinates.
#[derive(Resource, Default, Debug)]
pub struct GlowBatch {
    pub glows: Vec<Glow>,
}

/// Pooled glow sprite. Hidden rather than despawned when unused.
#[derive(Component)]
pub struct GlowSprite;

pub struct BevySurface<'a, 'w, 's> {
    gizmos: &'a mut FoamGizmos<'w, 's>,
    glows: &'a mut Vec<Glow>,
    half: Vec2,
    background: Option<Color>,
}

impl<'a, 'w, 's> BevySurface<'a, 'w, 's> {
    pub fn new(
        gizmos: &'a mut FoamGizmos<'w, 's>,
        glows: &'a mut Vec<Glow>,
        viewport: Viewport,
    ) -> Self {
        Self {
            gizmos,
            glows,
            half: Vec2::new(viewport.width, viewport.height) / 2.0,
            background: None,
        }
    }

    fn to_world(&self, p: Vec2) -> Vec2 {
        canvas_to_world(p, self.half)
    }
}

/// Canvas (top-left origin, y down) to 2D world (centered, y up).
#[inline]
pub fn canvas_to_world(p: Vec2, half_extent: Vec2) -> Vec2 {
    Vec2::new(p.x - half_extent.x, half_extent.y - p.y)
}

impl DrawSurface for BevySurface<'_, '_, '_> {
    fn fill_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke, color: Srgba) {
        if points.len() < 2 {
            return;
        }
        match stroke {
            Stroke::Uniform(style) => {
                let world: Vec<Vec2> = points.iter().map(|p| self.to_world(*p)).collect();
                let tint = color.with_alpha(color.alpha * style.alpha);
                self.gizmos.strip(style.width, world, tint.into());
            }
            Stroke::PerVertex(_) => {
                for (i, pair) in points.windows(2).enumerate() {
                    let (Some(sa), Some(sb)) = (stroke.style_at(i), stroke.style_at(i + 1)) else {
                        break;
                    };
                    let a = self.to_world(pair[0]);
                    let b = self.to_world(pair[1]);
                    self.gizmos.segment(
                        (sa.width + sb.width) * 0.5,
                        a,
                        b,
                        color.with_alpha(color.alpha * sa.alpha).into(),
                        color.with_alpha(color.alpha * sb.alpha).into(),
                    );
                }
            }
        }
    }

    fn fill_glow(&mut self, glow: Glow) {
        let center = self.to_world(glow.center);
        self.glows.push(Glow { center, ..glow });
    }
}

pub fn draw_foam(
    driver: Res<AnimationDriver>,
    engine: Option<Res<FoamEngine>>,
    style: Res<FoamStyle>,
    mut gizmos: FoamGizmos,
    mut batch: ResMut<GlowBatch>,
    mut clear: ResMut<ClearColor>,
    mut stats: ResMut<FrameStats>,
) {
    batch.glows.clear();
    let Some(engine) = engine.filter(|_| driver.is_mounted()) else {
        *stats = FrameStats::default();
        return;
    };
    let mut surface = BevySurface::new(&mut gizmos, &mut batch.glows, engine.viewport());
    *stats = draw_frame(&engine, &style, &mut surface);
    if let Some(background) = surface.background {
        if clear.0 != background {
            clear.0 = background;
        }
    }
}

pub fn sync_glow_sprites(
    mut commands: Commands,
    batch: Res<GlowBatch>,
    texture: Option<Res<GlowTexture>>,
    roots: Query<Entity, With<FoamSurface>>,
    mut sprites: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<GlowSprite>>,
) {
    let mut pending = batch.glows.iter();
    for (mut sprite, mut transform, mut visibility) in &mut sprites {
        match pending.next() {
            Some(glow) => {
                sprite.color = glow.color.into();
                sprite.custom_size = Some(Vec2::splat(glow.radius * 2.0));
                transform.translation = glow.center.extend(GLOW_Z);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    let (Some(texture), Ok(root)) = (texture, roots.get_single()) else {
        return;
    };
    for glow in pending {
        let child = commands
            .spawn((
                GlowSprite,
                Sprite {
                    image: texture.0.clone(),
                    color: glow.color.into(),
                    custom_size: Some(Vec2::splat(glow.radius * 2.0)),
                    ..default()
                },
                Transform::from_translation(glow.center.extend(GLOW_Z)),
            ))
            .id();
        commands.entity(root).add_child(child);
    }
}
