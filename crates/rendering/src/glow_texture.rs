//! Radial gradient texture shared by every glow sprite.
//!
//! Baked once at startup from the style's gradient stops: white RGB with the
//! gradient in alpha, so the sprite color supplies hue and intensity.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::style::{FoamStyle, GlowStyle};

/// Resolution of the glow texture (pixels per axis).
pub const GLOW_TEX_SIZE: u32 = 128;

#[derive(Resource, Debug, Clone)]
pub struct GlowTexture(pub Handle<Image>);

/// RGBA8 pixels of a `size` x `size` radial gradient.
pub fn bake_glow_pixels(glow: &GlowStyle, size: u32) -> Vec<u8> {
    let size = size.max(1) as usize;
    let radius = size as f32 / 2.0;
    let mut data = vec![0u8; size * size * 4];
    for py in 0..size {
        for px in 0..size {
            let dx = px as f32 + 0.5 - radius;
            let dy = py as f32 + 0.5 - radius;
            let t = (dx * dx + dy * dy).sqrt() / radius;
            let alpha = if t <= 1.0 { glow.alpha_at(t) } else { 0.0 };
            let i = (py * size + px) * 4;
            data[i] = 255;
            data[i + 1] = 255;
            data[i + 2] = 255;
            data[i + 3] = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    data
}

pub fn bake_glow_image(glow: &GlowStyle, size: u32) -> Image {
    let size = size.max(1);
    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        bake_glow_pixels(glow, size),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = bevy::image::ImageSampler::linear();
    image
}

pub fn setup_glow_texture(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    style: Res<FoamStyle>,
) {
    let handle = images.add(bake_glow_image(&style.glow, GLOW_TEX_SIZE));
    commands.insert_resource(GlowTexture(handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(data: &[u8], size: usize, x: usize, y: usize) -> u8 {
        data[(y * size + x) * 4 + 3]
    }

    #[test]
    fn test_glow_pixels_fade_from_center() {
        let size = 64;
        let data = bake_glow_pixels(&GlowStyle::default(), size as u32);
        assert_eq!(data.len(), size * size * 4);
        let center = alpha(&data, size, 32, 32);
        let mid = alpha(&data, size, 48, 32);
        let corner = alpha(&data, size, 0, 0);
        assert!(center > 245, "center alpha {}", center);
        assert!(mid < center && mid > 0);
        assert_eq!(corner, 0);
    }

    #[test]
    fn test_glow_pixels_are_white() {
        let data = bake_glow_pixels(&GlowStyle::default(), 8);
        for px in data.chunks_exact(4) {
            assert_eq!(&px[..3], &[255, 255, 255]);
        }
    }

    #[test]
    fn test_glow_image_dimensions() {
        let image = bake_glow_image(&GlowStyle::default(), 32);
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 32);
    }
}
