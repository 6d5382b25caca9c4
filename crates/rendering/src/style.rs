//! Visual tunables for the foam: colors, line weight curve, glow gradient.
//!
//! Kept separate from the simulation profile so the same engine state can be
//! drawn with different looks.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use simulation::config::FoamVariant;

use crate::surface::LineStyle;

/// Maps a closeness value in `[0, 1]` (1 = nearest or tallest) to a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightCurve {
    pub base_alpha: f32,
    pub alpha_gain: f32,
    pub base_width: f32,
    pub width_gain: f32,
}

impl Default for WeightCurve {
    fn default() -> Self {
        Self {
            base_alpha: 0.15,
            alpha_gain: 0.5,
            base_width: 0.5,
            width_gain: 1.5,
        }
    }
}

impl WeightCurve {
    pub fn at(&self, closeness: f32) -> LineStyle {
        let c = closeness.clamp(0.0, 1.0);
        LineStyle {
            alpha: (self.base_alpha + c * self.alpha_gain).clamp(0.0, 1.0),
            width: (self.base_width + c * self.width_gain).max(0.0),
        }
    }
}

/// One stop of the radial glow gradient. `offset` runs from the center (0) to
/// the rim (1); `alpha` is relative to the glow's own intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowStop {
    pub offset: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowStyle {
    pub color: [u8; 3],
    /// Alpha at the center of a glow whose fluctuation is at full amplitude.
    pub peak_alpha: f32,
    /// Fluctuations at or below this amplitude get no glow.
    pub threshold: f32,
    pub stops: Vec<GlowStop>,
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self {
            color: [100, 200, 255],
            peak_alpha: 0.3,
            threshold: 5.0,
            stops: vec![
                GlowStop {
                    offset: 0.0,
                    alpha: 1.0,
                },
                GlowStop {
                    offset: 1.0,
                    alpha: 0.0,
                },
            ],
        }
    }
}

impl GlowStyle {
    /// Gradient alpha at `t` (0 = center, 1 = rim), linear between stops.
    pub fn alpha_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some(first) = self.stops.first() else {
            return 0.0;
        };
        if t <= first.offset {
            return first.alpha;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.alpha;
                }
                return a.alpha + (b.alpha - a.alpha) * (t - a.offset) / span;
            }
        }
        self.stops.last().map_or(0.0, |s| s.alpha)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamStyle {
    pub background: [u8; 3],
    pub line_color: [u8; 3],
    pub weight: WeightCurve,
    pub glow: GlowStyle,
    /// Points projected further than this outside the frame are dropped.
    pub cull_margin: f32,
    /// Opacity of the whole foam layer, multiplied into every line and glow.
    pub opacity: f32,
}

impl Default for FoamStyle {
    fn default() -> Self {
        Self {
            background: [0x1a, 0x1a, 0x2e],
            line_color: [120, 180, 220],
            weight: WeightCurve::default(),
            glow: GlowStyle::default(),
            cull_margin: 100.0,
            opacity: 0.4,
        }
    }
}

impl FoamStyle {
    pub fn for_variant(variant: FoamVariant) -> Self {
        match variant {
            FoamVariant::Header => Self {
                line_color: [100, 150, 200],
                weight: WeightCurve {
                    base_alpha: 0.1,
                    alpha_gain: 0.6,
                    base_width: 0.5,
                    width_gain: 1.0,
                },
                glow: GlowStyle {
                    threshold: 2.0,
                    peak_alpha: 0.25,
                    ..default()
                },
                ..default()
            },
            FoamVariant::Normalized => Self {
                glow: GlowStyle {
                    threshold: 0.05,
                    ..default()
                },
                ..default()
            },
            FoamVariant::Background | FoamVariant::Responsive | FoamVariant::Intro => {
                Self::default()
            }
        }
    }

    pub fn background_color(&self) -> Color {
        let [r, g, b] = self.background;
        Color::srgb_u8(r, g, b)
    }

    fn layer_alpha(&self) -> f32 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Line color; its alpha is the layer opacity.
    pub fn line_srgba(&self) -> Srgba {
        let [r, g, b] = self.line_color;
        Srgba::rgb_u8(r, g, b).with_alpha(self.layer_alpha())
    }

    /// Glow color; its alpha is the layer opacity.
    pub fn glow_srgba(&self) -> Srgba {
        let [r, g, b] = self.glow.color;
        Srgba::rgb_u8(r, g, b).with_alpha(self.layer_alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_curve_matches_depth_fade() {
        let curve = WeightCurve::default();
        let near = curve.at(1.0);
        assert!((near.alpha - 0.65).abs() < 1e-6);
        assert!((near.width - 2.0).abs() < 1e-6);
        let far = curve.at(0.0);
        assert!((far.alpha - 0.15).abs() < 1e-6);
        assert!((far.width - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weight_curve_clamps_input() {
        let curve = WeightCurve::default();
        assert_eq!(curve.at(5.0), curve.at(1.0));
        assert_eq!(curve.at(-3.0), curve.at(0.0));
    }

    #[test]
    fn test_glow_alpha_interpolates_stops() {
        let glow = GlowStyle::default();
        assert_eq!(glow.alpha_at(0.0), 1.0);
        assert!((glow.alpha_at(0.25) - 0.75).abs() < 1e-6);
        assert_eq!(glow.alpha_at(1.0), 0.0);
        assert_eq!(glow.alpha_at(2.0), 0.0);
    }

    #[test]
    fn test_glow_alpha_three_stops() {
        let glow = GlowStyle {
            stops: vec![
                GlowStop {
                    offset: 0.0,
                    alpha: 1.0,
                },
                GlowStop {
                    offset: 0.5,
                    alpha: 0.2,
                },
                GlowStop {
                    offset: 1.0,
                    alpha: 0.0,
                },
            ],
            ..default()
        };
        assert!((glow.alpha_at(0.5) - 0.2).abs() < 1e-6);
        assert!((glow.alpha_at(0.75) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_empty_stops_are_invisible() {
        let glow = GlowStyle {
            stops: Vec::new(),
            ..default()
        };
        assert_eq!(glow.alpha_at(0.3), 0.0);
    }

    #[test]
    fn test_layer_opacity_carried_in_base_colors() {
        let style = FoamStyle::default();
        assert!((style.line_srgba().alpha - 0.4).abs() < 1e-6);
        assert!((style.glow_srgba().alpha - 0.4).abs() < 1e-6);

        let opaque = FoamStyle {
            opacity: 3.0,
            ..default()
        };
        assert_eq!(opaque.line_srgba().alpha, 1.0);
        let broken = FoamStyle {
            opacity: f32::NAN,
            ..default()
        };
        assert_eq!(broken.glow_srgba().alpha, 1.0);
    }

    #[test]
    fn test_style_parses_partial_json() {
        let style: FoamStyle =
            serde_json::from_str(r#"{"line_color":[255,0,0],"glow":{"threshold":1.5}}"#).unwrap();
        assert_eq!(style.line_color, [255, 0, 0]);
        assert_eq!(style.glow.threshold, 1.5);
        assert_eq!(style.background, [0x1a, 0x1a, 0x2e]);
        assert_eq!(style.glow.stops.len(), 2);
        assert_eq!(style.opacity, 0.4);
    }
}
