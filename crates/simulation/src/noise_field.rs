//! Static perturbation field that roughens the height field.
//!
//! Generated once per grid allocation and read-only until the grid is
//! reallocated. White noise draws an independent value per cell from the
//! engine RNG; simplex noise samples OpenSimplex2 seeded from the same RNG.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::Rng;

use crate::config::{NoiseConfig, NoiseKind};
use crate::sim_rng::FoamRng;
use crate::viewport::GridDims;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticNoiseField {
    dims: GridDims,
    values: Vec<f32>,
}

impl StaticNoiseField {
    /// Values lie in `[-intensity, intensity]`.
    pub fn generate(dims: GridDims, config: &NoiseConfig, rng: &mut FoamRng) -> Self {
        let intensity = config.intensity.abs();
        let values = match config.kind {
            NoiseKind::White => (0..dims.cell_count())
                .map(|_| {
                    if intensity > 0.0 {
                        rng.0.gen_range(-intensity..=intensity)
                    } else {
                        0.0
                    }
                })
                .collect(),
            NoiseKind::Simplex { frequency } => {
                let mut noise = FastNoiseLite::with_seed(rng.0.gen::<i32>());
                noise.set_noise_type(Some(NoiseType::OpenSimplex2));
                noise.set_frequency(Some(frequency));
                let mut values = Vec::with_capacity(dims.cell_count());
                for row in 0..dims.rows {
                    for column in 0..dims.columns {
                        let raw = noise.get_noise_2d(column as f32, row as f32);
                        values.push(raw.clamp(-1.0, 1.0) * intensity);
                    }
                }
                values
            }
        };
        Self { dims, values }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> f32 {
        self.values[self.dims.index(column, row)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueRange;

    fn config(kind: NoiseKind, intensity: f32) -> NoiseConfig {
        NoiseConfig {
            kind,
            intensity,
            scale: ValueRange::new(1.0, 1.0),
        }
    }

    #[test]
    fn test_white_noise_bounds_and_size() {
        let dims = GridDims::new(17, 9);
        let field = StaticNoiseField::generate(
            dims,
            &config(NoiseKind::White, 0.4),
            &mut FoamRng::from_seed_u64(1),
        );
        assert_eq!(field.values().len(), 17 * 9);
        assert_eq!(field.dims(), dims);
        for &v in field.values() {
            assert!((-0.4..=0.4).contains(&v), "noise {} out of bounds", v);
        }
    }

    #[test]
    fn test_simplex_noise_bounds_and_size() {
        let dims = GridDims::new(20, 11);
        let field = StaticNoiseField::generate(
            dims,
            &config(NoiseKind::Simplex { frequency: 0.3 }, 0.25),
            &mut FoamRng::from_seed_u64(1),
        );
        assert_eq!(field.values().len(), 20 * 11);
        for &v in field.values() {
            assert!((-0.25..=0.25).contains(&v), "noise {} out of bounds", v);
        }
    }

    #[test]
    fn test_simplex_noise_is_coherent() {
        let dims = GridDims::new(40, 40);
        let field = StaticNoiseField::generate(
            dims,
            &config(NoiseKind::Simplex { frequency: 0.05 }, 1.0),
            &mut FoamRng::from_seed_u64(6),
        );
        // Neighbouring cells at low frequency differ far less than the full range.
        for row in 0..40 {
            for column in 0..39 {
                let d = (field.get(column, row) - field.get(column + 1, row)).abs();
                assert!(d < 0.5, "jump {} between neighbours", d);
            }
        }
    }

    #[test]
    fn test_zero_intensity_is_flat() {
        let field = StaticNoiseField::generate(
            GridDims::new(5, 5),
            &config(NoiseKind::White, 0.0),
            &mut FoamRng::from_seed_u64(1),
        );
        assert!(field.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_same_seed_same_field() {
        let dims = GridDims::new(8, 8);
        let cfg = config(NoiseKind::White, 0.5);
        let a = StaticNoiseField::generate(dims, &cfg, &mut FoamRng::from_seed_u64(77));
        let b = StaticNoiseField::generate(dims, &cfg, &mut FoamRng::from_seed_u64(77));
        assert_eq!(a, b);
    }
}
