//! Per-cell height field, recomputed from scratch every frame as the sum of
//! each active fluctuation's Gaussian falloff.

use crate::fluctuation::FluctuationPool;
use crate::noise_field::StaticNoiseField;
use crate::viewport::GridDims;

/// Isotropic Gaussian radial basis: `amplitude * exp(-d^2 / (2 sigma^2))`.
#[inline]
pub fn radial_falloff(distance: f32, amplitude: f32, sigma: f32) -> f32 {
    falloff_sq(distance * distance, amplitude, sigma)
}

#[inline]
fn falloff_sq(distance_sq: f32, amplitude: f32, sigma: f32) -> f32 {
    amplitude * (-distance_sq / (2.0 * sigma * sigma)).exp()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    dims: GridDims,
    values: Vec<f32>,
}

impl HeightField {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            values: vec![0.0; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Row-major heights, `columns * rows` long.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> f32 {
        self.values[self.dims.index(column, row)]
    }

    /// Largest height currently in the field.
    pub fn peak(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Overwrite every cell from the current pool.
    ///
    /// A noise field whose dimensions disagree with the grid is ignored.
    pub fn recompute(
        &mut self,
        pool: &FluctuationPool,
        noise: Option<&StaticNoiseField>,
        normalized: bool,
    ) {
        let noise = noise.filter(|n| n.dims() == self.dims);
        debug_assert_eq!(self.values.len(), self.dims.cell_count());
        let columns = self.dims.columns;
        for (idx, height) in self.values.iter_mut().enumerate() {
            let column = (idx % columns) as f32;
            let row = (idx / columns) as f32;
            let perturbation = noise.map(|n| n.values()[idx]);
            let mut h = 0.0;
            for f in pool.iter() {
                let dx = column - f.x;
                let dz = row - f.z;
                let base = falloff_sq(dx * dx + dz * dz, f.amplitude, f.sigma);
                h += base;
                if let Some(p) = perturbation {
                    h += base * p * f.noise_scale;
                }
            }
            h = h.max(0.0);
            if normalized {
                h = h.min(1.0);
            }
            *height = h;
        }
    }
}
