/// Gaussian smoothing of elevation grid heights
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{Result, TerrainError};
use crate::grid::ElevationGrid;

/// Normalised square Gaussian kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    sigma: f64,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build a `size` x `size` kernel. `size` must be odd, `sigma` positive.
    pub fn new(size: usize, sigma: f64) -> Result<Self> {
        if size % 2 == 0 || !sigma.is_finite() || sigma <= 0.0 {
            return Err(TerrainError::InvalidKernel { size, sigma });
        }

        let radius = (size / 2) as isize;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut weights = Vec::with_capacity(size * size);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist_sq = (dx * dx + dy * dy) as f64;
                weights.push((-dist_sq / two_sigma_sq).exp());
            }
        }

        let sum: f64 = weights.iter().sum();
        for weight in &mut weights {
            *weight /= sum;
        }

        Ok(Self {
            size,
            sigma,
            weights,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights, `size * size` entries summing to 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at offset (dx, dy) from the kernel centre.
    pub fn weight(&self, dx: isize, dy: isize) -> f64 {
        let radius = self.radius() as isize;
        let idx = (dy + radius) as usize * self.size + (dx + radius) as usize;
        self.weights[idx]
    }

    /// Convolve the grid's heights. Samples beyond the border reuse the
    /// nearest edge row/column; X/Y are copied unchanged.
    #[instrument(skip(self, grid), fields(size = self.size, sigma = self.sigma))]
    pub fn apply(&self, grid: &ElevationGrid) -> Result<ElevationGrid> {
        let width = grid.width();
        let height = grid.height();
        let radius = self.radius() as isize;
        let max_col = width as isize - 1;
        let max_row = height as isize - 1;

        let mut zs = vec![0.0; width * height];
        zs.par_chunks_mut(width).enumerate().for_each(|(row, out)| {
            for (col, z) in out.iter_mut().enumerate() {
                let mut acc = 0.0;
                for dy in -radius..=radius {
                    let sy = (row as isize + dy).clamp(0, max_row) as usize;
                    for dx in -radius..=radius {
                        let sx = (col as isize + dx).clamp(0, max_col) as usize;
                        acc += self.weight(dx, dy) * grid.height_at(sy, sx);
                    }
                }
                *z = acc;
            }
        });

        debug!(width, height, "grid smoothed");
        grid.with_heights(zs)
    }
}

/// Smooth `grid` with a fresh `kernel_size` x `kernel_size` Gaussian.
pub fn gaussian_blur(grid: &ElevationGrid, kernel_size: usize, sigma: f64) -> Result<ElevationGrid> {
    GaussianKernel::new(kernel_size, sigma)?.apply(grid)
}
