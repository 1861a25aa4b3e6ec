/// Read-only point and height queries over a finished elevation grid
use std::sync::Arc;

use crate::coordinate::{Coordinate, Point};
use crate::error::Result;
use crate::grid::{ElevationGrid, WorldRect, check_dimensions};

/// Query façade used for marker placement, vegetation and mesh building.
///
/// Holds the grid behind an `Arc`: clones are cheap and queries can run from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct TerrainSampler {
    grid: Arc<ElevationGrid>,
}

impl TerrainSampler {
    pub fn new(grid: ElevationGrid) -> Result<Self> {
        Self::from_shared(Arc::new(grid))
    }

    pub fn from_shared(grid: Arc<ElevationGrid>) -> Result<Self> {
        check_dimensions(grid.width(), grid.height())?;
        Ok(Self { grid })
    }

    pub fn grid(&self) -> &ElevationGrid {
        &self.grid
    }

    pub fn shared_grid(&self) -> Arc<ElevationGrid> {
        Arc::clone(&self.grid)
    }

    pub fn extent(&self) -> WorldRect {
        self.grid.extent()
    }

    /// The grid point nearest to `coordinate`, or `None` when it is off the map.
    ///
    /// Snaps with `round`, so a coordinate up to half a cell outside the grid
    /// still resolves to the edge point.
    pub fn closest_point(&self, coordinate: &Coordinate) -> Option<Point> {
        let extent = self.grid.extent();
        let col = snap(extent.normalize_x(coordinate.world_x), self.grid.width())?;
        let row = snap(extent.normalize_y(coordinate.world_y), self.grid.height())?;
        self.grid.point(row, col)
    }

    /// Smoothly interpolated height (km) at `coordinate`.
    ///
    /// Returns `0.0` off the map, which is indistinguishable from real
    /// sea-level terrain. Callers that must tell the two apart should use
    /// [`TerrainSampler::surface_point`] instead.
    pub fn height_at(&self, coordinate: &Coordinate) -> f64 {
        self.surface_height(coordinate).unwrap_or(0.0)
    }

    /// `coordinate` lifted onto the interpolated surface; `None` off the map.
    pub fn surface_point(&self, coordinate: &Coordinate) -> Option<Point> {
        self.surface_height(coordinate)
            .map(|height| coordinate.with_height(height))
    }

    fn surface_height(&self, coordinate: &Coordinate) -> Option<f64> {
        let extent = self.grid.extent();
        let u = extent.normalize_x(coordinate.world_x);
        let v = extent.normalize_y(coordinate.world_y);
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }
        Some(self.grid.interpolate_uv(u, v))
    }
}

/// Nearest index along an axis of `len` samples; `None` outside `[0, len-1]` or for NaN.
fn snap(t: f64, len: usize) -> Option<usize> {
    let index = (t * (len - 1) as f64).round();
    if index >= 0.0 && index <= (len - 1) as f64 {
        Some(index as usize)
    } else {
        None
    }
}
