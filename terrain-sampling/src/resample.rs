/// Elevation grid resampling with Hermite-smoothed bilinear interpolation
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::grid::{ElevationGrid, WorldRect, check_dimensions, unit_step};
use crate::world_scaling::WorldScaling;

/// Resample `grid` to exactly `target_width` x `target_height` points.
///
/// Each target cell samples the source at the same normalised position, so
/// the four corners land on the source corners exactly. X/Y are recomputed
/// across the source's world rectangle rather than interpolated.
#[instrument(skip(grid), fields(source_width = grid.width(), source_height = grid.height()))]
pub fn resample(
    grid: &ElevationGrid,
    target_width: usize,
    target_height: usize,
) -> Result<ElevationGrid> {
    check_dimensions(target_width, target_height)?;

    let mut zs = vec![0.0; target_width * target_height];
    zs.par_chunks_mut(target_width)
        .enumerate()
        .for_each(|(iy, row)| {
            let v = unit_step(iy, target_height);
            for (ix, z) in row.iter_mut().enumerate() {
                *z = grid.interpolate_uv(unit_step(ix, target_width), v);
            }
        });

    debug!(target_width, target_height, "grid resampled");
    ElevationGrid::from_heights(target_width, target_height, grid.extent(), zs)
}

/// Grid dimensions for an on-screen density of `resolution_per_unit` points
/// per game unit across `rect`. Never below 2 along an axis.
pub fn target_resolution(
    rect: WorldRect,
    scaling: &WorldScaling,
    resolution_per_unit: f64,
) -> (usize, usize) {
    let along = |world_span: f64| {
        let points = (resolution_per_unit * scaling.to_game(world_span)).round();
        if points.is_finite() && points > 2.0 {
            points as usize
        } else {
            2
        }
    };
    (along(rect.size_x), along(rect.size_y))
}
