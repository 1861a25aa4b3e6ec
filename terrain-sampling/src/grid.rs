/// Row-major elevation grid stored as flat coordinate arrays
use serde::{Deserialize, Serialize};

use crate::coordinate::Point;
use crate::error::{Result, TerrainError};

/// Axis-aligned world rectangle (km) covered by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub min_x: f64,
    pub min_y: f64,
    pub size_x: f64,
    pub size_y: f64,
}

impl WorldRect {
    /// Rectangle anchored at the world origin.
    pub fn from_size(size_x: f64, size_y: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            size_x,
            size_y,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + self.size_x
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.size_y
    }

    /// Normalise a world X to 0-1 across the rectangle
    pub fn normalize_x(&self, world_x: f64) -> f64 {
        (world_x - self.min_x) / self.size_x
    }

    /// Normalise a world Y to 0-1 across the rectangle
    pub fn normalize_y(&self, world_y: f64) -> f64 {
        (world_y - self.min_y) / self.size_y
    }

    pub fn world_x(&self, u: f64) -> f64 {
        self.min_x + u * self.size_x
    }

    pub fn world_y(&self, v: f64) -> f64 {
        self.min_y + v * self.size_y
    }
}

/// Hermite smoothstep `t²(3 - 2t)` applied to interpolation weights.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Position of index `i` along an axis of `n` samples, 0 at the first sample and 1 at the last.
#[inline]
pub(crate) fn unit_step(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        i as f64 / (n - 1) as f64
    }
}

/// Rectangular grid of terrain points; `row` runs along Y, `col` along X.
///
/// Coordinates live in three parallel arrays indexed by `row * width + col`.
/// Grids are never empty and never change after construction: every
/// processing stage returns a new one. Deserializing runs the same shape
/// checks as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    extent: WorldRect,
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl ElevationGrid {
    /// Build a grid whose X/Y positions are spread evenly across `extent`.
    pub fn from_heights(
        width: usize,
        height: usize,
        extent: WorldRect,
        zs: Vec<f64>,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        check_len(width * height, zs.len())?;

        let mut xs = Vec::with_capacity(zs.len());
        let mut ys = Vec::with_capacity(zs.len());
        for row in 0..height {
            let world_y = extent.world_y(unit_step(row, height));
            for col in 0..width {
                xs.push(extent.world_x(unit_step(col, width)));
                ys.push(world_y);
            }
        }

        Ok(Self {
            width,
            height,
            extent,
            xs,
            ys,
            zs,
        })
    }

    /// Build a grid from nested rows of points. Rows must be equally long.
    pub fn from_rows(rows: &[Vec<Point>], extent: WorldRect) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(width, height)?;

        let mut xs = Vec::with_capacity(width * height);
        let mut ys = Vec::with_capacity(width * height);
        let mut zs = Vec::with_capacity(width * height);
        for row in rows {
            check_len(width, row.len())?;
            for point in row {
                xs.push(point.world_x);
                ys.push(point.world_y);
                zs.push(point.world_z);
            }
        }

        Ok(Self {
            width,
            height,
            extent,
            xs,
            ys,
            zs,
        })
    }

    /// Same positions, replaced heights.
    pub fn with_heights(&self, zs: Vec<f64>) -> Result<Self> {
        check_len(self.len(), zs.len())?;
        Ok(Self {
            width: self.width,
            height: self.height,
            extent: self.extent,
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            zs,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn extent(&self) -> WorldRect {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.zs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zs.is_empty()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn heights(&self) -> &[f64] {
        &self.zs
    }

    /// Height at a cell. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn height_at(&self, row: usize, col: usize) -> f64 {
        self.zs[self.index(row, col)]
    }

    pub fn point(&self, row: usize, col: usize) -> Option<Point> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let idx = self.index(row, col);
        Some(Point::from_world(self.xs[idx], self.ys[idx], self.zs[idx]))
    }

    /// Every point in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((&x, &y), &z)| Point::from_world(x, y, z))
    }

    /// Nested `rows[row][col]` view for consumers that want one.
    pub fn to_rows(&self) -> Vec<Vec<Point>> {
        let points: Vec<Point> = self.points().collect();
        points.chunks(self.width).map(<[Point]>::to_vec).collect()
    }

    /// Lowest and highest stored height.
    pub fn height_range(&self) -> (f64, f64) {
        self.zs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &z| {
                (lo.min(z), hi.max(z))
            })
    }

    /// Hermite-smoothed bilinear height at fractional grid indices.
    ///
    /// `col_f`/`row_f` are clamped to the grid; the cell is found with
    /// `floor`, the far neighbour is clamped at the last row/column.
    pub fn interpolate(&self, col_f: f64, row_f: f64) -> f64 {
        let col_f = col_f.clamp(0.0, (self.width - 1) as f64);
        let row_f = row_f.clamp(0.0, (self.height - 1) as f64);

        let x0 = col_f.floor() as usize;
        let y0 = row_f.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let wx = fade(col_f - x0 as f64);
        let wy = fade(row_f - y0 as f64);

        let h00 = self.height_at(y0, x0);
        let h10 = self.height_at(y0, x1);
        let h01 = self.height_at(y1, x0);
        let h11 = self.height_at(y1, x1);

        let top = h00 * (1.0 - wx) + h10 * wx;
        let bottom = h01 * (1.0 - wx) + h11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    /// Interpolated height at normalised grid position (u, v) in 0-1.
    pub fn interpolate_uv(&self, u: f64, v: f64) -> f64 {
        self.interpolate(
            u * (self.width - 1) as f64,
            v * (self.height - 1) as f64,
        )
    }
}

/// Unchecked serde form of [`ElevationGrid`].
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    extent: WorldRect,
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl TryFrom<RawGrid> for ElevationGrid {
    type Error = TerrainError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        check_dimensions(raw.width, raw.height)?;
        let len = raw.width * raw.height;
        check_len(len, raw.xs.len())?;
        check_len(len, raw.ys.len())?;
        check_len(len, raw.zs.len())?;
        Ok(Self {
            width: raw.width,
            height: raw.height,
            extent: raw.extent,
            xs: raw.xs,
            ys: raw.ys,
            zs: raw.zs,
        })
    }
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TerrainError::EmptyGrid { width, height });
    }
    Ok(())
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(TerrainError::GridShapeMismatch { expected, actual });
    }
    Ok(())
}
