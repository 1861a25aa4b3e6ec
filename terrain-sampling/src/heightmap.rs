/// Heightmap decoding and windowed sampling into an elevation grid
use std::path::Path;

use constants::texture::{DEFAULT_WINDOW, MAX_CHANNEL_VALUE};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, TerrainError};
use crate::grid::{ElevationGrid, WorldRect, unit_step};
use crate::world_scaling::WorldSize;

/// Decoded heightmap: the red channel of every pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapImage {
    width: u32,
    height: u32,
    red: Vec<u8>,
}

impl HeightmapImage {
    /// Read and decode a heightmap file (any format the `image` crate knows).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TerrainError::ImageDecode {
            source_name: path.display().to_string(),
            source,
        })?;
        Self::from_dynamic(&img)
    }

    /// Decode an in-memory encoded image (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|source| TerrainError::ImageDecode {
            source_name: format!("<{} bytes in memory>", bytes.len()),
            source,
        })?;
        Self::from_dynamic(&img)
    }

    /// Keep only the first channel. Greyscale buffers are used as-is.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        let red = match img {
            DynamicImage::ImageLuma8(luma) => luma.as_raw().clone(),
            other => other.to_rgba8().pixels().map(|pixel| pixel.0[0]).collect(),
        };
        Self::from_red_channel(width, height, red)
    }

    pub fn from_red_channel(width: u32, height: u32, red: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize;
        if red.len() != expected {
            return Err(TerrainError::GridShapeMismatch {
                expected,
                actual: red.len(),
            });
        }
        Ok(Self { width, height, red })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.red[y as usize * self.width as usize + x as usize]
    }

    /// Pixel brightness in 0-1.
    pub fn normalized(&self, x: u32, y: u32) -> f64 {
        self.value(x, y) as f64 / MAX_CHANNEL_VALUE
    }

    /// Nearest pixel to a clamped UV position; edges repeat.
    pub fn sample_nearest(&self, u: f64, v: f64) -> f64 {
        let px = (u.clamp(0.0, 1.0) * (self.width - 1) as f64).round() as u32;
        let py = (v.clamp(0.0, 1.0) * (self.height - 1) as f64).round() as u32;
        self.normalized(px.min(self.width - 1), py.min(self.height - 1))
    }
}

/// Sub-region of the source image to sample: its center and the fraction of
/// the source extent it covers, all in normalised UV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub u_center: f64,
    pub v_center: f64,
    pub u_span: f64,
    pub v_span: f64,
}

impl Default for SampleWindow {
    fn default() -> Self {
        let [u_center, v_center, u_span, v_span] = DEFAULT_WINDOW;
        Self {
            u_center,
            v_center,
            u_span,
            v_span,
        }
    }
}

impl SampleWindow {
    pub fn new(u_center: f64, v_center: f64, u_span: f64, v_span: f64) -> Result<Self> {
        Self {
            u_center,
            v_center,
            u_span,
            v_span,
        }
        .validate()
    }

    pub fn validate(self) -> Result<Self> {
        let center_ok = (0.0..=1.0).contains(&self.u_center) && (0.0..=1.0).contains(&self.v_center);
        let span_ok = self.u_span > 0.0 && self.u_span <= 1.0 && self.v_span > 0.0 && self.v_span <= 1.0;
        if center_ok && span_ok {
            Ok(self)
        } else {
            Err(TerrainError::InvalidWindow {
                u_center: self.u_center,
                v_center: self.v_center,
                u_span: self.u_span,
                v_span: self.v_span,
            })
        }
    }

    pub fn u_start(&self) -> f64 {
        self.u_center - self.u_span / 2.0
    }

    pub fn v_start(&self) -> f64 {
        self.v_center - self.v_span / 2.0
    }

    /// Absolute source UV for window-local (tu, tv), clamped to the image.
    pub fn source_uv(&self, tu: f64, tv: f64) -> (f64, f64) {
        let u = self.u_start() + tu * self.u_span;
        let v = self.v_start() + tv * self.v_span;
        (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
    }

    /// World rectangle the window covers when the full source spans `world_size`.
    pub fn world_rect(&self, world_size: WorldSize) -> WorldRect {
        WorldRect {
            min_x: self.u_start() * world_size.x,
            min_y: self.v_start() * world_size.y,
            size_x: self.u_span * world_size.x,
            size_y: self.v_span * world_size.y,
        }
    }
}

/// Sample `image` through `window` into a grid of the image's dimensions.
///
/// `world_size` is the extent of the whole source image. Heights are the
/// red channel scaled to 0-1 and multiplied by `world_size.z`; X/Y spread
/// evenly across the window's world rectangle.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn build_elevation_grid(
    image: &HeightmapImage,
    window: SampleWindow,
    world_size: WorldSize,
) -> Result<ElevationGrid> {
    let window = window.validate()?;
    let world_size = world_size.validate()?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    let mut zs = Vec::with_capacity(width * height);
    for iy in 0..height {
        let tv = unit_step(iy, height);
        for ix in 0..width {
            let tu = unit_step(ix, width);
            let (u, v) = window.source_uv(tu, tv);
            zs.push(image.sample_nearest(u, v) * world_size.z);
        }
    }

    let extent = window.world_rect(world_size);
    debug!(
        min_x = extent.min_x,
        min_y = extent.min_y,
        size_x = extent.size_x,
        size_y = extent.size_y,
        "heightmap sampled"
    );
    ElevationGrid::from_heights(width, height, extent, zs)
}
