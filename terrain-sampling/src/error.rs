/// Error types raised while building and configuring terrain grids.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to decode heightmap {source_name}: {source}")]
    ImageDecode {
        source_name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("heightmap has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("elevation grid has no points ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid arrays hold {actual} values, expected {expected}")]
    GridShapeMismatch { expected: usize, actual: usize },

    #[error("invalid gaussian kernel: size {size} must be odd, sigma {sigma} must be positive")]
    InvalidKernel { size: usize, sigma: f64 },

    #[error("invalid world size ({x}, {y}, {z}) km: every span must be positive")]
    InvalidWorldSize { x: f64, y: f64, z: f64 },

    #[error("invalid game size limit ({x}, {y}, {z}): every limit must be positive")]
    InvalidGameLimit { x: f64, y: f64, z: f64 },

    #[error(
        "invalid sampling window: center ({u_center}, {v_center}) must lie in [0,1], span ({u_span}, {v_span}) in (0,1]"
    )]
    InvalidWindow {
        u_center: f64,
        v_center: f64,
        u_span: f64,
        v_span: f64,
    },

    #[error("coordinate field `{field}` read before it was set")]
    UninitializedCoordinate { field: &'static str },

    #[error("failed to read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no dataset named `{0}` in config")]
    UnknownDataset(String),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
