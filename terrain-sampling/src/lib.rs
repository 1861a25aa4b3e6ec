//! Heightmap-to-terrain sampling.
//!
//! A greyscale heightmap is decoded into an [`ElevationGrid`], resampled to the
//! on-screen mesh density, smoothed with a Gaussian kernel and wrapped in a
//! [`TerrainSampler`] that answers point and height queries. Positions are kept
//! in kilometres; [`WorldScaling`] converts them to render ("game") units.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod gaussian;
pub mod grid;
pub mod heightmap;
pub mod pipeline;
pub mod resample;
pub mod sampler;
pub mod world_scaling;

pub use config::{MapDataset, SamplingSettings, TerrainConfig};
pub use coordinate::{Coordinate, CoordinateBuilder, Point};
pub use error::{Result, TerrainError};
pub use gaussian::{GaussianKernel, gaussian_blur};
pub use grid::{ElevationGrid, WorldRect, fade};
pub use heightmap::{HeightmapImage, SampleWindow, build_elevation_grid};
pub use pipeline::{build_dataset, build_sampler};
pub use resample::{resample, target_resolution};
pub use sampler::TerrainSampler;
pub use world_scaling::{ScalingSnapshot, SharedWorldScaling, WorldScaling, WorldSize};
