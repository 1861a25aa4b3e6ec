/// Terrain datasets and sampling settings loaded from JSON
use std::fs;
use std::path::{Path, PathBuf};

use constants::render_settings::{
    DEFAULT_KERNEL_SIZE, DEFAULT_RESOLUTION_PER_UNIT, DEFAULT_SIGMA, GAME_SIZE_LIMIT,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::heightmap::SampleWindow;
use crate::world_scaling::{SharedWorldScaling, WorldScaling, WorldSize};

/// How the native heightmap grid is turned into the render grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Grid points per game unit when no explicit target resolution is given.
    pub resolution_per_unit: f64,
    /// Gaussian kernel size; 1 disables smoothing.
    pub kernel_size: usize,
    pub sigma: f64,
    /// Fixed `[width, height]` of the render grid, overriding `resolution_per_unit`.
    pub target_resolution: Option<[usize; 2]>,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            resolution_per_unit: DEFAULT_RESOLUTION_PER_UNIT,
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
            target_resolution: None,
        }
    }
}

/// One selectable map: a heightmap plus the real-world span of the whole image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataset {
    pub name: String,
    pub heightmap: PathBuf,
    /// Kilometres covered by the full source image: `[x, y, height]`.
    pub world_size_km: [f64; 3],
    #[serde(default)]
    pub window: SampleWindow,
}

impl MapDataset {
    pub fn world_size(&self) -> WorldSize {
        WorldSize::from(self.world_size_km)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_game_size_limit")]
    pub game_size_limit: [f64; 3],
    #[serde(default)]
    pub sampling: SamplingSettings,
    pub datasets: Vec<MapDataset>,
}

fn default_game_size_limit() -> [f64; 3] {
    GAME_SIZE_LIMIT
}

impl TerrainConfig {
    /// Load a config file. Relative heightmap paths resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text, path)?;

        if let Some(base) = path.parent() {
            for dataset in &mut config.datasets {
                if dataset.heightmap.is_relative() {
                    dataset.heightmap = base.join(&dataset.heightmap);
                }
            }
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| TerrainError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn dataset(&self, name: &str) -> Option<&MapDataset> {
        self.datasets.iter().find(|dataset| dataset.name == name)
    }

    /// Uncalibrated shared scaling using this config's game bounding box.
    pub fn shared_scaling(&self) -> Result<SharedWorldScaling> {
        Ok(SharedWorldScaling::new(WorldScaling::uncalibrated(
            self.game_size_limit,
        )?))
    }
}
