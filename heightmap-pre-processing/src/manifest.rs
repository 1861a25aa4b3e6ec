/// Tile manifest linking the generated heightmaps to their world extent.
use crate::bounds::ElevationBounds;
use crate::coordinates::SrtmTile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use terrain_sampling::MapDataset;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeightmapManifest {
    /// Geographic bounds of the source tile.
    pub tile: SrtmTile,
    /// Raw elevation range in metres, voids excluded.
    pub elevation: ElevationBounds,
    /// Samples per side of the source tile.
    pub source_resolution: usize,
    /// `[width, height]` of the sampled render grid.
    pub grid_resolution: [usize; 2],
    pub files: HeightmapFiles,
    /// Ready-made dataset entry for a terrain config; the heightmap path is
    /// relative to the manifest.
    pub dataset: MapDataset,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeightmapFiles {
    /// 8-bit greyscale PNG of the whole tile.
    pub heightmap_png: String,
    /// R32F texture of the sampled grid, heights normalised to 0-1.
    pub heightmap_dds: String,
}

pub struct ManifestGenerator {
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Write `manifest.json` into the output directory and return its path.
    pub fn write(
        &self,
        manifest: &HeightmapManifest,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let manifest_path = self.output_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, manifest_json)?;

        println!("Generated manifest: {}", manifest_path.display());
        self.print_manifest_summary(manifest);
        Ok(manifest_path)
    }

    fn print_manifest_summary(&self, manifest: &HeightmapManifest) {
        let world = &manifest.dataset.world_size_km;
        println!("Manifest Summary:");
        println!(
            "  Tile {}: lat {:.0} to {:.0}, lon {:.0} to {:.0}",
            manifest.tile.name,
            manifest.tile.south,
            manifest.tile.north,
            manifest.tile.west,
            manifest.tile.east
        );
        println!(
            "  Elevation: {} m to {} m ({} valid samples)",
            manifest.elevation.min, manifest.elevation.max, manifest.elevation.valid_samples
        );
        println!(
            "  World size: {:.2} x {:.2} km, height {:.3} km",
            world[0], world[1], world[2]
        );
        println!(
            "  Grid: {}x{} source, {}x{} sampled",
            manifest.source_resolution,
            manifest.source_resolution,
            manifest.grid_resolution[0],
            manifest.grid_resolution[1]
        );
        println!("  Files: {}, {}", manifest.files.heightmap_png, manifest.files.heightmap_dds);
    }
}

