/// SRTM tile converter orchestrating heightmap, texture and manifest generation.
use crate::bounds::ElevationBounds;
use crate::constants::MIN_HEIGHT_SPAN_KM;
use crate::coordinates::SrtmTile;
use crate::dds_writer::write_heightmap_dds;
use crate::heightmap::HeightmapGenerator;
use crate::hgt::{ElevationSamples, read_hgt};
use crate::manifest::{HeightmapFiles, HeightmapManifest, ManifestGenerator};
use ::constants::render_settings::GAME_SIZE_LIMIT;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use terrain_sampling::{
    HeightmapImage, MapDataset, SampleWindow, SamplingSettings, WorldScaling, WorldSize,
    build_sampler,
};
use tracing::info;

pub struct HeightmapConverter {
    /// Source `.hgt` tile.
    input_path: PathBuf,
    /// Directory receiving the PNG, DDS and manifest.
    output_dir: PathBuf,
}

impl HeightmapConverter {
    /// Outputs go next to the input unless `output_dir` is given.
    pub fn new(
        input_path: &Path,
        output_dir: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !input_path.is_file() {
            return Err(format!("Input tile does not exist: {}", input_path.display()).into());
        }

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf(),
        };
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_dir,
        })
    }

    pub fn convert(&self) -> Result<HeightmapManifest, Box<dyn std::error::Error>> {
        println!("Converting {}...", self.input_path.display());

        let tile = SrtmTile::from_path(&self.input_path)?;
        let samples = read_hgt(&self.input_path)?;
        self.convert_samples(&tile, &samples)
    }

    /// Run every stage after the tile has been decoded.
    pub fn convert_samples(
        &self,
        tile: &SrtmTile,
        samples: &ElevationSamples,
    ) -> Result<HeightmapManifest, Box<dyn std::error::Error>> {
        info!(tile = %tile.name, side = samples.side, "converting tile");

        let bounds = ElevationBounds::from_samples(&samples.values);
        if bounds.is_empty() {
            return Err(format!("Tile {} contains only voids", tile.name).into());
        }
        self.print_bounds(&bounds);

        let generator = HeightmapGenerator::new(&self.output_dir, &tile.name);
        let png_path = generator.generate(samples, &bounds)?;

        let world_size = world_size_km(tile, &bounds);
        println!(
            "World size: {:.2} x {:.2} km, height span {:.3} km",
            world_size.x, world_size.y, world_size.z
        );

        let (grid_resolution, dds_name) =
            self.generate_sampled_texture(&png_path, world_size, &tile.name)?;

        let png_name = generator.file_name();
        let manifest = HeightmapManifest {
            tile: tile.clone(),
            elevation: bounds,
            source_resolution: samples.side,
            grid_resolution,
            files: HeightmapFiles {
                heightmap_png: png_name.clone(),
                heightmap_dds: dds_name,
            },
            dataset: MapDataset {
                name: tile.name.clone(),
                heightmap: PathBuf::from(png_name),
                world_size_km: [world_size.x, world_size.y, world_size.z],
                window: SampleWindow::default(),
            },
        };
        ManifestGenerator::new(&self.output_dir).write(&manifest)?;

        println!("Conversion complete!");
        Ok(manifest)
    }

    /// Sample the saved PNG the way the game does and store the grid as R32F,
    /// heights normalised over the world height span.
    fn generate_sampled_texture(
        &self,
        png_path: &Path,
        world_size: WorldSize,
        output_name: &str,
    ) -> Result<([usize; 2], String), Box<dyn std::error::Error>> {
        let image = HeightmapImage::open(png_path)?;
        let scaling = WorldScaling::new(world_size, GAME_SIZE_LIMIT)?;
        let sampler = build_sampler(
            &image,
            SampleWindow::default(),
            world_size,
            &scaling,
            &SamplingSettings::default(),
        )?;

        let grid = sampler.grid();
        let data: Vec<f32> = grid
            .heights()
            .par_iter()
            .map(|&z| (z / world_size.z) as f32)
            .collect();

        let dds_name = format!(
            "{}_heightmap_{}x{}.dds",
            output_name,
            grid.width(),
            grid.height()
        );
        write_heightmap_dds(
            &self.output_dir.join(&dds_name),
            grid.width(),
            grid.height(),
            &data,
        )?;
        println!("Saved {} (R32F sampled heightmap)", dds_name);

        Ok(([grid.width(), grid.height()], dds_name))
    }

    fn print_bounds(&self, bounds: &ElevationBounds) {
        println!("Elevation bounds:");
        println!("  Min: {} m", bounds.min);
        println!("  Max: {} m", bounds.max);
        println!("  Valid samples: {}", bounds.valid_samples);
    }
}

/// Ground extent of the tile plus its height span, all in kilometres.
/// Flat tiles get a minimal height span so the world size stays valid.
pub fn world_size_km(tile: &SrtmTile, bounds: &ElevationBounds) -> WorldSize {
    let (x, y) = tile.extent_km();
    let z = (bounds.span() / 1000.0).max(MIN_HEIGHT_SPAN_KM);
    WorldSize::new(x, y, z)
}
