/// 8-bit greyscale heightmap generation from raw elevation samples
use crate::bounds::ElevationBounds;
use crate::constants::ROWS_PER_CHUNK;
use crate::hgt::ElevationSamples;
use image::GrayImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub struct HeightmapGenerator {
    output_dir: PathBuf,
    output_name: String,
}

impl HeightmapGenerator {
    pub fn new(output_dir: &Path, output_name: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            output_name: output_name.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_heightmap.png", self.output_name)
    }

    /// Normalise the tile onto 0-255 and save it as a PNG. Returns the written path.
    pub fn generate(
        &self,
        samples: &ElevationSamples,
        bounds: &ElevationBounds,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        println!(
            "Creating {}x{} heightmap, elevation {} m to {} m",
            samples.side, samples.side, bounds.min, bounds.max
        );

        let image = normalize_samples(samples, bounds)?;
        let png_path = self.output_dir.join(self.file_name());
        image.save(&png_path)?;

        println!("Saved {} (8-bit greyscale)", png_path.display());
        Ok(png_path)
    }
}

/// Greyscale image of the tile, row 0 at the top.
pub fn normalize_samples(
    samples: &ElevationSamples,
    bounds: &ElevationBounds,
) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let side = samples.side;
    let chunk_len = side * ROWS_PER_CHUNK;
    let total_chunks = samples.values.len().div_ceil(chunk_len);

    let pb = ProgressBar::new(total_chunks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} row chunks ({percent}%) {msg}")?
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message("Normalising elevation");

    let mut pixels = vec![0u8; samples.values.len()];
    pixels
        .par_chunks_mut(chunk_len)
        .zip(samples.values.par_chunks(chunk_len))
        .for_each(|(out, values)| {
            for (pixel, &value) in out.iter_mut().zip(values) {
                *pixel = bounds.normalize_u8(value);
            }
            pb.inc(1);
        });
    pb.finish_with_message("Heightmap normalised");

    GrayImage::from_raw(side as u32, side as u32, pixels)
        .ok_or_else(|| format!("Pixel buffer does not match {}x{} image", side, side).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SRTM_NODATA;

    fn tile() -> ElevationSamples {
        ElevationSamples {
            side: 3,
            values: vec![0, 100, 200, 300, 400, SRTM_NODATA, 600, 700, 800],
        }
    }

    #[test]
    fn pixels_follow_elevation() {
        let samples = tile();
        let bounds = ElevationBounds::from_samples(&samples.values);
        let image = normalize_samples(&samples, &bounds).unwrap();

        assert_eq!(image.dimensions(), (3, 3));
        assert_eq!(image.get_pixel(0, 0).0[0], 0);
        assert_eq!(image.get_pixel(1, 0).0[0], 31);
        assert_eq!(image.get_pixel(2, 1).0[0], 0);
        assert_eq!(image.get_pixel(2, 2).0[0], 255);
    }

    #[test]
    fn generate_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let samples = tile();
        let bounds = ElevationBounds::from_samples(&samples.values);
        let generator = HeightmapGenerator::new(dir.path(), "N00E010");

        let path = generator.generate(&samples, &bounds).unwrap();
        assert_eq!(path, dir.path().join("N00E010_heightmap.png"));

        let reloaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(reloaded, normalize_samples(&samples, &bounds).unwrap());
    }
}
