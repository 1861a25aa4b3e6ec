/// Heightmap to sampler pipeline: load, resample, smooth, wrap
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{SamplingSettings, TerrainConfig};
use crate::error::{Result, TerrainError};
use crate::gaussian::GaussianKernel;
use crate::heightmap::{HeightmapImage, SampleWindow, build_elevation_grid};
use crate::resample::{resample, target_resolution};
use crate::sampler::TerrainSampler;
use crate::world_scaling::{ScalingSnapshot, SharedWorldScaling, WorldScaling, WorldSize};

/// Build a ready sampler from a decoded heightmap.
///
/// The render grid size comes from `settings.target_resolution` when set,
/// otherwise from `settings.resolution_per_unit` and the window's extent in
/// game units under `scaling`. The smoothing kernel is validated even when
/// `kernel_size` is 1 and the blur itself is skipped.
#[instrument(skip(image, scaling, settings), fields(width = image.width(), height = image.height()))]
pub fn build_sampler(
    image: &HeightmapImage,
    window: SampleWindow,
    world_size: WorldSize,
    scaling: &WorldScaling,
    settings: &SamplingSettings,
) -> Result<TerrainSampler> {
    let kernel = GaussianKernel::new(settings.kernel_size, settings.sigma)?;
    let native = build_elevation_grid(image, window, world_size)?;

    let (width, height) = match settings.target_resolution {
        Some([width, height]) => (width, height),
        None => target_resolution(native.extent(), scaling, settings.resolution_per_unit),
    };
    let resampled = resample(&native, width, height)?;

    let smoothed = if kernel.size() == 1 {
        resampled
    } else {
        kernel.apply(&resampled)?
    };

    let (min_height, max_height) = smoothed.height_range();
    info!(
        width,
        height,
        min_height,
        max_height,
        "terrain sampler ready"
    );
    TerrainSampler::new(smoothed)
}

/// Switch to the dataset called `name`: load its heightmap, build the
/// sampler and publish the matching world scaling.
///
/// The scaling fits the sampled window, not the whole source image. It is
/// published only after the sampler was built, so a failed switch leaves the
/// previous map's scaling in place.
pub fn build_dataset(
    config: &TerrainConfig,
    name: &str,
    shared: &SharedWorldScaling,
) -> Result<(TerrainSampler, Arc<ScalingSnapshot>)> {
    let dataset = config
        .dataset(name)
        .ok_or_else(|| TerrainError::UnknownDataset(name.to_string()))?;
    info!(dataset = name, heightmap = %dataset.heightmap.display(), "loading dataset");

    let world_size = dataset.world_size().validate()?;
    let window = dataset.window.validate()?;
    let extent = window.world_rect(world_size);
    let scaling = shared
        .scaling()
        .updated(extent.size_x, extent.size_y, world_size.z)?;

    let image = HeightmapImage::open(&dataset.heightmap)?;
    let sampler = build_sampler(&image, window, world_size, &scaling, &config.sampling)?;

    let snapshot = shared.update_world_scaling(extent.size_x, extent.size_y, world_size.z)?;
    Ok((sampler, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(target: [usize; 2], kernel_size: usize) -> SamplingSettings {
        SamplingSettings {
            target_resolution: Some(target),
            kernel_size,
            ..SamplingSettings::default()
        }
    }

    #[test]
    fn explicit_target_resolution_wins() {
        let image = HeightmapImage::from_red_channel(2, 2, vec![0, 255, 0, 255]).unwrap();
        let sampler = build_sampler(
            &image,
            SampleWindow::default(),
            WorldSize::new(4.0, 4.0, 1.0),
            &WorldScaling::default(),
            &settings([9, 4], 1),
        )
        .unwrap();
        assert_eq!(sampler.grid().width(), 9);
        assert_eq!(sampler.grid().height(), 4);
    }

    #[test]
    fn derived_resolution_uses_game_extent() {
        let image = HeightmapImage::from_red_channel(2, 2, vec![10; 4]).unwrap();
        let world_size = WorldSize::new(20.0, 10.0, 1.0);
        let scaling = WorldScaling::new(world_size, [10.0, 10.0, 3.0]).unwrap();
        let settings = SamplingSettings {
            resolution_per_unit: 2.0,
            ..SamplingSettings::default()
        };
        let sampler =
            build_sampler(&image, SampleWindow::default(), world_size, &scaling, &settings).unwrap();
        assert_eq!(sampler.grid().width(), 20);
        assert_eq!(sampler.grid().height(), 10);
    }

    #[test]
    fn invalid_smoothing_settings_are_rejected() {
        let image = HeightmapImage::from_red_channel(2, 2, vec![0, 255, 0, 255]).unwrap();
        let build = |kernel_size, sigma| {
            let settings = SamplingSettings {
                kernel_size,
                sigma,
                ..SamplingSettings::default()
            };
            build_sampler(
                &image,
                SampleWindow::default(),
                WorldSize::new(4.0, 4.0, 1.0),
                &WorldScaling::default(),
                &settings,
            )
        };

        assert!(matches!(build(0, 1.0), Err(TerrainError::InvalidKernel { size: 0, .. })));
        assert!(matches!(build(0, -3.0), Err(TerrainError::InvalidKernel { .. })));
        assert!(matches!(build(1, -3.0), Err(TerrainError::InvalidKernel { .. })));
        assert!(matches!(build(4, 1.0), Err(TerrainError::InvalidKernel { size: 4, .. })));
        assert!(build(1, 1.0).is_ok());
    }

    #[test]
    fn unknown_dataset_is_reported() {
        let config = TerrainConfig::from_json(r#"{ "datasets": [] }"#).unwrap();
        let shared = config.shared_scaling().unwrap();
        assert!(matches!(
            build_dataset(&config, "nowhere", &shared),
            Err(TerrainError::UnknownDataset(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn failed_load_keeps_previous_scaling() {
        let config = TerrainConfig::from_json(
            r#"{ "datasets": [
                { "name": "gone", "heightmap": "/missing/gone.png", "world_size_km": [5.0, 5.0, 1.0] }
            ] }"#,
        )
        .unwrap();
        let shared = config.shared_scaling().unwrap();
        assert!(matches!(
            build_dataset(&config, "gone", &shared),
            Err(TerrainError::ImageDecode { .. })
        ));
        assert_eq!(shared.snapshot().version, 0);
    }
}
