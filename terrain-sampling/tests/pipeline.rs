use image::GrayImage;
use terrain_sampling::{
    Coordinate, HeightmapImage, SampleWindow, SamplingSettings, TerrainConfig, TerrainSampler,
    WorldScaling, WorldSize, build_dataset, build_elevation_grid, gaussian_blur, resample,
};

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// 4x4 ramp: value = 10 * x + 40 * y.
fn ramp() -> HeightmapImage {
    let red = (0..16u8).map(|i| (i % 4) * 10 + (i / 4) * 40).collect();
    HeightmapImage::from_red_channel(4, 4, red).unwrap()
}

#[test]
fn centred_half_window_covers_central_quadrant() {
    let image = ramp();
    let window = SampleWindow::new(0.5, 0.5, 0.5, 0.5).unwrap();
    let grid = build_elevation_grid(&image, window, WorldSize::new(8.0, 4.0, 1.0)).unwrap();

    let xs = grid.xs();
    let ys = grid.ys();
    let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(close(min_x, 2.0, 1e-12) && close(max_x, 6.0, 1e-12));
    assert!(close(min_y, 1.0, 1e-12) && close(max_y, 3.0, 1e-12));

    // Window corners fall on source pixels (1,1), (2,1), (1,2), (2,2).
    let expected = |x: u32, y: u32| image.value(x, y) as f64 / 255.0;
    assert!(close(grid.height_at(0, 0), expected(1, 1), 1e-12));
    assert!(close(grid.height_at(0, 3), expected(2, 1), 1e-12));
    assert!(close(grid.height_at(3, 0), expected(1, 2), 1e-12));
    assert!(close(grid.height_at(3, 3), expected(2, 2), 1e-12));
}

#[test]
fn resampled_corners_equal_source_corners() {
    let grid = build_elevation_grid(&ramp(), SampleWindow::default(), WorldSize::new(1.0, 1.0, 1.0)).unwrap();
    let big = resample(&grid, 13, 9).unwrap();
    assert_eq!(big.height_at(0, 0), grid.height_at(0, 0));
    assert_eq!(big.height_at(0, 12), grid.height_at(0, 3));
    assert_eq!(big.height_at(8, 0), grid.height_at(3, 0));
    assert_eq!(big.height_at(8, 12), grid.height_at(3, 3));
}

#[test]
fn flat_image_survives_the_whole_pipeline() {
    let image = HeightmapImage::from_red_channel(2, 2, vec![255; 4]).unwrap();
    let scaling = WorldScaling::new(WorldSize::new(10.0, 10.0, 1.0), [10.0, 10.0, 3.0]).unwrap();

    let grid = build_elevation_grid(&image, SampleWindow::default(), scaling.world_size()).unwrap();
    let resampled = resample(&grid, 5, 5).unwrap();
    let smoothed = gaussian_blur(&resampled, 3, 1.0).unwrap();

    assert_eq!(smoothed.width(), 5);
    assert_eq!(smoothed.height(), 5);
    assert!(smoothed.heights().iter().all(|&z| close(z, 1.0, 1e-6)));

    let sampler = TerrainSampler::new(smoothed).unwrap();
    let centre = Coordinate::from_world(5.0, 5.0);
    assert!(close(sampler.height_at(&centre), 1.0, 1e-6));

    let point = sampler.closest_point(&centre).unwrap();
    assert!(close(point.world_x, 5.0, 1e-12));
    let render = point.render_position(&scaling);
    assert!(close(render[1], 3.0, 1e-6));
}

#[test]
fn dataset_switch_loads_png_and_calibrates_scaling() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("slope.png");
    GrayImage::from_fn(8, 4, |x, _| image::Luma([(x * 30) as u8]))
        .save(&png)
        .unwrap();

    let config_path = dir.path().join("terrain.json");
    std::fs::write(
        &config_path,
        r#"{
            "sampling": { "target_resolution": [16, 8], "kernel_size": 1 },
            "datasets": [
                { "name": "slope", "heightmap": "slope.png", "world_size_km": [20.0, 10.0, 2.1] },
                { "name": "east", "heightmap": "slope.png", "world_size_km": [20.0, 10.0, 2.1],
                  "window": { "u_center": 0.75, "v_center": 0.5, "u_span": 0.5, "v_span": 1.0 } }
            ]
        }"#,
    )
    .unwrap();

    let config = TerrainConfig::from_path(&config_path).unwrap();
    let shared = config.shared_scaling().unwrap();

    let (sampler, snapshot) = build_dataset(&config, "slope", &shared).unwrap();
    assert_eq!(snapshot.version, 1);
    assert!(close(snapshot.scaling.world_to_game(), 0.5, 1e-12));
    assert_eq!(sampler.grid().width(), 16);
    // Column 0 is black, column 7 is 210/255 of 2.1 km.
    assert!(close(sampler.height_at(&Coordinate::from_world(0.0, 5.0)), 0.0, 1e-9));
    assert!(close(sampler.height_at(&Coordinate::from_world(20.0, 5.0)), 210.0 / 255.0 * 2.1, 1e-9));

    let (east, snapshot) = build_dataset(&config, "east", &shared).unwrap();
    assert_eq!(snapshot.version, 2);
    assert_eq!(east.extent().min_x, 10.0);
    assert!(close(shared.scaling().world_to_game(), 1.0, 1e-12));
    assert!(east.closest_point(&Coordinate::from_world(2.0, 5.0)).is_none());
}

#[test]
fn default_settings_produce_render_density_grid() {
    let image = HeightmapImage::from_red_channel(3, 3, vec![0, 50, 100, 50, 100, 150, 100, 150, 200]).unwrap();
    let world_size = WorldSize::new(5.0, 5.0, 0.5);
    let scaling = WorldScaling::new(world_size, [10.0, 10.0, 3.0]).unwrap();
    let sampler = terrain_sampling::build_sampler(
        &image,
        SampleWindow::default(),
        world_size,
        &scaling,
        &SamplingSettings::default(),
    )
    .unwrap();
    assert_eq!(sampler.grid().width(), 200);
    assert_eq!(sampler.grid().height(), 200);
}
