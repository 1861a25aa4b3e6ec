/// Render-unit bounding box the active map is fitted into (X, Y planar; Z height)
pub const GAME_SIZE_LIMIT: [f64; 3] = [10.0, 10.0, 3.0];

/// Grid points per game unit of the on-screen terrain mesh
pub const DEFAULT_RESOLUTION_PER_UNIT: f64 = 20.0;

/// Gaussian smoothing applied after resampling
pub const DEFAULT_KERNEL_SIZE: usize = 5;
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Scale ratio reported before any map has been selected
pub const UNCALIBRATED_RATIO: f64 = 1.0;
