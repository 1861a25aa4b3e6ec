/// Shared configuration for SRTM tile conversion

/// Sample value SRTM uses for voids
pub const SRTM_NODATA: i16 = -32768;

/// Samples per side of a 1 arc-second (SRTM1, ~30 m) tile
pub const SRTM1_SIDE: usize = 3601;

/// Samples per side of a 3 arc-second (SRTM3, ~90 m) tile
pub const SRTM3_SIDE: usize = 1201;

/// Kilometres per degree of latitude (and of longitude at the equator)
pub const KM_PER_DEGREE: f64 = 111.32;

/// Smallest height span handed to the sampling pipeline for flat tiles (1 m)
pub const MIN_HEIGHT_SPAN_KM: f64 = 0.001;

/// Rows processed per progress bar tick
pub const ROWS_PER_CHUNK: usize = 64;
