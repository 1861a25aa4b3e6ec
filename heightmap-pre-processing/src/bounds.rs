/// Elevation range tracking and normalisation
use crate::constants::SRTM_NODATA;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationBounds {
    pub min: i16,
    pub max: i16,
    pub valid_samples: usize,
}

impl ElevationBounds {
    /// Create empty bounds; the first valid sample sets both ends
    pub fn new() -> Self {
        Self {
            min: i16::MAX,
            max: i16::MIN,
            valid_samples: 0,
        }
    }

    /// Update bounds with a sample, skipping voids
    pub fn update(&mut self, value: i16) {
        if value == SRTM_NODATA {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.valid_samples += 1;
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.valid_samples += other.valid_samples;
        self
    }

    /// Bounds over all samples, computed in parallel chunks
    pub fn from_samples(values: &[i16]) -> Self {
        values
            .par_chunks(25_000)
            .map(|chunk| {
                let mut local_bounds = Self::new();
                for &value in chunk {
                    local_bounds.update(value);
                }
                local_bounds
            })
            .reduce(Self::new, Self::merge)
    }

    pub fn is_empty(&self) -> bool {
        self.valid_samples == 0
    }

    /// Height span in metres
    pub fn span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max as f64 - self.min as f64
        }
    }

    /// Map a sample onto 0-255 the way numpy's uint8 cast does (truncation).
    /// Voids and flat tiles map to 0.
    pub fn normalize_u8(&self, value: i16) -> u8 {
        let span = self.span();
        if value == SRTM_NODATA || span <= 0.0 {
            return 0;
        }
        ((value as f64 - self.min as f64) / span * 255.0) as u8
    }
}

impl Default for ElevationBounds {
    fn default() -> Self {
        Self::new()
    }
}
