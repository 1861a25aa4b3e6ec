/// SRTM `.hgt` elevation tile reader
use crate::constants::{SRTM1_SIDE, SRTM3_SIDE};
use std::fs;
use std::path::Path;

/// Square grid of raw elevation samples in metres, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSamples {
    pub side: usize,
    pub values: Vec<i16>,
}

/// Read an `.hgt` tile from disk.
pub fn read_hgt(path: &Path) -> Result<ElevationSamples, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    parse_hgt(&bytes)
}

/// Decode a tile, inferring SRTM1 or SRTM3 resolution from the byte count.
pub fn parse_hgt(bytes: &[u8]) -> Result<ElevationSamples, Box<dyn std::error::Error>> {
    let side = [SRTM1_SIDE, SRTM3_SIDE]
        .into_iter()
        .find(|side| side * side * 2 == bytes.len())
        .ok_or_else(|| {
            format!(
                "Unexpected .hgt size {} bytes (SRTM1 is {}, SRTM3 is {})",
                bytes.len(),
                SRTM1_SIDE * SRTM1_SIDE * 2,
                SRTM3_SIDE * SRTM3_SIDE * 2
            )
        })?;
    decode_samples(bytes, side)
}

/// Decode `side` x `side` big-endian signed 16-bit samples. Rows are flipped
/// vertically so row 0 is the last row stored in the file.
pub fn decode_samples(
    bytes: &[u8],
    side: usize,
) -> Result<ElevationSamples, Box<dyn std::error::Error>> {
    if side == 0 || bytes.len() != side * side * 2 {
        return Err(format!(
            "Expected {} bytes for a {}x{} tile, got {}",
            side * side * 2,
            side,
            side,
            bytes.len()
        )
        .into());
    }

    let rows: Vec<Vec<i16>> = bytes
        .chunks_exact(side * 2)
        .map(|row| {
            row.chunks_exact(2)
                .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
                .collect()
        })
        .collect();

    let values = rows.into_iter().rev().flatten().collect();
    Ok(ElevationSamples { side, values })
}
