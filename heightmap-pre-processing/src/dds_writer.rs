use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use std::fs::File;
use std::path::Path;

/// Write a single-channel R32F texture, row-major, `width` x `height`.
pub fn write_heightmap_dds(
    path: &Path,
    width: usize,
    height: usize,
    data: &[f32],
) -> Result<(), Box<dyn std::error::Error>> {
    if data.len() != width * height {
        return Err(format!(
            "Heightmap texture needs {} values for {}x{}, got {}",
            width * height,
            width,
            height,
            data.len()
        )
        .into());
    }

    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &value in data {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    let params = NewDxgiParams {
        height: height as u32,
        width: width as u32,
        depth: None,
        format: DxgiFormat::R32_Float,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params)?;
    dds.data = bytes;
    dds.write(&mut File::create(path)?)?;
    Ok(())
}
