/// SRTM tile to terrain heightmap converter main entry point
mod bounds;
mod constants;
mod converter;
mod coordinates;
mod dds_writer;
mod heightmap;
mod hgt;
mod manifest;

use converter::HeightmapConverter;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <input.hgt> [output_dir]", args[0]);
        std::process::exit(1);
    }

    let input_path = Path::new(&args[1]);
    let output_dir = args.get(2).map(Path::new);

    let converter = HeightmapConverter::new(input_path, output_dir)?;
    converter.convert()?;

    Ok(())
}
