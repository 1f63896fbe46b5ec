/*

    Print the bounding box of a glTF 1 scene.

    Usage: gltf-extent <scene>.gltf [precision] [--parallel]

    @date: Nov, 2025
    @author: Bartu

*/

use std::{env, path::Path, time::Instant};
use tracing::{info, warn, error};

use gltf_extent::BoundsConfig;
use gltf_extent::bbox::compute_bounding_box_with;
use gltf_extent::gltf::GltfPositions;
use gltf_extent::json_parser::{load_buffers, parse_gltf};
use gltf_extent::rounding::DecimalRounding;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let mut config = BoundsConfig::default();
    let mut positional: Vec<&String> = Vec::new();
    for arg in args.iter().skip(1) {
        if arg == "--parallel" {
            config.parallel = true;
        } else {
            positional.push(arg);
        }
    }

    let gltf_path = match positional.as_slice() {
        [path] => path.as_str(),
        [path, precision] => {
            config.precision = Some(precision.parse().map_err(|e| {
                error!("Invalid precision '{}': {}", precision, e);
                Box::<dyn std::error::Error>::from(format!("invalid precision '{}'", precision))
            })?);
            path.as_str()
        }
        _ => {
            error!("Usage: {} <scene>.gltf [precision] [--parallel]", args[0]);
            std::process::exit(1);
        }
    };
    if config.precision.is_none() {
        warn!("No precision given, values are printed unrounded");
    }

    // Parse glTF
    info!("Loading scene from {}...", gltf_path);
    let start = Instant::now();
    let document = parse_gltf(gltf_path).map_err(|e| {
        error!("Failed to load scene: {}", e);
        Box::<dyn std::error::Error>::from(e)
    })?;
    let base_dir = Path::new(gltf_path).parent().unwrap_or(Path::new("."));
    let buffers = load_buffers(&document, base_dir)?;

    // Compute bounds
    let positions = GltfPositions::new(&document, &buffers);
    let bounds = compute_bounding_box_with(&document.nodes, &positions, &config, &DecimalRounding).map_err(|e| {
        error!("Failed to compute bounds: {}", e);
        Box::<dyn std::error::Error>::from(e)
    })?;
    info!("Bounds of {} took: {:?}", gltf_path, start.elapsed());

    println!("{}", serde_json::to_string_pretty(&bounds)?);
    Ok(())
}
