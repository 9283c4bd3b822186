//! Tesseroid forward modelling
//!
//! Regional and global gravity models need to account for the curvature of the
//! Earth. Here a single tesseroid with its top at the mean Earth radius is
//! modelled and the downward acceleration is computed on a regular grid 100 km
//! above it.
//!
//! Run with `cargo run --release --example tesseroid`. Set `RUST_LOG=debug`
//! to see per-point discretization counts. A JSON forward configuration can be
//! given as the first argument.

use std::path::Path;

use harmonica::{
    Field, ForwardConfig, Region, Tesseroid, get_ellipsoid, grid_coordinates, tesseroid_gravity,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ForwardConfig::from_json_file(Path::new(&path))?,
        None => ForwardConfig::default(),
    };

    // Default ellipsoid (WGS84) provides the mean Earth radius
    let ellipsoid = get_ellipsoid();
    let mean_radius = ellipsoid.mean_radius();

    // 10 km thick tesseroid with typical crustal density
    let tesseroid = Tesseroid::try_from([
        -70.0,
        -50.0,
        -40.0,
        -20.0,
        mean_radius - 10e3,
        mean_radius,
    ])?;
    let density = 2670.0;

    let region = Region::new(-80.0, -40.0, -50.0, -10.0)?;
    let grid = grid_coordinates(region, (80, 80), mean_radius + 100e3)?;

    let field: Field = "g_r".parse()?;
    let gravity = tesseroid_gravity(&grid.points(), &[tesseroid], &[density], field, &config)?;

    let (rows, columns) = grid.shape();
    let (min, max) = gravity
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &g| (lo.min(g), hi.max(g)));
    info!("Computed {} on a {}x{} grid", field, rows, columns);
    println!("{} (mGal): min = {:.6}, max = {:.6}", field, min, max);

    // Profile along the central parallel of the grid
    let row = rows / 2;
    println!("Profile at latitude {:.3}:", grid.latitude[row]);
    for column in (0..columns).step_by(8) {
        println!(
            "  lon {:8.3}  {:10.6}",
            grid.longitude[column],
            gravity[row * columns + column]
        );
    }
    Ok(())
}
