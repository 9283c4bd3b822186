//! Sample datasets
//!
//! Loaders for the gravity, topography and magnetic sample data kept in the
//! local cache. Every loader checks the file against its fixture contract.

pub mod cache;
pub mod contract;
pub mod parser;
pub mod types;

pub use cache::SampleDataCache;
pub use parser::DatasetError;
pub use types::{GridDataset, LineType, MagneticSurvey, SampleDataset};

use tracing::info;

/// Gravity of the Earth (mGal) on a 0.5 degree grid at 10 km above the ellipsoid
///
/// Variables: `gravity`, `height_over_ell`.
pub fn fetch_gravity_earth(cache: &SampleDataCache) -> Result<GridDataset, anyhow::Error> {
    load_grid(cache, SampleDataset::GravityEarth, &contract::GRAVITY_EARTH)
}

/// ETOPO1 topography and bathymetry (m) on a 0.5 degree grid
///
/// Variables: `topography`.
pub fn fetch_topography_earth(cache: &SampleDataCache) -> Result<GridDataset, anyhow::Error> {
    load_grid(cache, SampleDataset::TopographyEarth, &contract::TOPOGRAPHY_EARTH)
}

/// Total-field magnetic anomaly survey over Rio de Janeiro, Brazil
pub fn fetch_rio_magnetic(cache: &SampleDataCache) -> Result<MagneticSurvey, anyhow::Error> {
    let file = cache.open(SampleDataset::RioMagnetic)?;
    let survey = parser::parse_rio_magnetic(file)?;
    contract::RIO_MAGNETIC.check(&survey)?;
    info!(
        "Loaded {} sample data: {} rows",
        SampleDataset::RioMagnetic,
        survey.len()
    );
    Ok(survey)
}

fn load_grid(
    cache: &SampleDataCache,
    dataset: SampleDataset,
    expected: &contract::GridContract,
) -> Result<GridDataset, anyhow::Error> {
    let file = cache.open(dataset)?;
    let grid = parser::parse_xyz_grid(file)?;
    expected.check(&grid)?;
    info!("Loaded {} sample data: grid {:?}", dataset, grid.shape());
    Ok(grid)
}
