//! Sample dataset types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Sample datasets known to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleDataset {
    /// Gravity of the Earth at 10 km above the ellipsoid, 0.5 degree grid
    GravityEarth,
    /// ETOPO1 topography and bathymetry, 0.5 degree grid
    TopographyEarth,
    /// Airborne magnetic survey over Rio de Janeiro, Brazil
    RioMagnetic,
}

impl SampleDataset {
    pub const ALL: [SampleDataset; 3] = [
        SampleDataset::GravityEarth,
        SampleDataset::TopographyEarth,
        SampleDataset::RioMagnetic,
    ];

    /// File name inside the cache directory
    pub fn file_name(self) -> &'static str {
        match self {
            SampleDataset::GravityEarth => "gravity-earth-0.5deg.xyz",
            SampleDataset::TopographyEarth => "etopo1-0.5deg.xyz",
            SampleDataset::RioMagnetic => "rio-magnetic.csv",
        }
    }
}

impl fmt::Display for SampleDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleDataset::GravityEarth => "gravity-earth",
            SampleDataset::TopographyEarth => "topography-earth",
            SampleDataset::RioMagnetic => "rio-magnetic",
        };
        write!(f, "{}", name)
    }
}

/// Regular geographic grid holding one or more variables
///
/// Variables are stored row-major with shape (latitude count, longitude count),
/// latitude and longitude both ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDataset {
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    pub variables: BTreeMap<String, Vec<f64>>,
}

impl GridDataset {
    pub fn shape(&self) -> (usize, usize) {
        (self.latitude.len(), self.longitude.len())
    }

    pub fn variable(&self, name: &str) -> Option<&[f64]> {
        self.variables.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at (row, column)
    pub fn get(&self, name: &str, row: usize, column: usize) -> Option<f64> {
        let (rows, columns) = self.shape();
        if row >= rows || column >= columns {
            return None;
        }
        self.variable(name).map(|values| values[row * columns + column])
    }
}

/// Flight line classification in airborne surveys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineType {
    #[serde(rename = "LINE")]
    Line,
    #[serde(rename = "TIE")]
    Tie,
}

impl FromStr for LineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LINE" => Ok(LineType::Line),
            "TIE" => Ok(LineType::Tie),
            other => Err(format!("Unknown line type: {}", other)),
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineType::Line => write!(f, "LINE"),
            LineType::Tie => write!(f, "TIE"),
        }
    }
}

/// Airborne magnetic survey stored column-wise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MagneticSurvey {
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    pub total_field_anomaly_nt: Vec<f64>,
    pub altitude_m: Vec<f64>,
    pub line_type: Vec<LineType>,
    pub line_number: Vec<u32>,
}

impl MagneticSurvey {
    pub const COLUMNS: [&'static str; 6] = [
        "longitude",
        "latitude",
        "total_field_anomaly_nt",
        "altitude_m",
        "line_type",
        "line_number",
    ];

    pub fn len(&self) -> usize {
        self.longitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.longitude.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), Self::COLUMNS.len())
    }

    /// Numeric column by name; line numbers are widened to f64
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        match name {
            "longitude" => Some(self.longitude.clone()),
            "latitude" => Some(self.latitude.clone()),
            "total_field_anomaly_nt" => Some(self.total_field_anomaly_nt.clone()),
            "altitude_m" => Some(self.altitude_m.clone()),
            "line_number" => Some(self.line_number.iter().map(|&n| n as f64).collect()),
            _ => None,
        }
    }

    pub fn line_types(&self) -> BTreeSet<LineType> {
        self.line_type.iter().copied().collect()
    }
}

/// Minimum and maximum of a column, ignoring NaN. None for empty input.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
