//! Fixture contracts for the sample datasets
//!
//! Each dataset ships with a known shape and known value ranges. Loaded data is
//! checked against them so a truncated or swapped file is caught on load.
//! Comparisons follow `assert_allclose` semantics: |actual - expected| <= rtol * |expected|.

use super::parser::DatasetError;
use super::types::{GridDataset, LineType, MagneticSurvey, min_max};

pub const RELATIVE_TOLERANCE: f64 = 1e-7;

/// Expected minimum and maximum of a named column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridContract {
    pub name: &'static str,
    /// (latitude count, longitude count)
    pub shape: (usize, usize),
    pub bounds: &'static [Bounds],
    /// Columns expected to hold a single value everywhere
    pub constants: &'static [(&'static str, f64)],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableContract {
    pub name: &'static str,
    pub shape: (usize, usize),
    pub bounds: &'static [Bounds],
    pub line_types: &'static [LineType],
}

pub const GRAVITY_EARTH: GridContract = GridContract {
    name: "gravity-earth",
    shape: (361, 721),
    bounds: &[Bounds {
        column: "gravity",
        min: 9.7476403e05,
        max: 9.8018358e05,
    }],
    constants: &[("height_over_ell", 10000.0)],
};

pub const TOPOGRAPHY_EARTH: GridContract = GridContract {
    name: "topography-earth",
    shape: (361, 721),
    bounds: &[Bounds {
        column: "topography",
        min: -8397.0,
        max: 5622.0,
    }],
    constants: &[],
};

pub const RIO_MAGNETIC: TableContract = TableContract {
    name: "rio-magnetic",
    shape: (81796, 6),
    bounds: &[
        Bounds {
            column: "longitude",
            min: -43.199966,
            max: -41.950012,
        },
        Bounds {
            column: "latitude",
            min: -22.569992,
            max: -22.050003,
        },
        Bounds {
            column: "total_field_anomaly_nt",
            min: -636.18,
            max: 875.12,
        },
        Bounds {
            column: "altitude_m",
            min: 62.18,
            max: 300.0,
        },
        Bounds {
            column: "line_number",
            min: 1680.0,
            max: 9600.0,
        },
    ],
    line_types: &[LineType::Line, LineType::Tie],
};

pub fn is_close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= RELATIVE_TOLERANCE * expected.abs()
}

fn violation(dataset: &str, check: &str, detail: String) -> DatasetError {
    DatasetError::ContractViolation {
        dataset: dataset.to_string(),
        check: check.to_string(),
        detail,
    }
}

fn check_bounds(dataset: &str, bounds: &Bounds, values: &[f64]) -> Result<(), DatasetError> {
    // A NaN anywhere makes the range undefined
    if let Some(index) = values.iter().position(|v| v.is_nan()) {
        return Err(violation(dataset, bounds.column, format!("NaN at index {}", index)));
    }
    let (min, max) = min_max(values).ok_or_else(|| {
        violation(dataset, bounds.column, "column has no values".to_string())
    })?;
    if !is_close(min, bounds.min) || !is_close(max, bounds.max) {
        return Err(violation(
            dataset,
            bounds.column,
            format!(
                "range [{}, {}] differs from expected [{}, {}]",
                min, max, bounds.min, bounds.max
            ),
        ));
    }
    Ok(())
}

impl GridContract {
    pub fn check(&self, grid: &GridDataset) -> Result<(), DatasetError> {
        if grid.shape() != self.shape {
            return Err(violation(
                self.name,
                "shape",
                format!("got {:?}, expected {:?}", grid.shape(), self.shape),
            ));
        }
        for bounds in self.bounds {
            let values = grid.variable(bounds.column).ok_or_else(|| {
                violation(self.name, bounds.column, "variable is missing".to_string())
            })?;
            check_bounds(self.name, bounds, values)?;
        }
        for &(column, expected) in self.constants {
            let values = grid.variable(column).ok_or_else(|| {
                violation(self.name, column, "variable is missing".to_string())
            })?;
            if let Some(bad) = values.iter().find(|&&v| !is_close(v, expected)) {
                return Err(violation(
                    self.name,
                    column,
                    format!("found {}, expected {} everywhere", bad, expected),
                ));
            }
        }
        Ok(())
    }
}

impl TableContract {
    pub fn check(&self, survey: &MagneticSurvey) -> Result<(), DatasetError> {
        if survey.shape() != self.shape {
            return Err(violation(
                self.name,
                "shape",
                format!("got {:?}, expected {:?}", survey.shape(), self.shape),
            ));
        }
        for bounds in self.bounds {
            let values = survey.numeric_column(bounds.column).ok_or_else(|| {
                violation(self.name, bounds.column, "column is missing".to_string())
            })?;
            check_bounds(self.name, bounds, &values)?;
        }
        let found = survey.line_types();
        if !found.iter().eq(self.line_types.iter()) {
            return Err(violation(
                self.name,
                "line_type",
                format!("got {:?}, expected {:?}", found, self.line_types),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const SMALL_GRID: GridContract = GridContract {
        name: "small",
        shape: (2, 2),
        bounds: &[Bounds {
            column: "gravity",
            min: 974764.03,
            max: 980183.58,
        }],
        constants: &[("height_over_ell", 10000.0)],
    };

    fn small_grid(max_gravity: f64, height: f64) -> GridDataset {
        let mut variables = BTreeMap::new();
        variables.insert(
            "gravity".to_string(),
            vec![974764.03, 978000.0, 979000.0, max_gravity],
        );
        variables.insert("height_over_ell".to_string(), vec![height; 4]);
        GridDataset {
            longitude: vec![0.0, 0.5],
            latitude: vec![-90.0, -89.5],
            variables,
        }
    }

    fn survey(line_types: Vec<LineType>) -> MagneticSurvey {
        let n = line_types.len();
        MagneticSurvey {
            longitude: vec![-43.199966; n],
            latitude: vec![-22.569992; n],
            total_field_anomaly_nt: vec![0.0; n],
            altitude_m: vec![100.0; n],
            line_type: line_types,
            line_number: vec![1680; n],
        }
    }

    #[test]
    fn test_is_close_is_relative() {
        assert!(is_close(9.8018358e05, 9.8018358e05 * (1.0 + 5e-8)));
        assert!(!is_close(9.8018358e05, 9.8018358e05 * (1.0 + 5e-7)));
        assert!(is_close(5622.0, 5622.0));
    }

    #[test]
    fn test_grid_contract_accepts_matching_data() {
        assert!(SMALL_GRID.check(&small_grid(980183.58, 10000.0)).is_ok());
        // Within tolerance
        assert!(SMALL_GRID.check(&small_grid(980183.58 + 1e-3, 10000.0)).is_ok());
    }

    #[test]
    fn test_grid_contract_rejects_range_and_constant() {
        let err = SMALL_GRID.check(&small_grid(981000.0, 10000.0)).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ContractViolation { ref check, .. } if check == "gravity"
        ));

        let err = SMALL_GRID.check(&small_grid(980183.58, 9000.0)).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ContractViolation { ref check, .. } if check == "height_over_ell"
        ));
    }

    #[test]
    fn test_grid_contract_rejects_nan() {
        let mut grid = small_grid(980183.58, 10000.0);
        if let Some(gravity) = grid.variables.get_mut("gravity") {
            gravity[1] = f64::NAN;
        }
        let err = SMALL_GRID.check(&grid).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ContractViolation { ref check, .. } if check == "gravity"
        ));
        assert!(err.to_string().contains("NaN at index 1"));
    }

    #[test]
    fn test_builtin_grid_contract_rejects_wrong_shape() {
        let err = GRAVITY_EARTH.check(&small_grid(980183.58, 10000.0)).unwrap_err();
        assert!(err.to_string().contains("shape"));
        assert!(err.to_string().contains("(361, 721)"));
    }

    #[test]
    fn test_topography_contract_requires_variable() {
        let mut grid = small_grid(0.0, 0.0);
        grid.longitude = vec![0.0; 721];
        grid.latitude = vec![0.0; 361];
        let err = TOPOGRAPHY_EARTH.check(&grid).unwrap_err();
        assert!(err.to_string().contains("variable is missing"));
    }

    #[test]
    fn test_table_contract_checks_shape_and_line_types() {
        let err = RIO_MAGNETIC.check(&survey(vec![LineType::Line])).unwrap_err();
        assert!(err.to_string().contains("(81796, 6)"));

        const TWO_ROWS: TableContract = TableContract {
            name: "two-rows",
            shape: (2, 6),
            bounds: &[Bounds {
                column: "line_number",
                min: 1680.0,
                max: 1680.0,
            }],
            line_types: &[LineType::Line, LineType::Tie],
        };
        assert!(TWO_ROWS.check(&survey(vec![LineType::Tie, LineType::Line])).is_ok());
        let err = TWO_ROWS
            .check(&survey(vec![LineType::Line, LineType::Line]))
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ContractViolation { ref check, .. } if check == "line_type"
        ));
    }
}
