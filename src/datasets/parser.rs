//! Parsers for the sample dataset text formats
//!
//! Grids use an XYZ layout: a header row naming the columns (starting with
//! `longitude` and `latitude`) followed by one row per grid node. Fields are
//! separated by commas or whitespace. Rows may come in any order but must cover
//! the full rectangular grid exactly once.
//!
//! The magnetic survey is plain CSV with the columns of [`MagneticSurvey::COLUMNS`].

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

use super::types::{GridDataset, LineType, MagneticSurvey};

/// Error type for dataset parsing and validation.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing header row")]
    MissingHeader,
    #[error("Missing column '{0}' in header")]
    MissingColumn(String),
    #[error("Expected {expected} fields at line {line}, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid value '{value}' for column '{column}' at line {line}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
    #[error("Irregular grid: {0}")]
    IrregularGrid(String),
    #[error("Dataset '{dataset}' failed check '{check}': {detail}")]
    ContractViolation {
        dataset: String,
        check: String,
        detail: String,
    },
}

fn split_fields(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Non-empty lines with their 1-based line numbers; `#` starts a comment line
fn data_lines<R: Read>(reader: R) -> impl Iterator<Item = Result<(usize, String), DatasetError>> {
    BufReader::new(reader)
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) => {
                let trimmed = line.trim_matches(|c| c == '\u{feff}' || c == '\r' || c == ' ');
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    None
                } else {
                    Some(Ok((index + 1, trimmed.to_string())))
                }
            }
            Err(e) => Some(Err(DatasetError::Io(e))),
        })
}

fn parse_f64(value: &str, column: &str, line: usize) -> Result<f64, DatasetError> {
    value.parse::<f64>().map_err(|_| DatasetError::InvalidValue {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parse an XYZ grid file into a [`GridDataset`]
pub fn parse_xyz_grid<R: Read>(reader: R) -> Result<GridDataset, DatasetError> {
    let mut lines = data_lines(reader);
    let (_, header) = lines.next().ok_or(DatasetError::MissingHeader)??;
    let columns: Vec<String> = split_fields(&header).into_iter().map(String::from).collect();
    for required in ["longitude", "latitude"] {
        if !columns.iter().any(|c| c == required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }
    let lon_index = columns.iter().position(|c| c == "longitude").unwrap_or(0);
    let lat_index = columns.iter().position(|c| c == "latitude").unwrap_or(1);
    let variable_names: Vec<(usize, &String)> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != lon_index && *i != lat_index)
        .collect();
    if variable_names.is_empty() {
        return Err(DatasetError::IrregularGrid(
            "no data columns besides longitude and latitude".into(),
        ));
    }

    let mut rows: Vec<(f64, f64, Vec<f64>)> = Vec::new();
    for entry in lines {
        let (line_number, line) = entry?;
        let fields = split_fields(&line);
        if fields.len() != columns.len() {
            return Err(DatasetError::FieldCount {
                line: line_number,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        let lon = parse_f64(fields[lon_index], "longitude", line_number)?;
        let lat = parse_f64(fields[lat_index], "latitude", line_number)?;
        let values = variable_names
            .iter()
            .map(|(i, name)| parse_f64(fields[*i], name, line_number))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((lon, lat, values));
    }

    let longitude = sorted_unique(rows.iter().map(|r| r.0));
    let latitude = sorted_unique(rows.iter().map(|r| r.1));
    let size = longitude.len() * latitude.len();
    if rows.len() != size {
        return Err(DatasetError::IrregularGrid(format!(
            "{} rows for {} latitudes x {} longitudes",
            rows.len(),
            latitude.len(),
            longitude.len()
        )));
    }

    let mut data = vec![vec![f64::NAN; size]; variable_names.len()];
    let mut filled = vec![false; size];
    for (lon, lat, values) in rows {
        // Both coordinates come from the same row set, so the search always hits
        let column = longitude.partition_point(|&x| x < lon);
        let row = latitude.partition_point(|&y| y < lat);
        let index = row * longitude.len() + column;
        if filled[index] {
            return Err(DatasetError::IrregularGrid(format!(
                "duplicate node at longitude {} latitude {}",
                lon, lat
            )));
        }
        filled[index] = true;
        for (variable, value) in data.iter_mut().zip(values) {
            variable[index] = value;
        }
    }

    let variables: BTreeMap<String, Vec<f64>> = variable_names
        .into_iter()
        .map(|(_, name)| name.clone())
        .zip(data)
        .collect();
    Ok(GridDataset {
        longitude,
        latitude,
        variables,
    })
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Parse the Rio de Janeiro magnetic survey CSV
pub fn parse_rio_magnetic<R: Read>(reader: R) -> Result<MagneticSurvey, DatasetError> {
    let mut lines = data_lines(reader);
    let (_, header) = lines.next().ok_or(DatasetError::MissingHeader)??;
    let columns: Vec<&str> = split_fields(&header);
    let mut positions = [0usize; 6];
    for (slot, name) in positions.iter_mut().zip(MagneticSurvey::COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
    }
    let [lon_i, lat_i, anomaly_i, altitude_i, type_i, number_i] = positions;

    let mut survey = MagneticSurvey::default();
    for entry in lines {
        let (line_number, line) = entry?;
        let fields = split_fields(&line);
        if fields.len() != columns.len() {
            return Err(DatasetError::FieldCount {
                line: line_number,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        survey
            .longitude
            .push(parse_f64(fields[lon_i], "longitude", line_number)?);
        survey
            .latitude
            .push(parse_f64(fields[lat_i], "latitude", line_number)?);
        survey.total_field_anomaly_nt.push(parse_f64(
            fields[anomaly_i],
            "total_field_anomaly_nt",
            line_number,
        )?);
        survey
            .altitude_m
            .push(parse_f64(fields[altitude_i], "altitude_m", line_number)?);
        let line_type =
            fields[type_i]
                .parse::<LineType>()
                .map_err(|_| DatasetError::InvalidValue {
                    line: line_number,
                    column: "line_type".into(),
                    value: fields[type_i].to_string(),
                })?;
        survey.line_type.push(line_type);
        let number = fields[number_i]
            .parse::<u32>()
            .map_err(|_| DatasetError::InvalidValue {
                line: line_number,
                column: "line_number".into(),
                value: fields[number_i].to_string(),
            })?;
        survey.line_number.push(number);
    }
    Ok(survey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xyz_grid_any_order() {
        let text = "\
# gravity sample
longitude latitude gravity height_over_ell
1.0 -1.0 980000.5 10000
0.0 -1.0 979999.0 10000
0.0 0.0 978000.0 10000
1.0 0.0 978100.0 10000
0.0 1.0 979500.0 10000
1.0 1.0 979600.0 10000
";
        let grid = parse_xyz_grid(text.as_bytes()).unwrap();
        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(grid.longitude, vec![0.0, 1.0]);
        assert_eq!(grid.latitude, vec![-1.0, 0.0, 1.0]);
        assert_eq!(grid.get("gravity", 0, 0), Some(979999.0));
        assert_eq!(grid.get("gravity", 0, 1), Some(980000.5));
        assert_eq!(grid.get("gravity", 2, 1), Some(979600.0));
        assert!(grid.variable("height_over_ell").unwrap().iter().all(|&h| h == 10000.0));
    }

    #[test]
    fn test_parse_xyz_grid_commas() {
        let text = "longitude,latitude,topography\n0,0,-10\n1,0,20\n";
        let grid = parse_xyz_grid(text.as_bytes()).unwrap();
        assert_eq!(grid.shape(), (1, 2));
        assert_eq!(grid.variable("topography"), Some(&[-10.0, 20.0][..]));
    }

    #[test]
    fn test_parse_xyz_grid_incomplete() {
        let text = "longitude latitude topography\n0 0 1\n1 0 2\n0 1 3\n";
        assert!(matches!(
            parse_xyz_grid(text.as_bytes()),
            Err(DatasetError::IrregularGrid(_))
        ));
    }

    #[test]
    fn test_parse_xyz_grid_duplicate_node() {
        let text = "longitude latitude topography\n0 0 1\n0 0 2\n";
        // Two rows, one unique node
        assert!(matches!(
            parse_xyz_grid(text.as_bytes()),
            Err(DatasetError::IrregularGrid(_))
        ));
    }

    #[test]
    fn test_parse_xyz_grid_errors() {
        assert!(matches!(
            parse_xyz_grid("".as_bytes()),
            Err(DatasetError::MissingHeader)
        ));
        assert!(matches!(
            parse_xyz_grid("lon lat topography\n".as_bytes()),
            Err(DatasetError::MissingColumn(name)) if name == "longitude"
        ));
        assert!(matches!(
            parse_xyz_grid("longitude latitude topography\n0 0\n".as_bytes()),
            Err(DatasetError::FieldCount { line: 2, expected: 3, found: 2 })
        ));
        assert!(matches!(
            parse_xyz_grid("longitude latitude topography\n0 0 abc\n".as_bytes()),
            Err(DatasetError::InvalidValue { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rio_magnetic() {
        let text = "\
longitude,latitude,total_field_anomaly_nt,altitude_m,line_type,line_number
-43.199966,-22.569992,-636.18,62.18,LINE,1680
-41.950012,-22.050003,875.12,300.0,TIE,9600
";
        let survey = parse_rio_magnetic(text.as_bytes()).unwrap();
        assert_eq!(survey.shape(), (2, 6));
        assert_eq!(survey.line_type, vec![LineType::Line, LineType::Tie]);
        assert_eq!(survey.line_number, vec![1680, 9600]);
        assert_eq!(survey.total_field_anomaly_nt[1], 875.12);
    }

    #[test]
    fn test_parse_rio_magnetic_column_order_independent() {
        let text = "\
line_number,line_type,altitude_m,total_field_anomaly_nt,latitude,longitude
1700,TIE,120.5,12.0,-22.3,-42.5
";
        let survey = parse_rio_magnetic(text.as_bytes()).unwrap();
        assert_eq!(survey.longitude, vec![-42.5]);
        assert_eq!(survey.latitude, vec![-22.3]);
        assert_eq!(survey.altitude_m, vec![120.5]);
        assert_eq!(survey.line_number, vec![1700]);
    }

    #[test]
    fn test_parse_rio_magnetic_bad_line_type() {
        let text = "\
longitude,latitude,total_field_anomaly_nt,altitude_m,line_type,line_number
-43.0,-22.5,1.0,100.0,FLIGHT,1680
";
        assert!(matches!(
            parse_rio_magnetic(text.as_bytes()),
            Err(DatasetError::InvalidValue { line: 2, column, .. }) if column == "line_type"
        ));
    }

    #[test]
    fn test_parse_rio_magnetic_missing_column() {
        let text = "longitude,latitude,total_field_anomaly_nt,altitude_m,line_type\n";
        assert!(matches!(
            parse_rio_magnetic(text.as_bytes()),
            Err(DatasetError::MissingColumn(name)) if name == "line_number"
        ));
    }
}
