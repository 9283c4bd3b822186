//! Forward-modelling configuration
//!
//! Settings can be built in code or loaded from a JSON file such as:
//!
//! ```json
//! { "glq_orders": [2, 2, 2], "distance_size_ratio": 2.5, "parallel": true }
//! ```
//!
//! Missing keys fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::forward::glq::MAX_ORDER;

/// Default GLQ order along longitude, latitude and radius
pub const DEFAULT_GLQ_ORDERS: [usize; 3] = [2, 2, 2];
/// Default capacity of the adaptive discretization stack
pub const DEFAULT_STACK_SIZE: usize = 100;
/// Default cap on tesseroids produced per observation point and source
pub const DEFAULT_MAX_DISCRETIZATIONS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// GLQ order along longitude, latitude and radius
    pub glq_orders: [usize; 3],
    /// Overrides the per-field distance-size ratio when set
    pub distance_size_ratio: Option<f64>,
    pub stack_size: usize,
    pub max_discretizations: usize,
    /// Evaluate observation points on the rayon thread pool
    pub parallel: bool,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            glq_orders: DEFAULT_GLQ_ORDERS,
            distance_size_ratio: None,
            stack_size: DEFAULT_STACK_SIZE,
            max_discretizations: DEFAULT_MAX_DISCRETIZATIONS,
            parallel: true,
        }
    }
}

impl ForwardConfig {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: ForwardConfig = serde_json::from_str(contents)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(order) = self
            .glq_orders
            .iter()
            .find(|&&order| order == 0 || order > MAX_ORDER)
        {
            return Err(Error::InvalidConfig(format!(
                "GLQ orders must be between 1 and {}, got {}",
                MAX_ORDER, order
            )));
        }
        if let Some(ratio) = self.distance_size_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "distance-size ratio must be positive, got {}",
                ratio
            )));
        }
        if self.stack_size == 0 {
            return Err(Error::InvalidConfig("stack size must be at least 1".into()));
        }
        if self.max_discretizations == 0 {
            return Err(Error::InvalidConfig(
                "max discretizations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(test_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "harmonica-config-{}-{}-{}.json",
            test_name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ForwardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.glq_orders, [2, 2, 2]);
        assert_eq!(config.stack_size, 100);
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ForwardConfig::from_json_str(r#"{ "glq_orders": [3, 3, 4], "parallel": false }"#)
                .unwrap();
        assert_eq!(config.glq_orders, [3, 3, 4]);
        assert!(!config.parallel);
        assert_eq!(config.distance_size_ratio, None);
        assert_eq!(config.max_discretizations, DEFAULT_MAX_DISCRETIZATIONS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ForwardConfig::from_json_str(r#"{ "glq_orders": [0, 2, 2] }"#).is_err());
        assert!(ForwardConfig::from_json_str(r#"{ "distance_size_ratio": -1.0 }"#).is_err());
        assert!(ForwardConfig::from_json_str(r#"{ "stack_size": 0 }"#).is_err());
        assert!(ForwardConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = unique_temp_file("load");
        fs::write(&path, r#"{ "distance_size_ratio": 4.0, "stack_size": 250 }"#)
            .expect("Failed to write config");

        let config = ForwardConfig::from_json_file(&path).expect("Failed to load config");
        assert_eq!(config.distance_size_ratio, Some(4.0));
        assert_eq!(config.stack_size, 250);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = unique_temp_file("missing");
        assert!(matches!(
            ForwardConfig::from_json_file(&path),
            Err(Error::InvalidConfig(_))
        ));
    }
}
