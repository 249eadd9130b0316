//! Configuration and per-operation option types.

use crate::cover::{CoverageMode, DEFAULT_MAX_WINDOW_CELLS};
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Default geohash precision for covering operations (1-12).
pub const DEFAULT_GEOHASH_PRECISION: usize = 8;

/// Session configuration for [`GeoJsonHasher`](crate::GeoJsonHasher).
///
/// Designed to be easily serializable and loadable from JSON or TOML while
/// keeping complexity minimal.
///
/// # Example
///
/// ```rust
/// use geocover::Config;
///
/// let config = Config::default();
///
/// let json = r#"{ "max_window_cells": 65536 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.max_window_cells, 65536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound on the candidate-cell window a single covering
    /// traversal may walk. Coverings whose bounding-box window is larger
    /// fail with `ResourceLimitExceeded` instead of attempting unbounded
    /// work.
    #[serde(default = "Config::default_max_window_cells")]
    pub max_window_cells: usize,
}

impl Config {
    const fn default_max_window_cells() -> usize {
        DEFAULT_MAX_WINDOW_CELLS
    }

    pub fn with_max_window_cells(mut self, max_window_cells: usize) -> Self {
        self.max_window_cells = max_window_cells;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_window_cells == 0 {
            return Err("max_window_cells must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_window_cells: Self::default_max_window_cells(),
        }
    }
}

/// Options for [`GeoJsonHasher::encode`](crate::GeoJsonHasher::encode).
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Geohash length of the covering cells.
    pub precision: usize,
    /// Cell classification policy.
    pub mode: CoverageMode,
    /// Minimum fractional overlap for intersect mode, in (0, 1].
    pub threshold: Option<f64>,
    /// Attach each feature's own code list to its `geohash` property.
    pub keep_structure: bool,
    /// Replace an already-computed code set instead of rejecting.
    pub overwrite: bool,
}

impl EncodeOptions {
    /// Create options covering at the given precision
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: CoverageMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_keep_structure(mut self, keep_structure: bool) -> Self {
        self.keep_structure = keep_structure;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_GEOHASH_PRECISION,
            mode: CoverageMode::default(),
            threshold: None,
            keep_structure: false,
            overwrite: false,
        }
    }
}

/// Options for [`GeoJsonHasher::decode`](crate::GeoJsonHasher::decode).
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Emit a single multipolygon feature instead of one feature per cell.
    pub multipolygon: bool,
    /// Merge adjacent cell rectangles into a single boundary. Only
    /// meaningful together with `multipolygon`.
    pub union: bool,
    /// Replace an already-set region instead of rejecting.
    pub overwrite: bool,
}

impl DecodeOptions {
    pub fn with_multipolygon(mut self, multipolygon: bool) -> Self {
        self.multipolygon = multipolygon;
        self
    }

    pub fn with_union(mut self, union: bool) -> Self {
        self.union = union;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
