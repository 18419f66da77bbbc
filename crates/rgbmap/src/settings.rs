//! Mapper settings files.
//!
//! A YAML document holding the mapper's persistent configuration:
//!
//! ```yaml
//! color_algorithm: logarithmic
//! color_hashsize: 65536
//! exponent: 10.0
//! max_hashsize: 1048576
//! color_table: [[0, 0, 0], [1, 1, 1]]
//! ```
//!
//! Missing fields take the defaults of [`ColorMapper::new`]. Tables are
//! optional; when absent the mapper keeps its current tables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use rgbmap_lut::{
    ColorTable, DistributionTable, HashAlgorithm, IntensityTable, DEFAULT_EXPONENT,
    DEFAULT_HASH_SIZE, MAX_HASH_SIZE, MIN_HASH_SIZE,
};

use crate::mapper::ColorMapper;

/// Result type for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Errors loading or applying settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file does not exist.
    #[error("settings file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O error reading or writing a settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings parsed but are not usable.
    #[error(transparent)]
    Invalid(#[from] rgbmap_core::Error),
}

/// Persistent mapper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperSettings {
    /// Distribution algorithm name.
    pub color_algorithm: String,
    /// Distribution table size.
    pub color_hashsize: usize,
    /// Distribution exponent.
    pub exponent: f64,
    /// Largest permitted distribution table size.
    pub max_hashsize: usize,
    /// Color table as RGB triples in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_table: Option<Vec<[f32; 3]>>,
    /// Intensity table, 256 values in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity_table: Option<Vec<f32>>,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            color_algorithm: HashAlgorithm::Linear.name().to_string(),
            color_hashsize: DEFAULT_HASH_SIZE,
            exponent: DEFAULT_EXPONENT,
            max_hashsize: MAX_HASH_SIZE,
            color_table: None,
            intensity_table: None,
        }
    }
}

/// Everything [`MapperSettings`] describes, validated and generated.
struct Resolved {
    hash: DistributionTable,
    max_hash_size: usize,
    color_table: Option<ColorTable>,
    intensity_table: Option<IntensityTable>,
}

impl MapperSettings {
    /// Loads settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&content)?;
        debug!(path = %path.display(), "loaded mapper settings");
        Ok(settings)
    }

    /// Parses settings from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> SettingsResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> SettingsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes settings to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Parsed distribution algorithm.
    pub fn algorithm(&self) -> SettingsResult<HashAlgorithm> {
        Ok(self.color_algorithm.parse()?)
    }

    /// Checks every field without building a mapper.
    pub fn validate(&self) -> SettingsResult<()> {
        self.resolve(MAX_HASH_SIZE).map(|_| ())
    }

    fn resolve(&self, limit: usize) -> SettingsResult<Resolved> {
        let algorithm = self.algorithm()?;
        if !(MIN_HASH_SIZE..=limit).contains(&self.max_hashsize) {
            return Err(rgbmap_core::Error::InvalidHashSize {
                size: self.max_hashsize,
                min: MIN_HASH_SIZE,
                max: limit,
            }
            .into());
        }
        if !(MIN_HASH_SIZE..=self.max_hashsize).contains(&self.color_hashsize) {
            return Err(rgbmap_core::Error::InvalidHashSize {
                size: self.color_hashsize,
                min: MIN_HASH_SIZE,
                max: self.max_hashsize,
            }
            .into());
        }
        let hash = DistributionTable::generate(algorithm, self.color_hashsize, self.exponent)?;
        let color_table = self
            .color_table
            .as_ref()
            .map(|colors| ColorTable::new("settings", colors.clone()))
            .transpose()?;
        let intensity_table = self
            .intensity_table
            .as_ref()
            .map(|values| IntensityTable::new("settings", values.clone()))
            .transpose()?;
        Ok(Resolved {
            hash,
            max_hash_size: self.max_hashsize,
            color_table,
            intensity_table,
        })
    }
}

impl ColorMapper {
    /// Builds a lookup-table mapper from settings.
    pub fn from_settings(settings: &MapperSettings) -> SettingsResult<Self> {
        let mut mapper = Self::new();
        mapper.apply_settings(settings, false)?;
        Ok(mapper)
    }

    /// Applies settings as one batch.
    ///
    /// Everything is validated before anything changes; on success
    /// listeners are notified once (if `notify`).
    pub fn apply_settings(&mut self, settings: &MapperSettings, notify: bool) -> SettingsResult<()> {
        let resolved = settings.resolve(self.hash_size_limit())?;
        self.replace_distribution(resolved.hash, resolved.max_hash_size, false)?;
        if let Some(table) = resolved.color_table {
            self.set_color_table(table, false);
        }
        if let Some(table) = resolved.intensity_table {
            self.set_intensity_table(table, false);
        }
        self.notify(notify);
        Ok(())
    }

    /// Snapshot of the current configuration.
    pub fn settings(&self) -> MapperSettings {
        MapperSettings {
            color_algorithm: self.hash_algorithm().name().to_string(),
            color_hashsize: self.hash_size(),
            exponent: self.exponent(),
            max_hashsize: self.max_hash_size(),
            color_table: Some(self.color_table().colors().to_vec()),
            intensity_table: Some(self.intensity_table().values().to_vec()),
        }
    }
}
