//! # Settings Module
//!
//! ## Purpose
//! Converter settings stored in a JSON file (`ode_topo_config.json` in the working
//! directory). Missing file or missing fields fall back to the defaults, which reproduce
//! the BioSANS topology conventions.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "placeholder": "type actual value",
//!   "round_decimals": 3,
//!   "print_decimals": 4,
//!   "log_level": "info",
//!   "log_file": null
//! }
//! ```
use crate::OdeTopology::error::OdeTopoError;
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "ode_topo_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// text written for rate constants and initial values without a known value
    pub placeholder: String,
    /// decimals of the stoichiometric coefficients in reaction lines
    pub round_decimals: u32,
    /// decimals of the printed stoichiometric matrix
    pub print_decimals: u32,
    /// off, error, warn, info, debug, trace
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            placeholder: "type actual value".to_string(),
            round_decimals: 3,
            print_decimals: 4,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl ConverterSettings {
    /// reads settings from `path`; a missing file gives the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OdeTopoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: ConverterSettings = serde_json::from_str(&content)?;
        info!("settings loaded from '{}'", path.display());
        Ok(settings)
    }

    /// settings from `CONFIG_FILE`, defaults if it cannot be read
    pub fn load_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_else(|e| {
            warn!("cannot read '{}': {}, using defaults", CONFIG_FILE, e);
            Self::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), OdeTopoError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = ConverterSettings::load("definitely_missing_config.json").unwrap();
        assert_eq!(settings, ConverterSettings::default());
        assert_eq!(settings.placeholder, "type actual value");
        assert_eq!(settings.round_decimals, 3);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{ \"placeholder\": \"???\", \"log_level\": \"debug\" }}").unwrap();
        let settings = ConverterSettings::load(temp_file.path()).unwrap();
        assert_eq!(settings.placeholder, "???");
        assert_eq!(settings.round_decimals, 3);
        assert_eq!(settings.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut settings = ConverterSettings::default();
        settings.print_decimals = 6;
        settings.log_file = Some("ode_topo.log".to_string());
        settings.save(temp_file.path()).unwrap();
        assert_eq!(ConverterSettings::load(temp_file.path()).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "not json").unwrap();
        assert!(matches!(
            ConverterSettings::load(temp_file.path()),
            Err(OdeTopoError::Json(_))
        ));
    }
}
