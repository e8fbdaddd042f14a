//! # Settings Module
//!
//! ## Purpose
//! Persistent settings of the balancer: how many species may be entered per side,
//! the search budget of the solver, the web services used for name lookup and
//! reaction diagrams, and the log level of the binary.
//!
//! ## Architecture
//! - **BalancerSettings**: serializable settings structure with defaults
//! - **SettingsManager**: loads the settings from JSON, validates updates and saves them
//! - **Configuration File**: JSON file `balancer_config.json` in the working directory
//!
//! ## Configuration Format
//! ```json
//! {
//!   "max_species_per_side": 4,
//!   "solver_max_iterations": 2000000,
//!   "pubchem_base_url": "https://pubchem.ncbi.nlm.nih.gov/rest/pug",
//!   "depiction_base_url": "https://www.simolecule.com/cdkdepict",
//!   "render_diagram": true,
//!   "open_viewer": true,
//!   "diagram_dir": null,
//!   "log_level": "info"
//! }
//! ```
//!
//! ## Usage
//! ```rust, ignore
//! let mut manager = SettingsManager::new();
//! manager.set_max_species_per_side(6)?;
//! let engine = manager.solver_engine();
//! ```

use crate::Balancing::balance_solver::LatticeSearchEngine;
use crate::Lookup::depiction_api::DEPICTION_BASE_URL;
use crate::Lookup::pubchem_api::PUBCHEM_BASE_URL;
use log::{LevelFilter, info};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE: &str = "balancer_config.json";

/// Settings of the balancer
///
/// # Fields
/// * `max_species_per_side` - upper limit of reactants (and of products) asked for interactively
/// * `solver_max_iterations` - candidate assignments the solver may examine before giving up
/// * `pubchem_base_url` - PUG REST root used for name lookup
/// * `depiction_base_url` - CDK Depict root used for reaction diagrams
/// * `render_diagram` - request a diagram after a successful balance
/// * `open_viewer` - open the saved diagram in the system viewer
/// * `diagram_dir` - directory for diagrams, system temp dir when `None`
/// * `log_level` - `off`, `error`, `warn`, `info`, `debug` or `trace`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerSettings {
    pub max_species_per_side: usize,
    pub solver_max_iterations: u64,
    pub pubchem_base_url: String,
    pub depiction_base_url: String,
    pub render_diagram: bool,
    pub open_viewer: bool,
    pub diagram_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for BalancerSettings {
    fn default() -> Self {
        Self {
            max_species_per_side: 4,
            solver_max_iterations: 2_000_000,
            pubchem_base_url: PUBCHEM_BASE_URL.to_string(),
            depiction_base_url: DEPICTION_BASE_URL.to_string(),
            render_diagram: true,
            open_viewer: true,
            diagram_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl BalancerSettings {
    /// Level filter for the logger; unknown names fall back to `Info`
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn to_table(&self) -> Table {
        let diagram_dir = self
            .diagram_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "system temp dir".to_string());
        let rows = [
            ("max_species_per_side", self.max_species_per_side.to_string()),
            ("solver_max_iterations", self.solver_max_iterations.to_string()),
            ("pubchem_base_url", self.pubchem_base_url.clone()),
            ("depiction_base_url", self.depiction_base_url.clone()),
            ("render_diagram", self.render_diagram.to_string()),
            ("open_viewer", self.open_viewer.to_string()),
            ("diagram_dir", diagram_dir),
            ("log_level", self.log_level.clone()),
        ];
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("Setting"), Cell::new("Value")]));
        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }
        table
    }
}

fn validate_base_url(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Url::parse(url)?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("Not an http(s) base URL: {}", url).into());
    }
    Ok(())
}

/// Loads, validates and persists `BalancerSettings`
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: BalancerSettings,
    config_file: String,
}

impl SettingsManager {
    /// Reads `balancer_config.json` from the working directory; defaults if it is
    /// missing or unreadable.
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let settings = Self::load_config(config_file).unwrap_or_default();
        Self {
            settings,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<BalancerSettings, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: BalancerSettings = serde_json::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(BalancerSettings::default())
        }
    }

    /// Writes the settings as pretty JSON. Does nothing in tests so the real
    /// config file is left alone.
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.settings)?;
            fs::write(&self.config_file, content)?;
            info!("settings saved to {}", self.config_file);
            Ok(())
        }
    }

    pub fn get_settings(&self) -> &BalancerSettings {
        &self.settings
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Solver engine configured with the iteration budget of the settings
    pub fn solver_engine(&self) -> LatticeSearchEngine {
        LatticeSearchEngine::new(self.settings.solver_max_iterations)
    }

    pub fn set_max_species_per_side(
        &mut self,
        max: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if max == 0 {
            return Err("At least one species per side is required".into());
        }
        self.settings.max_species_per_side = max;
        self.save_config()
    }

    pub fn set_solver_max_iterations(
        &mut self,
        max_iterations: u64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if max_iterations == 0 {
            return Err("Solver budget must be positive".into());
        }
        self.settings.solver_max_iterations = max_iterations;
        self.save_config()
    }

    pub fn set_pubchem_base_url(&mut self, url: &str) -> Result<(), Box<dyn std::error::Error>> {
        validate_base_url(url)?;
        self.settings.pubchem_base_url = url.to_string();
        self.save_config()
    }

    pub fn set_depiction_base_url(&mut self, url: &str) -> Result<(), Box<dyn std::error::Error>> {
        validate_base_url(url)?;
        self.settings.depiction_base_url = url.to_string();
        self.save_config()
    }

    pub fn set_render_diagram(&mut self, render: bool) -> Result<(), Box<dyn std::error::Error>> {
        self.settings.render_diagram = render;
        self.save_config()
    }

    pub fn set_open_viewer(&mut self, open: bool) -> Result<(), Box<dyn std::error::Error>> {
        self.settings.open_viewer = open;
        self.save_config()
    }

    /// `None` means the system temp dir; a given directory must exist
    pub fn set_diagram_dir(&mut self, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
        match dir {
            Some(dir) if !Path::new(dir).is_dir() => {
                Err(format!("Directory does not exist: {}", dir).into())
            }
            _ => {
                self.settings.diagram_dir = dir.map(PathBuf::from);
                self.save_config()
            }
        }
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), Box<dyn std::error::Error>> {
        level
            .parse::<LevelFilter>()
            .map_err(|_| format!("Unknown log level: {}", level))?;
        self.settings.log_level = level.to_lowercase();
        self.save_config()
    }

    /// Applies several textual updates at once; nothing changes unless every
    /// key is known and every value is valid.
    pub fn update_settings(
        &mut self,
        updates: HashMap<&str, &str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut candidate = self.clone();
        for (key, value) in updates {
            let value = value.trim();
            match key {
                "max_species_per_side" => candidate.set_max_species_per_side(value.parse()?)?,
                "solver_max_iterations" => candidate.set_solver_max_iterations(value.parse()?)?,
                "pubchem_base_url" => candidate.set_pubchem_base_url(value)?,
                "depiction_base_url" => candidate.set_depiction_base_url(value)?,
                "render_diagram" => candidate.set_render_diagram(value.parse()?)?,
                "open_viewer" => candidate.set_open_viewer(value.parse()?)?,
                "diagram_dir" => {
                    candidate.set_diagram_dir(if value.is_empty() { None } else { Some(value) })?
                }
                "log_level" => candidate.set_log_level(value)?,
                _ => return Err(format!("Unknown setting: {}", key).into()),
            }
        }
        self.settings = candidate.settings;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.settings = BalancerSettings::default();
        self.save_config()
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let manager = SettingsManager::with_config_file("no_such_balancer_config.json");
        let settings = manager.get_settings();
        assert_eq!(settings, &BalancerSettings::default());
        assert_eq!(settings.max_species_per_side, 4);
        assert_eq!(settings.solver_max_iterations, 2_000_000);
        assert_eq!(settings.level_filter(), LevelFilter::Info);
        assert_eq!(manager.solver_engine().max_iterations, 2_000_000);
    }

    #[test]
    fn test_with_config_file() {
        let mut temp_config = NamedTempFile::new().unwrap();
        let settings = BalancerSettings {
            max_species_per_side: 6,
            render_diagram: false,
            log_level: "debug".to_string(),
            ..BalancerSettings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        temp_config.write_all(json.as_bytes()).unwrap();

        let manager = SettingsManager::with_config_file(temp_config.path().to_str().unwrap());
        assert_eq!(manager.get_settings(), &settings);
        assert_eq!(manager.get_settings().level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_and_broken_files() {
        let mut partial = NamedTempFile::new().unwrap();
        partial.write_all(br#"{"max_species_per_side": 8}"#).unwrap();
        let manager = SettingsManager::with_config_file(partial.path().to_str().unwrap());
        assert_eq!(manager.get_settings().max_species_per_side, 8);
        assert_eq!(manager.get_settings().pubchem_base_url, PUBCHEM_BASE_URL);

        let mut broken = NamedTempFile::new().unwrap();
        broken.write_all(b"{ not json").unwrap();
        let manager = SettingsManager::with_config_file(broken.path().to_str().unwrap());
        assert_eq!(manager.get_settings(), &BalancerSettings::default());
    }

    #[test]
    fn test_setters_validate() {
        let temp_config = NamedTempFile::new().unwrap();
        let mut manager = SettingsManager::with_config_file(temp_config.path().to_str().unwrap());

        assert!(manager.set_max_species_per_side(0).is_err());
        assert!(manager.set_max_species_per_side(5).is_ok());
        assert_eq!(manager.get_settings().max_species_per_side, 5);

        assert!(manager.set_solver_max_iterations(0).is_err());
        assert!(manager.set_pubchem_base_url("not a url").is_err());
        assert!(manager.set_depiction_base_url("mailto:someone@example.com").is_err());
        assert!(manager.set_pubchem_base_url("http://localhost:8080/pug").is_ok());

        assert!(manager.set_log_level("loud").is_err());
        assert!(manager.set_log_level("WARN").is_ok());
        assert_eq!(manager.get_settings().log_level, "warn");

        let dir = tempfile::tempdir().unwrap();
        assert!(manager.set_diagram_dir(Some("/no/such/dir/for/diagrams")).is_err());
        assert!(manager.set_diagram_dir(dir.path().to_str()).is_ok());
        assert_eq!(
            manager.get_settings().diagram_dir.as_deref(),
            Some(dir.path())
        );
    }

    #[test]
    fn test_update_settings_is_all_or_nothing() {
        let temp_config = NamedTempFile::new().unwrap();
        let mut manager = SettingsManager::with_config_file(temp_config.path().to_str().unwrap());

        let mut updates = HashMap::new();
        updates.insert("max_species_per_side", "3");
        updates.insert("open_viewer", "false");
        assert!(manager.update_settings(updates).is_ok());
        assert_eq!(manager.get_settings().max_species_per_side, 3);
        assert!(!manager.get_settings().open_viewer);

        let mut updates = HashMap::new();
        updates.insert("max_species_per_side", "7");
        updates.insert("colour", "blue");
        assert!(manager.update_settings(updates).is_err());
        assert_eq!(manager.get_settings().max_species_per_side, 3);

        assert!(manager.reset_to_defaults().is_ok());
        assert_eq!(manager.get_settings(), &BalancerSettings::default());
    }

    #[test]
    fn test_table() {
        let table = BalancerSettings::default().to_table();
        assert_eq!(table.len(), 9);
    }
}
