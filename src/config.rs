use crate::error::{Result, RiceFertError};
use crate::logic::leaf::estimator::DEFAULT_PARALLEL_THRESHOLD;
use crate::models::{FertilizerContents, SoilType};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub analysis: AnalysisConfig,
    pub fertilizers: FertilizerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    pub name: String,
    pub soil_type: Option<String>,
    pub default_rainfall_mm: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            name: "Main Field".into(),
            soil_type: Some("Loam".into()),
            default_rainfall_mm: 150.0,
        }
    }
}

impl FieldConfig {
    /// Parsed soil type. Unrecognized names are logged and treated as unknown.
    pub fn soil(&self) -> Option<SoilType> {
        let name = self.soil_type.as_deref()?;
        SoilType::from_str(name).or_else(|| {
            warn!(soil_type = %name, "Unknown soil_type in config, using neutral factor");
            None
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pixel count above which leaf analysis runs in parallel
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Nutrient fraction of each single-nutrient product.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FertilizerConfig {
    pub urea_n: f64,
    pub sp36_p2o5: f64,
    pub kcl_k2o: f64,
}

impl Default for FertilizerConfig {
    fn default() -> Self {
        let contents = FertilizerContents::default();
        Self {
            urea_n: contents.urea_n,
            sp36_p2o5: contents.sp36_p2o5,
            kcl_k2o: contents.kcl_k2o,
        }
    }
}

impl FertilizerConfig {
    pub fn contents(&self) -> FertilizerContents {
        FertilizerContents {
            urea_n: self.urea_n,
            sp36_p2o5: self.sp36_p2o5,
            kcl_k2o: self.kcl_k2o,
        }
    }
}

impl Config {
    /// Load the config file. A missing file yields the defaults; a file
    /// that exists but fails to parse is an error.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            if config_override.is_some() {
                return Err(RiceFertError::Config(format!(
                    "Config file not found at {:?}",
                    config_path
                )));
            }
            debug!(path = ?config_path, "No config file found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| RiceFertError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    fn parse(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| RiceFertError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("urea_n", self.fertilizers.urea_n),
            ("sp36_p2o5", self.fertilizers.sp36_p2o5),
            ("kcl_k2o", self.fertilizers.kcl_k2o),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(RiceFertError::Config(format!(
                    "fertilizers.{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        let rainfall = self.field.default_rainfall_mm;
        if !rainfall.is_finite() || rainfall < 0.0 {
            return Err(RiceFertError::Config(format!(
                "field.default_rainfall_mm must be a non-negative number, got {}",
                rainfall
            )));
        }

        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    pub fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/ricefert/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RiceFertError::Config("Cannot determine config directory".into()))?
            .join("ricefert");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up ricefert!");
        println!();

        println!("Field");
        let name: String = Input::new()
            .with_prompt("  Field name")
            .default("Main Field".into())
            .interact_text()
            .map_err(|e| RiceFertError::Config(format!("Input error: {}", e)))?;

        let soil_names: Vec<&str> = SoilType::all().iter().map(|s| s.as_str()).collect();
        let soil_index = Select::new()
            .with_prompt("  Soil type")
            .items(&soil_names)
            .default(0)
            .interact()
            .map_err(|e| RiceFertError::Config(format!("Input error: {}", e)))?;

        let default_rainfall_mm: f64 = Input::new()
            .with_prompt("  Typical monthly rainfall (mm)")
            .default(150.0)
            .validate_with(|v: &f64| -> std::result::Result<(), &str> {
                if v.is_finite() && *v >= 0.0 {
                    Ok(())
                } else {
                    Err("rainfall must be a non-negative number")
                }
            })
            .interact_text()
            .map_err(|e| RiceFertError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            field: FieldConfig {
                name,
                soil_type: Some(soil_names[soil_index].to_string()),
                default_rainfall_mm,
            },
            ..Config::default()
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| RiceFertError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# ricefert configuration\n# Generated by `ricefert init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("RICEFERT_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| RiceFertError::Config("Cannot determine data directory".into()))?
            .join("ricefert");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("ricefert.db"))
    }
}

/// Replace `${VAR}` placeholders with environment values. Unset variables
/// are left as-is.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RiceFertError::Config(format!("Invalid substitution pattern: {}", e)))?;

    let result = re.replace_all(content, |caps: &regex_lite::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.field.name, "Main Field");
        assert_eq!(config.field.soil(), Some(SoilType::Loam));
        assert_eq!(config.field.default_rainfall_mm, 150.0);
        assert_eq!(config.analysis.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.fertilizers.contents(), FertilizerContents::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "field:\n  soil_type: pasir\nfertilizers:\n  urea_n: 0.45\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.field.soil(), Some(SoilType::Sand));
        assert_eq!(config.field.name, "Main Field");
        assert_eq!(config.fertilizers.urea_n, 0.45);
        assert_eq!(config.fertilizers.kcl_k2o, 0.60);
    }

    #[test]
    fn unknown_soil_is_neutral() {
        let yaml = "field:\n  soil_type: peat\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.field.soil(), None);
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("RICEFERT_TEST_FIELD_NAME", "North Paddy");
        let yaml = "field:\n  name: ${RICEFERT_TEST_FIELD_NAME}\n  soil_type: ${RICEFERT_TEST_UNSET_VAR}\n";
        let out = substitute_env_vars(yaml).unwrap();
        assert!(out.contains("name: North Paddy"));
        assert!(out.contains("${RICEFERT_TEST_UNSET_VAR}"));
    }

    #[test]
    fn rejects_invalid_fertilizer_fraction() {
        let yaml = "fertilizers:\n  sp36_p2o5: 0\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(RiceFertError::Config(_))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(Config::parse("field: [unclosed").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let path = PathBuf::from("/nonexistent/ricefert/config.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
