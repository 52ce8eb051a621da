use std::collections::BTreeMap;
use std::path::Path;

use actionpack_ocr::OcrTools;
use serde::Deserialize;

/// Top-level configuration, loaded from `actionpack.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Input defaults per action name.
    ///
    /// # Example
    ///
    /// ```toml
    /// [defaults."Send Mail"]
    /// hostname = "smtp.example.com"
    /// port = "587"
    /// ```
    #[serde(default)]
    pub defaults: BTreeMap<String, BTreeMap<String, String>>,
    /// Locations of the OCR programs.
    #[serde(default)]
    pub ocr: OcrTools,
    #[serde(default)]
    pub terraform: TerraformConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_owned()
}

#[derive(Debug, Default, Deserialize)]
pub struct TerraformConfig {
    /// API base URL for Terraform Enterprise installations.
    pub host_url: Option<String>,
}

impl CliConfig {
    /// Load the configuration file, or defaults when it does not exist.
    ///
    /// The flag tells whether the file was found.
    pub fn load(path: &Path) -> anyhow::Result<(Self, bool)> {
        if !path.exists() {
            return Ok((Self::default(), false));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok((toml::from_str(&contents)?, true))
    }
}
