//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Standard configuration locations, relative to the working directory
pub const CONFIG_CANDIDATES: [&str; 3] =
    [".autodiag.toml", "autodiag.toml", ".config/autodiag.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, a standard location, or defaults.
    ///
    /// An explicit path that does not exist is an error; a missing standard
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(Path::new("."), path)
    }

    /// Same as [`Config::load`], with standard locations resolved against `base`.
    pub fn load_from(base: &Path, path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let p = base.join(p);
                if !p.is_file() {
                    return Err(Error::config_not_found(&p));
                }
                Some(p)
            }
            None => find_config_file(base),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        validate(&schema)?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        validate(&schema)?;
        Ok(Self { schema, path: None })
    }
}

/// Find configuration file in standard locations
fn find_config_file(base: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))
}

fn validate(schema: &ConfigSchema) -> Result<()> {
    if schema.database.path.is_none() && schema.database.candidates.is_empty() {
        return Err(Error::new(
            ErrorCode::InvalidConfigValue,
            "database.candidates is empty and database.path is unset",
        )
        .with_suggestion("Set database.path or list at least one candidate"));
    }
    Ok(())
}
