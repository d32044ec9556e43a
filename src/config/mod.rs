pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// Command-line overrides for the prediction server.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "aqariy-serve")]
#[command(about = "Serves apartment price predictions over HTTP")]
pub struct CliConfig {
    #[arg(short, long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Socket address to listen on, e.g. 0.0.0.0:8000")]
    pub bind: Option<String>,

    #[arg(long, help = "Directory holding the model artifacts")]
    pub artifacts_dir: Option<String>,

    #[arg(long, help = "Directory with index.html and static assets")]
    pub static_dir: Option<String>,

    #[arg(long, help = "Fail at startup if the feature schema has gaps")]
    pub strict_schema: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取 TOML（若有）再套用命令列覆寫
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
        if self.strict_schema {
            config.encoder.strict_schema = true;
        }
    }
}

/// Loads a config file when given, defaults otherwise.
pub fn load_config(path: Option<&str>) -> Result<TomlConfig> {
    let config = match path {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
