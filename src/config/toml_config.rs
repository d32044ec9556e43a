use crate::core::artifact::ArtifactFiles;
use crate::core::encoder::CITY_PREFIX;
use crate::core::judgement::JudgementBands;
use crate::core::ConfigProvider;
use crate::utils::error::{PriceError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub encoder: EncoderConfig,
    pub judgement: JudgementBands,
    pub monitoring: Option<MonitoringConfig>,
    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: String,
    pub model_file: String,
    pub features_file: String,
    pub cities_file: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        let files = ArtifactFiles::default();
        Self {
            dir: "model".to_string(),
            model_file: files.model,
            features_file: files.feature_columns,
            cities_file: files.city_categories,
        }
    }
}

impl ArtifactsConfig {
    pub fn files(&self) -> ArtifactFiles {
        ArtifactFiles {
            model: self.model_file.clone(),
            feature_columns: self.features_file.clone(),
            city_categories: self.cities_file.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub city_prefix: String,
    /// Refuse to start when the field table and the feature columns disagree.
    pub strict_schema: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            city_prefix: CITY_PREFIX.to_string(),
            strict_schema: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing page URL; the page number is appended.
    pub list_url: String,
    /// Base for relative detail links.
    pub site_base: String,
    pub pages: u32,
    pub request_delay_ms: u64,
    pub output_path: String,
    pub output_file: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            list_url: "https://ps.opensooq.com/ar/عقارات/شقق-للبيع?page=".to_string(),
            site_base: "https://ps.opensooq.com/".to_string(),
            pages: 1,
            request_delay_ms: 3000,
            output_path: "data".to_string(),
            output_file: "apartments.csv".to_string(),
        }
    }
}

impl ConfigProvider for ScraperConfig {
    fn list_url(&self) -> &str {
        &self.list_url
    }

    fn site_base(&self) -> &str {
        &self.site_base
    }

    fn pages(&self) -> u32 {
        self.pages
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PriceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PriceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PriceError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        if let Some(static_dir) = &self.server.static_dir {
            validation::validate_path("server.static_dir", static_dir)?;
        }

        validation::validate_path("artifacts.dir", &self.artifacts.dir)?;
        validation::validate_path("artifacts.model_file", &self.artifacts.model_file)?;
        validation::validate_path("artifacts.features_file", &self.artifacts.features_file)?;
        validation::validate_path("artifacts.cities_file", &self.artifacts.cities_file)?;

        validation::validate_non_empty_string("encoder.city_prefix", &self.encoder.city_prefix)?;
        validation::validate_ascending("judgement", &self.judgement.edges())?;

        validation::validate_url("scraper.list_url", &self.scraper.list_url)?;
        validation::validate_url("scraper.site_base", &self.scraper.site_base)?;
        validation::validate_positive_number("scraper.pages", self.scraper.pages as usize, 1)?;
        validation::validate_path("scraper.output_path", &self.scraper.output_path)?;
        validation::validate_path("scraper.output_file", &self.scraper.output_file)?;

        Ok(())
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
