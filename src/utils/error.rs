use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Artifact '{artifact}' could not be loaded: {message}")]
    ArtifactError { artifact: String, message: String },

    #[error("Feature schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Prediction failed: {message}")]
    InferenceError { message: String },

    #[error("Scrape error: {message}")]
    ScrapeError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Input,
    Inference,
    Network,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 重試錯誤
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl PriceError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceError {
            message: message.into(),
        }
    }

    pub fn artifact(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactError {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PriceError::HttpError(_) | PriceError::ScrapeError { .. } => ErrorCategory::Network,
            PriceError::CsvError(_) | PriceError::IoError(_) => ErrorCategory::Storage,
            PriceError::SerializationError(_) | PriceError::InvalidInput { .. } => {
                ErrorCategory::Input
            }
            PriceError::ConfigError { .. }
            | PriceError::ConfigValidationError { .. }
            | PriceError::InvalidConfigValueError { .. }
            | PriceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PriceError::ArtifactError { .. } | PriceError::SchemaMismatch { .. } => {
                ErrorCategory::Artifact
            }
            PriceError::InferenceError { .. } => ErrorCategory::Inference,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Inference | ErrorCategory::Storage | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Artifact => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於單一請求範圍內的錯誤（回報為 400）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Inference
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the TOML file and CLI overrides, then restart",
            ErrorCategory::Artifact => {
                "Re-export final_model.json, feature_columns.json and city_categories.json from the same training run"
            }
            ErrorCategory::Input => "Fix the request body: all counts must be non-negative integers and flags 0 or 1",
            ErrorCategory::Inference => "Check that the model artifact matches the feature columns",
            ErrorCategory::Network => "Check connectivity to the listing site and re-run the scrape",
            ErrorCategory::Storage => "Check that the path exists and is readable/writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PriceError::ArtifactError { artifact, .. } => {
                format!("The model artifact '{}' is missing or corrupt", artifact)
            }
            PriceError::SchemaMismatch { .. } => {
                "The model's feature columns do not match the input schema".to_string()
            }
            PriceError::InvalidInput { field, reason } => format!("{}: {}", field, reason),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
