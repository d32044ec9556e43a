//! Training-time artifacts, loaded once before the service accepts requests.

use crate::core::encoder::{city_column, DirectField, CITY_PREFIX};
use crate::core::regressor::RegressorModel;
use crate::domain::ports::{Regressor, Storage};
use crate::utils::error::{PriceError, Result};
use std::collections::{BTreeSet, HashSet};

/// File names of the three artifacts inside the artifacts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub model: String,
    pub feature_columns: String,
    pub city_categories: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            model: "final_model.json".to_string(),
            feature_columns: "feature_columns.json".to_string(),
            city_categories: "city_categories.json".to_string(),
        }
    }
}

/// Read-only after construction; shared by every request.
#[derive(Debug)]
pub struct ModelArtifact {
    regressor: Box<dyn Regressor>,
    feature_columns: Vec<String>,
    city_categories: BTreeSet<String>,
    city_prefix: String,
}

impl ModelArtifact {
    /// Build from in-memory parts. Used by the loader and by tests injecting fakes.
    pub fn from_parts(
        regressor: Box<dyn Regressor>,
        feature_columns: Vec<String>,
        city_categories: Vec<String>,
    ) -> Result<Self> {
        if feature_columns.is_empty() {
            return Err(PriceError::artifact(
                "feature_columns",
                "feature column list is empty",
            ));
        }

        let mut seen = HashSet::with_capacity(feature_columns.len());
        for column in &feature_columns {
            if !seen.insert(column.as_str()) {
                return Err(PriceError::artifact(
                    "feature_columns",
                    format!("duplicate feature column '{}'", column),
                ));
            }
        }

        if let Some(width) = regressor.n_features() {
            if width != feature_columns.len() {
                return Err(PriceError::SchemaMismatch {
                    message: format!(
                        "regressor expects {} inputs but {} feature columns were loaded",
                        width,
                        feature_columns.len()
                    ),
                });
            }
        }

        Ok(Self {
            regressor,
            feature_columns,
            city_categories: city_categories.into_iter().collect(),
            city_prefix: CITY_PREFIX.to_string(),
        })
    }

    pub fn with_city_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.city_prefix = prefix.into();
        self
    }

    /// Load and validate all three artifacts. Any failure is fatal for startup.
    pub async fn load<S: Storage>(storage: &S, files: &ArtifactFiles) -> Result<Self> {
        tracing::info!("📦 Loading model artifacts");

        let model_bytes = read_artifact(storage, &files.model).await?;
        let regressor = RegressorModel::from_json_slice(&model_bytes)
            .map_err(|e| PriceError::artifact(&files.model, e.to_string()))?;

        let columns_bytes = read_artifact(storage, &files.feature_columns).await?;
        let feature_columns: Vec<String> = serde_json::from_slice(&columns_bytes)
            .map_err(|e| PriceError::artifact(&files.feature_columns, e.to_string()))?;

        let cities_bytes = read_artifact(storage, &files.city_categories).await?;
        let city_categories: Vec<String> = serde_json::from_slice(&cities_bytes)
            .map_err(|e| PriceError::artifact(&files.city_categories, e.to_string()))?;

        regressor.validate(feature_columns.len()).map_err(|e| match e {
            PriceError::SchemaMismatch { .. } => e,
            other => PriceError::artifact(&files.model, other.to_string()),
        })?;

        let artifact = Self::from_parts(Box::new(regressor), feature_columns, city_categories)?;

        tracing::info!(
            "✅ Artifacts loaded: {} feature columns, {} cities",
            artifact.feature_columns.len(),
            artifact.city_categories.len()
        );
        Ok(artifact)
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn city_categories(&self) -> &BTreeSet<String> {
        &self.city_categories
    }

    pub fn city_prefix(&self) -> &str {
        &self.city_prefix
    }

    /// Compare the encoder's output names with the artifact's column list.
    pub fn schema_report(&self) -> SchemaReport {
        let columns: HashSet<&str> = self.feature_columns.iter().map(String::as_str).collect();

        let dropped_fields = DirectField::ALL
            .iter()
            .map(|f| f.column())
            .filter(|c| !columns.contains(c))
            .map(str::to_string)
            .collect();

        let mut produced: HashSet<String> = DirectField::ALL
            .iter()
            .map(|f| f.column().to_string())
            .collect();
        produced.extend(
            self.city_categories
                .iter()
                .map(|city| city_column(&self.city_prefix, city)),
        );

        let zero_filled_columns = self
            .feature_columns
            .iter()
            .filter(|c| !produced.contains(c.as_str()))
            .cloned()
            .collect();

        SchemaReport {
            dropped_fields,
            zero_filled_columns,
        }
    }
}

async fn read_artifact<S: Storage>(storage: &S, name: &str) -> Result<Vec<u8>> {
    tracing::debug!("Reading artifact {}", name);
    storage
        .read_file(name)
        .await
        .map_err(|e| PriceError::artifact(name, e.to_string()))
}

/// Mismatches between the encoder's field table and the loaded columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Training columns from the field table that the model does not know.
    /// Their input is discarded by the reindex.
    pub dropped_fields: Vec<String>,
    /// Model columns nothing produces. Always 0 at serving time.
    pub zero_filled_columns: Vec<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_fields.is_empty() && self.zero_filled_columns.is_empty()
    }

    pub fn log(&self) {
        for field in &self.dropped_fields {
            tracing::warn!("⚠️ Input field '{}' is not a model column and will be dropped", field);
        }
        for column in &self.zero_filled_columns {
            tracing::warn!("⚠️ Model column '{}' has no producer and will always be 0", column);
        }
    }

    /// Strict mode: a non-clean report stops startup.
    pub fn enforce(&self, strict: bool) -> Result<()> {
        self.log();
        if strict && !self.is_clean() {
            return Err(PriceError::SchemaMismatch {
                message: format!(
                    "{} dropped input field(s), {} zero-filled column(s)",
                    self.dropped_fields.len(),
                    self.zero_filled_columns.len()
                ),
            });
        }
        Ok(())
    }
}
