use crate::config::cli::LocalStorage;
use crate::config::toml_config::TomlConfig;
use crate::core::artifact::ModelArtifact;
use crate::core::service::PredictionService;
use crate::core::Storage;
use crate::utils::error::Result;

/// 啟動時載入 artifacts 並建立預測服務；任何錯誤都讓程序停止
pub async fn load_service(config: &TomlConfig) -> Result<PredictionService> {
    let storage = LocalStorage::new(config.artifacts.dir.clone());
    tracing::info!("📂 Artifacts directory: {}", storage.base_path());
    load_service_from(&storage, config).await
}

pub async fn load_service_from<S: Storage>(storage: &S, config: &TomlConfig) -> Result<PredictionService> {
    let artifact = ModelArtifact::load(storage, &config.artifacts.files())
        .await?
        .with_city_prefix(config.encoder.city_prefix.clone());

    artifact
        .schema_report()
        .enforce(config.encoder.strict_schema)?;

    Ok(PredictionService::new(artifact).with_bands(config.judgement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::DirectField;
    use crate::utils::error::PriceError;
    use tempfile::TempDir;

    fn write_artifacts(dir: &std::path::Path, columns: &[String]) {
        let model = serde_json::json!({
            "kind": "linear",
            "intercept": 50000.0,
            "coefficients": vec![0.0; columns.len()],
        });
        std::fs::write(dir.join("final_model.json"), model.to_string()).unwrap();
        std::fs::write(
            dir.join("feature_columns.json"),
            serde_json::to_string(columns).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.join("city_categories.json"), r#"["رام الله"]"#).unwrap();
    }

    fn config_for(dir: &TempDir) -> TomlConfig {
        let mut config = TomlConfig::default();
        config.artifacts.dir = dir.path().to_str().unwrap().to_string();
        config
    }

    #[tokio::test]
    async fn test_load_service_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut columns: Vec<String> = DirectField::ALL
            .iter()
            .map(|f| f.column().to_string())
            .collect();
        columns.push("المدينة_رام الله".to_string());
        write_artifacts(temp_dir.path(), &columns);

        let service = load_service(&config_for(&temp_dir)).await.unwrap();
        assert_eq!(service.artifact().feature_columns().len(), 10);
        assert!(service.artifact().schema_report().is_clean());
    }

    #[tokio::test]
    async fn test_strict_schema_rejects_unproduced_column() {
        let temp_dir = TempDir::new().unwrap();
        let mut columns: Vec<String> = DirectField::ALL
            .iter()
            .map(|f| f.column().to_string())
            .collect();
        columns.push("حديقة".to_string());
        write_artifacts(temp_dir.path(), &columns);

        let mut config = config_for(&temp_dir);
        assert!(load_service(&config).await.is_ok());

        config.encoder.strict_schema = true;
        let err = load_service(&config).await.unwrap_err();
        assert!(matches!(err, PriceError::SchemaMismatch { .. }));
    }

    #[tokio::test]
    async fn test_missing_directory_is_artifact_error() {
        let mut config = TomlConfig::default();
        config.artifacts.dir = "/nonexistent/aqariy/model".to_string();

        let err = load_service(&config).await.unwrap_err();
        assert!(matches!(err, PriceError::ArtifactError { .. }));
    }
}
