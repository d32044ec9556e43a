pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod transport;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::bootstrap::load_service;
pub use app::pipelines::ScrapePipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{etl::ScrapeEngine, service::PredictionService};
pub use utils::error::{PriceError, Result};
