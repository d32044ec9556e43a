use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a scrape pipeline's extract → transform → load phases in order.
pub struct ScrapeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ScrapeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting scrape job");

        tracing::info!("📥 Extracting listings...");
        let listings = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} listings", listings.len());

        tracing::info!("🔧 Transforming listings...");
        let output = self.pipeline.transform(listings).await?;
        tracing::info!(
            "🔧 Transformed {} listings ({} bytes of CSV)",
            output.listings.len(),
            output.csv_output.len()
        );

        tracing::info!("💾 Loading output...");
        let output_path = self.pipeline.load(output).await?;
        tracing::info!(
            "✅ Scrape finished in {:?}, output saved to: {}",
            started.elapsed(),
            output_path
        );

        Ok(output_path)
    }
}
