use crate::domain::model::{ListingCard, RawListing, ScrapeOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A trained model: one feature vector in, one raw price out.
pub trait Regressor: Send + Sync + std::fmt::Debug {
    /// Number of inputs the model was trained on, when the format records it.
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// 抓取設定來源
pub trait ConfigProvider: Send + Sync {
    fn list_url(&self) -> &str;
    fn site_base(&self) -> &str;
    fn pages(&self) -> u32;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
}

/// Where listings come from. The marketplace adapter is one implementation.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn list_page(&self, page: u32) -> Result<Vec<ListingCard>>;

    /// Label/value pairs from the listing's detail page.
    async fn details(&self, card: &ListingCard) -> Result<Vec<(String, String)>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawListing>>;
    async fn transform(&self, data: Vec<RawListing>) -> Result<ScrapeOutput>;
    async fn load(&self, result: ScrapeOutput) -> Result<String>;
}
