use crate::adapters::html::ListingHtmlParser;
use crate::config::toml_config::ScraperConfig;
use crate::domain::model::ListingCard;
use crate::domain::ports::ListingSource;
use crate::utils::error::{PriceError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches marketplace pages over HTTP, pausing after every request.
pub struct HttpListingSource {
    client: Client,
    list_url: String,
    site_base: String,
    delay: Duration,
    parser: ListingHtmlParser,
}

impl HttpListingSource {
    pub fn new(list_url: String, site_base: String, delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("aqariy-price/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            list_url,
            site_base,
            delay,
            parser: ListingHtmlParser::new()?,
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Self::new(
            config.list_url.clone(),
            config.site_base.clone(),
            Duration::from_millis(config.request_delay_ms),
        )
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::ScrapeError {
                message: format!("{} returned HTTP {}", url, status),
            });
        }
        let body = response.text().await?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(body)
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn list_page(&self, page: u32) -> Result<Vec<ListingCard>> {
        let url = format!("{}{}", self.list_url, page);
        let html = self.fetch(&url).await?;
        Ok(self.parser.parse_listing_cards(&html, &self.site_base))
    }

    async fn details(&self, card: &ListingCard) -> Result<Vec<(String, String)>> {
        let html = self.fetch(&card.details_url).await?;
        Ok(self.parser.parse_detail_pairs(&html))
    }
}
