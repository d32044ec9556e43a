use crate::core::{ConfigProvider, ListingSource, Pipeline, RawListing, ScrapeOutput, Storage};
use crate::utils::error::{PriceError, Result};
use chrono::{SecondsFormat, Utc};

/// CSV 欄位，順序與 `RawListing` 相同
pub const CSV_HEADER: [&str; 15] = [
    "id",
    "price",
    "details_url",
    "city",
    "num_rooms",
    "furnished",
    "floor",
    "facade",
    "mortgaged",
    "num_bathrooms",
    "area",
    "age",
    "payment",
    "extras",
    "scraped_at",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Copy one detail-page attribute onto the listing. Returns false for unknown labels.
pub fn apply_detail(listing: &mut RawListing, label: &str, value: &str) -> bool {
    let slot = match label.trim() {
        "المدينة" => &mut listing.city,
        "عدد الغرف" => &mut listing.num_rooms,
        "مفروشة؟" => &mut listing.furnished,
        "الطابق" => &mut listing.floor,
        "الواجهة" => &mut listing.facade,
        "هل العقار مرهون" => &mut listing.mortgaged,
        "عدد الحمامات" => &mut listing.num_bathrooms,
        "مساحة البناء" => &mut listing.area,
        "عمر البناء" => &mut listing.age,
        "طريقة الدفع" => &mut listing.payment,
        "المزايا الاضافية" => &mut listing.extras,
        _ => return false,
    };
    *slot = Some(value.to_string());
    true
}

pub struct ScrapePipeline<S: Storage, C: ConfigProvider, L: ListingSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: L,
}

impl<S: Storage, C: ConfigProvider, L: ListingSource> ScrapePipeline<S, C, L> {
    pub fn new(storage: S, config: C, source: L) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: ListingSource> Pipeline for ScrapePipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<RawListing>> {
        let mut listings = Vec::new();

        for page in 1..=self.config.pages() {
            tracing::info!("📄 Loading listing page {}", page);
            let cards = self.source.list_page(page).await?;
            tracing::info!("Found {} cards on page {}", cards.len(), page);

            for card in cards {
                let mut listing = RawListing::from_card(&card);
                // 跨頁連續編號
                listing.id = listings.len();

                match self.source.details(&card).await {
                    Ok(pairs) => {
                        for (label, value) in &pairs {
                            if !apply_detail(&mut listing, label, value) {
                                tracing::debug!("Ignoring detail label '{}'", label);
                            }
                        }
                        listing.scraped_at =
                            Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
                    }
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Failed to read details from {}: {} (keeping listing)",
                            card.details_url,
                            e
                        );
                    }
                }

                listings.push(listing);
            }
        }

        Ok(listings)
    }

    async fn transform(&self, data: Vec<RawListing>) -> Result<ScrapeOutput> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(UTF8_BOM.to_vec());

        writer.write_record(CSV_HEADER)?;
        for listing in &data {
            writer.serialize(listing)?;
        }

        let csv_output = writer
            .into_inner()
            .map_err(|e| PriceError::IoError(e.into_error()))?;

        Ok(ScrapeOutput {
            listings: data,
            csv_output,
        })
    }

    async fn load(&self, result: ScrapeOutput) -> Result<String> {
        let output_path = format!(
            "{}/{}",
            self.config.output_path(),
            self.config.output_file()
        );

        tracing::debug!(
            "Writing CSV ({} bytes, {} rows) to storage",
            result.csv_output.len(),
            result.listings.len()
        );
        self.storage
            .write_file(self.config.output_file(), &result.csv_output)
            .await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ListingCard;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files
                .lock()
                .await
                .get(path)
                .cloned()
                .ok_or_else(|| PriceError::ScrapeError {
                    message: format!("no file {}", path),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        pages: u32,
    }

    impl ConfigProvider for MockConfig {
        fn list_url(&self) -> &str {
            "http://localhost/list?page="
        }

        fn site_base(&self) -> &str {
            "http://localhost/"
        }

        fn pages(&self) -> u32 {
            self.pages
        }

        fn output_path(&self) -> &str {
            "data"
        }

        fn output_file(&self) -> &str {
            "apartments.csv"
        }
    }

    /// Two cards per page; the second card's detail page fails.
    struct MockSource;

    #[async_trait]
    impl ListingSource for MockSource {
        async fn list_page(&self, page: u32) -> Result<Vec<ListingCard>> {
            Ok((0..2)
                .map(|i| ListingCard {
                    id: i,
                    price: Some(100_000 * u64::from(page) + i as u64),
                    details_url: format!("http://localhost/item/{}/{}", page, i),
                })
                .collect())
        }

        async fn details(&self, card: &ListingCard) -> Result<Vec<(String, String)>> {
            if card.id == 1 {
                return Err(PriceError::ScrapeError {
                    message: "HTTP 404".to_string(),
                });
            }
            Ok(vec![
                ("المدينة".to_string(), "نابلس".to_string()),
                ("عدد الغرف".to_string(), "4".to_string()),
                ("رقم الإعلان".to_string(), "123".to_string()),
            ])
        }
    }

    fn pipeline(pages: u32) -> ScrapePipeline<MockStorage, MockConfig, MockSource> {
        ScrapePipeline::new(MockStorage::new(), MockConfig { pages }, MockSource)
    }

    #[test]
    fn test_apply_detail_label_mapping() {
        let mut listing = RawListing::default();

        assert!(apply_detail(&mut listing, "مفروشة؟", "غير مفروشة"));
        assert!(apply_detail(&mut listing, " هل العقار مرهون ", "لا"));
        assert!(apply_detail(&mut listing, "المزايا الاضافية", "مصعد"));
        assert!(!apply_detail(&mut listing, "مفروشة", "نعم"));

        assert_eq!(listing.furnished.as_deref(), Some("غير مفروشة"));
        assert_eq!(listing.mortgaged.as_deref(), Some("لا"));
        assert_eq!(listing.extras.as_deref(), Some("مصعد"));
        assert_eq!(listing.city, None);
    }

    #[tokio::test]
    async fn test_extract_keeps_listing_when_details_fail() {
        let listings = pipeline(2).extract().await.unwrap();

        assert_eq!(listings.len(), 4);
        assert_eq!(
            listings.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );

        assert_eq!(listings[0].city.as_deref(), Some("نابلس"));
        assert_eq!(listings[0].num_rooms.as_deref(), Some("4"));
        assert!(listings[0].scraped_at.is_some());

        assert_eq!(listings[1].price, Some(100_001));
        assert_eq!(listings[1].city, None);
        assert_eq!(listings[1].scraped_at, None);

        assert_eq!(listings[2].price, Some(200_000));
    }

    #[tokio::test]
    async fn test_transform_writes_bom_and_header() {
        let p = pipeline(1);
        let mut listing = RawListing {
            id: 0,
            price: Some(250_000),
            details_url: "http://localhost/item/1".to_string(),
            ..Default::default()
        };
        listing.city = Some("رام الله".to_string());
        listing.extras = Some("مصعد, موقف سيارات".to_string());

        let output = p.transform(vec![listing]).await.unwrap();
        assert_eq!(output.listings.len(), 1);
        assert!(output.csv_output.starts_with(UTF8_BOM));

        let text = String::from_utf8(output.csv_output[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            "0,250000,http://localhost/item/1,رام الله,,,,,,,,,,\"مصعد, موقف سيارات\","
        );
    }

    #[tokio::test]
    async fn test_transform_empty_still_has_header() {
        let output = pipeline(1).transform(Vec::new()).await.unwrap();
        let text = String::from_utf8(output.csv_output[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER.join(","));
    }

    #[tokio::test]
    async fn test_load_writes_output_file() {
        let p = pipeline(1);
        let output = ScrapeOutput {
            listings: Vec::new(),
            csv_output: b"id\n".to_vec(),
        };

        let path = p.load(output).await.unwrap();
        assert_eq!(path, "data/apartments.csv");
        assert_eq!(
            p.storage.get_file("apartments.csv").await,
            Some(b"id\n".to_vec())
        );
    }
}
