use serde::{Deserialize, Serialize};

/// 單一請求的房屋屬性。欄位名稱為前端送出的阿拉伯文鍵，英文名稱作為別名。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "عدد_الغرف", alias = "rooms")]
    pub rooms: u32,

    #[serde(rename = "عدد_الحمامات", alias = "bathrooms")]
    pub bathrooms: u32,

    #[serde(rename = "مفروشة", alias = "furnished")]
    pub furnished: u8,

    #[serde(rename = "مساحة_البناء", alias = "area")]
    pub area: f64,

    #[serde(rename = "الطابق", alias = "floor")]
    pub floor: u32,

    #[serde(rename = "عمر_البناء", alias = "age")]
    pub age: u32,

    #[serde(rename = "العقار_مرهون", alias = "mortgaged")]
    pub mortgaged: u8,

    #[serde(rename = "طريقة_الدفع", alias = "payment")]
    pub payment: u32,

    #[serde(rename = "مصعد", alias = "elevator")]
    pub elevator: u8,

    /// Not a model feature; only drives the parking premium.
    #[serde(rename = "موقف_سيارات", alias = "parking", default)]
    pub parking: Option<u8>,

    #[serde(rename = "المدينة", alias = "city")]
    pub city: String,
}

impl InputRecord {
    pub fn has_parking(&self) -> bool {
        self.parking.unwrap_or(0) != 0
    }
}

/// Encoder output: one value per artifact column, in artifact order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    columns: &'a [String],
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    /// `values` must line up with `columns`; the encoder is the only producer.
    pub(crate) fn new(columns: &'a [String], values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeRequest {
    #[serde(flatten)]
    pub record: InputRecord,
    pub listed_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceJudgement {
    SuspiciouslyUnderpriced,
    GoodDeal,
    FairLow,
    FairPrice,
    Overpriced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResponse {
    pub predicted_price: f64,
    pub listed_price: f64,
    pub ratio: f64,
    pub judgment_key: PriceJudgement,
}

/// 列表頁上的一張卡片
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub id: usize,
    pub price: Option<u64>,
    pub details_url: String,
}

/// 抓取結果的一列，欄位順序即 CSV 欄位順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub id: usize,
    pub price: Option<u64>,
    pub details_url: String,
    pub city: Option<String>,
    pub num_rooms: Option<String>,
    pub furnished: Option<String>,
    pub floor: Option<String>,
    pub facade: Option<String>,
    pub mortgaged: Option<String>,
    pub num_bathrooms: Option<String>,
    pub area: Option<String>,
    pub age: Option<String>,
    pub payment: Option<String>,
    pub extras: Option<String>,
    pub scraped_at: Option<String>,
}

impl RawListing {
    pub fn from_card(card: &ListingCard) -> Self {
        Self {
            id: card.id,
            price: card.price,
            details_url: card.details_url.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub listings: Vec<RawListing>,
    pub csv_output: Vec<u8>,
}
