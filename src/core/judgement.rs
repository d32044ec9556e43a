use crate::domain::model::PriceJudgement;
use crate::utils::error::{PriceError, Result};
use serde::{Deserialize, Serialize};

/// Upper edges (exclusive) of the listed/predicted ratio bands, ascending.
/// A ratio at or above `overpriced_from` is overpriced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgementBands {
    pub suspicious_below: f64,
    pub good_deal_below: f64,
    pub fair_low_below: f64,
    pub overpriced_from: f64,
}

impl Default for JudgementBands {
    fn default() -> Self {
        Self {
            suspicious_below: 0.70,
            good_deal_below: 0.85,
            fair_low_below: 0.95,
            overpriced_from: 1.15,
        }
    }
}

impl JudgementBands {
    pub fn edges(&self) -> [f64; 4] {
        [
            self.suspicious_below,
            self.good_deal_below,
            self.fair_low_below,
            self.overpriced_from,
        ]
    }

    pub fn classify(&self, ratio: f64) -> PriceJudgement {
        if ratio < self.suspicious_below {
            PriceJudgement::SuspiciouslyUnderpriced
        } else if ratio < self.good_deal_below {
            PriceJudgement::GoodDeal
        } else if ratio < self.fair_low_below {
            PriceJudgement::FairLow
        } else if ratio < self.overpriced_from {
            PriceJudgement::FairPrice
        } else {
            PriceJudgement::Overpriced
        }
    }
}

/// listed / predicted
pub fn price_ratio(listed_price: f64, predicted_price: f64) -> Result<f64> {
    if !listed_price.is_finite() || listed_price <= 0.0 {
        return Err(PriceError::invalid_input(
            "listed_price",
            format!("must be a positive number, got {}", listed_price),
        ));
    }
    if predicted_price <= 0.0 {
        return Err(PriceError::inference(format!(
            "cannot judge a listing against a predicted price of {}",
            predicted_price
        )));
    }
    Ok(listed_price / predicted_price)
}
