//! Prediction service: validate → encode → infer → parking premium → round.

use crate::core::artifact::ModelArtifact;
use crate::core::encoder::{encode, DirectField};
use crate::core::judgement::{price_ratio, JudgementBands};
use crate::domain::model::{InputRecord, JudgeResponse};
use crate::domain::ports::Regressor;
use crate::utils::error::{PriceError, Result};
use crate::utils::validation::{validate_flag, validate_non_negative_real, Validate};

/// Market premium for units with a parking space. Not captured by the model.
pub const PARKING_PREMIUM: f64 = 1.011;

impl Validate for InputRecord {
    fn validate(&self) -> Result<()> {
        validate_flag(DirectField::Furnished.wire_name(), self.furnished)?;
        validate_flag(DirectField::Mortgaged.wire_name(), self.mortgaged)?;
        validate_flag(DirectField::Elevator.wire_name(), self.elevator)?;
        if let Some(parking) = self.parking {
            validate_flag("موقف_سيارات", parking)?;
        }
        validate_non_negative_real(DirectField::Area.wire_name(), self.area)?;
        Ok(())
    }
}

pub fn apply_parking_premium(raw: f64, has_parking: bool) -> f64 {
    if has_parking {
        raw * PARKING_PREMIUM
    } else {
        raw
    }
}

/// Two decimals, ties to even.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Debug)]
pub struct PredictionService {
    artifact: ModelArtifact,
    bands: JudgementBands,
}

impl PredictionService {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self {
            artifact,
            bands: JudgementBands::default(),
        }
    }

    pub fn with_bands(mut self, bands: JudgementBands) -> Self {
        self.bands = bands;
        self
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Raw model output for a validated record, before premium and rounding.
    pub fn raw_prediction(&self, record: &InputRecord) -> Result<f64> {
        record.validate()?;

        let features = encode(record, &self.artifact);
        let raw = self.artifact.regressor().predict(features.values())?;
        if !raw.is_finite() {
            return Err(PriceError::inference(format!(
                "model returned a non-finite value ({})",
                raw
            )));
        }
        Ok(raw)
    }

    pub fn predict(&self, record: &InputRecord) -> Result<f64> {
        let raw = self.raw_prediction(record)?;
        let price = round_price(apply_parking_premium(raw, record.has_parking()));

        tracing::debug!(
            "Predicted {} for {} rooms in '{}' (raw {}, parking {})",
            price,
            record.rooms,
            record.city,
            raw,
            record.has_parking()
        );
        Ok(price)
    }

    pub fn judge(&self, record: &InputRecord, listed_price: f64) -> Result<JudgeResponse> {
        let predicted_price = self.predict(record)?;
        let ratio = price_ratio(listed_price, predicted_price)?;

        Ok(JudgeResponse {
            predicted_price,
            listed_price,
            ratio,
            judgment_key: self.bands.classify(ratio),
        })
    }
}
