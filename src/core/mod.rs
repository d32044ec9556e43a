pub mod artifact;
pub mod encoder;
pub mod etl;
pub mod judgement;
pub mod regressor;
pub mod service;

pub use crate::domain::model::{FeatureVector, InputRecord, RawListing, ScrapeOutput};
pub use crate::domain::ports::{ConfigProvider, ListingSource, Pipeline, Regressor, Storage};
pub use crate::utils::error::Result;
