//! Input record → feature vector.
//!
//! The encoder reproduces the training-time preprocessing exactly: direct
//! fields are copied under their training column names, building age is
//! bucketed, the city is one-hot encoded against the training categories, and
//! the result is reindexed onto the artifact's column order. A column the
//! encoder did not produce is filled with 0 and a produced column the model
//! does not know is dropped.

use crate::core::artifact::ModelArtifact;
use crate::domain::model::{FeatureVector, InputRecord};
use std::collections::HashMap;

/// Default prefix of the one-hot city columns.
pub const CITY_PREFIX: &str = "المدينة_";

/// Scalar input fields and the training columns they feed.
///
/// Every field the model consumes must appear here; `ALL` drives both the
/// encoder and the startup schema check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectField {
    Rooms,
    Bathrooms,
    Furnished,
    Area,
    Floor,
    BuildingAge,
    Mortgaged,
    PaymentMethod,
    Elevator,
}

impl DirectField {
    pub const ALL: [DirectField; 9] = [
        DirectField::Rooms,
        DirectField::Bathrooms,
        DirectField::Furnished,
        DirectField::Area,
        DirectField::Floor,
        DirectField::BuildingAge,
        DirectField::Mortgaged,
        DirectField::PaymentMethod,
        DirectField::Elevator,
    ];

    /// Key in the request body.
    pub fn wire_name(self) -> &'static str {
        match self {
            DirectField::Rooms => "عدد_الغرف",
            DirectField::Bathrooms => "عدد_الحمامات",
            DirectField::Furnished => "مفروشة",
            DirectField::Area => "مساحة_البناء",
            DirectField::Floor => "الطابق",
            DirectField::BuildingAge => "عمر_البناء",
            DirectField::Mortgaged => "العقار_مرهون",
            DirectField::PaymentMethod => "طريقة_الدفع",
            DirectField::Elevator => "مصعد",
        }
    }

    /// Column name used when the model was trained.
    pub fn column(self) -> &'static str {
        match self {
            DirectField::Rooms => "عدد الغرف",
            DirectField::Bathrooms => "عدد الحمامات",
            DirectField::Furnished => "مفروشة",
            DirectField::Area => "مساحة البناء",
            DirectField::Floor => "الطابق",
            DirectField::BuildingAge => "عمر البناء",
            DirectField::Mortgaged => "العقار مرهون",
            DirectField::PaymentMethod => "طريقة الدفع",
            DirectField::Elevator => "مصعد",
        }
    }

    pub fn value(self, record: &InputRecord) -> f64 {
        match self {
            DirectField::Rooms => f64::from(record.rooms),
            DirectField::Bathrooms => f64::from(record.bathrooms),
            DirectField::Furnished => f64::from(record.furnished),
            DirectField::Area => record.area,
            DirectField::Floor => f64::from(record.floor),
            DirectField::BuildingAge => f64::from(bin_building_age(record.age)),
            DirectField::Mortgaged => f64::from(record.mortgaged),
            DirectField::PaymentMethod => f64::from(record.payment),
            DirectField::Elevator => f64::from(record.elevator),
        }
    }
}

/// Building age in years → ordinal bucket used at training time.
pub fn bin_building_age(age: u32) -> u8 {
    match age {
        0 => 0,
        1 => 1,
        2..=5 => 2,
        6..=9 => 3,
        10..=19 => 4,
        _ => 5,
    }
}

pub fn city_column(prefix: &str, city: &str) -> String {
    format!("{}{}", prefix, city)
}

/// Encode one record against the loaded artifact. Total: never fails.
pub fn encode<'a>(record: &InputRecord, artifact: &'a ModelArtifact) -> FeatureVector<'a> {
    let prefix = artifact.city_prefix();
    let cities = artifact.city_categories();

    let mut produced: HashMap<String, f64> =
        HashMap::with_capacity(DirectField::ALL.len() + cities.len());

    for field in DirectField::ALL {
        produced.insert(field.column().to_string(), field.value(record));
    }

    for city in cities {
        produced.insert(city_column(prefix, city), 0.0);
    }
    if cities.contains(&record.city) {
        produced.insert(city_column(prefix, &record.city), 1.0);
    } else {
        tracing::debug!("City '{}' not seen in training, no city signal", record.city);
    }

    reindex(&produced, artifact.feature_columns())
}

/// Project `produced` onto `columns`, filling gaps with 0.
pub fn reindex<'a>(produced: &HashMap<String, f64>, columns: &'a [String]) -> FeatureVector<'a> {
    let values = columns
        .iter()
        .map(|column| produced.get(column).copied().unwrap_or(0.0))
        .collect();
    FeatureVector::new(columns, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::regressor::{LinearModel, RegressorModel};

    fn columns() -> Vec<String> {
        let mut columns: Vec<String> = DirectField::ALL
            .iter()
            .map(|f| f.column().to_string())
            .collect();
        columns.push(city_column(CITY_PREFIX, "Ramallah"));
        columns.push(city_column(CITY_PREFIX, "Nablus"));
        columns.push(city_column(CITY_PREFIX, "Hebron"));
        columns
    }

    fn artifact() -> ModelArtifact {
        let columns = columns();
        let regressor = RegressorModel::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0; columns.len()],
        });
        ModelArtifact::from_parts(
            Box::new(regressor),
            columns,
            vec!["Ramallah".into(), "Nablus".into(), "Hebron".into()],
        )
        .unwrap()
    }

    fn record(city: &str, age: u32) -> InputRecord {
        InputRecord {
            rooms: 3,
            bathrooms: 2,
            furnished: 1,
            area: 120.0,
            floor: 2,
            age,
            mortgaged: 0,
            payment: 1,
            elevator: 1,
            parking: Some(1),
            city: city.to_string(),
        }
    }

    #[test]
    fn test_bin_building_age_table() {
        let ages = [0, 1, 3, 7, 15, 25];
        let buckets: Vec<u8> = ages.iter().map(|a| bin_building_age(*a)).collect();
        assert_eq!(buckets, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_bin_building_age_boundaries() {
        assert_eq!(bin_building_age(2), 2);
        assert_eq!(bin_building_age(5), 2);
        assert_eq!(bin_building_age(6), 3);
        assert_eq!(bin_building_age(9), 3);
        assert_eq!(bin_building_age(10), 4);
        assert_eq!(bin_building_age(19), 4);
        assert_eq!(bin_building_age(20), 5);
        assert_eq!(bin_building_age(u32::MAX), 5);
    }

    #[test]
    fn test_encode_known_city() {
        let artifact = artifact();
        let vector = encode(&record("Ramallah", 7), &artifact);

        assert_eq!(vector.columns(), artifact.feature_columns());
        assert_eq!(vector.get("عمر البناء"), Some(3.0));
        assert_eq!(vector.get("مساحة البناء"), Some(120.0));
        assert_eq!(vector.get("المدينة_Ramallah"), Some(1.0));
        assert_eq!(vector.get("المدينة_Nablus"), Some(0.0));
        assert_eq!(vector.get("المدينة_Hebron"), Some(0.0));
    }

    #[test]
    fn test_encode_unknown_city_is_all_zero() {
        let artifact = artifact();
        let vector = encode(&record("Gaza", 0), &artifact);

        let city_sum: f64 = vector
            .iter()
            .filter(|(name, _)| name.starts_with(CITY_PREFIX))
            .map(|(_, v)| v)
            .sum();
        assert_eq!(city_sum, 0.0);
        assert_eq!(vector.len(), artifact.feature_columns().len());
    }

    #[test]
    fn test_reindex_fills_missing_and_drops_extra() {
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut produced = HashMap::new();
        produced.insert("c".to_string(), 3.0);
        produced.insert("a".to_string(), 1.0);
        produced.insert("unknown".to_string(), 9.0);

        let vector = reindex(&produced, &columns);

        assert_eq!(vector.values(), &[1.0, 0.0, 3.0]);
        assert_eq!(vector.get("unknown"), None);
    }

    #[test]
    fn test_wire_and_column_names_are_unique() {
        let mut wires: Vec<&str> = DirectField::ALL.iter().map(|f| f.wire_name()).collect();
        let mut columns: Vec<&str> = DirectField::ALL.iter().map(|f| f.column()).collect();
        wires.sort();
        wires.dedup();
        columns.sort();
        columns.dedup();
        assert_eq!(wires.len(), DirectField::ALL.len());
        assert_eq!(columns.len(), DirectField::ALL.len());
    }
}
