//! Categorical encoders
//!
//! A [`LabelEncoder`] maps a closed set of labels onto the dense code space
//! `[0, k)`: the code of a label is its position in `classes`. The training
//! side stores the classes sorted, the same way a scikit-learn `LabelEncoder`
//! does, so `["Tidak", "Ya"]` encodes `Tidak = 0` and `Ya = 1`.
//!
//! [`EncoderBundle`] owns one encoder per feature and is the authoritative
//! source of each feature's closed label set at run time.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{BibitError, Result};
use crate::feature::{EncodedFeatures, Feature, FeatureValues, FEATURE_COUNT};

/// Bijection between a closed label set and `[0, k)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

/// Target class labels and the indices the classifier emits
pub type TargetEncoder = LabelEncoder;

impl LabelEncoder {
    /// Build an encoder; labels must be non-empty and unique ignoring case
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(BibitError::model_unavailable("encoder has no classes"));
        }

        let mut seen = HashSet::new();
        for label in &classes {
            if label.trim().is_empty() {
                return Err(BibitError::model_unavailable("encoder has an empty label"));
            }
            if !seen.insert(label.to_lowercase()) {
                return Err(BibitError::model_unavailable(format!(
                    "encoder has duplicate label '{label}'"
                )));
            }
        }

        Ok(Self { classes })
    }

    /// Labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code of an exact (canonical) label
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Label of a code
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Label of a class index, for the target encoder
    pub fn label_of(&self, index: usize) -> Result<&str> {
        self.inverse_transform(index).ok_or_else(|| {
            BibitError::model_unavailable(format!(
                "class index {index} outside target encoder ({} classes)",
                self.len()
            ))
        })
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = BibitError;

    fn try_from(classes: Vec<String>) -> Result<Self> {
        Self::new(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

/// One encoder per feature, always complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderBundle {
    encoders: [LabelEncoder; FEATURE_COUNT],
}

impl EncoderBundle {
    /// Build a bundle from encoders in feature order
    pub fn new(encoders: [LabelEncoder; FEATURE_COUNT]) -> Self {
        Self { encoders }
    }

    /// Encoders as the training pipeline fits them on the standard labels
    pub fn standard() -> Self {
        Self::new(Feature::ALL.map(|feature| {
            let mut labels = feature.prompt_labels();
            labels.sort_unstable();
            LabelEncoder {
                classes: labels.iter().map(|l| l.to_string()).collect(),
            }
        }))
    }

    /// Build a bundle keyed by feature name, as stored on disk.
    ///
    /// Every feature must be present. Unknown keys are ignored.
    pub fn from_map(mut map: BTreeMap<String, LabelEncoder>) -> Result<Self> {
        let mut encoders = Vec::with_capacity(FEATURE_COUNT);
        let mut missing = Vec::new();
        for feature in Feature::ALL {
            match map.remove(feature.name()) {
                Some(encoder) => encoders.push(encoder),
                None => missing.push(feature.name()),
            }
        }
        if !missing.is_empty() {
            return Err(BibitError::model_unavailable(format!(
                "encoders tidak lengkap, missing: {}",
                missing.join(", ")
            )));
        }
        for extra in map.keys() {
            tracing::debug!("Ignoring encoder for unknown feature '{}'", extra);
        }

        let encoders: [LabelEncoder; FEATURE_COUNT] = encoders
            .try_into()
            .map_err(|_| BibitError::model_unavailable("encoder bundle has the wrong size"))?;
        Ok(Self { encoders })
    }

    /// Parse the `feature_encoders.json` artifact
    pub fn from_json(content: &str) -> Result<Self> {
        let map: BTreeMap<String, LabelEncoder> = serde_json::from_str(content)?;
        Self::from_map(map)
    }

    /// The encoder of one feature
    pub fn encoder(&self, feature: Feature) -> &LabelEncoder {
        &self.encoders[feature.index()]
    }

    /// Closed label set of a feature, in code order
    pub fn classes_of(&self, feature: Feature) -> &[String] {
        self.encoder(feature).classes()
    }

    /// Encode one canonical value
    pub fn encode(&self, feature: Feature, value: &str) -> Result<usize> {
        let encoder = self.encoder(feature);
        encoder
            .transform(value)
            .ok_or_else(|| BibitError::invalid_value(feature, value, encoder.classes()))
    }

    /// Encode four validated values into the classifier's input vector
    pub fn encode_all(&self, values: &FeatureValues) -> Result<EncodedFeatures> {
        let mut encoded = [0usize; FEATURE_COUNT];
        for (feature, value) in values.iter() {
            encoded[feature.index()] = self.encode(feature, value)?;
        }
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_codes_follow_class_order() {
        let enc = LabelEncoder::new(["Tidak", "Ya"]).unwrap();
        assert_eq!(enc.transform("Tidak"), Some(0));
        assert_eq!(enc.transform("Ya"), Some(1));
        assert_eq!(enc.transform("ya"), None);
        assert_eq!(enc.inverse_transform(1), Some("Ya"));
        assert_eq!(enc.inverse_transform(2), None);
    }

    #[test]
    fn test_label_encoder_rejects_bad_class_lists() {
        assert!(LabelEncoder::new(Vec::<String>::new()).is_err());
        assert!(LabelEncoder::new(["Ya", "YA"]).is_err());
        assert!(LabelEncoder::new(["Ya", " "]).is_err());
    }

    #[test]
    fn test_label_encoder_deserializes_from_list() {
        let enc: LabelEncoder = serde_json::from_str(r#"["Bara","Dewata"]"#).unwrap();
        assert_eq!(enc.len(), 2);
        assert!(serde_json::from_str::<LabelEncoder>("[]").is_err());
    }

    #[test]
    fn test_standard_bundle_is_sorted() {
        let bundle = EncoderBundle::standard();
        assert_eq!(bundle.classes_of(Feature::Umur), ["Tidak", "Ya"]);
        assert_eq!(bundle.classes_of(Feature::JumlahDaun), ["Banyak", "Sedikit"]);
        assert_eq!(bundle.classes_of(Feature::KondisiDaun), ["Baik", "Buruk"]);
    }

    #[test]
    fn test_encode() {
        let bundle = EncoderBundle::standard();
        assert_eq!(bundle.encode(Feature::Tinggi, "Ya").unwrap(), 1);
        assert_eq!(bundle.encode(Feature::KondisiDaun, "Buruk").unwrap(), 1);
        assert!(matches!(
            bundle.encode(Feature::Umur, "maybe"),
            Err(BibitError::InvalidFeatureValue { .. })
        ));
    }

    #[test]
    fn test_from_json_requires_every_feature() {
        let err = EncoderBundle::from_json(
            r#"{"umur":["Tidak","Ya"],"tinggi":["Tidak","Ya"],"jumlah_daun":["Banyak","Sedikit"]}"#,
        )
        .unwrap_err();
        assert!(err.is_model_unavailable());
        assert!(err.to_string().contains("kondisi_daun"));
    }

    #[test]
    fn test_from_json_matches_standard_bundle() {
        let json = r#"{
            "umur": ["Tidak", "Ya"],
            "tinggi": ["Tidak", "Ya"],
            "jumlah_daun": ["Banyak", "Sedikit"],
            "kondisi_daun": ["Baik", "Buruk"]
        }"#;
        assert_eq!(EncoderBundle::from_json(json).unwrap(), EncoderBundle::standard());
    }
}
