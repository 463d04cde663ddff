//! The four plant traits the recommender reads
//!
//! The set and order of features is fixed: `umur`, `tinggi`, `jumlah_daun`,
//! `kondisi_daun`. Encoded vectors, explanation sentences and artifact
//! layouts all follow this order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Number of features in a request
pub const FEATURE_COUNT: usize = 4;

/// One of the four fixed feature slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Age-to-harvest: fast harvest or not
    Umur,
    /// Plant height: tall or not
    Tinggi,
    /// Leaf density
    JumlahDaun,
    /// Leaf condition
    KondisiDaun,
}

impl Feature {
    /// All features in request order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Umur,
        Feature::Tinggi,
        Feature::JumlahDaun,
        Feature::KondisiDaun,
    ];

    /// Field name as used in requests and artifact files
    pub fn name(self) -> &'static str {
        match self {
            Feature::Umur => "umur",
            Feature::Tinggi => "tinggi",
            Feature::JumlahDaun => "jumlah_daun",
            Feature::KondisiDaun => "kondisi_daun",
        }
    }

    /// Human label for prompts
    pub fn title(self) -> &'static str {
        match self {
            Feature::Umur => "Umur",
            Feature::Tinggi => "Tinggi",
            Feature::JumlahDaun => "Jumlah Daun",
            Feature::KondisiDaun => "Kondisi Daun",
        }
    }

    /// Position in the encoded feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label the explanation rules treat as the positive case
    pub fn positive_label(self) -> &'static str {
        match self {
            Feature::Umur | Feature::Tinggi => "Ya",
            Feature::JumlahDaun => "Banyak",
            Feature::KondisiDaun => "Baik",
        }
    }

    /// The complement of [`Feature::positive_label`]
    pub fn negative_label(self) -> &'static str {
        match self {
            Feature::Umur | Feature::Tinggi => "Tidak",
            Feature::JumlahDaun => "Sedikit",
            Feature::KondisiDaun => "Buruk",
        }
    }

    /// Labels in prompt order, positive first (`Ya/Tidak`)
    pub fn prompt_labels(self) -> [&'static str; 2] {
        [self.positive_label(), self.negative_label()]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// Raw request: four free-form text fields, exactly as a caller sent them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInput {
    #[serde(default)]
    pub umur: String,
    #[serde(default)]
    pub tinggi: String,
    #[serde(default)]
    pub jumlah_daun: String,
    #[serde(default)]
    pub kondisi_daun: String,
}

impl FeatureInput {
    pub fn new(
        umur: impl Into<String>,
        tinggi: impl Into<String>,
        jumlah_daun: impl Into<String>,
        kondisi_daun: impl Into<String>,
    ) -> Self {
        Self {
            umur: umur.into(),
            tinggi: tinggi.into(),
            jumlah_daun: jumlah_daun.into(),
            kondisi_daun: kondisi_daun.into(),
        }
    }

    /// Raw value for one feature
    pub fn get(&self, feature: Feature) -> &str {
        match feature {
            Feature::Umur => &self.umur,
            Feature::Tinggi => &self.tinggi,
            Feature::JumlahDaun => &self.jumlah_daun,
            Feature::KondisiDaun => &self.kondisi_daun,
        }
    }
}

/// Four validated values in canonical casing, in feature order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureValues([String; FEATURE_COUNT]);

impl FeatureValues {
    pub fn new(values: [String; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, feature: Feature) -> &str {
        &self.0[feature.index()]
    }

    /// `(feature, value)` pairs in feature order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &str)> {
        Feature::ALL.into_iter().zip(self.0.iter().map(String::as_str))
    }
}

impl Index<Feature> for FeatureValues {
    type Output = str;

    fn index(&self, feature: Feature) -> &str {
        self.get(feature)
    }
}

/// Encoded feature vector fed to the classifier
pub type EncodedFeatures = [usize; FEATURE_COUNT];
