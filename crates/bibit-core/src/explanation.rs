//! Rule-based explanation of a recommendation
//!
//! Explanations read only the validated input values, never the prediction.
//! Each (feature, label) pair maps to one canned sentence; the sentences come
//! out in feature order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::feature::{Feature, FeatureValues};

/// Sentence returned in place of the explanation when a value has no rule
pub const FALLBACK_SENTENCE: &str = "[System] Penjelasan teknis tidak tersedia";

/// A value the rule table has no sentence for
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no explanation rule for {feature} = '{value}'")]
pub struct ExplanationUnavailable {
    pub feature: Feature,
    pub value: String,
}

/// One row of a rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplanationRule {
    pub feature: Feature,
    pub label: &'static str,
    pub sentence: &'static str,
}

const fn rule(feature: Feature, label: &'static str, sentence: &'static str) -> ExplanationRule {
    ExplanationRule {
        feature,
        label,
        sentence,
    }
}

static TECHNICAL_RULES: [ExplanationRule; 8] = [
    rule(Feature::Umur, "Ya", "Pilihan umur panen cepat cocok untuk varietas ini"),
    rule(Feature::Umur, "Tidak", "Varietas ini baik untuk pertumbuhan jangka panjang"),
    rule(Feature::Tinggi, "Ya", "Tanaman tinggi cocok untuk lahan luas"),
    rule(Feature::Tinggi, "Tidak", "Tanaman pendek ideal untuk lahan terbatas"),
    rule(Feature::JumlahDaun, "Banyak", "Daun rimbun meningkatkan produktivitas"),
    rule(Feature::JumlahDaun, "Sedikit", "Daun sedikit memudahkan perawatan"),
    rule(Feature::KondisiDaun, "Baik", "Kondisi daun optimal untuk hasil terbaik"),
    rule(
        Feature::KondisiDaun,
        "Buruk",
        "Varietas ini toleran terhadap kondisi daun kurang ideal",
    ),
];

static FARMER_RULES: [ExplanationRule; 8] = [
    rule(
        Feature::Umur,
        "Ya",
        "Bibit ini cocok untuk panen cepat, bisa dipanen dalam waktu singkat.",
    ),
    rule(
        Feature::Umur,
        "Tidak",
        "Bibit ini lebih baik untuk jangka panjang, hasil lebih besar tapi butuh waktu lebih lama.",
    ),
    rule(
        Feature::Tinggi,
        "Ya",
        "Tanaman ini tumbuh tinggi, cocok ditanam di lahan luas dan terbuka.",
    ),
    rule(
        Feature::Tinggi,
        "Tidak",
        "Tanaman pendek, cocok untuk lahan sempit atau dekat rumah.",
    ),
    rule(
        Feature::JumlahDaun,
        "Banyak",
        "Daunnya banyak, bisa mendukung pertumbuhan buah lebih banyak.",
    ),
    rule(
        Feature::JumlahDaun,
        "Sedikit",
        "Daunnya sedikit, mudah dirawat dan tidak terlalu lebat.",
    ),
    rule(
        Feature::KondisiDaun,
        "Baik",
        "Daun dalam kondisi bagus, tandanya tanaman sehat dan kuat.",
    ),
    rule(
        Feature::KondisiDaun,
        "Buruk",
        "Meski daun kurang bagus, bibit ini masih bisa tumbuh dengan baik.",
    ),
];

/// Which sentence table to explain with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStyle {
    /// Short agronomic statements
    #[default]
    Technical,
    /// Plain language for farmers
    Farmer,
}

impl ExplanationStyle {
    /// The rule table of this style
    pub fn rules(self) -> &'static [ExplanationRule] {
        match self {
            ExplanationStyle::Technical => &TECHNICAL_RULES,
            ExplanationStyle::Farmer => &FARMER_RULES,
        }
    }

    /// Sentence printed after the explanation list, if the style has one
    pub fn closing_remark(self) -> Option<&'static str> {
        match self {
            ExplanationStyle::Technical => {
                Some("Rekomendasi akhir berdasarkan kombinasi karakteristik yang paling sesuai.")
            }
            ExplanationStyle::Farmer => None,
        }
    }

    /// Sentence for one (feature, label) pair; labels match ignoring case
    pub fn sentence(
        self,
        feature: Feature,
        value: &str,
    ) -> Result<&'static str, ExplanationUnavailable> {
        self.rules()
            .iter()
            .find(|r| r.feature == feature && r.label.eq_ignore_ascii_case(value.trim()))
            .map(|r| r.sentence)
            .ok_or_else(|| ExplanationUnavailable {
                feature,
                value: value.to_string(),
            })
    }
}

impl fmt::Display for ExplanationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplanationStyle::Technical => f.write_str("technical"),
            ExplanationStyle::Farmer => f.write_str("farmer"),
        }
    }
}

impl FromStr for ExplanationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" | "teknis" => Ok(ExplanationStyle::Technical),
            "farmer" | "petani" => Ok(ExplanationStyle::Farmer),
            other => Err(format!("unknown explanation style '{other}'")),
        }
    }
}

/// Explain a set of input values.
///
/// Never fails: if any value has no rule the whole explanation collapses to
/// [`FALLBACK_SENTENCE`].
pub fn explain(values: &FeatureValues, style: ExplanationStyle) -> Vec<String> {
    match try_explain(values, style) {
        Ok(sentences) => sentences,
        Err(e) => {
            tracing::warn!("Explanation unavailable: {}", e);
            vec![FALLBACK_SENTENCE.to_string()]
        }
    }
}

/// Explain a set of input values, reporting the first value without a rule
pub fn try_explain(
    values: &FeatureValues,
    style: ExplanationStyle,
) -> Result<Vec<String>, ExplanationUnavailable> {
    values
        .iter()
        .map(|(feature, value)| style.sentence(feature, value).map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: [&str; 4]) -> FeatureValues {
        FeatureValues::new(v.map(String::from))
    }

    #[test]
    fn test_every_feature_label_pair_has_a_sentence() {
        for style in [ExplanationStyle::Technical, ExplanationStyle::Farmer] {
            for feature in Feature::ALL {
                for label in feature.prompt_labels() {
                    assert!(style.sentence(feature, label).is_ok(), "{style} {feature} {label}");
                }
            }
            assert_eq!(style.rules().len(), 8);
        }
    }

    #[test]
    fn test_positive_and_negative_sentences_differ() {
        for feature in Feature::ALL {
            let style = ExplanationStyle::Technical;
            assert_ne!(
                style.sentence(feature, feature.positive_label()).unwrap(),
                style.sentence(feature, feature.negative_label()).unwrap()
            );
        }
    }

    #[test]
    fn test_explain_follows_feature_order() {
        let sentences = explain(
            &values(["Ya", "Tidak", "Banyak", "Baik"]),
            ExplanationStyle::Technical,
        );
        assert_eq!(
            sentences,
            vec![
                "Pilihan umur panen cepat cocok untuk varietas ini",
                "Tanaman pendek ideal untuk lahan terbatas",
                "Daun rimbun meningkatkan produktivitas",
                "Kondisi daun optimal untuk hasil terbaik",
            ]
        );
    }

    #[test]
    fn test_explain_matches_labels_ignoring_case() {
        let sentences = explain(
            &values(["tidak", "YA", "sedikit", "buruk"]),
            ExplanationStyle::Farmer,
        );
        assert_eq!(sentences.len(), 4);
        assert!(sentences[1].contains("lahan luas"));
    }

    #[test]
    fn test_unknown_value_falls_back_to_single_sentence() {
        let sentences = explain(
            &values(["Ya", "Tidak", "Lebat", "Baik"]),
            ExplanationStyle::Technical,
        );
        assert_eq!(sentences, vec![FALLBACK_SENTENCE]);

        let err = try_explain(
            &values(["Ya", "Tidak", "Lebat", "Baik"]),
            ExplanationStyle::Technical,
        )
        .unwrap_err();
        assert_eq!(err.feature, Feature::JumlahDaun);
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Petani".parse::<ExplanationStyle>().unwrap(), ExplanationStyle::Farmer);
        assert_eq!("technical".parse::<ExplanationStyle>().unwrap(), ExplanationStyle::Technical);
        assert!("formal".parse::<ExplanationStyle>().is_err());
    }
}
