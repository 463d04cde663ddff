//! Result assembly and the caller-facing response shape

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::predictor::Prediction;

/// Everything one request produces, at full precision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Recommended variety
    pub label: String,
    /// Probability of the recommended variety, in `[0, 1]`
    pub probability: f64,
    /// Every variety with its probability, most likely first
    pub distribution: Vec<(String, f64)>,
    /// Explanation sentences in feature order
    pub explanations: Vec<String>,
}

/// Combine a prediction with its explanation.
///
/// The distribution is re-ordered by descending probability for display;
/// ties keep class order. The recommended label is the prediction's and is
/// never re-derived from the sorted list.
pub fn assemble(prediction: Prediction, explanations: Vec<String>) -> Recommendation {
    let mut distribution = prediction.distribution;
    distribution.sort_by(|a, b| b.1.total_cmp(&a.1));

    Recommendation {
        label: prediction.label,
        probability: prediction.probability,
        distribution,
        explanations,
    }
}

/// Format a probability as a one-decimal percentage, `0.8769 -> "87.7%"`
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

impl Recommendation {
    /// The display view with percentage strings
    pub fn view(&self) -> RecommendationView {
        RecommendationView {
            recommendation: self.label.clone(),
            probability: format_percent(self.probability),
            details: self
                .distribution
                .iter()
                .map(|(label, p)| (label.clone(), format_percent(*p)))
                .collect(),
            explanations: self.explanations.clone(),
        }
    }
}

/// Response shape rendered by the front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationView {
    pub recommendation: String,
    pub probability: String,
    /// Label -> percentage, serialized as a JSON object in display order
    #[serde(serialize_with = "ordered_map")]
    pub details: Vec<(String, String)>,
    pub explanations: Vec<String>,
}

fn ordered_map<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}
