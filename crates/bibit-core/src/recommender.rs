//! The request pipeline and the process-wide model handle

use std::sync::Arc;

use crate::artifacts::ModelArtifacts;
use crate::config::BibitConfig;
use crate::encoder::EncoderBundle;
use crate::error::{BibitError, Result};
use crate::explanation::{explain, ExplanationStyle};
use crate::feature::{Feature, FeatureInput};
use crate::predictor::PredictionEngine;
use crate::result::{assemble, Recommendation};
use crate::validator::validate_input;

/// Validates, encodes, predicts, explains and assembles one request
#[derive(Debug, Clone)]
pub struct Recommender {
    encoders: EncoderBundle,
    engine: PredictionEngine,
    style: ExplanationStyle,
}

impl Recommender {
    pub fn new(artifacts: ModelArtifacts, style: ExplanationStyle) -> Result<Self> {
        let engine = PredictionEngine::new(artifacts.classifier(), artifacts.target().clone())?;
        Ok(Self {
            encoders: artifacts.encoders().clone(),
            engine,
            style,
        })
    }

    /// Recommend a variety for one request.
    ///
    /// All four values are validated before anything is encoded; the first
    /// invalid one aborts the request.
    pub fn recommend(&self, input: &FeatureInput) -> Result<Recommendation> {
        let values = validate_input(input, &self.encoders)?;
        let encoded = self.encoders.encode_all(&values)?;
        let prediction = self.engine.predict(&encoded)?;
        let explanations = explain(&values, self.style);

        tracing::debug!(
            "Recommendation for {:?}: {} ({:.4})",
            values,
            prediction.label,
            prediction.probability
        );
        Ok(assemble(prediction, explanations))
    }

    /// Closed label set of a feature
    pub fn classes_of(&self, feature: Feature) -> &[String] {
        self.encoders.classes_of(feature)
    }

    /// Target varieties in class order
    pub fn target_classes(&self) -> &[String] {
        self.engine.target().classes()
    }

    pub fn style(&self) -> ExplanationStyle {
        self.style
    }
}

/// Outcome of the one-time startup load.
///
/// Built once, never mutated, shared read-only between requests.
#[derive(Debug, Clone)]
pub enum RecommenderHandle {
    Ready(Arc<Recommender>),
    Unavailable { reason: String },
}

impl RecommenderHandle {
    /// Load the artifacts named by `config`
    pub fn from_config(config: &BibitConfig) -> Self {
        let loaded = ModelArtifacts::load(&config.artifacts)
            .and_then(|artifacts| Recommender::new(artifacts, config.explanation_style));
        Self::from_result(loaded)
    }

    pub fn from_result(loaded: Result<Recommender>) -> Self {
        match loaded {
            Ok(recommender) => Self::Ready(Arc::new(recommender)),
            Err(e) => {
                tracing::error!("Model unavailable: {}", e);
                Self::Unavailable { reason: e.reason() }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The recommender, or `ModelUnavailable`
    pub fn ready(&self) -> Result<&Arc<Recommender>> {
        match self {
            Self::Ready(recommender) => Ok(recommender),
            Self::Unavailable { reason } => Err(BibitError::model_unavailable(reason.clone())),
        }
    }

    /// Serve one request
    pub fn recommend(&self, input: &FeatureInput) -> Result<Recommendation> {
        self.ready()?.recommend(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CategoricalNaiveBayes;
    use crate::encoder::TargetEncoder;

    fn recommender() -> Recommender {
        let feature = vec![vec![0.3, 0.7], vec![0.6, 0.4]];
        let classifier = CategoricalNaiveBayes::from_probabilities(
            &[0.5, 0.5],
            &[feature.clone(), feature.clone(), feature.clone(), feature],
        )
        .unwrap();
        let artifacts = ModelArtifacts::new(
            Arc::new(classifier),
            EncoderBundle::standard(),
            TargetEncoder::new(["Bara", "Dewata"]).unwrap(),
        )
        .unwrap();
        Recommender::new(artifacts, ExplanationStyle::Technical).unwrap()
    }

    #[test]
    fn test_recommend_end_to_end() {
        let rec = recommender()
            .recommend(&FeatureInput::new("ya", "ya", "sedikit", "buruk"))
            .unwrap();
        // every code is 1, where class Bara has 0.7 per feature
        assert_eq!(rec.label, "Bara");
        assert_eq!(rec.explanations.len(), 4);
        assert_eq!(rec.distribution[0].0, "Bara");
    }

    #[test]
    fn test_invalid_input_is_user_error() {
        let err = recommender()
            .recommend(&FeatureInput::new("maybe", "Ya", "Banyak", "Baik"))
            .unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_unavailable_handle_fails_every_request() {
        let handle =
            RecommenderHandle::from_result(Err(BibitError::model_unavailable("no model")));
        assert!(!handle.is_ready());

        for _ in 0..3 {
            let err = handle
                .recommend(&FeatureInput::new("Ya", "Ya", "Banyak", "Baik"))
                .unwrap_err();
            assert!(err.is_model_unavailable());
            assert!(err.to_string().contains("no model"));
        }
    }

    #[test]
    fn test_ready_handle_serves_requests() {
        let handle = RecommenderHandle::from_result(Ok(recommender()));
        assert!(handle.is_ready());
        assert!(handle
            .recommend(&FeatureInput::new("Tidak", "Tidak", "Banyak", "Baik"))
            .is_ok());
    }
}
