//! Prediction engine: arg-max over the classifier's distribution

use serde::Serialize;
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::encoder::TargetEncoder;
use crate::error::{BibitError, Result};
use crate::feature::EncodedFeatures;

/// Probability tolerance when checking the classifier's output
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Outcome of one prediction, at full precision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Position of the predicted class
    pub class_index: usize,
    /// Label of the predicted class
    pub label: String,
    /// Probability of the predicted class
    pub probability: f64,
    /// `(label, probability)` for every class, in class order
    pub distribution: Vec<(String, f64)>,
}

/// Classifier plus target encoder, both immutable after load
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    classifier: Arc<dyn Classifier>,
    target: TargetEncoder,
}

impl PredictionEngine {
    /// Pair a classifier with its target encoder.
    ///
    /// The two must agree on the number of classes.
    pub fn new(classifier: Arc<dyn Classifier>, target: TargetEncoder) -> Result<Self> {
        if classifier.n_classes() != target.len() {
            return Err(BibitError::model_unavailable(format!(
                "classifier emits {} classes but the target encoder knows {}",
                classifier.n_classes(),
                target.len()
            )));
        }
        Ok(Self { classifier, target })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn target(&self) -> &TargetEncoder {
        &self.target
    }

    /// Predict the most likely class for an encoded feature vector.
    ///
    /// Ties go to the first class in the artifact's class order. That order
    /// comes from training and may change when the model is retrained.
    pub fn predict(&self, encoded: &EncodedFeatures) -> Result<Prediction> {
        let proba = self.classifier.predict_proba(encoded)?;
        self.check_distribution(&proba)?;

        let (class_index, probability) = argmax(&proba)
            .ok_or_else(|| BibitError::model_unavailable("classifier returned no classes"))?;

        let distribution = proba
            .iter()
            .enumerate()
            .map(|(i, &p)| -> Result<(String, f64)> {
                Ok((self.target.label_of(i)?.to_string(), p))
            })
            .collect::<Result<Vec<_>>>()?;

        let label = self.target.label_of(class_index)?.to_string();
        tracing::debug!(
            "{} predicted {} ({:.4}) for {:?}",
            self.classifier.name(),
            label,
            probability,
            encoded
        );

        Ok(Prediction {
            class_index,
            label,
            probability,
            distribution,
        })
    }

    fn check_distribution(&self, proba: &[f64]) -> Result<()> {
        if proba.len() != self.target.len() {
            return Err(BibitError::model_unavailable(format!(
                "classifier returned {} probabilities for {} classes",
                proba.len(),
                self.target.len()
            )));
        }
        if let Some(p) = proba
            .iter()
            .find(|p| !p.is_finite() || **p < -PROBABILITY_TOLERANCE || **p > 1.0 + PROBABILITY_TOLERANCE)
        {
            return Err(BibitError::model_unavailable(format!(
                "classifier returned probability {p}"
            )));
        }
        Ok(())
    }
}

/// Index and value of the maximum; the first one wins on ties
fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().fold(None, |best, (i, v)| match best {
        Some((_, b)) if v <= b => best,
        _ => Some((i, v)),
    })
}
