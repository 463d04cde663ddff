//! Probabilistic classifiers
//!
//! The prediction engine only needs one capability from a trained model:
//! a probability distribution over target classes for an encoded feature
//! vector. [`Classifier`] is that seam; [`CategoricalNaiveBayes`] is the model
//! the training pipeline produces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BibitError, Result};
use crate::feature::{EncodedFeatures, Feature, FEATURE_COUNT};

/// A trained model mapping an encoded feature vector to class probabilities
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Probability of every class, indexed by class position
    fn predict_proba(&self, x: &EncodedFeatures) -> Result<Vec<f64>>;

    /// Number of target classes the model emits
    fn n_classes(&self) -> usize;

    /// Number of categories the model knows for one feature
    fn n_categories(&self, feature: Feature) -> usize;

    /// Short model name for logs
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Serialized classifier, tagged by model kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    CategoricalNaiveBayes(CategoricalNaiveBayes),
}

impl ClassifierArtifact {
    /// Parse the model artifact
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::CategoricalNaiveBayes(nb) => Box::new(nb),
        }
    }
}

/// Raw parameters as stored on disk, before shape checks
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NaiveBayesParams {
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<Vec<f64>>>,
}

/// Naive Bayes over categorical features.
///
/// `class_log_prior[c]` is `ln P(c)` and `feature_log_prob[f][c][k]` is
/// `ln P(x_f = k | c)`, the layout scikit-learn's `CategoricalNB` exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NaiveBayesParams", into = "NaiveBayesParams")]
pub struct CategoricalNaiveBayes {
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<Vec<f64>>>,
}

impl CategoricalNaiveBayes {
    /// Build a model from log parameters, checking every shape
    pub fn new(class_log_prior: Vec<f64>, feature_log_prob: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let n_classes = class_log_prior.len();
        if n_classes == 0 {
            return Err(BibitError::model_unavailable("classifier has no classes"));
        }
        check_log_probs("class_log_prior", &class_log_prior)?;
        if class_log_prior.iter().all(|p| !p.is_finite()) {
            return Err(BibitError::model_unavailable(
                "class_log_prior gives every class zero probability",
            ));
        }

        if feature_log_prob.len() != FEATURE_COUNT {
            return Err(BibitError::model_unavailable(format!(
                "classifier has {} features, expected {}",
                feature_log_prob.len(),
                FEATURE_COUNT
            )));
        }

        for (feature, per_class) in Feature::ALL.iter().zip(&feature_log_prob) {
            if per_class.len() != n_classes {
                return Err(BibitError::model_unavailable(format!(
                    "feature_log_prob[{feature}] has {} classes, expected {n_classes}",
                    per_class.len()
                )));
            }
            let n_categories = per_class[0].len();
            if n_categories == 0 {
                return Err(BibitError::model_unavailable(format!(
                    "feature_log_prob[{feature}] has no categories"
                )));
            }
            for row in per_class {
                if row.len() != n_categories {
                    return Err(BibitError::model_unavailable(format!(
                        "feature_log_prob[{feature}] is ragged"
                    )));
                }
                check_log_probs(feature.name(), row)?;
            }
            if let Some(k) =
                (0..n_categories).find(|&k| per_class.iter().all(|row| !row[k].is_finite()))
            {
                return Err(BibitError::model_unavailable(format!(
                    "category {k} of {feature} has zero probability under every class"
                )));
            }
        }

        Ok(Self {
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Build a model from plain probabilities, mostly for fixtures
    pub fn from_probabilities(
        class_prior: &[f64],
        feature_prob: &[Vec<Vec<f64>>],
    ) -> Result<Self> {
        let ln = |v: &[f64]| v.iter().map(|p| p.ln()).collect::<Vec<_>>();
        Self::new(
            ln(class_prior),
            feature_prob
                .iter()
                .map(|per_class| per_class.iter().map(Vec::as_slice).map(ln).collect())
                .collect(),
        )
    }

    /// Unnormalized joint log likelihood `ln P(c) + Σ ln P(x_f | c)`
    fn joint_log_likelihood(&self, x: &EncodedFeatures) -> Result<Vec<f64>> {
        let mut jll = self.class_log_prior.clone();
        for (feature, &code) in Feature::ALL.iter().zip(x.iter()) {
            let per_class = &self.feature_log_prob[feature.index()];
            for (c, score) in jll.iter_mut().enumerate() {
                let log_p = per_class[c].get(code).ok_or_else(|| {
                    BibitError::model_unavailable(format!(
                        "code {code} for {feature} outside the model's {} categories",
                        per_class[c].len()
                    ))
                })?;
                *score += log_p;
            }
        }
        Ok(jll)
    }
}

impl Classifier for CategoricalNaiveBayes {
    fn predict_proba(&self, x: &EncodedFeatures) -> Result<Vec<f64>> {
        let jll = self.joint_log_likelihood(x)?;

        // log-sum-exp normalization
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(BibitError::model_unavailable(
                "every class has zero likelihood for this input",
            ));
        }
        let exp: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|v| v / sum).collect())
    }

    fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    fn n_categories(&self, feature: Feature) -> usize {
        self.feature_log_prob[feature.index()][0].len()
    }

    fn name(&self) -> &str {
        "categorical_naive_bayes"
    }
}

impl TryFrom<NaiveBayesParams> for CategoricalNaiveBayes {
    type Error = BibitError;

    fn try_from(params: NaiveBayesParams) -> Result<Self> {
        Self::new(params.class_log_prior, params.feature_log_prob)
    }
}

impl From<CategoricalNaiveBayes> for NaiveBayesParams {
    fn from(nb: CategoricalNaiveBayes) -> Self {
        Self {
            class_log_prior: nb.class_log_prior,
            feature_log_prob: nb.feature_log_prob,
        }
    }
}

fn check_log_probs(what: &str, values: &[f64]) -> Result<()> {
    // ln p is at most 0; -inf is a zero probability
    match values.iter().find(|v| v.is_nan() || **v > 1e-9) {
        Some(v) => Err(BibitError::model_unavailable(format!(
            "{what} holds {v}, not a log probability"
        ))),
        None => Ok(()),
    }
}
