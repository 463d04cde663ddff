//! Loading the trained model artifacts
//!
//! The classifier, the feature encoders and the target encoder are produced
//! by training and read once at startup. Any missing, unreadable or
//! inconsistent artifact is reported as `ModelUnavailable`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::classifier::{Classifier, ClassifierArtifact};
use crate::config::ArtifactPaths;
use crate::encoder::{EncoderBundle, TargetEncoder};
use crate::error::{BibitError, Result, ResultExt};
use crate::feature::{EncodedFeatures, Feature, FEATURE_COUNT};

/// The three read-only artifacts, checked for consistency
#[derive(Clone)]
pub struct ModelArtifacts {
    classifier: Arc<dyn Classifier>,
    encoders: EncoderBundle,
    target: TargetEncoder,
}

impl fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("classifier", &self.classifier.name())
            .field("encoders", &self.encoders)
            .field("target", &self.target)
            .finish()
    }
}

impl ModelArtifacts {
    /// Bundle artifacts after checking they fit together
    pub fn new(
        classifier: Arc<dyn Classifier>,
        encoders: EncoderBundle,
        target: TargetEncoder,
    ) -> Result<Self> {
        if classifier.n_classes() != target.len() {
            return Err(BibitError::model_unavailable(format!(
                "classifier emits {} classes but the target encoder knows {}",
                classifier.n_classes(),
                target.len()
            )));
        }
        for feature in Feature::ALL {
            let known = classifier.n_categories(feature);
            let labels = encoders.classes_of(feature).len();
            if labels > known {
                return Err(BibitError::model_unavailable(format!(
                    "encoder for {feature} has {labels} labels but the classifier knows {known}"
                )));
            }
        }
        for encoded in encodable_inputs(&encoders) {
            classifier
                .predict_proba(&encoded)
                .with_context(|| format!("checking input {encoded:?}"))?;
        }

        Ok(Self {
            classifier,
            encoders,
            target,
        })
    }

    /// Read and check all three artifacts
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        Self::read_all(paths).map_err(BibitError::into_model_unavailable)
    }

    fn read_all(paths: &ArtifactPaths) -> Result<Self> {
        let model_path = paths.model_path();
        let classifier = ClassifierArtifact::from_json(&read_artifact(&model_path)?)
            .with_context(|| format!("parsing {}", model_path.display()))?
            .into_classifier();

        let encoders_path = paths.feature_encoders_path();
        let encoders = EncoderBundle::from_json(&read_artifact(&encoders_path)?)
            .with_context(|| format!("parsing {}", encoders_path.display()))?;

        let target_path = paths.target_encoder_path();
        let target: TargetEncoder = serde_json::from_str(&read_artifact(&target_path)?)
            .map_err(BibitError::from)
            .with_context(|| format!("parsing {}", target_path.display()))?;

        let artifacts = Self::new(Arc::from(classifier), encoders, target)?;
        tracing::info!(
            "Loaded {} with {} classes from {}",
            artifacts.classifier.name(),
            artifacts.target.len(),
            paths.dir.display()
        );
        Ok(artifacts)
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.classifier)
    }

    pub fn encoders(&self) -> &EncoderBundle {
        &self.encoders
    }

    pub fn target(&self) -> &TargetEncoder {
        &self.target
    }
}

/// Every code vector the encoders can produce
fn encodable_inputs(encoders: &EncoderBundle) -> Vec<EncodedFeatures> {
    let mut inputs = vec![[0usize; FEATURE_COUNT]];
    for feature in Feature::ALL {
        let n_labels = encoders.classes_of(feature).len();
        inputs = inputs
            .into_iter()
            .flat_map(|x| {
                (0..n_labels).map(move |code| {
                    let mut x = x;
                    x[feature.index()] = code;
                    x
                })
            })
            .collect();
    }
    inputs
}

fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(BibitError::from)
        .with_context(|| format!("reading {}", path.display()))
}
