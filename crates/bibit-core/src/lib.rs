//! Bibit Core - inference engine for chili-seedling recommendations
//!
//! Given four categorical plant-trait observations, Bibit recommends a chili
//! seedling variety with a previously trained classifier and explains the
//! recommendation in plain sentences.
//!
//! # Architecture
//!
//! A request flows through five stages:
//!
//! 1. **Validation** (`validator`): every value must belong to its feature's closed label set
//! 2. **Encoding** (`encoder`): labels become the integer codes the model was trained on
//! 3. **Prediction** (`predictor`): arg-max over the classifier's class distribution
//! 4. **Explanation** (`explanation`): a fixed (feature, label) → sentence table
//! 5. **Assembly** (`result`): one result with the display view front ends render
//!
//! The artifacts behind stages 2 and 3 are loaded once (`artifacts`) into a
//! [`RecommenderHandle`] that is either ready or unavailable for the whole
//! process.
//!
//! # Quick Start
//!
//! ```no_run
//! use bibit_core::{BibitConfig, FeatureInput, RecommenderHandle};
//!
//! let config = BibitConfig::load(None)?;
//! let handle = RecommenderHandle::from_config(&config);
//!
//! let input = FeatureInput::new("Ya", "Tidak", "Banyak", "Baik");
//! let view = handle.recommend(&input)?.view();
//! println!("Bibit terbaik: {} ({})", view.recommendation, view.probability);
//! # Ok::<(), bibit_core::BibitError>(())
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod explanation;
pub mod feature;
pub mod predictor;
pub mod recommender;
pub mod result;
pub mod validator;

// Re-export commonly used types for convenience
pub use artifacts::ModelArtifacts;
pub use classifier::{CategoricalNaiveBayes, Classifier, ClassifierArtifact};
pub use config::{ArtifactPaths, BibitConfig, ServerSettings};
pub use encoder::{EncoderBundle, LabelEncoder, TargetEncoder};
pub use error::{BibitError, Result, ResultExt};
pub use explanation::{explain, ExplanationStyle, ExplanationUnavailable, FALLBACK_SENTENCE};
pub use feature::{EncodedFeatures, Feature, FeatureInput, FeatureValues};
pub use predictor::{Prediction, PredictionEngine};
pub use recommender::{Recommender, RecommenderHandle};
pub use result::{assemble, format_percent, Recommendation, RecommendationView};
pub use validator::{validate, validate_input};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
