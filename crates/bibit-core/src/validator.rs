//! Input validation against each feature's closed label set

use crate::encoder::EncoderBundle;
use crate::error::{BibitError, Result};
use crate::feature::{Feature, FeatureInput, FeatureValues};

/// Check one raw value against `allowed` and return the stored label.
///
/// Leading and trailing whitespace is ignored and the comparison is
/// case-insensitive. The error carries the raw value as received.
pub fn validate(feature: Feature, raw_value: &str, allowed: &[String]) -> Result<String> {
    let needle = raw_value.trim();
    allowed
        .iter()
        .find(|label| label.to_lowercase() == needle.to_lowercase())
        .cloned()
        .ok_or_else(|| BibitError::invalid_value(feature, raw_value, allowed))
}

/// Validate all four fields of a request.
///
/// Fails on the first invalid feature in feature order; nothing is encoded
/// before every field has passed.
pub fn validate_input(input: &FeatureInput, encoders: &EncoderBundle) -> Result<FeatureValues> {
    let mut canonical: [String; 4] = Default::default();
    for feature in Feature::ALL {
        canonical[feature.index()] =
            validate(feature, input.get(feature), encoders.classes_of(feature))?;
    }
    Ok(FeatureValues::new(canonical))
}
