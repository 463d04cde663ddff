//! Interactive prompt loop
//!
//! Asks for the four traits one by one and re-asks until each answer is in
//! that feature's label set, so the request that reaches the recommender is
//! always valid.

use anyhow::{bail, Result};
use bibit_core::{validate, Feature, FeatureInput, Recommender};
use std::io::{BufRead, Write};

/// Labels of a feature as offered to the user, positive label first
pub fn offered_labels(feature: Feature, classes: &[String]) -> Vec<String> {
    let mut labels = classes.to_vec();
    labels.sort_by_key(|l| !l.eq_ignore_ascii_case(feature.positive_label()));
    labels
}

/// Ask for one feature until the answer is valid
pub fn ask(
    input: &mut impl BufRead,
    out: &mut impl Write,
    feature: Feature,
    classes: &[String],
) -> Result<String> {
    let offered = offered_labels(feature, classes);
    loop {
        write!(out, "- {} ({}): ", feature.title(), offered.join("/"))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before {} was answered", feature);
        }

        match validate(feature, &line, classes) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Rejected answer: {}", e);
                writeln!(out, "Error: Hanya menerima {}", offered.join(", "))?;
            }
        }
    }
}

/// Collect all four answers
pub fn collect(
    input: &mut impl BufRead,
    out: &mut impl Write,
    recommender: &Recommender,
) -> Result<FeatureInput> {
    let mut answers: [String; 4] = Default::default();
    for feature in Feature::ALL {
        answers[feature.index()] = ask(input, out, feature, recommender.classes_of(feature))?;
    }
    let [umur, tinggi, jumlah_daun, kondisi_daun] = answers;
    Ok(FeatureInput::new(umur, tinggi, jumlah_daun, kondisi_daun))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ya_tidak() -> Vec<String> {
        vec!["Tidak".to_string(), "Ya".to_string()]
    }

    #[test]
    fn test_offered_labels_put_positive_first() {
        assert_eq!(offered_labels(Feature::Umur, &ya_tidak()), ["Ya", "Tidak"]);
        let daun = vec!["Banyak".to_string(), "Sedikit".to_string()];
        assert_eq!(offered_labels(Feature::JumlahDaun, &daun), ["Banyak", "Sedikit"]);
    }

    #[test]
    fn test_ask_reprompts_until_valid() {
        let mut input = Cursor::new("mungkin\n\n  tIdAk \n");
        let mut out = Vec::new();

        let value = ask(&mut input, &mut out, Feature::Umur, &ya_tidak()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(value, "Tidak");
        assert_eq!(text.matches("- Umur (Ya/Tidak): ").count(), 3);
        assert_eq!(text.matches("Error: Hanya menerima Ya, Tidak").count(), 2);
    }

    #[test]
    fn test_ask_fails_on_closed_input() {
        let mut input = Cursor::new("salah\n");
        let mut out = Vec::new();
        assert!(ask(&mut input, &mut out, Feature::Tinggi, &ya_tidak()).is_err());
    }
}
