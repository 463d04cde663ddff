//! End-to-end tests of the recommendation pipeline against the fixture
//! artifacts in `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use bibit_core::{
    validate, ArtifactPaths, BibitConfig, BibitError, ExplanationStyle, Feature, FeatureInput,
    FeatureValues, ModelArtifacts, RecommenderHandle, FALLBACK_SENTENCE,
};
use proptest::prelude::*;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn handle() -> &'static RecommenderHandle {
    static HANDLE: OnceLock<RecommenderHandle> = OnceLock::new();
    HANDLE.get_or_init(|| {
        let handle =
            RecommenderHandle::from_config(&BibitConfig::new().with_artifacts_dir(fixtures_dir()));
        assert!(handle.is_ready(), "fixture artifacts failed to load: {handle:?}");
        handle
    })
}

fn copy_fixtures(to: &Path) {
    for name in [
        "model_naive_bayes.json",
        "feature_encoders.json",
        "target_encoder.json",
    ] {
        fs::copy(fixtures_dir().join(name), to.join(name)).unwrap();
    }
}

#[test]
fn test_scenario_fast_harvest_short_dense_healthy() {
    let rec = handle()
        .recommend(&FeatureInput::new("Ya", "Tidak", "Banyak", "Baik"))
        .unwrap();

    assert_eq!(
        rec.explanations,
        vec![
            "Pilihan umur panen cepat cocok untuk varietas ini",
            "Tanaman pendek ideal untuk lahan terbatas",
            "Daun rimbun meningkatkan produktivitas",
            "Kondisi daun optimal untuk hasil terbaik",
        ]
    );

    let view = rec.view();
    assert_eq!(view.recommendation, "Bara");
    assert_eq!(view.probability, "87.7%");
    assert_eq!(
        view.details,
        vec![
            ("Bara".to_string(), "87.7%".to_string()),
            ("Dewata".to_string(), "9.2%".to_string()),
            ("Sret".to_string(), "3.1%".to_string()),
        ]
    );
}

#[test]
fn test_scenario_slow_short_sparse_poor_leaves() {
    let rec = handle()
        .recommend(&FeatureInput::new("tidak", "TIDAK", " Sedikit ", "buruk"))
        .unwrap();

    assert_eq!(rec.label, "Sret");
    assert_eq!(rec.view().probability, "70.5%");
}

#[test]
fn test_scenario_invalid_umur() {
    let err = handle()
        .recommend(&FeatureInput::new("maybe", "Ya", "Banyak", "Baik"))
        .unwrap_err();

    match err {
        BibitError::InvalidFeatureValue {
            feature,
            value,
            mut allowed,
        } => {
            assert_eq!(feature, Feature::Umur);
            assert_eq!(value, "maybe");
            allowed.sort();
            assert_eq!(allowed, ["Tidak", "Ya"]);
        }
        other => panic!("expected InvalidFeatureValue, got {other}"),
    }
}

#[test]
fn test_scenario_artifacts_absent() {
    let dir = tempfile::tempdir().unwrap();
    let handle = RecommenderHandle::from_config(&BibitConfig::new().with_artifacts_dir(dir.path()));

    assert!(!handle.is_ready());
    for input in [
        FeatureInput::new("Ya", "Ya", "Banyak", "Baik"),
        FeatureInput::new("maybe", "Ya", "Banyak", "Baik"),
    ] {
        let err = handle.recommend(&input).unwrap_err();
        assert!(err.is_model_unavailable(), "unexpected error: {err}");
    }
}

#[test]
fn test_incomplete_encoder_bundle_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures(dir.path());
    fs::write(
        dir.path().join("feature_encoders.json"),
        r#"{"umur":["Tidak","Ya"],"tinggi":["Tidak","Ya"],"jumlah_daun":["Banyak","Sedikit"]}"#,
    )
    .unwrap();

    let err = ModelArtifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    assert!(err.is_model_unavailable());
    assert!(err.to_string().contains("kondisi_daun"));
}

#[test]
fn test_target_encoder_mismatch_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures(dir.path());
    fs::write(dir.path().join("target_encoder.json"), r#"["Bara","Dewata"]"#).unwrap();

    let handle =
        RecommenderHandle::from_config(&BibitConfig::new().with_artifacts_dir(dir.path()));
    assert!(matches!(handle, RecommenderHandle::Unavailable { .. }));
}

#[test]
fn test_corrupt_model_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures(dir.path());
    fs::write(dir.path().join("model_naive_bayes.json"), "{not json").unwrap();

    let err = ModelArtifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, BibitError::ModelUnavailable { .. }));
    assert!(err.reason().starts_with("parsing "));
    assert!(err.reason().contains("model_naive_bayes.json"));

    let handle = RecommenderHandle::from_config(&BibitConfig::new().with_artifacts_dir(dir.path()));
    match handle {
        RecommenderHandle::Unavailable { reason } => assert_eq!(reason, err.reason()),
        RecommenderHandle::Ready(_) => panic!("corrupt model loaded"),
    }
}

#[test]
fn test_farmer_style_uses_plain_sentences() {
    let config = BibitConfig::new()
        .with_artifacts_dir(fixtures_dir())
        .with_explanation_style(ExplanationStyle::Farmer);
    let rec = RecommenderHandle::from_config(&config)
        .recommend(&FeatureInput::new("Ya", "Tidak", "Banyak", "Baik"))
        .unwrap();

    assert_eq!(rec.explanations.len(), 4);
    assert!(rec.explanations[0].contains("panen cepat"));
    assert!(rec.explanations[1].contains("lahan sempit"));
    assert!(!rec.explanations.contains(&FALLBACK_SENTENCE.to_string()));
}

fn label_variant(label: &'static str) -> impl Strategy<Value = String> {
    (prop::collection::vec(any::<bool>(), label.len()), "[ \t]{0,2}", "[ \t]{0,2}").prop_map(
        move |(upper, pre, post)| {
            let cased: String = label
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();
            format!("{pre}{cased}{post}")
        },
    )
}

fn feature_strategy(feature: Feature) -> impl Strategy<Value = (&'static str, String)> {
    prop::sample::select(feature.prompt_labels().to_vec())
        .prop_flat_map(|label| label_variant(label).prop_map(move |raw| (label, raw)))
}

fn input_strategy() -> impl Strategy<Value = ([&'static str; 4], FeatureInput)> {
    (
        feature_strategy(Feature::Umur),
        feature_strategy(Feature::Tinggi),
        feature_strategy(Feature::JumlahDaun),
        feature_strategy(Feature::KondisiDaun),
    )
        .prop_map(|(a, b, c, d)| ([a.0, b.0, c.0, d.0], FeatureInput::new(a.1, b.1, c.1, d.1)))
}

proptest! {
    #[test]
    fn prop_case_and_whitespace_variants_canonicalize(
        (canonical, input) in input_strategy()
    ) {
        let handle = handle();
        let recommender = handle.ready().unwrap();
        for feature in Feature::ALL {
            let accepted = validate(feature, input.get(feature), recommender.classes_of(feature)).unwrap();
            prop_assert_eq!(accepted, canonical[feature.index()]);
        }
    }

    #[test]
    fn prop_values_outside_label_set_are_rejected(
        feature in prop::sample::select(Feature::ALL.to_vec()),
        raw in "[A-Za-z ]{0,10}",
    ) {
        let handle = handle();
        let allowed = handle.ready().unwrap().classes_of(feature).to_vec();
        prop_assume!(!allowed.iter().any(|l| l.eq_ignore_ascii_case(raw.trim())));

        match validate(feature, &raw, &allowed) {
            Err(BibitError::InvalidFeatureValue { feature: f, allowed: a, .. }) => {
                prop_assert_eq!(f, feature);
                prop_assert_eq!(a, allowed);
            }
            other => prop_assert!(false, "expected InvalidFeatureValue, got {:?}", other),
        }
    }

    #[test]
    fn prop_prediction_is_max_of_normalized_distribution(
        (_, input) in input_strategy()
    ) {
        let handle = handle();
        let rec = handle.recommend(&input).unwrap();
        let targets = handle.ready().unwrap().target_classes().to_vec();

        prop_assert!(targets.contains(&rec.label));
        prop_assert!((0.0..=1.0).contains(&rec.probability));

        let total: f64 = rec.distribution.iter().map(|(_, p)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-6);

        let max = rec.distribution.iter().map(|(_, p)| *p).fold(f64::MIN, f64::max);
        prop_assert_eq!(rec.probability, max);
        prop_assert_eq!(rec.distribution.len(), targets.len());
    }

    #[test]
    fn prop_explain_depends_only_on_input(
        (canonical, _) in input_strategy(),
        style in prop::sample::select(vec![ExplanationStyle::Technical, ExplanationStyle::Farmer]),
    ) {
        let values = FeatureValues::new(canonical.map(String::from));
        let first = bibit_core::explain(&values, style);
        let second = bibit_core::explain(&values, style);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 4);
    }
}
