use super::*;
use crate::collab::{AnchoredAverageBlender, UngappedColumnScorer};
use crate::error::TransferError;
use crate::model::profile::{Profile, ProfileColumn};

struct FailingScorer;

impl PairwiseScorer for FailingScorer {
    fn score(&self, _a: &Profile, _b: &Profile) -> Result<f64> {
        Err(TransferError::Collaborator("scorer must not run".to_string()))
    }
}

struct FailingBlender;

impl ProfileBlender for FailingBlender {
    fn blend(&self, _profiles: &[Profile]) -> Result<Profile> {
        Err(TransferError::Collaborator("blender must not run".to_string()))
    }
}

fn gata(w: f64) -> Profile {
    let r = (1.0 - w) / 3.0;
    Profile::new(vec![
        ProfileColumn::new(r, r, w, r),
        ProfileColumn::new(w, r, r, r),
        ProfileColumn::new(r, r, r, w),
        ProfileColumn::new(w, r, r, r),
    ])
}

fn poly_c() -> Profile {
    Profile::new(vec![ProfileColumn::new(0.0, 1.0, 0.0, 0.0); 4])
}

fn collection() -> ReferenceCollection {
    ReferenceCollection::from_profiles(vec![
        ("GATA1".to_string(), gata(0.97)),
        ("GATA2".to_string(), gata(0.91)),
        ("GATA3".to_string(), gata(0.94)),
        ("SP1".to_string(), poly_c()),
        ("GATA4".to_string(), gata(0.88)),
    ])
}

fn pairs(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|(name, score)| (name.to_string(), *score))
        .collect()
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let coll = collection();
    let mut config = TransferConfig::default_v1();
    config.outlier_tolerance = -1.5;
    let err = TransferPipeline::new(config, &coll, &FailingScorer, &FailingBlender)
        .err()
        .unwrap();
    assert!(matches!(err, TransferError::Configuration(_)));
    assert!(!err.is_fatal_for_query());
}

#[test]
fn test_no_match_skips_lookup_filter_and_merge() {
    let empty = ReferenceCollection::default();
    let pipeline = TransferPipeline::new(
        TransferConfig::default_v1(),
        &empty,
        &FailingScorer,
        &FailingBlender,
    )
    .unwrap();
    let outcome = pipeline
        .run(&pairs(&[("GATA1", 0.2), ("SP1", 0.1)]))
        .unwrap();
    assert_eq!(outcome, TransferOutcome::NoTransfer { threshold: Some(0.5) });
    assert_eq!(outcome.state(), TransferState::NoTransfer);
}

#[test]
fn test_outlier_excluded_and_rest_merged() {
    let coll = collection();
    let scorer = UngappedColumnScorer::default();
    let blender = AnchoredAverageBlender { scorer };
    let mut config = TransferConfig::default_v1();
    config.similarity_threshold = 0.3;
    let pipeline = TransferPipeline::new(config, &coll, &scorer, &blender).unwrap();

    let outcome = pipeline
        .run(&pairs(&[
            ("GATA4", 0.81),
            ("SP1", 0.90),
            ("GATA1", 0.95),
            ("GATA2", 0.93),
            ("GATA3", 0.92),
        ]))
        .unwrap();
    let TransferOutcome::Transferred(result) = outcome else {
        panic!("expected a transfer");
    };

    let ranked: Vec<&str> = result.best_matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(ranked, vec!["GATA1", "GATA2", "GATA3", "SP1", "GATA4"]);
    assert_eq!(result.excluded_outliers.len(), 1);
    assert_eq!(result.excluded_outliers[0].name, "SP1");

    let contributors: Vec<&str> = result
        .consensus
        .contributors
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(contributors, vec!["GATA1", "GATA2", "GATA3", "GATA4"]);

    assert_eq!(result.consensus.columns.len(), 4);
    for column in &result.consensus.columns {
        assert_eq!(column.iter().sum::<u32>(), 100);
    }
    // G, A, T, A survive as the dominant bases
    assert!(result.consensus.columns[0][2] > 80);
    assert!(result.consensus.columns[1][0] > 80);
    assert!(result.consensus.columns[2][3] > 80);
    assert!(result.consensus.columns[3][0] > 80);
}

#[test]
fn test_best_matches_not_capped_by_merge_cap() {
    let coll = collection();
    let scorer = UngappedColumnScorer::default();
    let blender = AnchoredAverageBlender { scorer };
    let mut config = TransferConfig::default_v1();
    config.similarity_threshold = 0.3;
    config.merge_cap = 2;
    let pipeline = TransferPipeline::new(config, &coll, &scorer, &blender).unwrap();

    let outcome = pipeline
        .run(&pairs(&[("GATA1", 0.95), ("GATA2", 0.93), ("GATA3", 0.92)]))
        .unwrap();
    let TransferOutcome::Transferred(result) = outcome else {
        panic!("expected a transfer");
    };
    assert_eq!(result.best_matches.len(), 3);
    assert_eq!(result.consensus.contributors.len(), 2);
}

#[test]
fn test_single_match_used_directly() {
    let coll = collection();
    let mut config = TransferConfig::default_v1();
    config.similarity_threshold = 0.95;
    let pipeline = TransferPipeline::new(config, &coll, &FailingScorer, &FailingBlender).unwrap();

    let outcome = pipeline
        .run(&pairs(&[("GATA2", 0.91), ("GATA1", 0.97), ("SP1", 0.40)]))
        .unwrap();
    let TransferOutcome::Transferred(result) = outcome else {
        panic!("expected a transfer");
    };
    assert_eq!(result.best_matches, vec![LabeledCandidate::new("GATA1", 0.97)]);
    assert_eq!(result.consensus.columns[0], [1, 1, 97, 1]);
}

#[test]
fn test_missing_profile_is_fatal_lookup_error() {
    let coll = collection();
    let scorer = UngappedColumnScorer::default();
    let blender = AnchoredAverageBlender { scorer };
    let pipeline =
        TransferPipeline::new(TransferConfig::default_v1(), &coll, &scorer, &blender).unwrap();

    let err = pipeline
        .run(&pairs(&[("GATA1", 0.95), ("NOT_THERE", 0.9)]))
        .unwrap_err();
    assert!(matches!(err, TransferError::Lookup(_)));
    assert!(err.is_fatal_for_query());
}

#[test]
fn test_dynamic_threshold_from_config() {
    let coll = collection();
    let scorer = UngappedColumnScorer::default();
    let blender = AnchoredAverageBlender { scorer };
    let mut config = TransferConfig::default_v1();
    config.use_dynamic_threshold = true;
    config.similarity_threshold = 0.99;
    let pipeline = TransferPipeline::new(config, &coll, &scorer, &blender).unwrap();

    // top 0.8 -> medium tier 0.75; 0.7 stays out even though it clears low
    let outcome = pipeline
        .run(&pairs(&[("GATA1", 0.8), ("GATA2", 0.77), ("GATA3", 0.7)]))
        .unwrap();
    let TransferOutcome::Transferred(result) = outcome else {
        panic!("expected a transfer");
    };
    assert_eq!(result.threshold, Some(0.75));
    assert_eq!(result.best_matches.len(), 2);
}
