use super::*;
use crate::collab::UngappedColumnScorer;
use crate::model::profile::ProfileColumn;

/// Position-by-position dot product, no offsets.
struct AlignedDotScorer;

impl PairwiseScorer for AlignedDotScorer {
    fn score(&self, a: &Profile, b: &Profile) -> Result<f64> {
        Ok(a
            .columns()
            .iter()
            .zip(b.columns())
            .map(|(x, y)| x.dot(y))
            .sum())
    }
}

struct FailingScorer;

impl PairwiseScorer for FailingScorer {
    fn score(&self, _a: &Profile, _b: &Profile) -> Result<f64> {
        Err(TransferError::Collaborator("aligner exited with 1".to_string()))
    }
}

fn single(a: f64, c: f64, g: f64, t: f64) -> Profile {
    Profile::new(vec![ProfileColumn::new(a, c, g, t)])
}

fn cluster_with_outlier() -> Vec<Profile> {
    vec![
        single(0.97, 0.01, 0.01, 0.01),
        single(0.94, 0.02, 0.02, 0.02),
        single(0.01, 0.01, 0.01, 0.97),
        single(0.91, 0.03, 0.03, 0.03),
        single(0.95, 0.01, 0.03, 0.01),
    ]
}

#[test]
fn test_two_or_fewer_profiles_pass_through() {
    let profiles = vec![single(1.0, 0.0, 0.0, 0.0), single(0.0, 0.0, 0.0, 1.0)];
    for tolerance in [0.0, 0.5, 10.0] {
        let split = filter_outliers(profiles.clone(), tolerance, &FailingScorer).unwrap();
        assert_eq!(split.kept, profiles);
        assert!(split.excluded.is_empty());
    }
    let one = filter_outliers(vec![single(1.0, 0.0, 0.0, 0.0)], 0.0, &FailingScorer).unwrap();
    assert_eq!(one.kept.len(), 1);
}

#[test]
fn test_distance_matrix_symmetric_with_zero_diagonal() {
    let profiles = cluster_with_outlier();
    let dist = distance_matrix(&profiles, &AlignedDotScorer).unwrap();
    assert_eq!(dist.size(), 5);
    for i in 0..5 {
        assert_eq!(dist.get(i, i), 0.0);
        for j in 0..5 {
            assert_eq!(dist.get(i, j), dist.get(j, i));
            assert!((0.0..=1.0).contains(&dist.get(i, j)));
        }
    }
}

#[test]
fn test_far_profile_flagged_and_rest_kept_in_order() {
    let profiles = cluster_with_outlier();
    let dist = distance_matrix(&profiles, &AlignedDotScorer).unwrap();
    let outlier_row = dist.row_mean(2);
    for i in [0usize, 1, 3, 4] {
        assert!(outlier_row >= 3.0 * dist.row_mean(i));
    }

    let flags = outlier_flags(&dist, 0.5);
    assert_eq!(flags, vec![false, false, true, false, false]);

    let split = filter_outliers(profiles.clone(), 0.5, &AlignedDotScorer).unwrap();
    assert_eq!(split.excluded, vec![profiles[2].clone()]);
    assert_eq!(
        split.kept,
        vec![
            profiles[0].clone(),
            profiles[1].clone(),
            profiles[3].clone(),
            profiles[4].clone()
        ]
    );
}

#[test]
fn test_large_tolerance_keeps_everything() {
    let profiles = cluster_with_outlier();
    let split = filter_outliers(profiles, 10.0, &AlignedDotScorer).unwrap();
    assert_eq!(split.kept.len(), 5);
}

#[test]
fn test_identical_profiles_never_flagged() {
    let p = single(0.25, 0.25, 0.25, 0.25);
    let profiles = vec![p.clone(), p.clone(), p.clone(), p];
    let split = filter_outliers(profiles, 0.0, &AlignedDotScorer).unwrap();
    assert_eq!(split.kept.len(), 4);
}

#[test]
fn test_mean_and_row_means() {
    let profiles = vec![
        single(1.0, 0.0, 0.0, 0.0),
        single(1.0, 0.0, 0.0, 0.0),
        single(0.0, 1.0, 0.0, 0.0),
    ];
    let dist = distance_matrix(&profiles, &AlignedDotScorer).unwrap();
    assert!((dist.mean_distance() - 2.0 / 3.0).abs() < 1e-12);
    assert!((dist.row_mean(0) - 0.5).abs() < 1e-12);
    assert!((dist.row_mean(2) - 1.0).abs() < 1e-12);
}

#[test]
fn test_scorer_failure_propagates() {
    let profiles = cluster_with_outlier();
    let err = filter_outliers(profiles, 0.5, &FailingScorer).unwrap_err();
    assert!(matches!(err, TransferError::Collaborator(_)));
}

#[test]
fn test_works_with_offset_scorer_on_multi_column_profiles() {
    let gata = |w: f64| {
        let r = (1.0 - w) / 3.0;
        Profile::new(vec![
            ProfileColumn::new(r, r, w, r),
            ProfileColumn::new(w, r, r, r),
            ProfileColumn::new(r, r, r, w),
            ProfileColumn::new(w, r, r, r),
        ])
    };
    let poly_c = Profile::new(vec![ProfileColumn::new(0.0, 1.0, 0.0, 0.0); 4]);
    let profiles = vec![gata(0.97), gata(0.91), gata(0.94), poly_c, gata(0.88)];
    let split = filter_outliers(profiles, 0.5, &UngappedColumnScorer::default()).unwrap();
    assert_eq!(split.kept.len(), 4);
    assert_eq!(split.excluded.len(), 1);
    assert_eq!(split.excluded[0].columns()[0].c, 1.0);
}
