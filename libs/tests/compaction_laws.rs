use ark_bls12_381::Fr;
use ark_ec::{AffineRepr, CurveGroup};
use libs::group_structures::{compact_points, G1Affine, G2Affine, Identity};
use proptest::prelude::*;

fn g1_vector(pattern: &[bool]) -> Vec<G1Affine> {
    pattern
        .iter()
        .enumerate()
        .map(|(i, &at_infinity)| {
            if at_infinity {
                G1Affine::identity()
            } else {
                (G1Affine::generator() * Fr::from(i as u64 + 1)).into_affine()
            }
        })
        .collect()
}

fn g2_vector(pattern: &[bool]) -> Vec<G2Affine> {
    pattern
        .iter()
        .enumerate()
        .map(|(i, &at_infinity)| {
            if at_infinity {
                G2Affine::identity()
            } else {
                (G2Affine::generator() * Fr::from(i as u64 + 1)).into_affine()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lengths_add_up(pattern in prop::collection::vec(any::<bool>(), 0..24)) {
        let points = g1_vector(&pattern);
        let compacted = compact_points(&points);
        prop_assert_eq!(compacted.dense().len() as u64 + compacted.infinity_count(), points.len() as u64);
        prop_assert_eq!(compacted.infinity_at().len(), points.len());
        prop_assert_eq!(compacted.infinity_at(), pattern.as_slice());
    }

    #[test]
    fn expand_restores_input(pattern in prop::collection::vec(any::<bool>(), 0..24)) {
        let points = g1_vector(&pattern);
        prop_assert_eq!(compact_points(&points).expand(), points);
    }

    #[test]
    fn dense_keeps_relative_order(pattern in prop::collection::vec(any::<bool>(), 0..24)) {
        let points = g1_vector(&pattern);
        let expected: Vec<G1Affine> = points.iter().copied().filter(|p| !p.is_identity()).collect();
        let compacted = compact_points(&points);
        prop_assert_eq!(compacted.dense(), expected.as_slice());
    }

    #[test]
    fn g2_matches_g1(pattern in prop::collection::vec(any::<bool>(), 0..12)) {
        let c1 = compact_points(&g1_vector(&pattern));
        let c2 = compact_points(&g2_vector(&pattern));
        prop_assert_eq!(c1.infinity_at(), c2.infinity_at());
        prop_assert_eq!(c1.infinity_count(), c2.infinity_count());
        prop_assert_eq!(c2.expand(), g2_vector(&pattern));
    }
}
