use proptest::prelude::*;

use kmer_bench_viewer::data::filename::extract;
use kmer_bench_viewer::data::metrics::compute_errors;
use kmer_bench_viewer::data::model::Variant;
use kmer_bench_viewer::data::smooth::smooth_series;
use kmer_bench_viewer::ReportError;

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Plain),
        Just(Variant::Compressed),
        Just(Variant::Sketch),
    ]
}

proptest! {
    #[test]
    fn extract_returns_tag_and_last_digit_run(
        v in variant(),
        prefix in "[a-z_]{0,8}",
        first in 0u32..1000,
        last in 0u32..100_000,
    ) {
        // Exactly one tag in the name.
        prop_assume!(!Variant::ALL.iter().any(|t| prefix.contains(t.tag())));
        let name = format!("{prefix}-{first}-{}_k{last}.csv", v.tag());
        let key = extract(&name).unwrap();
        prop_assert_eq!(key.variant, v);
        prop_assert_eq!(key.parameter, last);
    }

    #[test]
    fn names_without_digits_are_not_recognized(v in variant(), stem in "[a-z_]{0,12}") {
        let name = format!("{stem}{}.csv", v.tag());
        let is_not_recognized = matches!(extract(&name), Err(ReportError::NotRecognized { .. }));
        prop_assert!(is_not_recognized);
    }

    #[test]
    fn names_without_tags_are_not_recognized(n in 0u32..1000) {
        let name = format!("consultas_btree_{n}.csv");
        prop_assert!(extract(&name).is_err());
    }

    #[test]
    fn unit_window_is_identity(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
        prop_assert_eq!(smooth_series(&values, 1, true), values.clone());
        prop_assert_eq!(smooth_series(&values, 0, false), values);
    }

    #[test]
    fn smoothing_preserves_length(
        values in prop::collection::vec(-1e6f64..1e6, 0..64),
        window in 1usize..40,
        centered in any::<bool>(),
    ) {
        prop_assert_eq!(smooth_series(&values, window, centered).len(), values.len());
    }

    #[test]
    fn smoothing_stays_within_input_range(
        values in prop::collection::vec(-1e3f64..1e3, 1..64),
        window in 1usize..20,
    ) {
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for v in smooth_series(&values, window, true) {
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }

    #[test]
    fn errors_are_non_negative_and_sign_symmetric(
        pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..64),
    ) {
        let real: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let estimated: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let s = compute_errors("q", &real, &estimated).unwrap();
        prop_assert!(s.absolute_error >= 0.0);
        prop_assert!(s.relative_error >= 0.0);

        // Swapping over/under-estimation around the real value gives the
        // same errors.
        let mirrored: Vec<f64> = real.iter().zip(&estimated).map(|(r, e)| 2.0 * r - e).collect();
        let m = compute_errors("q", &real, &mirrored).unwrap();
        prop_assert!((s.absolute_error - m.absolute_error).abs() < 1e-6);
        let tolerance = 1e-6 * s.relative_error.max(1.0);
        prop_assert!((s.relative_error - m.relative_error).abs() < tolerance);
    }

    #[test]
    fn relative_error_non_negative_for_positive_truth(
        pairs in prop::collection::vec((0f64..1e3, -1e3f64..1e3), 1..64),
    ) {
        let real: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let estimated: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let s = compute_errors("q", &real, &estimated).unwrap();
        prop_assert!(s.relative_error >= 0.0);
        prop_assert!(s.relative_error.is_finite());
    }

    #[test]
    fn mismatched_lengths_always_fail(a in 1usize..20, b in 1usize..20) {
        prop_assume!(a != b);
        let is_mismatch = matches!(
            compute_errors("q", &vec![1.0; a], &vec![1.0; b]),
            Err(ReportError::DimensionMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }
}
