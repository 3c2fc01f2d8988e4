//! Deterministic k-th order statistic in worst-case linear time.
//!
//! Median of medians over groups of five with a three-way partition, so
//! repeated values shrink the problem instead of stalling it. Values are
//! ordered by `f64::total_cmp`.

use std::cmp::Ordering;

const GROUP: usize = 5;

/// Value at 1-indexed rank `k` of `values` sorted ascending.
///
/// Returns `None` when `values` is empty or `k` is outside `1..=values.len()`.
/// The input is copied; the caller's slice is not reordered.
pub fn select(values: &[f64], k: usize) -> Option<f64> {
    if k == 0 || k > values.len() {
        return None;
    }
    let mut work = values.to_vec();
    Some(select_in_place(&mut work, k - 1))
}

/// Lower median (rank `(n + 1) / 2`).
#[inline]
pub fn median(values: &[f64]) -> Option<f64> {
    select(values, values.len().div_ceil(2))
}

/// Upper median (rank `n / 2 + 1`) of `values`; an empty buffer yields NaN.
pub(crate) fn upper_median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let k = values.len() / 2;
    select_in_place(&mut values, k)
}

/// 0-indexed selection on a scratch buffer the function may reorder and shrink.
fn select_in_place(work: &mut Vec<f64>, mut k: usize) -> f64 {
    loop {
        debug_assert!(k < work.len());
        if work.len() <= GROUP {
            work.sort_unstable_by(f64::total_cmp);
            return work[k];
        }
        let pivot = pivot_of(work);

        let mut less = Vec::new();
        let mut greater = Vec::new();
        let mut equal = 0usize;
        for &v in work.iter() {
            match v.total_cmp(&pivot) {
                Ordering::Less => less.push(v),
                Ordering::Greater => greater.push(v),
                Ordering::Equal => equal += 1,
            }
        }

        if k < less.len() {
            *work = less;
        } else if k < less.len() + equal {
            return pivot;
        } else {
            k -= less.len() + equal;
            *work = greater;
        }
    }
}

/// Median of the group medians; guarantees a 3/10 split on each side.
fn pivot_of(work: &[f64]) -> f64 {
    let mut medians: Vec<f64> = work
        .chunks(GROUP)
        .map(|chunk| {
            let mut group = [0.0f64; GROUP];
            let group = &mut group[..chunk.len()];
            group.copy_from_slice(chunk);
            group.sort_unstable_by(f64::total_cmp);
            group[(group.len() - 1) / 2]
        })
        .collect();
    let mid = (medians.len() - 1) / 2;
    select_in_place(&mut medians, mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut s = values.to_vec();
        s.sort_by(f64::total_cmp);
        s
    }

    #[test]
    fn rejects_empty_and_out_of_range_ranks() {
        assert_eq!(select(&[], 1), None);
        assert_eq!(select(&[1.0, 2.0], 0), None);
        assert_eq!(select(&[1.0, 2.0], 3), None);
    }

    #[test]
    fn small_inputs() {
        assert_eq!(select(&[4.0], 1), Some(4.0));
        assert_eq!(select(&[3.0, -1.0, 2.0], 1), Some(-1.0));
        assert_eq!(select(&[3.0, -1.0, 2.0], 2), Some(2.0));
        assert_eq!(select(&[3.0, -1.0, 2.0], 3), Some(3.0));
    }

    #[test]
    fn caller_slice_untouched() {
        let values = vec![5.0, 1.0, 4.0, 2.0, 3.0, 9.0, 0.0];
        let before = values.clone();
        assert_eq!(select(&values, 4), Some(3.0));
        assert_eq!(values, before);
    }

    #[test]
    fn many_duplicates() {
        let mut values = vec![7.0; 200];
        values.extend(std::iter::repeat(1.0).take(50));
        values.push(100.0);
        assert_eq!(select(&values, 1), Some(1.0));
        assert_eq!(select(&values, 50), Some(1.0));
        assert_eq!(select(&values, 51), Some(7.0));
        assert_eq!(select(&values, 250), Some(7.0));
        assert_eq!(select(&values, 251), Some(100.0));
    }

    #[test]
    fn median_is_lower_median() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn upper_median_ranks() {
        assert_eq!(upper_median(vec![2.5]), 2.5);
        assert_eq!(upper_median(vec![4.0, 1.0]), 4.0);
        assert_eq!(upper_median(vec![4.0, 1.0, 3.0, 2.0]), 3.0);
        assert_eq!(upper_median(vec![5.0, 1.0, 3.0]), 3.0);
        assert!(upper_median(Vec::new()).is_nan());
    }

    #[test]
    fn matches_sort_on_seeded_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f64> = (0..1000).map(|_| rng.gen_range(-1e3..1e3)).collect();
        let s = sorted(&values);
        for k in [1, 2, 17, 333, 500, 501, 999, 1000] {
            assert_eq!(select(&values, k), Some(s[k - 1]));
        }
    }

    proptest! {
        #[test]
        fn agrees_with_sorting(values in prop::collection::vec(-1e6f64..1e6, 1..300), r in 0usize..300) {
            let k = r % values.len() + 1;
            let s = sorted(&values);
            prop_assert_eq!(select(&values, k), Some(s[k - 1]));
        }
    }
}
