// Sample Reducer: min / median / max / mean of one sample array

use crate::models::Summary;

/// Reduces samples to a [`Summary`]. Returns `None` for an empty slice.
///
/// The median of an even-length window is the mean of the two central sorted
/// values. The mean is taken over the samples as given.
pub fn reduce(samples: &[f64]) -> Option<Summary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mid = n / 2;
    let med = if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    let min = sorted[0];
    let max = sorted[n - 1];

    // Summation rounding can push the mean a ulp past the extremes of a flat window.
    let avg = mean(samples).max(min).min(max);

    Some(Summary { min, med, max, avg })
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / (v.len() as f64)
}
