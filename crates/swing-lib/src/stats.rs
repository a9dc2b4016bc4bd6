//! Small numeric helpers shared by the aggregators

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Weighted mean over the available components
///
/// Components whose value is `None` or not finite are dropped from both the
/// numerator and the denominator, so the remaining weights are re-normalized
/// instead of the missing inputs dragging the result towards zero.
pub fn weighted_average(components: &[(Option<f64>, f64)]) -> Option<f64> {
    let (sum, weight) = components
        .iter()
        .filter_map(|(value, w)| value.filter(|v| v.is_finite()).map(|v| (v * w, *w)))
        .fold((0.0, 0.0), |acc, (vw, w)| (acc.0 + vw, acc.1 + w));
    if weight <= f64::EPSILON {
        return None;
    }
    Some(sum / weight)
}

/// Plain mean of the finite, present terms
pub fn average_available(terms: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = terms
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    mean(&present)
}

/// Ratio with an absent result for a zero denominator
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}
