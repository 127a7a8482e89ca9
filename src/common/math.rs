/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Signed change from the first to the last value.
pub fn net_change(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

/// `|value - reference| / reference`, or infinity when the reference is zero.
pub fn relative_distance(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return f64::INFINITY;
    }
    ((value - reference) / reference).abs()
}

pub fn max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

pub fn min(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}
