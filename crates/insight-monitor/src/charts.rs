//! Chart data preparation.

/// Points for the defined values; x is the position in the series.
pub fn points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
        .collect()
}

/// Y-axis bounds covering every dataset, with a 5% margin.
pub fn axis_bounds(datasets: &[&[(f64, f64)]]) -> [f64; 2] {
    let (min, max) = datasets
        .iter()
        .flat_map(|d| d.iter().map(|&(_, y)| y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

/// Low, middle and high labels for a numeric axis.
pub(crate) fn value_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect()
}

/// First, middle and last labels for a date axis.
pub(crate) fn date_labels<T: ToString>(dates: &[T]) -> Vec<String> {
    match dates.len() {
        0 => Vec::new(),
        1 => vec![dates[0].to_string()],
        n => vec![
            dates[0].to_string(),
            dates[n / 2].to_string(),
            dates[n - 1].to_string(),
        ],
    }
}
