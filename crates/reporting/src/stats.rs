//! Small numeric primitives shared by the reporting modules.
//!
//! Division by zero and zero-variance inputs yield NaN, never an error;
//! callers decide whether NaN is displayed or excluded.

/// `num / den`, NaN when the denominator is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::NAN
    } else {
        num / den
    }
}

/// Pearson correlation coefficient of two equal-length series. NaN when
/// either series has zero variance or the series are empty.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n == 0 {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

/// Trailing simple moving average. The window shrinks at the head of the
/// series: position i averages the min(window, i + 1) most recent values.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut running = 0.0;

    for (i, &v) in values.iter().enumerate() {
        running += v;
        if i >= window {
            running -= values[i - window];
        }
        let span = (i + 1).min(window);
        out.push(running / span as f64);
    }
    out
}

/// Shift a series toward later positions by `by` steps, zero-filling the
/// head. Values pushed past the end are dropped.
pub fn shift_forward(values: &[f64], by: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    if by < values.len() {
        out[by..].copy_from_slice(&values[..values.len() - by]);
    }
    out
}
