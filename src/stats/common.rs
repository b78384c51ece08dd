// Sample statistics used alongside the chain model (e.g. on discretized return series)

use ndarray::{s, ArrayView1};

use crate::error::StatsError;

// Unbiased covariance of two equally long samples, each centered on its own mean
fn covariance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let len = x.len() as f64;
    let x_mean = x.sum() / len;
    let y_mean = y.sum() / len;
    let centered = (&x - x_mean) * (&y - y_mean);
    centered.sum() / (len - 1.)
}

// Auto-covariance of a sample for lags 0..=n_lags
pub fn acvar(sample: &[f64], n_lags: usize) -> Result<Vec<f64>, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    // every lag needs at least two overlapping pairs
    let required = n_lags + 2;
    if sample.len() < required {
        return Err(StatsError::InsufficientSample {
            len: sample.len(),
            required,
        });
    }

    let sample = ArrayView1::from(sample);
    let n = sample.len();
    Ok((0..=n_lags)
        .map(|lag| covariance(sample.slice(s![lag..]), sample.slice(s![..n - lag])))
        .collect())
}

// Second centered moment (population variance)
pub fn c_moment_2(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(ArrayView1::from(sample).var(0.))
}

// Fourth centered moment, i.e. Pearson kurtosis times the squared variance
pub fn c_moment_4(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let sample = ArrayView1::from(sample);
    let len = sample.len() as f64;
    let mean = sample.sum() / len;
    Ok(sample.mapv(|x| (x - mean).powi(4)).sum() / len)
}
