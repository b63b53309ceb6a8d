use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// z value the cache-timing harness used for its confidence intervals
pub const CI_Z: f64 = 1.44;

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
pub fn std_deviation(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    Some(variance.sqrt())
}

/// Sample variance (`ddof = 1`), `None` for fewer than two values
pub fn sample_variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let data_mean = mean(data)?;
    Some(data.iter().map(|x| (x - data_mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64)
}

pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already sorted data, interpolating linearly between the closest ranks
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// One dimensional Gaussian kernel density estimate with Scott's rule bandwidth
#[derive(Debug, Clone)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: Option<f64>,
}

impl GaussianKde {
    pub fn new(data: &[f64]) -> Self {
        let factor = (data.len() as f64).powf(-1.0 / 5.0);
        let bandwidth = sample_variance(data)
            .map(|var| var.sqrt() * factor)
            .filter(|bw| *bw > 0.0 && bw.is_finite());
        Self {
            data: data.to_vec(),
            bandwidth,
        }
    }

    /// Kernel standard deviation, `None` when the data has no spread
    pub fn bandwidth(&self) -> Option<f64> {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self.bandwidth {
            Some(bw) => {
                let norm = 1.0 / (self.data.len() as f64 * bw * (2.0 * PI).sqrt());
                norm * self
                    .data
                    .iter()
                    .map(|xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                    .sum::<f64>()
            }
            // degenerate sample: a unit spike at the single value
            None => match self.data.first() {
                Some(v) if *v == x => 1.0,
                _ => 0.0,
            },
        }
    }
}

/// Everything needed to draw one violin
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinStats {
    pub coords: Vec<f64>,
    pub density: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub quantiles: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl ViolinStats {
    pub fn compute(samples: &[f64], points: usize, quantiles: &[f64]) -> Option<Self> {
        let sorted = sorted(samples);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let kde = GaussianKde::new(&sorted);
        let coords = linspace(min, max, points.max(1));
        let density = coords.iter().map(|x| kde.evaluate(*x)).collect();

        Some(Self {
            coords,
            density,
            mean: mean(&sorted)?,
            median: median(&sorted)?,
            quantiles: quantiles
                .iter()
                .filter_map(|q| quantile(&sorted, *q))
                .collect(),
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Half width of the confidence interval around the mean
    pub ci: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let sorted = sorted(samples);
        let std_dev = std_deviation(&sorted)?;
        Some(Self {
            n: sorted.len(),
            mean: mean(&sorted)?,
            std_dev,
            median: median(&sorted)?,
            min: *sorted.first()?,
            max: *sorted.last()?,
            ci: CI_Z * std_dev / (sorted.len() as f64).sqrt(),
        })
    }
}
