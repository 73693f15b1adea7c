//! Descriptive statistics over a single parameter

use serde::Serialize;

use crate::utils::round_to;

/// Number of equal-width value ranges in a distribution
pub const RANGE_BUCKETS: usize = 5;
/// How many extremes and outliers are reported
pub const TOP_N: usize = 5;

/// One value together with the station it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRange {
    pub range: String,
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    pub value: f64,
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Sample> for RankedValue {
    fn from(sample: &Sample) -> Self {
        Self {
            value: sample.value,
            station_name: sample.station_name.clone(),
            lat: sample.lat,
            lon: sample.lon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub outliers: Vec<f64>,
    pub ranges: Vec<ValueRange>,
    pub top_minimum: Vec<RankedValue>,
    pub top_maximum: Vec<RankedValue>,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub cv: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

pub fn summarize(samples: &[Sample]) -> Statistics {
    if samples.is_empty() {
        return Statistics::default();
    }

    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let n = values.len();
    let nf = n as f64;

    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);
    let min = sorted[0];
    let max = sorted[n - 1];

    let mean = values.iter().sum::<f64>() / nf;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    let std_dev = variance.sqrt();

    let outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() > 2.0 * std_dev)
        .take(TOP_N)
        .collect();

    let q1 = sorted[(nf * 0.25).floor() as usize];
    let q3 = sorted[((nf * 0.75).floor() as usize).min(n - 1)];
    let cv = if mean != 0.0 { std_dev / mean.abs() * 100.0 } else { 0.0 };

    let (skewness, kurtosis) = if std_dev > 0.0 {
        let moment = |power: i32| {
            values.iter().map(|v| ((v - mean) / std_dev).powi(power)).sum::<f64>() / nf
        };
        (moment(3), moment(4) - 3.0)
    } else {
        (0.0, 0.0)
    };

    let mut by_value: Vec<&Sample> = samples.iter().collect();
    by_value.sort_by(|a, b| a.value.total_cmp(&b.value));
    let top_minimum = by_value.iter().take(TOP_N).map(|s| RankedValue::from(*s)).collect();
    let top_maximum = by_value.iter().rev().take(TOP_N).map(|s| RankedValue::from(*s)).collect();

    Statistics {
        count: n,
        min,
        max,
        mean: round_to(mean, 2),
        median: round_to(median, 2),
        std_dev: round_to(std_dev, 2),
        outliers,
        ranges: value_ranges(&values, min, max),
        top_minimum,
        top_maximum,
        q1: round_to(q1, 2),
        q3: round_to(q3, 2),
        iqr: round_to(q3 - q1, 2),
        cv: round_to(cv, 2),
        skewness: round_to(skewness, 3),
        kurtosis: round_to(kurtosis, 3),
    }
}

/// Split `[min, max]` into equal-width ranges. Ranges are half-open except
/// the last, so every value lands in exactly one. Empty ranges are dropped
/// and the rest ordered by count, largest first.
fn value_ranges(values: &[f64], min: f64, max: f64) -> Vec<ValueRange> {
    let n = values.len();
    let percentage = |count: usize| (count as f64 / n as f64 * 100.0).round() as u32;

    if max <= min {
        return vec![ValueRange {
            range: range_label(min, max),
            start: min,
            end: max,
            count: n,
            percentage: 100,
        }];
    }

    let width = (max - min) / RANGE_BUCKETS as f64;
    let mut counts = [0usize; RANGE_BUCKETS];
    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(RANGE_BUCKETS - 1);
        counts[idx] += 1;
    }

    let mut ranges: Vec<ValueRange> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, count)| {
            let start = min + i as f64 * width;
            let end = if i == RANGE_BUCKETS - 1 { max } else { min + (i + 1) as f64 * width };
            ValueRange {
                range: range_label(start, end),
                start,
                end,
                count: *count,
                percentage: percentage(*count),
            }
        })
        .collect();

    ranges.sort_by(|a, b| b.count.cmp(&a.count));
    ranges
}

fn range_label(start: f64, end: f64) -> String {
    format!("{} - {}", round_to(start, 1), round_to(end, 1))
}
