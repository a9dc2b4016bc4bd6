//! Per-field statistics across the swings of a session

use crate::calibration::ScoringCalibration;
use crate::stats::{mean, population_std_dev};
use crate::swing::{MetricField, SwingMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one metric field over the swings where it was measured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAggregate {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
    /// `max(0, 100 - k * std_dev)`, higher is more repeatable
    pub consistency: f64,
}

impl FieldAggregate {
    /// `None` when no finite value is present
    pub fn from_values(values: &[f64], scoring: &ScoringCalibration) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mean = mean(&finite)?;
        let std_dev = population_std_dev(&finite)?;
        Some(Self {
            count: finite.len(),
            mean,
            max: finite.iter().copied().fold(f64::MIN, f64::max),
            min: finite.iter().copied().fold(f64::MAX, f64::min),
            std_dev,
            consistency: scoring.consistency(std_dev),
        })
    }
}

/// Aggregate every tracked field; fields never measured are left out
pub fn aggregate_fields(
    metrics: &[SwingMetrics],
    scoring: &ScoringCalibration,
) -> BTreeMap<MetricField, FieldAggregate> {
    MetricField::ALL
        .iter()
        .filter_map(|field| {
            let values: Vec<f64> = metrics.iter().filter_map(|m| field.value(m)).collect();
            FieldAggregate::from_values(&values, scoring).map(|agg| (*field, agg))
        })
        .collect()
}
