//! Per-swing analysis
//!
//! [`SwingAnalyzer`] combines the kinematics primitives into one flat
//! [`SwingMetrics`] record per swing.

mod analyzer;
mod metrics;

pub use analyzer::SwingAnalyzer;
pub use metrics::{MetricField, SwingMetrics};
