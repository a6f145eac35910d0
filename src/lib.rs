//! YELT Analytics - Catastrophe loss metrics from a year event loss table
//!
//! This library provides:
//! - Validated year event loss tables (YELT) loaded from columns, frames or CSV
//! - Aggregation to year loss tables (aggregate and largest-occurrence)
//! - Exceedance frequency and severity curves
//! - Losses at return periods by interpolation on exceedance frequency
//! - Layer losses with attachment, limit, franchise and occurrence cap
//! - Side-by-side EP summaries at standard return periods

pub mod config;
pub mod curves;
pub mod error;
pub mod layer;
pub mod summary;
pub mod yelt;
pub mod ylt;

// Re-export commonly used types
pub use config::AnalysisConfig;
pub use curves::{CurveKind, ExceedanceCurve};
pub use error::{ErrorKind, YeltError};
pub use layer::{Layer, LayeredYelt};
pub use summary::{EpSummaries, EpSummary, STANDARD_RETURN_PERIODS};
pub use yelt::{from_cols, from_csv, from_frame, LossRecord, YearEventLossTable};
pub use ylt::{YearLoss, YearLossTable};
