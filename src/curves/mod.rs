//! Exceedance curves and return-period interpolation
//!
//! Curves pair each loss with a rank-based empirical metric:
//! - **Exceedance frequency**: `rank (descending, ties = min) / n_yrs`
//! - **Severity**: `rank (ascending, ties = max) / record count`
//!
//! Return-period losses interpolate loss against exceedance frequency on the
//! unique-loss exceedance frequency curve.

mod exceedance;
mod interp;
pub mod rank;

pub use exceedance::{CurveKind, CurvePoint, ExceedanceCurve};
pub use interp::LinearInterpolator;
