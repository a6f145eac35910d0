//! Return-period losses by linear interpolation on exceedance frequency

use crate::error::{Result, YeltError};
use crate::yelt::YearEventLossTable;
use crate::ylt::YearLossTable;

use super::exceedance::{CurveKind, ExceedanceCurve};

/// Piecewise linear interpolator with fixed values outside the table.
///
/// `xs` must be non-decreasing. Below `xs[0]` the result is `left`, above
/// the last x it is `right`. Where an x repeats, the last of its points wins.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    left: f64,
    right: f64,
}

impl LinearInterpolator {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>, left: f64, right: f64) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(xs.windows(2).all(|w| w[0] <= w[1]), "xs must be non-decreasing");
        Self {
            xs,
            ys,
            left,
            right,
        }
    }

    /// Loss as a function of exceedance frequency, read off an exceedance
    /// frequency curve with or without its index. Frequencies beyond the
    /// rarest loss give the largest loss; frequencies beyond the most common
    /// give zero. Severity curves are rejected.
    pub fn from_ef_curve(curve: &ExceedanceCurve) -> Result<Self> {
        match curve.kind() {
            CurveKind::ExceedanceFrequency => Ok(Self::from_ef_points(curve)),
            other => Err(YeltError::WrongCurveKind(other.metric_name())),
        }
    }

    fn from_ef_points(curve: &ExceedanceCurve) -> Self {
        let max_loss = curve.points().first().map(|p| p.loss).unwrap_or(0.0);
        Self::new(curve.metrics(), curve.losses(), max_loss, 0.0)
    }

    pub fn interpolate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        let n = self.xs.len();
        if n == 0 {
            return self.right;
        }
        if x < self.xs[0] {
            return self.left;
        }
        if x > self.xs[n - 1] {
            return self.right;
        }

        // First index with xs[i] > x; x lies in [xs[pos - 1], xs[pos])
        let pos = self.xs.partition_point(|&xi| xi <= x);
        if pos == n {
            return self.ys[n - 1];
        }

        let (x0, x1) = (self.xs[pos - 1], self.xs[pos]);
        let (y0, y1) = (self.ys[pos - 1], self.ys[pos]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// Interpolate losses at return periods. A non-positive return period gives NaN.
pub(crate) fn losses_at_return_periods(
    curve: &ExceedanceCurve,
    return_periods: &[f64],
) -> Vec<f64> {
    let interp = LinearInterpolator::from_ef_points(curve);
    return_periods
        .iter()
        .map(|&rp| {
            if rp > 0.0 {
                interp.interpolate(1.0 / rp)
            } else {
                f64::NAN
            }
        })
        .collect()
}

impl YearEventLossTable {
    /// Event losses at the given return periods, interpolated on exceedance
    /// frequency. Each return period is handled independently.
    pub fn loss_at_rp(&self, return_periods: &[f64]) -> Vec<f64> {
        losses_at_return_periods(&self.to_ef_curve(false), return_periods)
    }
}

impl YearLossTable {
    /// Year losses at the given return periods
    pub fn loss_at_rp(&self, return_periods: &[f64]) -> Vec<f64> {
        losses_at_return_periods(&self.to_ef_curve(false), return_periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::yelt::from_cols;
    use approx::assert_relative_eq;

    fn example_table() -> YearEventLossTable {
        let losses = [100.0, 50.0, 200.0];
        from_cols(&[1, 1, 2], &[1, 2, 3], &[10, 20, 30], &losses, 10).unwrap()
    }

    fn tied_table() -> YearEventLossTable {
        let losses = [10.0, 10.0, 10.0, 20.0];
        from_cols(&[1, 2, 2, 1], &[1, 2, 3, 4], &[5, 1, 3, 1], &losses, 4).unwrap()
    }

    #[test]
    fn test_interpolator_edges() {
        let interp =
            LinearInterpolator::new(vec![0.1, 0.2, 0.4], vec![30.0, 20.0, 0.0], 99.0, -1.0);
        assert_eq!(interp.interpolate(0.05), 99.0);
        assert_eq!(interp.interpolate(0.5), -1.0);
        assert_eq!(interp.interpolate(0.1), 30.0);
        assert_eq!(interp.interpolate(0.4), 0.0);
        assert_relative_eq!(interp.interpolate(0.3), 10.0, epsilon = 1e-9);
        assert!(interp.interpolate(f64::NAN).is_nan());
    }

    #[test]
    fn test_loss_at_rp_on_knots_and_between() {
        let losses = example_table().loss_at_rp(&[10.0, 5.0, 4.0]);
        assert_relative_eq!(losses[0], 200.0);
        assert_relative_eq!(losses[1], 100.0);
        assert_relative_eq!(losses[2], 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_loss_at_rp_boundaries() {
        let losses = example_table().loss_at_rp(&[0.0, -5.0, 1000.0, f64::INFINITY, 2.0, 1.0]);
        assert!(losses[0].is_nan());
        assert!(losses[1].is_nan());
        assert_eq!(losses[2], 200.0);
        assert_eq!(losses[3], 200.0);
        assert_eq!(losses[4], 0.0);
        assert_eq!(losses[5], 0.0);
    }

    #[test]
    fn test_loss_at_rp_order_independent() {
        let yelt = example_table();
        let forward = yelt.loss_at_rp(&[2.0, 4.0, 10.0, 50.0]);
        let mut backward = yelt.loss_at_rp(&[50.0, 10.0, 4.0, 2.0]);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_loss_at_rp_empty_table() {
        let empty = YearEventLossTable::new(Vec::new(), 10).unwrap();
        let losses = empty.loss_at_rp(&[100.0, -1.0]);
        assert_eq!(losses[0], 0.0);
        assert!(losses[1].is_nan());
    }

    #[test]
    fn test_ylt_loss_at_rp() {
        let ylt = example_table().to_ylt(false);
        let losses = ylt.loss_at_rp(&[100.0, 10.0, 5.0, 2.0]);
        assert_eq!(losses, vec![200.0, 200.0, 150.0, 0.0]);
    }

    #[test]
    fn test_interpolator_with_repeated_xs() {
        let interp = LinearInterpolator::new(
            vec![0.25, 0.5, 0.5, 0.5],
            vec![20.0, 10.0, 10.0, 10.0],
            20.0,
            0.0,
        );
        assert_eq!(interp.interpolate(0.5), 10.0);
        assert_relative_eq!(interp.interpolate(0.375), 15.0, epsilon = 1e-9);
        assert_eq!(interp.interpolate(0.75), 0.0);
    }

    #[test]
    fn test_keyed_ef_curve_matches_unique_curve() {
        let yelt = tied_table();
        let keyed = LinearInterpolator::from_ef_curve(&yelt.to_ef_curve(true)).unwrap();
        let unique = LinearInterpolator::from_ef_curve(&yelt.to_ef_curve(false)).unwrap();

        for rp in [1.0, 2.0, 8.0 / 3.0, 4.0, 10.0] {
            assert_relative_eq!(
                keyed.interpolate(1.0 / rp),
                unique.interpolate(1.0 / rp),
                epsilon = 1e-9
            );
        }
        assert_relative_eq!(keyed.interpolate(0.375), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_severity_curve_rejected() {
        let err = LinearInterpolator::from_ef_curve(&example_table().to_severity_curve(false))
            .unwrap_err();
        assert!(matches!(err, YeltError::WrongCurveKind("CProb")));
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }
}
