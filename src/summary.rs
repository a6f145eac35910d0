//! Exceedance probability summaries at standard return periods

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::Result;
use crate::yelt::YearEventLossTable;

/// Return periods (years) reported by default
pub const STANDARD_RETURN_PERIODS: [f64; 12] = [
    10000.0, 5000.0, 1000.0, 500.0, 250.0, 200.0, 100.0, 50.0, 25.0, 10.0, 5.0, 2.0,
];

/// Loss at one return period
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpPoint {
    #[serde(rename = "ReturnPeriod")]
    pub return_period: f64,
    #[serde(rename = "Loss")]
    pub loss: f64,
}

/// Losses at a set of return periods for one year-loss basis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpSummary {
    /// True for the largest event loss per year (OEP), false for the
    /// aggregate loss per year (AEP)
    pub is_occurrence: bool,
    pub points: Vec<EpPoint>,
}

impl EpSummary {
    pub fn losses(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.loss).collect()
    }

    /// Loss at a return period, if it was requested
    pub fn loss_at(&self, return_period: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.return_period == return_period)
            .map(|p| p.loss)
    }
}

/// One return period across all summary bases
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpSummaryRow {
    #[serde(rename = "ReturnPeriod")]
    pub return_period: f64,
    /// Aggregate loss per year
    #[serde(rename = "LossPerYear")]
    pub loss_per_year: f64,
    /// Largest event loss per year
    #[serde(rename = "MaxEventLossPerYear")]
    pub max_event_loss_per_year: f64,
    /// Event loss exceedance, when requested
    #[serde(rename = "EventLoss")]
    pub event_loss: Option<f64>,
}

/// Side-by-side EP curves keyed by return period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpSummaries {
    pub rows: Vec<EpSummaryRow>,
}

impl EpSummaries {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

impl YearEventLossTable {
    /// Year losses at the given return periods, on the aggregate
    /// (`is_occurrence = false`) or largest-event basis
    pub fn to_ep_summary(&self, return_periods: &[f64], is_occurrence: bool) -> EpSummary {
        let losses = self.to_ylt(is_occurrence).loss_at_rp(return_periods);

        EpSummary {
            is_occurrence,
            points: return_periods
                .iter()
                .zip(losses)
                .map(|(&return_period, loss)| EpPoint {
                    return_period,
                    loss,
                })
                .collect(),
        }
    }

    /// Aggregate and occurrence EP curves side by side, with the event loss
    /// exceedance curve as well when `is_eef` is set
    pub fn to_ep_summaries(&self, return_periods: &[f64], is_eef: bool) -> EpSummaries {
        let aep = self.to_ep_summary(return_periods, false);
        let oep = self.to_ep_summary(return_periods, true);
        let eef = is_eef.then(|| self.loss_at_rp(return_periods));

        let rows = aep
            .points
            .iter()
            .zip(&oep.points)
            .enumerate()
            .map(|(i, (a, o))| EpSummaryRow {
                return_period: a.return_period,
                loss_per_year: a.loss,
                max_event_loss_per_year: o.loss,
                event_loss: eef.as_ref().map(|e| e[i]),
            })
            .collect();

        EpSummaries { rows }
    }
}
