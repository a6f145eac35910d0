//! Exceedance-frequency and severity curves

use std::cmp::Ordering;
use std::io::Write;

use csv::Writer;
use log::debug;

use crate::error::Result;
use crate::yelt::{LossRecord, YearEventLossTable, COL_DAY, COL_EVENT, COL_LOSS, COL_YEAR};
use crate::ylt::{YearLoss, YearLossTable};

use super::rank::{cmp_f64, rank_ascending_max, rank_descending_min};

/// Which empirical metric a curve carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Expected number of losses per year at least this large
    ExceedanceFrequency,
    /// P(X <= x | a loss occurred)
    Severity,
}

impl CurveKind {
    pub fn metric_name(&self) -> &'static str {
        match self {
            CurveKind::ExceedanceFrequency => "ExFreq",
            CurveKind::Severity => "CProb",
        }
    }

    /// Row order of the curve. Exceedance frequency: loss descending, then
    /// metric ascending, year descending, day descending. Severity: all
    /// ascending.
    fn compare(&self, a: &CurvePoint, b: &CurvePoint) -> Ordering {
        match self {
            CurveKind::ExceedanceFrequency => cmp_f64(b.loss, a.loss)
                .then(cmp_f64(a.metric, b.metric))
                .then(b.year.cmp(&a.year))
                .then(b.day_of_year.cmp(&a.day_of_year)),
            CurveKind::Severity => cmp_f64(a.loss, b.loss)
                .then(cmp_f64(a.metric, b.metric))
                .then(a.year.cmp(&b.year))
                .then(a.day_of_year.cmp(&b.day_of_year)),
        }
    }
}

/// A row of a curve. The key fields are `None` once the curve has dropped
/// its source index, and a YLT curve only ever carries the year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Zero-based position along the curve
    pub order: usize,
    pub loss: f64,
    /// Exceedance frequency or cumulative probability, per [`CurveKind`]
    pub metric: f64,
    pub year: Option<u32>,
    pub event_id: Option<i64>,
    pub day_of_year: Option<i64>,
}

impl CurvePoint {
    fn for_event(record: &LossRecord, metric: f64) -> Self {
        Self {
            order: 0,
            loss: record.loss,
            metric,
            year: Some(record.year),
            event_id: Some(record.event_id),
            day_of_year: Some(record.day_of_year),
        }
    }

    fn for_year(row: &YearLoss, metric: f64) -> Self {
        Self {
            order: 0,
            loss: row.loss,
            metric,
            year: Some(row.year),
            event_id: None,
            day_of_year: None,
        }
    }

    fn drop_key(&mut self) {
        self.year = None;
        self.event_id = None;
        self.day_of_year = None;
    }

    pub fn has_key(&self) -> bool {
        self.year.is_some()
    }
}

/// Loss curve ordered per its [`CurveKind`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExceedanceCurve {
    kind: CurveKind,
    points: Vec<CurvePoint>,
}

impl ExceedanceCurve {
    /// Sort the rows with a single multi-key comparator. Without
    /// `keep_index` the key columns are dropped and only the first row per
    /// distinct (loss, metric) is kept.
    fn build(kind: CurveKind, mut points: Vec<CurvePoint>, keep_index: bool) -> Self {
        let n_rows = points.len();

        points.sort_by(|a, b| kind.compare(a, b));

        if !keep_index {
            points.iter_mut().for_each(CurvePoint::drop_key);
            points.dedup_by(|later, kept| later.loss == kept.loss && later.metric == kept.metric);
        }

        for (order, point) in points.iter_mut().enumerate() {
            point.order = order;
        }

        debug!(
            "Built {} curve: {} rows from {}",
            kind.metric_name(),
            points.len(),
            n_rows
        );

        Self { kind, points }
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn losses(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.loss).collect()
    }

    pub fn metrics(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.metric).collect()
    }

    /// Write the curve as CSV with an `Order` column, the loss, the metric
    /// and, when kept, the source key.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);
        let with_key = self.points.iter().any(CurvePoint::has_key);

        let mut header = vec!["Order", COL_LOSS, self.kind.metric_name()];
        if with_key {
            header.extend([COL_YEAR, COL_EVENT, COL_DAY]);
        }
        wtr.write_record(&header)?;

        let opt = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
        for p in &self.points {
            let mut row = vec![
                p.order.to_string(),
                p.loss.to_string(),
                p.metric.to_string(),
            ];
            if with_key {
                row.push(opt(p.year.map(i64::from)));
                row.push(opt(p.event_id));
                row.push(opt(p.day_of_year));
            }
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl YearEventLossTable {
    /// For each loss, the frequency per year of a loss at least as large
    pub fn exfreq(&self) -> Vec<f64> {
        let losses: Vec<f64> = self.losses().collect();
        let n_yrs = self.n_yrs() as f64;
        rank_descending_min(&losses)
            .into_iter()
            .map(|rank| rank as f64 / n_yrs)
            .collect()
    }

    /// Empiric conditional cumulative probability of each loss,
    /// P(X <= x | a loss has occurred)
    pub fn cprob(&self) -> Vec<f64> {
        let losses: Vec<f64> = self.losses().collect();
        let n = losses.len() as f64;
        rank_ascending_max(&losses)
            .into_iter()
            .map(|rank| rank as f64 / n)
            .collect()
    }

    /// Exceedance frequency curve, largest loss first
    pub fn to_ef_curve(&self, keep_index: bool) -> ExceedanceCurve {
        let points = self
            .records()
            .iter()
            .zip(self.exfreq())
            .map(|(record, exfreq)| CurvePoint::for_event(record, exfreq))
            .collect();
        ExceedanceCurve::build(CurveKind::ExceedanceFrequency, points, keep_index)
    }

    /// Severity curve, smallest loss first
    pub fn to_severity_curve(&self, keep_index: bool) -> ExceedanceCurve {
        let points = self
            .records()
            .iter()
            .zip(self.cprob())
            .map(|(record, cprob)| CurvePoint::for_event(record, cprob))
            .collect();
        ExceedanceCurve::build(CurveKind::Severity, points, keep_index)
    }
}

impl YearLossTable {
    /// For each year's loss, the frequency per year of a year loss at least
    /// as large
    pub fn exfreq(&self) -> Vec<f64> {
        let losses: Vec<f64> = self.losses().collect();
        let n_yrs = self.n_yrs() as f64;
        rank_descending_min(&losses)
            .into_iter()
            .map(|rank| rank as f64 / n_yrs)
            .collect()
    }

    pub fn to_ef_curve(&self, keep_index: bool) -> ExceedanceCurve {
        let points = self
            .rows()
            .iter()
            .zip(self.exfreq())
            .map(|(row, exfreq)| CurvePoint::for_year(row, exfreq))
            .collect();
        ExceedanceCurve::build(CurveKind::ExceedanceFrequency, points, keep_index)
    }
}
