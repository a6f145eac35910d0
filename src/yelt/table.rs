//! The validated year event loss table

use std::collections::HashSet;

use crate::error::{Result, YeltError};

pub const COL_YEAR: &str = "Year";
pub const COL_EVENT: &str = "EventID";
pub const COL_DAY: &str = "DayOfYear";
pub const COL_LOSS: &str = "Loss";

/// Names of the three key fields
pub const INDEX_NAMES: [&str; 3] = [COL_YEAR, COL_DAY, COL_EVENT];

/// One simulated event loss, keyed by (year, event, day)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    pub year: u32,
    pub event_id: i64,
    pub day_of_year: i64,
    pub loss: f64,
}

impl LossRecord {
    pub fn new(year: u32, event_id: i64, day_of_year: i64, loss: f64) -> Self {
        Self {
            year,
            event_id,
            day_of_year,
            loss,
        }
    }
}

/// Year event loss table
///
/// One loss per (year, event, day) over `n_yrs` modeled years. Once built the
/// table is read-only: every operation on it produces a new value carrying
/// the same `n_yrs`.
#[derive(Debug, Clone, PartialEq)]
pub struct YearEventLossTable {
    records: Vec<LossRecord>,
    n_yrs: u32,
}

impl YearEventLossTable {
    /// Build a table from typed records, checking losses, n_yrs, key
    /// uniqueness and the year range.
    pub fn new(records: Vec<LossRecord>, n_yrs: u32) -> Result<Self> {
        let keys: Vec<(i64, i64, i64)> = records
            .iter()
            .map(|r| (r.year as i64, r.event_id, r.day_of_year))
            .collect();
        let losses: Vec<f64> = records.iter().map(|r| r.loss).collect();
        validate_parts(&keys, &losses, Some(n_yrs))?;

        Ok(Self { records, n_yrs })
    }

    /// Wrap records already known to satisfy the invariants for `n_yrs`
    pub(crate) fn from_validated(records: Vec<LossRecord>, n_yrs: u32) -> Self {
        Self { records, n_yrs }
    }

    /// New table over a subset (or transform) of this table's records
    pub(crate) fn derive(&self, records: Vec<LossRecord>) -> Self {
        Self::from_validated(records, self.n_yrs)
    }

    /// Construction enforces every invariant, so any table in hand is valid
    pub fn is_valid(&self) -> bool {
        true
    }

    /// Total number of modeled years
    pub fn n_yrs(&self) -> u32 {
        self.n_yrs
    }

    pub fn records(&self) -> &[LossRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn losses(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.loss)
    }

    pub fn total_loss(&self) -> f64 {
        self.losses().sum()
    }

    /// Average annual loss
    pub fn aal(&self) -> f64 {
        self.total_loss() / self.n_yrs as f64
    }

    /// Frequency of a loss greater than zero
    pub fn freq0(&self) -> f64 {
        self.losses().filter(|&l| l > 0.0).count() as f64 / self.n_yrs as f64
    }
}

/// Checks (c) through (f) on raw key triplets `(year, event_id, day_of_year)`
pub(crate) fn validate_parts(
    keys: &[(i64, i64, i64)],
    losses: &[f64],
    n_yrs: Option<u32>,
) -> Result<u32> {
    if let Some(row) = losses.iter().position(|l| l.is_nan()) {
        return Err(YeltError::NanLoss(row));
    }

    let n_yrs = n_yrs.ok_or(YeltError::MissingYears)?;
    if n_yrs == 0 {
        return Err(YeltError::ZeroYears(n_yrs));
    }

    let mut seen = HashSet::with_capacity(keys.len());
    for &(year, event_id, day_of_year) in keys {
        if !seen.insert((year, event_id, day_of_year)) {
            return Err(YeltError::DuplicateKey {
                year,
                event_id,
                day_of_year,
            });
        }
    }

    // An empty table has no year range to violate
    if let (Some(min), Some(max)) = (
        keys.iter().map(|k| k.0).min(),
        keys.iter().map(|k| k.0).max(),
    ) {
        if min < 1 || max > n_yrs as i64 {
            return Err(YeltError::YearOutOfRange { min, max, n_yrs });
        }
    }

    Ok(n_yrs)
}
