//! Table-like input whose schema has not been checked yet

use crate::error::{Result, YeltError};

use super::table::{
    validate_parts, LossRecord, YearEventLossTable, COL_DAY, COL_EVENT, COL_YEAR, INDEX_NAMES,
};

/// A dynamically typed column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    /// Pick the narrowest type every value parses as: integer, then float, then text
    pub fn infer(values: Vec<String>) -> Self {
        let ints: std::result::Result<Vec<i64>, _> =
            values.iter().map(|v| v.trim().parse()).collect();
        if let Ok(ints) = ints {
            return Column::Int(ints);
        }

        let floats: std::result::Result<Vec<f64>, _> =
            values.iter().map(|v| v.trim().parse()).collect();
        if let Ok(floats) = floats {
            return Column::Float(floats);
        }
        Column::Text(values)
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name used in error messages
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Int(_) => "int64",
            Column::Float(_) => "float64",
            Column::Text(_) => "text",
        }
    }
}

/// Candidate year event loss table
///
/// Holds named key columns, a loss column and optional `n_yrs` metadata.
/// [`CandidateTable::validate`] turns it into a [`YearEventLossTable`] or
/// reports the first invariant it breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTable {
    index: Vec<(String, Column)>,
    loss: Column,
    n_yrs: Option<u32>,
}

impl CandidateTable {
    pub fn new(index: Vec<(String, Column)>, loss: Column) -> Self {
        Self {
            index,
            loss,
            n_yrs: None,
        }
    }

    pub fn with_n_yrs(mut self, n_yrs: u32) -> Self {
        self.n_yrs = Some(n_yrs);
        self
    }

    pub fn n_yrs(&self) -> Option<u32> {
        self.n_yrs
    }

    /// Check the table is a valid YELT and wrap it.
    ///
    /// Checks run in order: index shape, integer keys, numeric losses, n_yrs
    /// present, unique keys, years within `1..=n_yrs`.
    pub fn validate(self) -> Result<YearEventLossTable> {
        if self.index.len() != INDEX_NAMES.len() {
            return Err(YeltError::IndexLevels(self.index.len()));
        }

        let names: Vec<String> = self.index.iter().map(|(name, _)| name.clone()).collect();
        if !INDEX_NAMES.iter().all(|expected| names.iter().any(|n| n == expected)) {
            return Err(YeltError::IndexNames(names));
        }

        let n_rows = self.loss.len();
        if let Some((name, column)) = self.index.iter().find(|(_, c)| c.len() != n_rows) {
            return Err(YeltError::LengthMismatch(format!(
                "index `{}` has {} values, losses have {}",
                name,
                column.len(),
                n_rows
            )));
        }

        let years = self.integer_level(COL_YEAR)?;
        let events = self.integer_level(COL_EVENT)?;
        let days = self.integer_level(COL_DAY)?;

        let losses: Vec<f64> = match &self.loss {
            Column::Float(v) => v.clone(),
            Column::Int(v) => v.iter().map(|&l| l as f64).collect(),
            Column::Text(_) => return Err(YeltError::NonNumericLoss(self.loss.dtype())),
        };

        let keys: Vec<(i64, i64, i64)> = (0..n_rows)
            .map(|i| (years[i], events[i], days[i]))
            .collect();
        let n_yrs = validate_parts(&keys, &losses, self.n_yrs)?;

        // Year range is checked, so the narrowing cast is exact
        let records = keys
            .iter()
            .zip(&losses)
            .map(|(&(year, event_id, day_of_year), &loss)| {
                LossRecord::new(year as u32, event_id, day_of_year, loss)
            })
            .collect();

        Ok(YearEventLossTable::from_validated(records, n_yrs))
    }

    fn integer_level(&self, name: &str) -> Result<&[i64]> {
        // Only reached after the name check, so the level exists
        let (_, column) = self
            .index
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| YeltError::IndexNames(vec![name.to_string()]))?;

        match column {
            Column::Int(values) => Ok(values),
            other => Err(YeltError::NonIntegerKey {
                column: name.to_string(),
                dtype: other.dtype(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ints(values: &[i64]) -> Column {
        Column::Int(values.to_vec())
    }

    fn candidate(years: &[i64], losses: Column) -> CandidateTable {
        let n = years.len() as i64;
        CandidateTable::new(
            vec![
                (COL_YEAR.to_string(), ints(years)),
                (COL_EVENT.to_string(), Column::Int((1..=n).collect())),
                (COL_DAY.to_string(), Column::Int((1..=n).collect())),
            ],
            losses,
        )
    }

    #[test]
    fn test_valid_candidate() {
        let yelt = candidate(&[1, 1, 2], Column::Float(vec![100.0, 50.0, 200.0]))
            .with_n_yrs(10)
            .validate()
            .unwrap();
        assert_eq!(yelt.len(), 3);
        assert_eq!(yelt.aal(), 35.0);
    }

    #[test]
    fn test_integer_losses_are_numeric() {
        let yelt = candidate(&[1, 2], ints(&[3, 4]))
            .with_n_yrs(2)
            .validate()
            .unwrap();
        assert_eq!(yelt.total_loss(), 7.0);
    }

    #[test]
    fn test_wrong_index_levels() {
        let table = CandidateTable::new(
            vec![
                (COL_YEAR.to_string(), ints(&[1])),
                (COL_EVENT.to_string(), ints(&[1])),
            ],
            Column::Float(vec![1.0]),
        )
        .with_n_yrs(1);
        assert!(matches!(table.validate(), Err(YeltError::IndexLevels(2))));
    }

    #[test]
    fn test_wrong_index_names() {
        let table = CandidateTable::new(
            vec![
                ("year".to_string(), ints(&[1])),
                (COL_EVENT.to_string(), ints(&[1])),
                (COL_DAY.to_string(), ints(&[1])),
            ],
            Column::Float(vec![1.0]),
        )
        .with_n_yrs(1);
        assert!(matches!(table.validate(), Err(YeltError::IndexNames(_))));
    }

    #[test]
    fn test_non_integer_key() {
        let table = CandidateTable::new(
            vec![
                (COL_YEAR.to_string(), ints(&[1])),
                (COL_EVENT.to_string(), ints(&[1])),
                (COL_DAY.to_string(), Column::Float(vec![1.5])),
            ],
            Column::Float(vec![1.0]),
        )
        .with_n_yrs(1);
        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            YeltError::NonIntegerKey { ref column, dtype: "float64" } if column == COL_DAY
        ));
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_non_numeric_loss() {
        let err = candidate(&[1], Column::Text(vec!["big".to_string()]))
            .with_n_yrs(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, YeltError::NonNumericLoss("text")));
    }

    #[test]
    fn test_missing_n_yrs() {
        let err = candidate(&[1], Column::Float(vec![1.0]))
            .validate()
            .unwrap_err();
        assert!(matches!(err, YeltError::MissingYears));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_duplicate_and_range_are_distinct_errors() {
        let dup = CandidateTable::new(
            vec![
                (COL_YEAR.to_string(), ints(&[1, 1])),
                (COL_EVENT.to_string(), ints(&[5, 5])),
                (COL_DAY.to_string(), ints(&[9, 9])),
            ],
            Column::Float(vec![1.0, 2.0]),
        )
        .with_n_yrs(3);
        assert!(matches!(dup.validate(), Err(YeltError::DuplicateKey { .. })));

        let out_of_range = candidate(&[1, 4], Column::Float(vec![1.0, 2.0]));
        assert!(matches!(
            out_of_range.with_n_yrs(3).validate(),
            Err(YeltError::YearOutOfRange {
                min: 1,
                max: 4,
                n_yrs: 3
            })
        ));

        let negative = candidate(&[-1], Column::Float(vec![1.0])).with_n_yrs(3);
        assert!(matches!(
            negative.validate(),
            Err(YeltError::YearOutOfRange { min: -1, .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let err = candidate(&[1, 2], Column::Float(vec![1.0]))
            .with_n_yrs(2)
            .validate()
            .unwrap_err();
        assert!(matches!(err, YeltError::LengthMismatch(_)));
    }

    #[test]
    fn test_column_inference() {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(Column::infer(owned(&["1", " 2"])), Column::Int(vec![1, 2]));
        assert_eq!(
            Column::infer(owned(&["1", "2.5"])),
            Column::Float(vec![1.0, 2.5])
        );
        assert_eq!(Column::infer(owned(&["1", ""])).dtype(), "text");
    }
}
