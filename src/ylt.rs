//! Year loss table: one aggregated loss per modeled year

use std::collections::BTreeMap;

use log::debug;

use crate::yelt::YearEventLossTable;

/// Aggregated loss for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearLoss {
    pub year: u32,
    pub loss: f64,
}

/// Year loss table
///
/// Rows are ordered by year. Years without events are absent unless the
/// table was made dense with [`YearLossTable::to_dense`]; an absent year
/// counts as zero loss.
#[derive(Debug, Clone, PartialEq)]
pub struct YearLossTable {
    rows: Vec<YearLoss>,
    n_yrs: u32,
    is_occurrence: bool,
}

impl YearEventLossTable {
    /// Convert to a YLT.
    ///
    /// With `is_occurrence` each year gets its largest event loss, otherwise
    /// the sum of its event losses.
    pub fn to_ylt(&self, is_occurrence: bool) -> YearLossTable {
        let mut by_year: BTreeMap<u32, f64> = BTreeMap::new();

        for record in self.records() {
            by_year
                .entry(record.year)
                .and_modify(|agg| {
                    if is_occurrence {
                        *agg = agg.max(record.loss);
                    } else {
                        *agg += record.loss;
                    }
                })
                .or_insert(record.loss);
        }

        debug!(
            "Aggregated {} event losses into {} years (occurrence = {})",
            self.len(),
            by_year.len(),
            is_occurrence
        );

        YearLossTable {
            rows: by_year
                .into_iter()
                .map(|(year, loss)| YearLoss { year, loss })
                .collect(),
            n_yrs: self.n_yrs(),
            is_occurrence,
        }
    }
}

impl YearLossTable {
    pub fn n_yrs(&self) -> u32 {
        self.n_yrs
    }

    /// True if each year holds its largest event loss rather than the sum
    pub fn is_occurrence(&self) -> bool {
        self.is_occurrence
    }

    pub fn rows(&self) -> &[YearLoss] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn losses(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.loss)
    }

    /// Loss stored for a year, `None` if the year has no row
    pub fn get(&self, year: u32) -> Option<f64> {
        self.rows
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|i| self.rows[i].loss)
    }

    /// Loss for a year, zero when the year had no events
    pub fn loss_for_year(&self, year: u32) -> f64 {
        self.get(year).unwrap_or(0.0)
    }

    /// Average annual loss
    pub fn aal(&self) -> f64 {
        self.losses().sum::<f64>() / self.n_yrs as f64
    }

    /// Frequency of a year with loss greater than zero
    pub fn freq0(&self) -> f64 {
        self.losses().filter(|&l| l > 0.0).count() as f64 / self.n_yrs as f64
    }

    /// Reindex over every year `1..=n_yrs`, filling missing years with zero
    pub fn to_dense(&self) -> YearLossTable {
        let rows = (1..=self.n_yrs)
            .map(|year| YearLoss {
                year,
                loss: self.loss_for_year(year),
            })
            .collect();

        YearLossTable {
            rows,
            n_yrs: self.n_yrs,
            is_occurrence: self.is_occurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yelt::{from_cols, LossRecord};
    use approx::assert_relative_eq;

    fn example_table() -> YearEventLossTable {
        let losses = [100.0, 50.0, 200.0];
        from_cols(&[1, 1, 2], &[1, 2, 3], &[10, 20, 30], &losses, 10).unwrap()
    }

    #[test]
    fn test_aggregate_ylt() {
        let ylt = example_table().to_ylt(false);
        assert!(!ylt.is_occurrence());
        assert_eq!(ylt.len(), 2);
        assert_eq!(ylt.get(1), Some(150.0));
        assert_eq!(ylt.get(2), Some(200.0));
        assert_eq!(ylt.get(3), None);
        assert_relative_eq!(ylt.aal(), 35.0);
    }

    #[test]
    fn test_occurrence_ylt() {
        let ylt = example_table().to_ylt(true);
        assert!(ylt.is_occurrence());
        assert_eq!(ylt.get(1), Some(100.0));
        assert_eq!(ylt.get(2), Some(200.0));
        assert_relative_eq!(ylt.aal(), 30.0);
        assert_relative_eq!(ylt.freq0(), 0.2);
    }

    #[test]
    fn test_occurrence_never_exceeds_aggregate() {
        let yelt = YearEventLossTable::new(
            vec![
                LossRecord::new(1, 1, 1, 5.0),
                LossRecord::new(1, 2, 2, 7.0),
                LossRecord::new(1, 3, 3, 1.0),
                LossRecord::new(2, 4, 1, 9.0),
                LossRecord::new(3, 5, 1, 2.5),
                LossRecord::new(3, 6, 8, 4.0),
            ],
            3,
        )
        .unwrap();

        let agg = yelt.to_ylt(false);
        let occ = yelt.to_ylt(true);
        for year in 1..=3 {
            let events = yelt.records().iter().filter(|r| r.year == year).count();
            let (a, o) = (agg.loss_for_year(year), occ.loss_for_year(year));
            assert!(o <= a);
            assert_eq!(o == a, events <= 1);
        }
    }

    #[test]
    fn test_dense_fills_missing_years() {
        let dense = example_table().to_ylt(false).to_dense();
        assert_eq!(dense.len(), 10);
        assert_eq!(dense.rows()[0].year, 1);
        assert_eq!(dense.rows()[0].loss, 150.0);
        assert_eq!(dense.loss_for_year(7), 0.0);
        assert_eq!(dense.get(7), Some(0.0));
        assert_relative_eq!(dense.aal(), 35.0);
    }

    #[test]
    fn test_empty_ylt() {
        let ylt = YearEventLossTable::new(Vec::new(), 4).unwrap().to_ylt(true);
        assert!(ylt.is_empty());
        assert_eq!(ylt.aal(), 0.0);
        assert_eq!(ylt.to_dense().len(), 4);
    }
}
