//! Build a YELT from columns, loosely typed frames and CSV files

use std::path::Path;

use csv::Reader;
use log::{info, warn};

use crate::error::{Result, YeltError};

use super::candidate::{CandidateTable, Column};
use super::table::{YearEventLossTable, COL_DAY, COL_EVENT, COL_LOSS, COL_YEAR, INDEX_NAMES};

/// Loosely typed table: named columns plus optional `n_yrs` metadata.
/// Column names are matched case-insensitively by [`from_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub columns: Vec<(String, Column)>,
    pub n_yrs: Option<u32>,
}

impl Frame {
    pub fn new(columns: Vec<(String, Column)>) -> Self {
        Self {
            columns,
            n_yrs: None,
        }
    }

    pub fn with_n_yrs(mut self, n_yrs: u32) -> Self {
        self.n_yrs = Some(n_yrs);
        self
    }

    fn take(&mut self, name: &str) -> Result<Column> {
        let target = name.to_lowercase();
        let pos = self
            .columns
            .iter()
            .position(|(n, _)| n.to_lowercase() == target)
            .ok_or_else(|| YeltError::MissingColumn(name.to_string()))?;
        Ok(self.columns.swap_remove(pos).1)
    }
}

/// Create a YELT from parallel columns.
///
/// All columns must be the same length and the (year, event, day)
/// combinations must be unique; a repeated key is an error, never dropped.
pub fn from_cols(
    year: &[i64],
    event_id: &[i64],
    day_of_year: &[i64],
    loss: &[f64],
    n_yrs: u32,
) -> Result<YearEventLossTable> {
    CandidateTable::new(
        vec![
            (COL_YEAR.to_string(), Column::Int(year.to_vec())),
            (COL_EVENT.to_string(), Column::Int(event_id.to_vec())),
            (COL_DAY.to_string(), Column::Int(day_of_year.to_vec())),
        ],
        Column::Float(loss.to_vec()),
    )
    .with_n_yrs(n_yrs)
    .validate()
}

/// Create a YELT from a frame.
///
/// `n_yrs` falls back to the frame's own metadata. Key columns that are not
/// integers are forced to integers with a warning.
pub fn from_frame(mut frame: Frame, n_yrs: Option<u32>) -> Result<YearEventLossTable> {
    let n_yrs = n_yrs.or(frame.n_yrs).ok_or(YeltError::MissingYears)?;

    let mut index = Vec::with_capacity(INDEX_NAMES.len());
    for name in [COL_YEAR, COL_EVENT, COL_DAY] {
        let column = frame.take(name)?;
        index.push((name.to_string(), force_integer(name, column)?));
    }
    let loss = frame.take(COL_LOSS)?;

    CandidateTable::new(index, loss).with_n_yrs(n_yrs).validate()
}

/// Load a YELT from a CSV file with Year, EventID, DayOfYear and Loss columns
pub fn from_csv<P: AsRef<Path>>(path: P, n_yrs: u32) -> Result<YearEventLossTable> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)?;
    let yelt = read_csv(reader, n_yrs)?;
    info!(
        "Loaded {} event losses over {} years from {}",
        yelt.len(),
        n_yrs,
        path.display()
    );
    Ok(yelt)
}

/// Load a YELT from any reader (e.g., string buffer)
pub fn from_csv_reader<R: std::io::Read>(reader: R, n_yrs: u32) -> Result<YearEventLossTable> {
    read_csv(Reader::from_reader(reader), n_yrs)
}

fn read_csv<R: std::io::Read>(mut reader: Reader<R>, n_yrs: u32) -> Result<YearEventLossTable> {
    let wanted = [COL_YEAR, COL_EVENT, COL_DAY, COL_LOSS];

    // Only the four required columns are read; anything else is ignored
    let headers = reader.headers()?.clone();
    let positions = wanted
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| YeltError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); wanted.len()];
    for result in reader.records() {
        let record = result?;
        for (values, &pos) in raw.iter_mut().zip(&positions) {
            values.push(record.get(pos).unwrap_or_default().to_string());
        }
    }

    let columns = wanted
        .iter()
        .zip(raw)
        .map(|(name, values)| (name.to_string(), Column::infer(values)))
        .collect();

    from_frame(Frame::new(columns), Some(n_yrs))
}

fn force_integer(name: &str, column: Column) -> Result<Column> {
    match column {
        Column::Int(values) => Ok(Column::Int(values)),
        Column::Float(values) => {
            warn!("{} is float64 and will be forced to int type", name);
            values
                .into_iter()
                .map(|v| {
                    if v.is_finite() {
                        Ok(v.trunc() as i64)
                    } else {
                        Err(YeltError::Coercion {
                            column: name.to_string(),
                            value: v.to_string(),
                        })
                    }
                })
                .collect::<Result<Vec<i64>>>()
                .map(Column::Int)
        }
        Column::Text(values) => {
            warn!("{} is text and will be forced to int type", name);
            values
                .into_iter()
                .map(|v| {
                    v.trim().parse::<i64>().map_err(|_| YeltError::Coercion {
                        column: name.to_string(),
                        value: v,
                    })
                })
                .collect::<Result<Vec<i64>>>()
                .map(Column::Int)
        }
    }
}
