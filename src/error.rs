//! Error types for table validation, layer preconditions and loading

use thiserror::Error;

/// Broad class of a [`YeltError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Table shape or metadata is wrong (index levels, n_yrs, uniqueness, year range)
    Schema,
    /// A key or loss column has the wrong type
    Type,
    /// An operation was called with an argument it cannot accept
    Precondition,
    /// The input could not be read or parsed at all
    Input,
}

/// Errors raised while building or operating on a year event loss table
#[derive(Debug, Error)]
pub enum YeltError {
    #[error("expecting 3 index levels, found {0}")]
    IndexLevels(usize),

    #[error("expecting index names [Year, DayOfYear, EventID], found {0:?}")]
    IndexNames(Vec<String>),

    #[error("index `{column}` must be an integer type, it is {dtype}")]
    NonIntegerKey {
        column: String,
        dtype: &'static str,
    },

    #[error("losses must be numeric, they are {0}")]
    NonNumericLoss(&'static str),

    #[error("NaN loss at row {0}")]
    NanLoss(usize),

    #[error("table must carry n_yrs metadata")]
    MissingYears,

    #[error("n_yrs must be at least 1, got {0}")]
    ZeroYears(u32),

    #[error(
        "combinations of Year, EventID, DayOfYear not unique: \
         ({year}, {event_id}, {day_of_year}) repeats"
    )]
    DuplicateKey {
        year: i64,
        event_id: i64,
        day_of_year: i64,
    },

    #[error("years in index are out of range 1..={n_yrs}: found min {min}, max {max}")]
    YearOutOfRange { min: i64, max: i64, n_yrs: u32 },

    #[error("column lengths differ: {0}")]
    LengthMismatch(String),

    #[error("column `{column}` value `{value}` cannot be forced to an integer")]
    Coercion { column: String, value: String },

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("attachment point must be >= 0, got {0}")]
    NegativeAttachment(f64),

    #[error("layer limit must be >= 0, got {0}")]
    NegativeLimit(f64),

    #[error("return-period losses need an exceedance frequency curve, got {0}")]
    WrongCurveKind(&'static str),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl YeltError {
    /// Which part of the error taxonomy this belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            YeltError::IndexLevels(_)
            | YeltError::IndexNames(_)
            | YeltError::MissingYears
            | YeltError::ZeroYears(_)
            | YeltError::DuplicateKey { .. }
            | YeltError::YearOutOfRange { .. }
            | YeltError::LengthMismatch(_)
            | YeltError::MissingColumn(_) => ErrorKind::Schema,
            YeltError::NonIntegerKey { .. }
            | YeltError::NonNumericLoss(_)
            | YeltError::NanLoss(_)
            | YeltError::Coercion { .. } => ErrorKind::Type,
            YeltError::NegativeAttachment(_)
            | YeltError::NegativeLimit(_)
            | YeltError::WrongCurveKind(_) => ErrorKind::Precondition,
            YeltError::Csv(_) | YeltError::Io(_) | YeltError::Config(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, YeltError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(YeltError::MissingYears.kind(), ErrorKind::Schema);
        assert_eq!(YeltError::NonNumericLoss("text").kind(), ErrorKind::Type);
        assert_eq!(YeltError::NanLoss(3).kind(), ErrorKind::Type);
        assert_eq!(
            YeltError::NegativeAttachment(-1.0).kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            YeltError::WrongCurveKind("CProb").kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn test_error_messages_name_the_invariant() {
        let err = YeltError::YearOutOfRange {
            min: 0,
            max: 3,
            n_yrs: 3,
        };
        assert!(err.to_string().contains("out of range"));

        let err = YeltError::DuplicateKey {
            year: 1,
            event_id: 7,
            day_of_year: 12,
        };
        assert!(err.to_string().contains("not unique: (1, 7, 12) repeats"));

        assert_eq!(YeltError::NanLoss(2).to_string(), "NaN loss at row 2");
    }
}
