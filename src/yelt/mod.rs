//! Year event loss table model, validation and loading

mod candidate;
pub mod loader;
mod table;

pub use candidate::{CandidateTable, Column};
pub use loader::{from_cols, from_csv, from_csv_reader, from_frame, Frame};
pub use table::{
    LossRecord, YearEventLossTable, COL_DAY, COL_EVENT, COL_LOSS, COL_YEAR, INDEX_NAMES,
};
