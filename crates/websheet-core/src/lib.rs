//! websheet-core - UI-agnostic grid controller + storage.

pub mod config;
pub mod error;
pub mod sheet;
pub mod storage;

pub use config::{RecalcMode, SheetConfig};
pub use error::{Result, SheetError};
pub use sheet::{Move, Sheet};

pub use websheet_engine::engine::{CellRecord, CellRef, ComputedValue};
