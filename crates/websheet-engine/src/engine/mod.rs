//! Spreadsheet engine API.
//!
//! This module provides the formula engine for the spreadsheet:
//!
//! - [`CellRecord`], [`ComputedValue`], [`CellStore`] - Data structures for cell storage
//! - [`CellRef`], [`column_name`], [`cell_id`] - Identifier parsing (A1 notation ↔ row/col)
//! - [`expand_range`] - Range expansion for aggregate arguments
//! - [`FormulaEngine`], [`parse_formula`] - Formula evaluation
//! - [`extract_dependencies`], [`detect_cycle`] - Dependency graph support
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod format;
mod formula;
mod preprocess;
mod range;

pub use cell::{CYCLE_MARKER, CellRecord, CellStore, ComputedValue, ERROR_MARKER};
pub use cell_ref::{CellRef, cell_id, column_index, column_name, normalize_id};
pub use cycle::{DependencyGraph, detect_cycle};
pub use deps::extract_dependencies;
pub use eval::{EvalError, eval_arithmetic};
pub use format::{MAX_DECIMAL_PLACES, format_number, parse_number, round_to};
pub use formula::{DEFAULT_DECIMAL_PLACES, FormulaEngine, parse_formula};
pub use preprocess::{expand_aggregates, preprocess_formula, substitute_references};
pub use range::{RangeMode, expand_range};
