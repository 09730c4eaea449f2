//! Formula preprocessing.
//!
//! Before an expression reaches the arithmetic evaluator, every reference is
//! replaced by a literal number:
//!
//! - **Aggregates first**: `SUM(A1:B5)` → the sum, computed over the raw range
//!   text so the range itself is never touched by reference substitution
//! - **References second**: `A1` → the cell's current numeric value (0 if absent)
//! - **Whitespace** is stripped last

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::cell::CellStore;
use super::format::format_number;
use super::range::{RangeMode, expand_range};

fn cell_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z]+[0-9]+").expect("cell reference regex must compile"))
}

/// Replace each aggregate call with the literal result of reducing its range.
pub fn expand_aggregates(expression: &str, store: &CellStore, mode: RangeMode) -> String {
    crate::builtins::aggregate_fn_re()
        .replace_all(expression, |caps: &Captures| {
            let Some(aggregate) = crate::builtins::aggregate(&caps[1]) else {
                return caps[0].to_string();
            };
            let values: Vec<_> = expand_range(&caps[2], mode)
                .iter()
                .map(|id| store.value(id))
                .collect();
            format_number((aggregate.reduce)(&values))
        })
        .into_owned()
}

/// Replace bare references like `B2` with the referenced cell's numeric value.
pub fn substitute_references(expression: &str, store: &CellStore) -> String {
    cell_ref_re()
        .replace_all(expression, |caps: &Captures| format_number(store.number(&caps[0])))
        .into_owned()
}

/// Full rewrite of a formula body (without the leading `=`) into plain arithmetic.
pub fn preprocess_formula(expression: &str, store: &CellStore, mode: RangeMode) -> String {
    let expanded = expand_aggregates(expression, store, mode);
    let substituted = substitute_references(&expanded, store);
    substituted.chars().filter(|c| !c.is_whitespace()).collect()
}
