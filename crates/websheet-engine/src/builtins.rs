//! Built-in aggregate functions.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`, ...).
//! - A call is rewritten textually: `SUM(A1:B2)` becomes the literal result.
//! - If you add a new aggregate, add it to `AGGREGATES`; `aggregate_fn_re`
//!   picks the name up automatically.

use regex::Regex;
use std::sync::OnceLock;

use crate::engine::ComputedValue;

/// Reduces the resolved values of a range (None = cell never written) to a number.
pub type Reducer = fn(&[Option<ComputedValue>]) -> f64;

pub struct Aggregate {
    pub sheet_name: &'static str,
    pub reduce: Reducer,
}

pub const AGGREGATES: &[Aggregate] = &[
    Aggregate {
        sheet_name: "SUM",
        reduce: sum,
    },
    Aggregate {
        sheet_name: "AVERAGE",
        reduce: average,
    },
    Aggregate {
        sheet_name: "COUNT",
        reduce: count,
    },
    Aggregate {
        sheet_name: "MAX",
        reduce: max,
    },
    Aggregate {
        sheet_name: "MIN",
        reduce: min,
    },
];

/// Regex that matches aggregate calls like `SUM(A1:B5)` or `MAX(A1, C3)`.
///
/// Captures:
/// - group 1: function name (e.g. `SUM`)
/// - group 2: the raw argument text (e.g. `A1:B5`)
pub fn aggregate_fn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = AGGREGATES
            .iter()
            .map(|a| a.sheet_name)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b({})\(([^)]+)\)", names))
            .expect("built-in aggregate regex must compile")
    })
}

pub fn aggregate(sheet_name: &str) -> Option<&'static Aggregate> {
    AGGREGATES.iter().find(|a| a.sheet_name == sheet_name)
}

fn numbers(values: &[Option<ComputedValue>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().filter_map(ComputedValue::as_number)
}

fn sum(values: &[Option<ComputedValue>]) -> f64 {
    numbers(values).sum()
}

fn average(values: &[Option<ComputedValue>]) -> f64 {
    let (total, n) = numbers(values).fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    if n == 0 { 0.0 } else { total / n as f64 }
}

fn count(values: &[Option<ComputedValue>]) -> f64 {
    values
        .iter()
        .flatten()
        .filter(|v| !v.as_text().is_empty())
        .count() as f64
}

fn max(values: &[Option<ComputedValue>]) -> f64 {
    numbers(values).reduce(f64::max).unwrap_or(0.0)
}

fn min(values: &[Option<ComputedValue>]) -> f64 {
    numbers(values).reduce(f64::min).unwrap_or(0.0)
}
