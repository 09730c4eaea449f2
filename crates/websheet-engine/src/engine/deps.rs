//! Dependency extraction from formula strings.
//!
//! Finds every cell identifier a formula reads. This is used to build the
//! dependency graph for dependent recomputation and cycle detection.
//!
//! Handles:
//! - Aggregate arguments: `SUM(A1:B5)`, `MAX(A1, C3)` (expanded like evaluation does)
//! - Bare references: `A1`, `B2`

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::normalize_id;
use super::range::{RangeMode, expand_range};

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"[A-Z]+[0-9]+").expect("dependency cell reference regex must compile")
    })
}

/// Extract the identifiers a formula depends on, in order of appearance.
/// Accepts the formula with or without its leading `=`.
pub fn extract_dependencies(formula: &str, mode: RangeMode) -> Vec<String> {
    let expression = formula.strip_prefix('=').unwrap_or(formula);
    let mut deps = Vec::new();

    let aggregate_re = crate::builtins::aggregate_fn_re();
    for caps in aggregate_re.captures_iter(expression) {
        deps.extend(
            expand_range(&caps[2], mode)
                .into_iter()
                .filter(|id| !id.is_empty())
                .map(|id| normalize_id(&id)),
        );
    }

    // Remove aggregate calls so their ranges are not counted twice.
    let remaining = aggregate_re.replace_all(expression, "");
    deps.extend(
        cell_ref_re()
            .find_iter(&remaining)
            .map(|m| m.as_str().to_string()),
    );

    deps
}
