//! Range expansion for aggregate function arguments.
//!
//! `A1:B2` expands row-major to `A1, B1, A2, B2`; `A1, C3` is split on commas.
//! Nothing is validated: malformed identifiers come through as-is and simply
//! miss when looked up.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::cell_ref::{column_index, column_name};

/// Upper bound on the number of identifiers a single range may expand to.
const MAX_RANGE_CELLS: usize = 1_000_000;

/// How range endpoints decode their column letters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// Only the first column letter counts (`AA` decodes like `A`).
    #[default]
    Legacy,
    /// Full bijective base-26 decode, the inverse of [`column_name`].
    Bijective,
}

impl RangeMode {
    fn decode(self, letters: &str) -> Option<usize> {
        match self {
            RangeMode::Legacy => letters.bytes().next().map(|b| (b - b'A') as usize),
            RangeMode::Bijective => column_index(letters),
        }
    }
}

fn endpoint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z]+)(\d+)").expect("range endpoint regex must compile"))
}

fn parse_endpoint(text: &str, mode: RangeMode) -> Option<(usize, usize)> {
    let caps = endpoint_re().captures(text)?;
    let col = mode.decode(&caps[1])?;
    let row = caps[2].parse::<usize>().ok()?;
    Some((col, row))
}

/// Expand an aggregate argument into an ordered list of cell identifiers.
pub fn expand_range(text: &str, mode: RangeMode) -> Vec<String> {
    let Some((start, end)) = text.split_once(':') else {
        return text.split(',').map(|id| id.trim().to_string()).collect();
    };

    let (Some((start_col, start_row)), Some((end_col, end_row))) =
        (parse_endpoint(start, mode), parse_endpoint(end, mode))
    else {
        return Vec::new();
    };
    if start_row > end_row || start_col > end_col {
        return Vec::new();
    }

    let row_count = end_row - start_row + 1;
    let col_count = end_col - start_col + 1;
    match row_count.checked_mul(col_count) {
        Some(count) if count <= MAX_RANGE_CELLS => {}
        _ => {
            tracing::warn!(range = text, "range too large to expand");
            return Vec::new();
        }
    }

    let mut ids = Vec::with_capacity(row_count * col_count);
    for row in start_row..=end_row {
        for col in start_col..=end_col {
            ids.push(format!("{}{}", column_name(col), row));
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rectangle_is_row_major() {
        assert_eq!(
            expand_range("A1:B2", RangeMode::Legacy),
            vec!["A1", "B1", "A2", "B2"]
        );
    }

    #[test]
    fn test_comma_list_is_trimmed() {
        assert_eq!(
            expand_range("A1,B2,C3", RangeMode::Legacy),
            vec!["A1", "B2", "C3"]
        );
        assert_eq!(expand_range(" A1 , B2 ", RangeMode::Legacy), vec!["A1", "B2"]);
    }

    #[test]
    fn test_single_identifier() {
        assert_eq!(expand_range("D4", RangeMode::Legacy), vec!["D4"]);
    }

    #[test]
    fn test_legacy_mode_reads_first_letter_only() {
        // AA decodes as column A, AB as column A as well.
        assert_eq!(expand_range("AA1:AB1", RangeMode::Legacy), vec!["A1"]);
        assert_eq!(expand_range("Z1:AA1", RangeMode::Legacy), Vec::<String>::new());
    }

    #[test]
    fn test_bijective_mode_handles_multi_letter_columns() {
        assert_eq!(
            expand_range("Z1:AB1", RangeMode::Bijective),
            vec!["Z1", "AA1", "AB1"]
        );
    }

    #[test]
    fn test_malformed_and_reversed_ranges_are_empty() {
        assert!(expand_range("B2:A1", RangeMode::Legacy).is_empty());
        assert!(expand_range("A:B", RangeMode::Legacy).is_empty());
        assert!(expand_range(":", RangeMode::Legacy).is_empty());
        assert!(expand_range("a1:b2", RangeMode::Legacy).is_empty());
    }

    #[test]
    fn test_oversized_range_is_skipped() {
        assert!(expand_range("A1:Z1000000", RangeMode::Legacy).is_empty());
    }
}
