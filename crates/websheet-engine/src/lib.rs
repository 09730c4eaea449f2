//! websheet_engine - Spreadsheet formula engine.

pub(crate) mod builtins;
pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn store(cells: &[(&str, &str)]) -> CellStore {
        let store = CellStore::new();
        for (id, raw) in cells {
            store.set(id, CellRecord::plain(raw));
        }
        store
    }

    #[test]
    fn test_plain_text_passes_through() {
        let store = CellStore::new();
        for text in ["", "hello", "42", " =1+1", "#ERROR"] {
            assert_eq!(parse_formula(text, &store), ComputedValue::Text(text.to_string()));
        }
    }

    #[test]
    fn test_sum_over_range() {
        let store = store(&[("A1", "2"), ("B1", "3")]);
        assert_eq!(parse_formula("=SUM(A1:B1)", &store), ComputedValue::Number(5.0));
    }

    #[test]
    fn test_average_skips_empty_cells() {
        let store = store(&[("A1", "10"), ("A2", ""), ("A3", "20")]);
        assert_eq!(parse_formula("=AVERAGE(A1:A3)", &store), ComputedValue::Number(15.0));
    }

    #[test]
    fn test_count_counts_text() {
        let store = store(&[("A1", "x"), ("A2", "y")]);
        assert_eq!(parse_formula("=COUNT(A1:A2)", &store), ComputedValue::Number(2.0));
    }

    #[test]
    fn test_max_min_over_comma_list() {
        let store = store(&[("A1", "4"), ("C3", "-1"), ("D4", "n/a")]);
        assert_eq!(parse_formula("=MAX(A1,C3,D4)", &store), ComputedValue::Number(4.0));
        assert_eq!(parse_formula("=MIN(A1, C3, D4)", &store), ComputedValue::Number(-1.0));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let store = CellStore::new();
        assert_eq!(parse_formula("=1/0", &store), ComputedValue::Error);
    }

    #[test]
    fn test_missing_references_are_zero() {
        let store = CellStore::new();
        assert_eq!(parse_formula("=A1+B1", &store), ComputedValue::Number(0.0));
    }

    #[test]
    fn test_result_rounded_to_two_places() {
        let store = store(&[("A1", "1"), ("A2", "3")]);
        assert_eq!(parse_formula("=A1/A2", &store), ComputedValue::Number(0.33));
        assert_eq!(parse_formula("=2/3", &store), ComputedValue::Number(0.67));
    }

    #[test]
    fn test_custom_decimal_places() {
        let engine = FormulaEngine::new(4, RangeMode::Legacy);
        assert_eq!(
            engine.parse_formula("=2/3", &CellStore::new()),
            ComputedValue::Number(0.6667)
        );
    }

    #[test]
    fn test_computed_value_preferred_over_raw() {
        let store = CellStore::new();
        store.set("A1", CellRecord::with_formula("=2*3", ComputedValue::Number(6.0)));
        store.set("A2", CellRecord::with_formula("=1/0", ComputedValue::Error));
        assert_eq!(parse_formula("=A1*2", &store), ComputedValue::Number(12.0));
        assert_eq!(parse_formula("=A2+1", &store), ComputedValue::Number(1.0));
    }

    #[test]
    fn test_negative_reference_values() {
        let store = store(&[("A1", "2"), ("B1", "-5")]);
        assert_eq!(parse_formula("=A1-B1", &store), ComputedValue::Number(7.0));
    }

    #[test]
    fn test_malformed_formulas_are_errors() {
        let store = store(&[("A1", "1")]);
        for formula in ["=", "=1+", "=(A1", "=a1+1", "=SUM()", "=\"abc\"", "=A1*"] {
            assert_eq!(parse_formula(formula, &store), ComputedValue::Error, "{formula}");
        }
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let store = store(&[("A1", "1"), ("A2", "2")]);
        assert_eq!(
            parse_formula("= SUM( A1 : A2 ) * ( A2 + 1 )", &store),
            ComputedValue::Number(9.0)
        );
    }

    #[test]
    fn test_legacy_ranges_misread_double_letter_columns() {
        let store = store(&[("A1", "1"), ("AA1", "100")]);
        assert_eq!(parse_formula("=SUM(AA1:AA1)", &store), ComputedValue::Number(1.0));

        let engine = FormulaEngine::new(2, RangeMode::Bijective);
        assert_eq!(
            engine.parse_formula("=SUM(AA1:AA1)", &store),
            ComputedValue::Number(100.0)
        );
    }

    #[test]
    fn test_numeric_prefix_text_is_read_as_number() {
        let store = store(&[("A1", "12px")]);
        assert_eq!(parse_formula("=A1+1", &store), ComputedValue::Number(13.0));
    }
}
