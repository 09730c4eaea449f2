//! Formula evaluation against a cell store.

use super::cell::{CellStore, ComputedValue};
use super::eval::eval_arithmetic;
use super::format::round_to;
use super::preprocess::preprocess_formula;
use super::range::RangeMode;

/// Numeric results are rounded to this many decimals unless configured otherwise.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Evaluates formulas (`=...`) to computed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormulaEngine {
    pub decimal_places: u32,
    pub range_mode: RangeMode,
}

impl Default for FormulaEngine {
    fn default() -> Self {
        FormulaEngine {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            range_mode: RangeMode::Legacy,
        }
    }
}

impl FormulaEngine {
    pub fn new(decimal_places: u32, range_mode: RangeMode) -> Self {
        FormulaEngine {
            decimal_places,
            range_mode,
        }
    }

    /// Compute the value of `formula` from the store's current contents.
    ///
    /// Text not starting with `=` is returned unchanged. Any failure yields
    /// [`ComputedValue::Error`]; this never panics or returns an `Err`.
    pub fn parse_formula(&self, formula: &str, store: &CellStore) -> ComputedValue {
        let Some(expression) = formula.strip_prefix('=') else {
            return ComputedValue::Text(formula.to_string());
        };

        let arithmetic = preprocess_formula(expression, store, self.range_mode);
        match eval_arithmetic(&arithmetic) {
            Ok(value) => ComputedValue::Number(round_to(value, self.decimal_places)),
            Err(err) => {
                tracing::debug!(formula, %arithmetic, error = %err, "formula evaluation failed");
                ComputedValue::Error
            }
        }
    }
}

/// [`FormulaEngine::parse_formula`] with default settings.
pub fn parse_formula(formula: &str, store: &CellStore) -> ComputedValue {
    FormulaEngine::default().parse_formula(formula, store)
}
