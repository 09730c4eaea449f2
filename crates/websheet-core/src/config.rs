//! Sheet configuration, loaded from TOML.
//!
//! ```toml
//! rows = 100
//! columns = 26
//! decimal_places = 2
//! recalc = "manual"        # or "dependents"
//! range_columns = "legacy" # or "bijective"
//! file_name = "Untitled"
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use websheet_engine::engine::{DEFAULT_DECIMAL_PLACES, FormulaEngine, MAX_DECIMAL_PLACES, RangeMode};

/// When formulas are recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcMode {
    /// Only the edited cell is computed; cells reading it keep their old value.
    #[default]
    Manual,
    /// Cells reading the edited cell are recomputed transitively; cycles show `#CYCLE!`.
    Dependents,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub rows: usize,
    pub columns: usize,
    pub decimal_places: u32,
    pub recalc: RecalcMode,
    pub range_columns: RangeMode,
    pub file_name: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: 100,
            columns: 26,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            recalc: RecalcMode::Manual,
            range_columns: RangeMode::Legacy,
            file_name: "Untitled".to_string(),
        }
    }
}

impl SheetConfig {
    /// Parse a config file. `decimal_places` is clamped to [`MAX_DECIMAL_PLACES`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SheetConfig = toml::from_str(content)?;
        config.decimal_places = config.decimal_places.min(MAX_DECIMAL_PLACES);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn engine(&self) -> FormulaEngine {
        FormulaEngine::new(self.decimal_places, self.range_columns)
    }
}
