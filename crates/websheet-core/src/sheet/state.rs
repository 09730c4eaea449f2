use crate::config::SheetConfig;
use crate::error::Result;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use websheet_engine::engine::{CellRef, CellStore, DependencyGraph, FormulaEngine};

/// UI-agnostic grid controller: owns the cells and mediates every edit.
pub struct Sheet {
    /// Sparse cell storage keyed by identifier
    pub store: CellStore,
    /// Formula evaluator configured from `config`
    pub engine: FormulaEngine,
    pub config: SheetConfig,
    /// Tracked extents used for rendering and export (never shrink)
    pub rows: usize,
    pub columns: usize,
    /// Currently selected cell
    pub selected: CellRef,
    /// In-progress edit for the selected cell, if any
    pub edit_buffer: Option<String>,
    /// Name written into JSON snapshots
    pub file_name: String,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last save/load
    pub modified: bool,
    /// Forward dependency map: cell -> cells its formula reads
    pub depends_on: DependencyGraph,
    /// Reverse dependency map: cell -> cells that read it
    pub dependents: HashMap<String, HashSet<String>>,
}

impl Sheet {
    /// Create an empty sheet with default configuration.
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Sheet {
            store: CellStore::new(),
            engine: config.engine(),
            rows: config.rows,
            columns: config.columns,
            selected: CellRef::new(0, 0),
            edit_buffer: None,
            file_name: config.file_name.clone(),
            file_path: None,
            modified: false,
            depends_on: DependencyGraph::new(),
            dependents: HashMap::new(),
            config,
        }
    }

    /// Create a sheet and load `path` if it exists. A missing file only sets the path.
    pub fn with_file(path: Option<PathBuf>, config: SheetConfig) -> Result<Self> {
        let mut sheet = Self::with_config(config);
        if let Some(p) = path {
            if p.exists() {
                sheet.open(&p)?;
            } else {
                sheet.file_path = Some(p);
            }
        }
        Ok(sheet)
    }

    /// Rebuild both dependency maps from the stored formulas.
    pub(crate) fn rebuild_dependents(&mut self) {
        self.depends_on.clear();
        self.dependents.clear();
        for (id, record) in self.store.to_map() {
            if let Some(formula) = &record.formula {
                self.link_dependencies(&id, formula);
            }
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
