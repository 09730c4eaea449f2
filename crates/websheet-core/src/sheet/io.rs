use super::Sheet;
use crate::config::RecalcMode;
use crate::error::{Result, SheetError};
use crate::storage::{Snapshot, iso_timestamp, parse_csv, write_csv};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use websheet_engine::engine::{CellRecord, ComputedValue, cell_id, normalize_id};

/// On-disk format, chosen by file extension.
enum FileKind {
    Csv,
    Snapshot,
}

fn file_kind(path: &Path) -> Result<FileKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => Ok(FileKind::Csv),
        Some("wss") | Some("json") => Ok(FileKind::Snapshot),
        _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
    }
}

impl Sheet {
    /// Row-major CSV of the display values over the tracked extents.
    pub fn export_csv(&self) -> Result<String> {
        let rows: Vec<Vec<String>> = (0..self.rows)
            .map(|row| {
                (0..self.columns)
                    .map(|col| self.display_value(&cell_id(row, col)))
                    .collect()
            })
            .collect();
        write_csv(&rows)
    }

    /// Snapshot of the whole sheet, stamped with the current time.
    pub fn export_json(&self) -> Snapshot {
        Snapshot {
            file_name: self.file_name.clone(),
            data: self.store.to_map(),
            rows: self.rows,
            columns: self.columns,
            timestamp: iso_timestamp(),
        }
    }

    /// The persisted cell store: `{ "A1": { "value", "formula"?, "computed"? }, .. }`.
    pub fn cells_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.store.to_map())?)
    }

    /// Replace the cells with a persisted cell store.
    pub fn load_cells_json(&mut self, content: &str) -> Result<()> {
        let cells: BTreeMap<String, CellRecord> = serde_json::from_str(content)?;
        self.restore_cells(cells);
        Ok(())
    }

    /// Replace the sheet contents with CSV text. Each non-empty field is
    /// committed as if typed into its cell; the extents grow to fit.
    pub fn import_csv(&mut self, content: &str) -> Result<()> {
        let rows = parse_csv(content)?;
        self.clear_all();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        self.ensure_extents(rows.len(), width);

        for (row, fields) in rows.iter().enumerate() {
            for (col, field) in fields.iter().enumerate() {
                if !field.is_empty() {
                    self.update_cell(&cell_id(row, col), field);
                }
            }
        }
        tracing::debug!(rows = rows.len(), columns = width, "csv imported");
        Ok(())
    }

    /// Restore a JSON snapshot. The extents grow to at least the snapshot's.
    pub fn import_json(&mut self, content: &str) -> Result<()> {
        let snapshot = Snapshot::from_json(content)?;
        self.ensure_extents(snapshot.rows, snapshot.columns);
        self.file_name = snapshot.file_name;
        self.restore_cells(snapshot.data);
        tracing::debug!(cells = self.store.len(), "snapshot imported");
        Ok(())
    }

    /// Load `cells` as stored. Formulas with no stored `computed` are
    /// evaluated once every record is in place, inputs first.
    fn restore_cells(&mut self, cells: BTreeMap<String, CellRecord>) {
        self.clear_all();
        let mut missing = HashSet::new();
        for (id, mut record) in cells {
            if record.raw_value.starts_with('=') {
                record.formula = Some(record.raw_value.clone());
            } else {
                record.formula = None;
            }
            if record.computed_value.is_none() {
                if record.is_formula() {
                    missing.insert(normalize_id(&id));
                } else {
                    record.computed_value = Some(ComputedValue::Text(record.raw_value.clone()));
                }
            }
            self.store.set(&id, record);
        }

        self.rebuild_dependents();
        if self.config.recalc == RecalcMode::Dependents {
            self.recalc_all();
        } else {
            self.recompute(missing);
        }
    }

    /// Save to `path`, as CSV or a JSON snapshot depending on its extension.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let content = match file_kind(path)? {
            FileKind::Csv => self.export_csv()?,
            FileKind::Snapshot => self.export_json().to_json()?,
        };
        std::fs::write(path, content)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.save(&path)?;
        Ok(path)
    }

    /// Load from a CSV file or JSON snapshot.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let kind = file_kind(path)?;
        let content = std::fs::read_to_string(path)?;
        match kind {
            FileKind::Csv => {
                self.import_csv(&content)?;
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    self.file_name = stem.to_string();
                }
            }
            FileKind::Snapshot => self.import_json(&content)?,
        }
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}
