use super::Sheet;
use crate::config::RecalcMode;
use crate::error::{Result, SheetError};
use std::collections::{HashMap, HashSet};
use websheet_engine::engine::{
    CellRecord, CellRef, ComputedValue, detect_cycle, extract_dependencies, normalize_id,
};

/// Where the selection goes after an edit is committed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    /// Enter: one row down, if within the tracked rows
    Down,
    /// Tab: one column right, if within the tracked columns
    Right,
    Stay,
}

impl Sheet {
    /// Commit `raw` to cell `id`.
    ///
    /// A leading `=` makes it a formula, computed now from the current store.
    /// In manual recalc mode this is the only time the cell is computed: cells
    /// whose formulas read `id` keep their previous value.
    pub fn update_cell(&mut self, id: &str, raw: &str) {
        let id = normalize_id(id);
        let record = if raw.starts_with('=') {
            CellRecord::with_formula(raw, self.engine.parse_formula(raw, &self.store))
        } else {
            CellRecord::plain(raw)
        };
        self.store.set(&id, record);
        self.modified = true;
        tracing::debug!(cell = %id, "cell committed");

        if self.config.recalc == RecalcMode::Dependents {
            self.unlink_dependencies(&id);
            if raw.starts_with('=') {
                self.link_dependencies(&id, raw);
            }
            self.recalc_from(&id);
        }
    }

    /// Stored cell record, if the cell was ever written.
    pub fn get(&self, id: &str) -> Option<CellRecord> {
        self.store.get(id)
    }

    /// `computedValue ?? rawValue ?? ""` as text.
    pub fn display_value(&self, id: &str) -> String {
        self.store
            .value(id)
            .map(|v| v.as_text())
            .unwrap_or_default()
    }

    /// Empty the store and reset the selection to A1.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.depends_on.clear();
        self.dependents.clear();
        self.selected = CellRef::new(0, 0);
        self.edit_buffer = None;
        self.modified = true;
        tracing::debug!("sheet cleared");
    }

    pub fn add_rows(&mut self, n: usize) {
        self.rows = self.rows.saturating_add(n);
        tracing::debug!(rows = self.rows, "rows added");
    }

    pub fn add_columns(&mut self, n: usize) {
        self.columns = self.columns.saturating_add(n);
        tracing::debug!(columns = self.columns, "columns added");
    }

    /// Grow the tracked extents to at least `rows` x `columns`.
    pub(crate) fn ensure_extents(&mut self, rows: usize, columns: usize) {
        if rows > self.rows {
            self.add_rows(rows - self.rows);
        }
        if columns > self.columns {
            self.add_columns(columns - self.columns);
        }
    }

    /// Select a cell and drop any in-progress edit.
    pub fn select(&mut self, id: &str) -> Result<()> {
        let cell = CellRef::parse(id).ok_or_else(|| SheetError::InvalidCellId(id.to_string()))?;
        self.selected = cell;
        self.edit_buffer = None;
        Ok(())
    }

    /// The stored formula-or-value of a cell, as it is shown in the editor.
    pub fn input_text(&self, id: &str) -> String {
        self.store
            .get(id)
            .map(|r| r.input_text().to_string())
            .unwrap_or_default()
    }

    /// Start editing the selected cell from its stored formula-or-value.
    pub fn begin_edit(&mut self) -> &str {
        let text = self.input_text(&self.selected.id());
        self.edit_buffer.insert(text)
    }

    pub fn set_edit_buffer(&mut self, text: &str) {
        self.edit_buffer = Some(text.to_string());
    }

    /// Escape: revert the edit buffer to the stored formula-or-value without committing.
    pub fn cancel_edit(&mut self) {
        if self.edit_buffer.is_some() {
            self.edit_buffer = Some(self.input_text(&self.selected.id()));
        }
    }

    /// Commit the edit buffer (if any) to the selected cell, then move the selection.
    pub fn commit_edit(&mut self, movement: Move) {
        if let Some(text) = self.edit_buffer.take() {
            let id = self.selected.id();
            self.update_cell(&id, &text);
        }
        match movement {
            Move::Down if self.selected.row + 1 < self.rows => self.selected.row += 1,
            Move::Right if self.selected.col + 1 < self.columns => self.selected.col += 1,
            _ => {}
        }
    }

    pub(crate) fn link_dependencies(&mut self, id: &str, formula: &str) {
        let deps = extract_dependencies(formula, self.engine.range_mode);
        for dep in &deps {
            self.dependents
                .entry(dep.clone())
                .or_default()
                .insert(id.to_string());
        }
        self.depends_on.insert(id.to_string(), deps);
    }

    fn unlink_dependencies(&mut self, id: &str) {
        let Some(old) = self.depends_on.remove(id) else {
            return;
        };
        for dep in old {
            if let Some(readers) = self.dependents.get_mut(&dep) {
                readers.remove(id);
                if readers.is_empty() {
                    self.dependents.remove(&dep);
                }
            }
        }
    }

    /// All cells that read `changed`, directly or transitively (excluding `changed`).
    fn transitive_dependents(&self, changed: &str) -> HashSet<String> {
        let mut to_process = vec![changed.to_string()];
        let mut visited = HashSet::new();
        while let Some(cell) = to_process.pop() {
            if let Some(readers) = self.dependents.get(&cell) {
                for reader in readers {
                    if visited.insert(reader.clone()) {
                        to_process.push(reader.clone());
                    }
                }
            }
        }
        visited.remove(changed);
        visited
    }

    fn recalc_from(&mut self, changed: &str) {
        if detect_cycle(changed, &self.depends_on).is_some() {
            self.set_computed(changed, ComputedValue::Cycle);
        }
        let affected = self.transitive_dependents(changed);
        self.recompute(affected);
    }

    /// Recompute every formula cell in dependency order.
    pub(crate) fn recalc_all(&mut self) {
        let formulas = self.depends_on.keys().cloned().collect();
        self.recompute(formulas);
    }

    /// Recompute `cells` so each is evaluated after the cells it reads.
    /// Cells left over once no progress can be made sit on a cycle.
    pub(super) fn recompute(&mut self, cells: HashSet<String>) {
        let mut pending: HashMap<String, usize> = cells
            .iter()
            .map(|cell| {
                let inputs = self
                    .depends_on
                    .get(cell)
                    .map(|deps| {
                        deps.iter()
                            .filter(|d| cells.contains(*d))
                            .collect::<HashSet<_>>()
                            .len()
                    })
                    .unwrap_or(0);
                (cell.clone(), inputs)
            })
            .collect();

        let mut ready: Vec<String> = pending
            .iter()
            .filter(|(_, inputs)| **inputs == 0)
            .map(|(cell, _)| cell.clone())
            .collect();
        ready.sort_unstable_by(|a, b| b.cmp(a));

        while let Some(cell) = ready.pop() {
            pending.remove(&cell);
            self.recompute_cell(&cell);
            if let Some(readers) = self.dependents.get(&cell) {
                for reader in readers {
                    if let Some(inputs) = pending.get_mut(reader) {
                        *inputs -= 1;
                        if *inputs == 0 {
                            ready.push(reader.clone());
                        }
                    }
                }
            }
        }

        for cell in pending.keys() {
            self.set_computed(cell, ComputedValue::Cycle);
        }
    }

    fn recompute_cell(&mut self, id: &str) {
        let Some(formula) = self.store.get(id).and_then(|r| r.formula) else {
            return;
        };
        // Inputs were recomputed first; a cycle upstream is already marked.
        let reads_cycle = self.depends_on.get(id).is_some_and(|deps| {
            deps.iter()
                .any(|dep| self.store.value(dep) == Some(ComputedValue::Cycle))
        });
        let value = if reads_cycle {
            ComputedValue::Cycle
        } else {
            self.engine.parse_formula(&formula, &self.store)
        };
        self.set_computed(id, value);
    }

    fn set_computed(&mut self, id: &str, value: ComputedValue) {
        if value == ComputedValue::Cycle {
            tracing::warn!(cell = id, "reference cycle");
        }
        if let Some(mut record) = self.store.get(id) {
            record.computed_value = Some(value);
            self.store.set(id, record);
        }
    }
}
