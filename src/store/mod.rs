//! Row store with snapshot undo/redo
//!
//! Single-writer, linear-history state machine over one logical document
//! (the row sequence). Every structural mutation pushes the pre-mutation
//! snapshot onto `past` and clears `future`; `undo`/`redo` transfer
//! entries between the two stacks. A fresh mutation after an undo
//! permanently discards the redo branch.
//!
//! History is unbounded: this is a single-session editing tool and the
//! snapshots are small. See DESIGN.md.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::core::Row;
use crate::models::scrape::ScrapeResult;

/// Snapshot captured before a mutation.
///
/// `affected_index` identifies the row a single-row edit targeted so the
/// UI can scroll to it after undo/redo; bulk replacements carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub rows: Vec<Row>,
    pub affected_index: Option<usize>,
}

/// Linear edit history. Created empty; never persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub past: Vec<HistoryEntry>,
    pub future: VecDeque<HistoryEntry>,
}

/// Outcome of an undo/redo step, for scroll-to-affected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UndoStep {
    pub affected_index: Option<usize>,
}

/// Canonical owner of the row sequence and its history.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    history: History,
    /// Scrape results for the production viewer; not part of edit history.
    scrape_results: Vec<ScrapeResult>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Replace the whole row sequence. Used by import/pull operations.
    pub fn replace_all(&mut self, rows: Vec<Row>, affected_index: Option<usize>) {
        self.push_history(affected_index);
        self.rows = rows;
    }

    /// Replace the row at `index`.
    pub fn update_row(&mut self, index: usize, row: Row) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.push_history(Some(index));
        self.rows[index] = row;
        Ok(())
    }

    /// Remove the row at `index`, shifting subsequent rows down.
    pub fn delete_row(&mut self, index: usize) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.push_history(Some(index));
        self.rows.remove(index);
        Ok(())
    }

    /// Append a newly authored row after creation-time validation:
    /// the trimmed SKU must be non-empty and unique in the current
    /// snapshot. Returns the new row's index.
    ///
    /// Uniqueness is only enforced here, not continuously.
    pub fn add_row(&mut self, row: Row) -> Result<usize, ValidationError> {
        let sku = row.product_sku.trim().to_string();
        if sku.is_empty() {
            return Err(ValidationError::EmptySku);
        }
        if self.rows.iter().any(|existing| existing.product_sku == sku) {
            return Err(ValidationError::DuplicateSku(sku.to_string()));
        }

        let index = self.rows.len();
        self.push_history(Some(index));
        let mut row = row;
        row.product_sku = sku.to_string();
        self.rows.push(row);
        Ok(index)
    }

    /// Equivalent to `replace_all(vec![], None)`.
    pub fn clear(&mut self) {
        self.replace_all(Vec::new(), None);
    }

    /// Step back one mutation. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> Option<UndoStep> {
        let previous = self.history.past.pop()?;
        let affected_index = previous.affected_index;
        self.history.future.push_front(HistoryEntry {
            rows: std::mem::replace(&mut self.rows, previous.rows),
            affected_index,
        });
        Some(UndoStep { affected_index })
    }

    /// Step forward one undone mutation. No-op when the redo stack is
    /// empty.
    pub fn redo(&mut self) -> Option<UndoStep> {
        let next = self.history.future.pop_front()?;
        let affected_index = next.affected_index;
        self.history.past.push(HistoryEntry {
            rows: std::mem::replace(&mut self.rows, next.rows),
            affected_index,
        });
        Some(UndoStep { affected_index })
    }

    pub fn can_undo(&self) -> bool {
        !self.history.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.future.is_empty()
    }

    /// Forget all history without touching the current rows.
    pub fn clear_history(&mut self) {
        self.history = History::default();
    }

    pub fn scrape_results(&self) -> &[ScrapeResult] {
        &self.scrape_results
    }

    pub fn set_scrape_results(&mut self, results: Vec<ScrapeResult>) {
        self.scrape_results = results;
    }

    pub fn clear_scrape_results(&mut self) {
        self.scrape_results.clear();
    }

    fn push_history(&mut self, affected_index: Option<usize>) {
        self.history.past.push(HistoryEntry {
            rows: self.rows.clone(),
            affected_index,
        });
        self.history.future.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.rows.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }
}
