// ============================================================================
// In-Memory Store
// ============================================================================
//
// A small transactional row store that plays the persistence collaborator
// for decorated records in tests and demos. Tables hold rows keyed by a
// generated u64 id.
//
// Transactions nest by depth: only the outermost scope commits or rolls
// back. Rolling back a nested scope marks the whole transaction
// rollback-only, and the outermost commit then rolls back and fails.
//
// ============================================================================

pub mod change;

pub use change::Change;

use crate::core::{Result, Value, VeneerError};
use crate::transaction::Transactional;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

pub type Row = BTreeMap<String, Value>;

/// Commit/rollback counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub commits: u64,
    pub rollbacks: u64,
    pub writes: u64,
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<u64, Row>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    tables: HashMap<String, Table>,
    depth: usize,
    rollback_only: bool,
    journal: Vec<Change>,
    stats: StoreStats,
}

impl StoreState {
    fn table_mut(&mut self, name: &str) -> &mut Table {
        self.tables.entry(name.to_string()).or_default()
    }

    fn record(&mut self, change: Change) {
        self.stats.writes += 1;
        if self.depth > 0 {
            self.journal.push(change);
        }
    }

    fn undo_all(&mut self) {
        let journal = std::mem::take(&mut self.journal);
        for change in journal.into_iter().rev() {
            debug!("undo write to {} id={}", change.table_name(), change.row_id());
            match change {
                Change::Insert { table, id } => {
                    self.table_mut(&table).rows.remove(&id);
                }
                Change::Update { table, id, old_row } | Change::Delete { table, id, old_row } => {
                    self.table_mut(&table).rows.insert(id, old_row);
                }
            }
        }
        self.depth = 0;
        self.rollback_only = false;
        self.stats.rollbacks += 1;
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `row` and returns its generated id.
    pub fn insert(&self, table: &str, row: Row) -> Result<u64> {
        let mut state = self.state.lock()?;
        let target = state.table_mut(table);
        target.next_id += 1;
        let id = target.next_id;
        target.rows.insert(id, row);
        state.record(Change::Insert {
            table: table.to_string(),
            id,
        });
        debug!("insert into {} id={}", table, id);
        Ok(id)
    }

    pub fn update(&self, table: &str, id: u64, row: Row) -> Result<()> {
        let mut state = self.state.lock()?;
        let Some(slot) = state.table_mut(table).rows.get_mut(&id) else {
            return Err(VeneerError::RecordNotFound {
                table: table.to_string(),
                id,
            });
        };
        let old_row = std::mem::replace(slot, row);
        state.record(Change::Update {
            table: table.to_string(),
            id,
            old_row,
        });
        Ok(())
    }

    /// Removes a row. Returns `false` when there was nothing to remove.
    pub fn delete(&self, table: &str, id: u64) -> Result<bool> {
        let mut state = self.state.lock()?;
        let Some(old_row) = state.table_mut(table).rows.remove(&id) else {
            return Ok(false);
        };
        state.record(Change::Delete {
            table: table.to_string(),
            id,
            old_row,
        });
        debug!("delete from {} id={}", table, id);
        Ok(true)
    }

    pub fn find(&self, table: &str, id: u64) -> Result<Option<Row>> {
        let state = self.state.lock()?;
        Ok(state
            .tables
            .get(table)
            .and_then(|t| t.rows.get(&id))
            .cloned())
    }

    pub fn exists(&self, table: &str, id: u64) -> Result<bool> {
        Ok(self.find(table, id)?.is_some())
    }

    pub fn count(&self, table: &str) -> Result<usize> {
        let state = self.state.lock()?;
        Ok(state.tables.get(table).map_or(0, |t| t.rows.len()))
    }

    pub fn ids(&self, table: &str) -> Result<Vec<u64>> {
        let state = self.state.lock()?;
        Ok(state
            .tables
            .get(table)
            .map(|t| t.rows.keys().copied().collect())
            .unwrap_or_default())
    }

    /// Removes every row of `table` outside of any transaction.
    pub fn truncate(&self, table: &str) -> Result<()> {
        let mut state = self.state.lock()?;
        if state.depth > 0 {
            return Err(VeneerError::Transaction(
                "cannot truncate inside a transaction".into(),
            ));
        }
        state.tables.remove(table);
        Ok(())
    }

    /// Current transaction nesting depth; 0 when idle.
    pub fn depth(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.depth)
            .unwrap_or_default()
    }

    pub fn stats(&self) -> StoreStats {
        self.state
            .lock()
            .map(|state| state.stats)
            .unwrap_or_default()
    }
}

impl Transactional for MemoryStore {
    fn begin(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        if state.depth == 0 {
            state.journal.clear();
            state.rollback_only = false;
        }
        state.depth += 1;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        match state.depth {
            0 => Err(VeneerError::Transaction("no active transaction".into())),
            1 if state.rollback_only => {
                warn!("commit of rollback-only transaction; rolling back");
                state.undo_all();
                Err(VeneerError::Transaction(
                    "transaction was marked rollback-only by a nested scope".into(),
                ))
            }
            1 => {
                state.journal.clear();
                state.depth = 0;
                state.stats.commits += 1;
                Ok(())
            }
            _ => {
                state.depth -= 1;
                Ok(())
            }
        }
    }

    fn rollback(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        match state.depth {
            0 => Err(VeneerError::Transaction("no active transaction".into())),
            1 => {
                debug!("rolling back {} change(s)", state.journal.len());
                state.undo_all();
                Ok(())
            }
            _ => {
                state.rollback_only = true;
                state.depth -= 1;
                Ok(())
            }
        }
    }

    fn in_transaction(&self) -> bool {
        self.depth() > 0
    }
}
