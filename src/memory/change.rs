// ============================================================================
// Change Journal
// ============================================================================
//
// Command Pattern for reversible writes. Every write made inside a
// transaction is journaled as a Change that knows how to undo itself;
// rollback replays the journal backwards.
//
// ============================================================================

use super::Row;

/// A single reversible write
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A row was inserted; undo removes it
    Insert { table: String, id: u64 },

    /// A row was replaced; undo restores `old_row`
    Update { table: String, id: u64, old_row: Row },

    /// A row was removed; undo puts `old_row` back
    Delete { table: String, id: u64, old_row: Row },
}

impl Change {
    /// Get the table name affected by this change
    pub fn table_name(&self) -> &str {
        match self {
            Change::Insert { table, .. } => table,
            Change::Update { table, .. } => table,
            Change::Delete { table, .. } => table,
        }
    }

    pub fn row_id(&self) -> u64 {
        match self {
            Change::Insert { id, .. } | Change::Update { id, .. } | Change::Delete { id, .. } => {
                *id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_accessors() {
        let change = Change::Delete {
            table: "balloons".to_string(),
            id: 7,
            old_row: Row::new(),
        };
        assert_eq!(change.table_name(), "balloons");
        assert_eq!(change.row_id(), 7);
    }
}
