/// MemoryStore tests
///
/// Transaction scopes over the in-memory store, including nesting.
/// Run with: cargo test --test memory_store_tests
use pretty_assertions::assert_eq;
use std::sync::Arc;
use veneer::memory::Row;
use veneer::transaction::TransactionState;
use veneer::{MemoryStore, TransactionScope, Transactional, Value, VeneerError};

const TABLE: &str = "balloons";

fn row(color: &str) -> Row {
    Row::from([("color".to_string(), Value::from(color))])
}

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

#[test]
fn test_scope_commit_keeps_writes() {
    let store = store();
    let scope = TransactionScope::begin(store.clone()).unwrap();
    assert_eq!(scope.state(), TransactionState::Active);

    store.insert(TABLE, row("blue")).unwrap();
    scope.commit().unwrap();

    assert_eq!(store.count(TABLE).unwrap(), 1);
    assert_eq!(store.stats().commits, 1);
    assert!(!store.in_transaction());
}

#[test]
fn test_scope_rollback_discards_writes() {
    let store = store();
    let kept = store.insert(TABLE, row("blue")).unwrap();

    let scope = TransactionScope::begin(store.clone()).unwrap();
    store.update(TABLE, kept, row("green")).unwrap();
    store.insert(TABLE, row("red")).unwrap();
    scope.rollback().unwrap();

    assert_eq!(store.ids(TABLE).unwrap(), vec![kept]);
    assert_eq!(store.find(TABLE, kept).unwrap(), Some(row("blue")));
}

#[test]
fn test_dropped_scope_rolls_back() {
    let store = store();
    {
        let _scope = TransactionScope::begin(store.clone()).unwrap();
        store.insert(TABLE, row("blue")).unwrap();
    }
    assert_eq!(store.count(TABLE).unwrap(), 0);
    assert_eq!(store.stats().rollbacks, 1);
    assert!(!store.in_transaction());
}

#[test]
fn test_finish_picks_commit_or_rollback() {
    let store = store();

    let scope = TransactionScope::begin(store.clone()).unwrap();
    store.insert(TABLE, row("blue")).unwrap();
    assert!(scope.finish(true).unwrap());

    let scope = TransactionScope::begin(store.clone()).unwrap();
    store.insert(TABLE, row("red")).unwrap();
    assert!(!scope.finish(false).unwrap());

    assert_eq!(store.count(TABLE).unwrap(), 1);
    assert_eq!(store.stats().commits, 1);
    assert_eq!(store.stats().rollbacks, 1);
}

#[test]
fn test_nested_scopes_commit_once() {
    let store = store();
    let outer = TransactionScope::begin(store.clone()).unwrap();
    let inner = TransactionScope::begin(store.clone()).unwrap();
    assert_eq!(store.depth(), 2);

    store.insert(TABLE, row("blue")).unwrap();
    inner.commit().unwrap();
    assert!(store.in_transaction());
    assert_eq!(store.stats().commits, 0);

    outer.commit().unwrap();
    assert_eq!(store.stats().commits, 1);
    assert_eq!(store.count(TABLE).unwrap(), 1);
}

#[test]
fn test_outer_rollback_discards_committed_inner_work() {
    let store = store();
    let outer = TransactionScope::begin(store.clone()).unwrap();
    let inner = TransactionScope::begin(store.clone()).unwrap();
    store.insert(TABLE, row("blue")).unwrap();
    inner.commit().unwrap();

    outer.rollback().unwrap();
    assert_eq!(store.count(TABLE).unwrap(), 0);
}

#[test]
fn test_inner_rollback_fails_outer_commit() {
    let store = store();
    let outer = TransactionScope::begin(store.clone()).unwrap();
    store.insert(TABLE, row("blue")).unwrap();

    let inner = TransactionScope::begin(store.clone()).unwrap();
    inner.rollback().unwrap();

    let err = outer.commit().unwrap_err();
    assert!(matches!(err, VeneerError::Transaction(_)));
    assert_eq!(store.count(TABLE).unwrap(), 0);
    assert!(!store.in_transaction());
}

#[test]
fn test_truncate_refused_inside_transaction() {
    let store = store();
    store.insert(TABLE, row("blue")).unwrap();

    let scope = TransactionScope::begin(store.clone()).unwrap();
    assert!(store.truncate(TABLE).is_err());
    scope.rollback().unwrap();

    store.truncate(TABLE).unwrap();
    assert_eq!(store.count(TABLE).unwrap(), 0);
}

#[test]
fn test_delete_missing_row_is_not_an_error() {
    let store = store();
    assert!(!store.delete(TABLE, 7).unwrap());
    assert!(!store.exists(TABLE, 7).unwrap());
}
