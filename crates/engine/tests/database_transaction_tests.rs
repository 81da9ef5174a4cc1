//! Database Transaction API Integration Tests
//!
//! Validates the write transaction lifecycle including:
//! - Closure, scoped and manual APIs
//! - Single writer per database
//! - Read-your-writes inside, committed state outside
//! - Implicit transactions with `strict_transactions = false`
//! - List length limits

use std::sync::Arc;
use std::thread;

use strata_core::{ObjectId, ObjectSchema, PrimitiveKind, StrataError, Value};
use strata_engine::{Database, DatabaseConfig};
use strata_storage::StoredRecord;
use tempfile::TempDir;

fn schema() -> Arc<ObjectSchema> {
    ObjectSchema::builder("Sensor")
        .list("readings", PrimitiveKind::Double)
        .list("labels", PrimitiveKind::String)
        .build()
        .unwrap()
}

fn add_sensor(db: &Database) -> ObjectId {
    db.write(|| db.insert_record(StoredRecord::new(schema()))).unwrap()
}

fn push(db: &Database, id: ObjectId, value: f64) -> Result<(), StrataError> {
    db.write_list(id, 0, "readings", "append", |xs| {
        xs.push(Value::Double(value));
        Ok(())
    })
}

fn readings(db: &Database, id: ObjectId) -> Vec<Value> {
    db.read_list(id, 0, "readings", |xs| xs.to_vec()).unwrap()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_commit_makes_writes_visible() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);

    db.begin_write().unwrap();
    push(&db, id, 1.5).unwrap();
    push(&db, id, 2.5).unwrap();
    let version = db.commit_write().unwrap();

    assert!(version >= 2, "insert and append are two commits");
    assert_eq!(readings(&db, id), vec![Value::Double(1.5), Value::Double(2.5)]);
}

#[test]
fn test_cancel_reverts_every_write() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);
    db.write(|| push(&db, id, 1.0)).unwrap();

    db.begin_write().unwrap();
    push(&db, id, 2.0).unwrap();
    db.write_list(id, 0, "readings", "remove all", |xs| {
        xs.clear();
        Ok(())
    })
    .unwrap();
    assert!(readings(&db, id).is_empty(), "transaction sees its own writes");
    db.cancel_write().unwrap();

    assert_eq!(readings(&db, id), vec![Value::Double(1.0)]);
}

#[test]
fn test_commit_and_cancel_without_transaction() {
    let db = Database::open_in_memory();
    assert!(db.commit_write().unwrap_err().is_no_transaction());
    assert!(db.cancel_write().unwrap_err().is_no_transaction());
}

#[test]
fn test_second_begin_is_rejected() {
    let db = Database::open_in_memory();
    db.begin_write().unwrap();
    assert!(matches!(
        db.begin_write(),
        Err(StrataError::TransactionAlreadyActive)
    ));
    db.cancel_write().unwrap();
    db.begin_write().unwrap();
    db.commit_write().unwrap();
}

#[test]
fn test_panicking_closure_cancels() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<(), StrataError> = db.write(|| {
            push(&db, id, 9.0)?;
            panic!("writer failed");
        });
    }));

    assert!(result.is_err());
    assert!(!db.is_in_write_transaction());
    assert!(readings(&db, id).is_empty());
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn test_other_thread_reads_committed_state() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);

    db.begin_write().unwrap();
    push(&db, id, 3.0).unwrap();

    let reader = {
        let db = db.clone();
        thread::spawn(move || {
            let len = db.read_list(id, 0, "readings", |xs| xs.len()).unwrap();
            let write = db.write_list(id, 0, "readings", "append", |_| Ok(()));
            let begin = db.begin_write();
            (len, write, begin)
        })
    };
    let (len, write, begin) = reader.join().unwrap();

    assert_eq!(len, 0, "uncommitted append must not leak to other threads");
    assert!(write.unwrap_err().is_no_transaction());
    assert!(matches!(begin, Err(StrataError::TransactionAlreadyActive)));
    db.commit_write().unwrap();
    assert_eq!(readings(&db, id).len(), 1);
}

// ============================================================================
// Deletion and incarnation
// ============================================================================

#[test]
fn test_delete_invalidates_and_commit_removes() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);

    db.begin_write().unwrap();
    db.delete_record(id, 0).unwrap();
    assert!(!db.is_live(id, 0), "deletion is visible inside the transaction");
    db.commit_write().unwrap();

    assert!(!db.is_live(id, 0));
    assert_eq!(db.record_incarnation(id), None);
    assert!(db.read_list(id, 0, "readings", |_| ()).unwrap_err().is_invalidated());
    assert!(matches!(
        db.delete_record(id, 0),
        Err(StrataError::ObjectNotFound { .. })
    ));
}

#[test]
fn test_cancelled_delete_restores_data_under_new_incarnation() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);
    db.write(|| push(&db, id, 4.0)).unwrap();

    db.begin_write().unwrap();
    db.delete_record(id, 0).unwrap();
    db.cancel_write().unwrap();

    assert!(!db.is_live(id, 0));
    let incarnation = db.record_incarnation(id).unwrap();
    let restored = db.read_list(id, incarnation, "readings", |xs| xs.to_vec()).unwrap();
    assert_eq!(restored, vec![Value::Double(4.0)]);
}

#[test]
fn test_invalidation_wins_over_missing_transaction() {
    let db = Database::open_in_memory();
    let id = add_sensor(&db);
    db.write(|| db.delete_record(id, 0)).unwrap();

    let err = push(&db, id, 1.0).unwrap_err();
    assert!(err.is_invalidated());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_non_strict_mode_auto_commits() {
    let config = DatabaseConfig {
        strict_transactions: false,
        ..DatabaseConfig::default()
    };
    let db = Database::open(config).unwrap();
    let id = db.insert_record(StoredRecord::new(schema())).unwrap();

    push(&db, id, 5.0).unwrap();
    assert!(!db.is_in_write_transaction());
    assert_eq!(readings(&db, id), vec![Value::Double(5.0)]);
    assert_eq!(db.transaction_stats().committed, 2);
}

#[test]
fn test_insert_respects_list_limit() {
    let config = DatabaseConfig {
        max_list_length: Some(1),
        ..DatabaseConfig::default()
    };
    let db = Database::open(config).unwrap();
    let mut record = StoredRecord::new(schema());
    record
        .set_list("labels", vec![Value::String("a".into()), Value::String("b".into())])
        .unwrap();

    let err = db.write(|| db.insert_record(record)).unwrap_err();
    assert!(matches!(err, StrataError::LimitExceeded { limit: 1, .. }));
    assert_eq!(db.record_count(), 0);
}

#[test]
fn test_open_with_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lists.toml");
    std::fs::write(&path, "name = \"field-station\"\nmax_list_length = 8\n").unwrap();

    let db = Database::open_with_config_file(&path).unwrap();
    assert_eq!(db.config().name, "field-station");
    assert_eq!(db.config().max_list_length, Some(8));
    assert!(db.config().strict_transactions);
}
