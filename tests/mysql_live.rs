//! Tests against a real MySQL-compatible server.
//!
//! Ignored by default. Run with `--ignored` after exporting
//! `DBFACADE_TEST_MYSQL_HOST`, `_USER`, `_PASSWORD` and `_DATABASE`.
#![cfg(feature = "mysql")]

use dbfacade::{Database, FacadeError, Value};
use std::env;

fn env_or(name: &str, default: &str) -> String {
    env::var(format!("DBFACADE_TEST_MYSQL_{}", name)).unwrap_or_else(|_| default.to_string())
}

fn connected() -> Database {
    let db = Database::mysql();
    db.connect(
        &env_or("HOST", "127.0.0.1"),
        &env_or("USER", "root"),
        &env_or("PASSWORD", ""),
        &env_or("DATABASE", "test"),
    )
    .unwrap();
    db.query("DROP TABLE IF EXISTS dbfacade_t", &[]).unwrap();
    db.query(
        "CREATE TABLE dbfacade_t (id INT AUTO_INCREMENT PRIMARY KEY, x INT, label VARCHAR(32))",
        &[],
    )
    .unwrap();
    db
}

#[test]
#[ignore = "requires a running MySQL server"]
fn test_insert_select_count_roundtrip() {
    let db = connected();
    db.set_debug(true).unwrap();

    assert_eq!(db.count_as_i64("SELECT COUNT(*) FROM dbfacade_t", &[]).unwrap(), 0);
    let id = db
        .query("INSERT INTO dbfacade_t (x, label) VALUES (?, ?)", &[Value::Int(5), Value::from("ünï")])
        .unwrap();
    assert_ne!(id, 0);

    let row = db
        .select("SELECT x, label FROM dbfacade_t WHERE id = ?", &[Value::from(id)])
        .unwrap()
        .unwrap();
    assert_eq!(row.get("x").and_then(Value::as_i64), Some(5));
    assert_eq!(row.get("label"), Some(&Value::from("ünï")));

    assert_eq!(db.count_as_i64("SELECT COUNT(*) FROM dbfacade_t", &[]).unwrap(), 1);
    assert!(db.select("SELECT * FROM dbfacade_t WHERE id = ?", &[Value::Int(-1)]).unwrap().is_none());
    assert_eq!(db.queries().unwrap().len(), 5);
}

#[test]
#[ignore = "requires a running MySQL server"]
fn test_bad_credentials_fail_to_connect() {
    let db = Database::mysql();
    let result = db.connect(&env_or("HOST", "127.0.0.1"), "no_such_user", "wrong", "test");
    assert!(matches!(result, Err(FacadeError::Connection(_))));
    assert!(!db.is_connected().unwrap());
}
