//! # Database Tests
//!
//! Integration tests for the snapshot store, user registry and operation
//! log against a temporary SQLite database.

use anyhow::Result;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use xiuxian_helper::db::{
    get_or_create_user, init_database_schema, latest_snapshot, log_operation, recent_operations,
    save_snapshot,
};
use xiuxian_helper::shop_parser::parse_shop_text;

fn setup_test_db() -> Result<(Connection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    init_database_schema(&conn)?;
    Ok((conn, temp_file))
}

fn sample_listing(item_name: &str, price: u32) -> String {
    format!(
        "1. [凡品] {item_name} (武器) [7%折]\n价格: {price} 灵石 (原价: 369)"
    )
}

#[test]
fn test_save_and_latest_roundtrip() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let result = parse_shop_text(&sample_listing("流云琴", 342));
    let snapshot_id = save_snapshot(&conn, 1001, &result, Some("2024-01-01 12:00"))?;

    assert!(snapshot_id > 0);

    let snapshot = latest_snapshot(&conn, 1001)?.expect("snapshot should exist");
    assert_eq!(snapshot.id, snapshot_id);
    assert_eq!(snapshot.user_id, 1001);
    assert_eq!(snapshot.items, result.items);
    assert_eq!(snapshot.raw_text, result.raw_text);
    assert_eq!(snapshot.refresh_time, Some("2024-01-01 12:00".to_string()));
    assert!(!snapshot.created_at.is_empty());

    Ok(())
}

#[test]
fn test_latest_returns_most_recent_save() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let first = parse_shop_text(&sample_listing("流云琴", 342));
    let second = parse_shop_text(&sample_listing("玄龟甲", 950));

    save_snapshot(&conn, 1001, &first, None)?;
    let second_id = save_snapshot(&conn, 1001, &second, None)?;

    // Both rows usually share a CURRENT_TIMESTAMP second; the id ordering
    // must still resolve the newer snapshot.
    let snapshot = latest_snapshot(&conn, 1001)?.expect("snapshot should exist");
    assert_eq!(snapshot.id, second_id);
    assert_eq!(snapshot.items[0].name, "玄龟甲");

    Ok(())
}

#[test]
fn test_latest_absent_for_unknown_user() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    assert!(latest_snapshot(&conn, 99999)?.is_none());

    Ok(())
}

#[test]
fn test_snapshots_are_isolated_per_user() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let for_alice = parse_shop_text(&sample_listing("流云琴", 342));
    let for_bob = parse_shop_text(&sample_listing("玄龟甲", 950));

    save_snapshot(&conn, 1, &for_alice, None)?;
    save_snapshot(&conn, 2, &for_bob, None)?;

    let alice = latest_snapshot(&conn, 1)?.expect("snapshot should exist");
    let bob = latest_snapshot(&conn, 2)?.expect("snapshot should exist");

    assert_eq!(alice.items[0].name, "流云琴");
    assert_eq!(bob.items[0].name, "玄龟甲");

    Ok(())
}

#[test]
fn test_save_with_empty_refresh_time() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let result = parse_shop_text(&sample_listing("流云琴", 342));
    save_snapshot(&conn, 1001, &result, None)?;

    let snapshot = latest_snapshot(&conn, 1001)?.expect("snapshot should exist");
    assert_eq!(snapshot.refresh_time, None);

    Ok(())
}

#[test]
fn test_get_or_create_user_registers_once() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let created = get_or_create_user(&conn, 42, Some("daoist"))?;
    assert_eq!(created.user_id, 42);
    assert_eq!(created.username, Some("daoist".to_string()));
    assert_eq!(created.level, "初入凡间");
    assert_eq!(created.spiritual_stones, 0);

    // A second call returns the same row instead of inserting a new one.
    let fetched = get_or_create_user(&conn, 42, Some("someone-else"))?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.username, Some("daoist".to_string()));

    Ok(())
}

#[test]
fn test_log_operation_and_recent_ordering() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    log_operation(&conn, 42, "command", Some("签到"), true)?;
    log_operation(&conn, 42, "buy", Some("流云琴 (位置 1)"), true)?;
    log_operation(&conn, 42, "command", Some("突破"), false)?;

    let operations = recent_operations(&conn, 42, 10)?;

    assert_eq!(operations.len(), 3);
    // Newest first.
    assert_eq!(operations[0].operation_content, Some("突破".to_string()));
    assert!(!operations[0].success);
    assert_eq!(operations[2].operation_content, Some("签到".to_string()));

    Ok(())
}

#[test]
fn test_recent_operations_respects_limit_and_user() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    for i in 0..5 {
        log_operation(&conn, 42, "command", Some(&format!("指令{i}")), true)?;
    }
    log_operation(&conn, 7, "command", Some("别人的指令"), true)?;

    let operations = recent_operations(&conn, 42, 2)?;

    assert_eq!(operations.len(), 2);
    assert_eq!(operations[0].operation_content, Some("指令4".to_string()));
    assert!(operations.iter().all(|op| op.user_id == 42));

    Ok(())
}
