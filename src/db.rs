use anyhow::{Context, Result};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

use crate::shop_model::{ShopItem, ShopParseResult};

/// One persisted shop snapshot: an immutable capture of a full parse result
/// for one user. Snapshots are append-only; "latest" is resolved by creation
/// time with the autoincrement id as a deterministic tie-breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSnapshot {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<ShopItem>,
    pub raw_text: String,
    /// Free-text refresh label extracted from the listing, not a timestamp.
    pub refresh_time: Option<String>,
    pub created_at: String,
}

/// A registered bot user with the game state we track for them.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub level: String,
    pub exp: f64,
    pub spiritual_stones: i64,
    pub created_at: String,
}

/// One logged relay operation (buy, quick command, shop input).
#[derive(Debug, Clone, PartialEq)]
pub struct OperationLog {
    pub id: i64,
    pub user_id: i64,
    pub operation_type: String,
    pub operation_content: Option<String>,
    pub success: bool,
    pub created_at: String,
}

/// Initialize the database schema
pub fn init_database_schema(conn: &Connection) -> Result<()> {
    info!("Initializing database schema...");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE,
            username TEXT,
            level TEXT NOT NULL DEFAULT '初入凡间',
            exp REAL NOT NULL DEFAULT 0,
            spiritual_stones INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create users table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS shop_snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            items TEXT NOT NULL,
            raw_text TEXT NOT NULL,
            refresh_time TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create shop_snapshots table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_snapshot
         ON shop_snapshots (user_id, created_at)",
        [],
    )
    .context("Failed to create snapshot index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS operation_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            operation_type TEXT NOT NULL,
            operation_content TEXT,
            success INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create operation_logs table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_operation
         ON operation_logs (user_id, created_at)",
        [],
    )
    .context("Failed to create operation log index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Persist a parse result as a new snapshot for the user.
///
/// The item records are stored as one JSON blob per row; the verbatim
/// listing text rides along for audit and re-parsing. Single append-style
/// write, never a partial one.
pub fn save_snapshot(
    conn: &Connection,
    user_id: i64,
    result: &ShopParseResult,
    refresh_time: Option<&str>,
) -> Result<i64> {
    let items_json =
        serde_json::to_string(&result.items).context("Failed to serialize shop items")?;

    conn.execute(
        "INSERT INTO shop_snapshots (user_id, items, raw_text, refresh_time)
         VALUES (?1, ?2, ?3, ?4)",
        params![user_id, items_json, result.raw_text, refresh_time],
    )
    .context("Failed to insert shop snapshot")?;

    let snapshot_id = conn.last_insert_rowid();
    info!(
        "Saved shop snapshot {} for user {} ({} items)",
        snapshot_id,
        user_id,
        result.items.len()
    );

    Ok(snapshot_id)
}

/// Fetch the most recently created snapshot for the user, if any.
///
/// Ordered by creation time descending; the id breaks same-second ties.
pub fn latest_snapshot(conn: &Connection, user_id: i64) -> Result<Option<ShopSnapshot>> {
    let row = conn
        .query_row(
            "SELECT id, user_id, items, raw_text, refresh_time, created_at
             FROM shop_snapshots
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()
        .context("Failed to read latest snapshot")?;

    match row {
        Some((id, user_id, items_json, raw_text, refresh_time, created_at)) => {
            let items: Vec<ShopItem> = serde_json::from_str(&items_json)
                .context("Failed to deserialize snapshot items")?;
            Ok(Some(ShopSnapshot {
                id,
                user_id,
                items,
                raw_text,
                refresh_time,
                created_at,
            }))
        }
        None => Ok(None),
    }
}

/// Fetch an existing user row or register a new one.
pub fn get_or_create_user(
    conn: &Connection,
    user_id: i64,
    username: Option<&str>,
) -> Result<UserProfile> {
    if let Some(user) = find_user(conn, user_id)? {
        return Ok(user);
    }

    conn.execute(
        "INSERT INTO users (user_id, username) VALUES (?1, ?2)",
        params![user_id, username],
    )
    .context("Failed to insert new user")?;
    info!("Registered new user: {}", user_id);

    find_user(conn, user_id)?.context("User row missing right after insert")
}

fn find_user(conn: &Connection, user_id: i64) -> Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT id, user_id, username, level, exp, spiritual_stones, created_at
         FROM users WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(UserProfile {
                id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                level: row.get(3)?,
                exp: row.get(4)?,
                spiritual_stones: row.get(5)?,
                created_at: row.get(6)?,
            })
        },
    )
    .optional()
    .context("Failed to read user")
}

/// Record one relay operation for the user.
pub fn log_operation(
    conn: &Connection,
    user_id: i64,
    operation_type: &str,
    operation_content: Option<&str>,
    success: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO operation_logs (user_id, operation_type, operation_content, success)
         VALUES (?1, ?2, ?3, ?4)",
        params![user_id, operation_type, operation_content, success],
    )
    .context("Failed to insert operation log")?;

    Ok(conn.last_insert_rowid())
}

/// Fetch the user's most recent operations, newest first.
pub fn recent_operations(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<OperationLog>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_id, operation_type, operation_content, success, created_at
             FROM operation_logs
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )
        .context("Failed to prepare operation log query")?;

    let rows = stmt
        .query_map(params![user_id, limit], |row| {
            Ok(OperationLog {
                id: row.get(0)?,
                user_id: row.get(1)?,
                operation_type: row.get(2)?,
                operation_content: row.get(3)?,
                success: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .context("Failed to query operation logs")?;

    let mut operations = Vec::new();
    for row in rows {
        operations.push(row.context("Failed to read operation log row")?);
    }

    Ok(operations)
}
