// ==========================================
// Slayer 任务追踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一建表,所有仓储共享同一套 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：foreign_keys 与 busy_timeout 都需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表 (幂等)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS monsters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            kill_cap INTEGER NOT NULL DEFAULT -1,
            added_at TEXT
        );

        CREATE TABLE IF NOT EXISTS kills (
            monster_id INTEGER PRIMARY KEY REFERENCES monsters(id) ON DELETE CASCADE,
            kills INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            is_wilderness INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS monster_locations (
            monster_id INTEGER NOT NULL REFERENCES monsters(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            PRIMARY KEY (monster_id, location_id)
        );

        CREATE TABLE IF NOT EXISTS slayer_masters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            combat_requirement INTEGER NOT NULL DEFAULT 0,
            slayer_requirement INTEGER NOT NULL DEFAULT 0,
            points_per_task INTEGER NOT NULL DEFAULT 0,
            points_per_10th INTEGER NOT NULL DEFAULT 0,
            is_location_based INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            slayer_requirement INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS master_tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slayer_master_id INTEGER NOT NULL REFERENCES slayer_masters(id),
            task_id INTEGER NOT NULL REFERENCES tasks(id),
            weight REAL NOT NULL DEFAULT 1,
            min_amount INTEGER NOT NULL DEFAULT 10,
            max_amount INTEGER NOT NULL DEFAULT 50,
            quest_unlocks TEXT,
            slayer_unlock TEXT,
            location_restriction TEXT,
            UNIQUE (slayer_master_id, task_id, location_restriction)
        );

        CREATE TABLE IF NOT EXISTS task_monsters (
            task_id INTEGER NOT NULL REFERENCES tasks(id),
            monster_id INTEGER NOT NULL REFERENCES monsters(id) ON DELETE CASCADE,
            PRIMARY KEY (task_id, monster_id)
        );

        CREATE TABLE IF NOT EXISTS player_data (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        CREATE TABLE IF NOT EXISTS blocked_tasks (
            slayer_master_id INTEGER NOT NULL REFERENCES slayer_masters(id),
            task_id INTEGER NOT NULL REFERENCES tasks(id),
            blocked_at TEXT,
            PRIMARY KEY (slayer_master_id, task_id)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
