// ==========================================
// 医院产能看板 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读取时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version（与 `scripts/dev_db/schema.sql` 对齐）
///
/// 版本号仅用于提示/告警（不做自动迁移）。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建库脚本
const SCHEMA_SQL: &str = include_str!("../scripts/dev_db/schema.sql");

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 初始化 schema（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
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

/// 检查 schema 版本，落后于代码期望版本时告警（不阻断）
pub fn warn_if_schema_outdated(conn: &Connection) -> rusqlite::Result<()> {
    match read_schema_version(conn)? {
        Some(v) if v >= CURRENT_SCHEMA_VERSION => {}
        Some(v) => tracing::warn!(
            db_version = v,
            expected = CURRENT_SCHEMA_VERSION,
            "数据库 schema 版本落后于代码期望版本"
        ),
        None => tracing::warn!("数据库缺少 schema_version 表，可能未初始化"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}
