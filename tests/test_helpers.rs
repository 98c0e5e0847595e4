// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据写入等功能
// ==========================================

#![allow(dead_code)]

use hospital_productivity::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

pub fn insert_unit(conn: &Connection, id: i64, name: &str) {
    conn.execute("INSERT INTO unit (id, name) VALUES (?1, ?2)", params![id, name])
        .unwrap();
}

pub fn insert_group(conn: &Connection, id: i64, name: &str, color: &str, active: bool) {
    conn.execute(
        "INSERT INTO service_group (id, name, color, active) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, color, active as i64],
    )
    .unwrap();
}

pub fn insert_service(
    conn: &Connection,
    id: i64,
    unit_id: i64,
    group_id: Option<i64>,
    name: &str,
    static_target: Option<i64>,
) {
    conn.execute(
        "INSERT INTO service (id, unit_id, group_id, name, static_target) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, unit_id, group_id, name, static_target],
    )
    .unwrap();
}

#[allow(clippy::too_many_arguments)]
pub fn insert_execution(
    conn: &Connection,
    unit_id: i64,
    service_id: i64,
    year: i32,
    month: u32,
    day: u32,
    scheduled: i64,
    executed: i64,
    walk_in: i64,
) {
    conn.execute(
        "INSERT INTO daily_execution
         (unit_id, service_id, year, month, day, scheduled_count, executed_count, executed_walkin_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![unit_id, service_id, year, month, day, scheduled, executed, walk_in],
    )
    .unwrap();
}

pub fn insert_capacity(conn: &Connection, unit_id: i64, service_id: i64, label: &str, per_day: i64) {
    conn.execute(
        "INSERT INTO weekday_capacity (unit_id, service_id, weekday_label, consultations_per_day)
         VALUES (?1, ?2, ?3, ?4)",
        params![unit_id, service_id, label, per_day],
    )
    .unwrap();
}

#[allow(clippy::too_many_arguments)]
pub fn insert_override(
    conn: &Connection,
    unit_id: i64,
    service_id: i64,
    kind: &str,
    value: i64,
    start: Option<&str>,
    end: Option<&str>,
    active: bool,
) {
    conn.execute(
        "INSERT INTO target_override
         (service_id, unit_id, kind, target_value, validity_start, validity_end, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![service_id, unit_id, kind, value, start, end, active as i64],
    )
    .unwrap();
}

/// 写入一个含 n 个服务的单元（每个服务有执行记录与上下午产能）
///
/// 服务 ID 为 unit_id * 1000 + 1..=n
pub fn seed_unit_with_services(conn: &Connection, unit_id: i64, n: i64, year: i32, month: u32) {
    insert_unit(conn, unit_id, &format!("Unidade {}", unit_id));
    insert_group(conn, unit_id, "Ambulatório", "#0d6efd", true);

    let tx = conn.unchecked_transaction().unwrap();
    for seq in 1..=n {
        let service_id = unit_id * 1000 + seq;
        let group_id = if seq % 3 == 0 { None } else { Some(unit_id) };
        insert_service(&tx, service_id, unit_id, group_id, &format!("Serviço {:03}", seq), Some(100 + seq));
        insert_capacity(&tx, unit_id, service_id, "segunda-manhã", 5 + seq % 4);
        insert_capacity(&tx, unit_id, service_id, "Segunda tarde", 3);
        insert_capacity(&tx, unit_id, service_id, "quarta", seq % 7);
        for day in [1u32, 2, 9, 15, 28] {
            insert_execution(&tx, unit_id, service_id, year, month, day, 6 + seq % 5, 4 + seq % 3, seq % 2);
        }
    }
    tx.commit().unwrap();
}
