// Dev utility: create the schema and seed one demo unit with a month of data.
//
// Usage:
//   cargo run --bin seed_demo_db -- [db_path] [year] [month]
//
// Existing DB files are backed up before being replaced.

use chrono::{Datelike, Local, NaiveDate};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use hospital_productivity::app::get_default_db_path;
use hospital_productivity::db::{init_schema, open_sqlite_connection};

const DEMO_UNIT_ID: i64 = 1;

// (id, group_id, name, static_target)
const SERVICES: &[(i64, Option<i64>, &str, Option<i64>)] = &[
    (1, Some(1), "Consulta Médica", Some(600)),
    (2, Some(1), "Consulta de Enfermagem", Some(400)),
    (3, Some(2), "Raio-X", Some(300)),
    (4, Some(2), "Ultrassonografia", None),
    (5, None, "Curativo", Some(200)),
];

// (id, name, color, active)
const GROUPS: &[(i64, &str, &str, i64)] = &[
    (1, "Ambulatório", "#0d6efd", 1),
    (2, "Diagnóstico por Imagem", "#198754", 1),
];

// (service_id, label, consultations_per_day)
const CAPACITY: &[(i64, &str, i64)] = &[
    (1, "Segunda-feira-manhã", 16),
    (1, "segunda-feira-tarde", 14),
    (1, "Terça-feira manhã", 15),
    (1, "Quarta-feira", 30),
    (1, "quinta manha", 15),
    (1, "Sexta-feira tarde", 12),
    (2, "segunda", 20),
    (2, "quarta", 20),
    (2, "sexta", 20),
    (3, "Terça", 14),
    (3, "Quinta", 14),
    (4, "Sábado manhã", 8),
    (5, "seg", 10),
    (5, "ter", 10),
    (5, "feriado", 5),
];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    let today = Local::now().date_naive();
    let year = args
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(today.year());
    let month = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .unwrap_or(today.month());

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed_demo_unit(&conn, year, month)?;
    print_quick_counts(&conn)?;

    eprintln!("Seeded {} for {:04}-{:02}", db_path, year, month);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo_unit(conn: &Connection, year: i32, month: u32) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO unit (id, name) VALUES (?1, ?2)",
        params![DEMO_UNIT_ID, "Hospital Municipal Demonstrativo"],
    )?;

    for (id, name, color, active) in GROUPS {
        conn.execute(
            "INSERT INTO service_group (id, name, color, active) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, color, active],
        )?;
    }

    for (id, group_id, name, static_target) in SERVICES {
        conn.execute(
            "INSERT INTO service (id, unit_id, group_id, name, static_target) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, DEMO_UNIT_ID, group_id, name, static_target],
        )?;
    }

    for (service_id, label, per_day) in CAPACITY {
        conn.execute(
            "INSERT INTO weekday_capacity (unit_id, service_id, weekday_label, consultations_per_day)
             VALUES (?1, ?2, ?3, ?4)",
            params![DEMO_UNIT_ID, service_id, label, per_day],
        )?;
    }

    // 一条常驻 PDT + 一条当年的 META
    conn.execute(
        "INSERT INTO target_override (service_id, unit_id, kind, target_value, validity_start, validity_end, active)
         VALUES (1, ?1, 'PDT', 650, NULL, NULL, 1)",
        params![DEMO_UNIT_ID],
    )?;
    conn.execute(
        "INSERT INTO target_override (service_id, unit_id, kind, target_value, validity_start, validity_end, active)
         VALUES (3, ?1, 'META', 280, ?2, ?3, 1)",
        params![
            DEMO_UNIT_ID,
            format!("{:04}-01-01", year),
            format!("{:04}-12-31", year)
        ],
    )?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or("invalid year/month")?;
    let tx = conn.unchecked_transaction()?;
    for date in first.iter_days().take_while(|d| d.month() == month) {
        let day = date.day() as i64;
        for (service_id, _, _, _) in SERVICES {
            // 周末无记录；其余日期按简单规律生成
            if date.weekday().number_from_monday() > 5 {
                continue;
            }
            let scheduled = 8 + (day * 7 + service_id * 3) % 12;
            let executed = scheduled - (day + service_id) % 4;
            let walk_in = (day * service_id) % 3;
            tx.execute(
                "INSERT INTO daily_execution
                 (unit_id, service_id, year, month, day, scheduled_count, executed_count, executed_walkin_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![DEMO_UNIT_ID, service_id, year, month, day, scheduled, executed, walk_in],
            )?;
        }
    }
    tx.commit()?;

    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for table in ["unit", "service_group", "service", "weekday_capacity", "target_override", "daily_execution"] {
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("{:<18} {}", table, count);
    }
    Ok(())
}
