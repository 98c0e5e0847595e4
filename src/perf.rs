// ==========================================
// 医院产能看板 - SQL 计数与慢查询日志
// ==========================================
// 报表构建用 PerfGuard 包裹，结束时输出耗时 / SQL 数 / 慢 SQL 数
// ==========================================

use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
// 进程级慢 SQL 计数；并发请求时 PerfGuard 的差值包含其他请求的慢 SQL
static SLOW_SQL_TOTAL: AtomicU64 = AtomicU64::new(0);

/// 开关环境变量
pub const PERF_SQL_ENV: &str = "HOSPITAL_PRODUCTIVITY_PERF_SQL";
/// 慢 SQL 阈值环境变量（毫秒）
pub const SLOW_SQL_MS_ENV: &str = "HOSPITAL_PRODUCTIVITY_SLOW_SQL_MS";

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on" | "sim"
    )
}

fn truncate_sql(sql: &str, max_len: usize) -> String {
    let s = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s,
    }
}

/// 安装 SQLite 语句 profile（慢查询日志）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭
/// - `HOSPITAL_PRODUCTIVITY_PERF_SQL=1` 强制开启
/// - `HOSPITAL_PRODUCTIVITY_SLOW_SQL_MS=50` 配置慢 SQL 阈值（毫秒）
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = match std::env::var(PERF_SQL_ENV) {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    };

    PERF_SQL_ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var(SLOW_SQL_MS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_SQL_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);

    conn.profile(Some(sql_profile_callback));
}

fn sql_profile_callback(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %truncate_sql(sql, 420),
            "slow sql"
        );
        SLOW_SQL_TOTAL.fetch_add(1, Ordering::Relaxed);
    }
}

/// SQL 语句计数来源（通常是数据源的 QueryCounter）
pub type SqlCountFn = Box<dyn Fn() -> u64 + Send + Sync>;

/// 性能统计 Guard：记录 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// 查询在阻塞任务线程上执行，SQL 数取自 `with_sql_counter` 给出的计数来源
/// （创建时取基线，结束时取差值）；未设置时为 0。
///
/// ```ignore
/// let _perf = PerfGuard::new("engine.build_report")
///     .with_sql_counter(move || source.queries_issued());
/// ```
pub struct PerfGuard {
    op: &'static str,
    detail: Option<String>,
    start: Instant,
    sql_counter: Option<(SqlCountFn, u64)>,
    slow_sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            detail: None,
            start: Instant::now(),
            sql_counter: None,
            slow_sql_start: SLOW_SQL_TOTAL.load(Ordering::Relaxed),
        }
    }

    /// 附加上下文（如 unit_id / 年月），输出在结束日志中
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 设置 SQL 计数来源，并以当前值为基线
    pub fn with_sql_counter<F>(mut self, counter: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        let baseline = counter();
        self.sql_counter = Some((Box::new(counter), baseline));
        self
    }

    /// Guard 创建以来执行的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        match &self.sql_counter {
            Some((counter, baseline)) => counter().saturating_sub(*baseline),
            None => 0,
        }
    }

    /// Guard 创建以来的慢 SQL 数
    pub fn slow_sql_count(&self) -> u64 {
        SLOW_SQL_TOTAL
            .load(Ordering::Relaxed)
            .saturating_sub(self.slow_sql_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            detail = self.detail.as_deref().unwrap_or(""),
            elapsed_ms,
            sql_count = self.sql_count(),
            slow_sql_count = self.slow_sql_count(),
            "done"
        );
    }
}
