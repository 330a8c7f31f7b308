// ==========================================
// Indicador Carimbadeira - 操作耗时与 SQL 统计
// ==========================================
// 环境变量:
// - INDICADOR_PERF_SQL=1     开启 SQL 统计（Debug 默认开启，Release 默认关闭）
// - INDICADOR_SLOW_SQL_MS=50 慢 SQL 阈值（毫秒，0 表示不告警）
// 统计口径: 只统计当前线程上处于 PerfGuard 作用域内的语句
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// SQL 统计设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlPerfSettings {
    pub enabled: bool,
    pub slow_sql_ms: u64,
}

impl SqlPerfSettings {
    /// 从环境变量读取
    pub fn from_env() -> Self {
        let enabled = std::env::var("INDICADOR_PERF_SQL")
            .map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(cfg!(debug_assertions));

        let slow_sql_ms = std::env::var("INDICADOR_SLOW_SQL_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });

        Self {
            enabled,
            slow_sql_ms,
        }
    }
}

// 慢 SQL 阈值；u64::MAX 表示不告警
static SLOW_THRESHOLD_MS: AtomicU64 = AtomicU64::new(u64::MAX);

/// 线程内累计计数
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    statements: u64,
    slow: u64,
}

thread_local! {
    static OPEN_SCOPES: Cell<u32> = Cell::new(0);
    static TALLY: Cell<Tally> = Cell::new(Tally::default());
}

fn bump(f: impl FnOnce(&mut Tally)) {
    if OPEN_SCOPES.with(|s| s.get()) == 0 {
        return;
    }
    TALLY.with(|t| {
        let mut tally = t.get();
        f(&mut tally);
        t.set(tally);
    });
}

/// 按环境变量在连接上安装 SQL 统计回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    install_sqlite_tracing_with(conn, SqlPerfSettings::from_env());
}

/// 按给定设置安装（关闭时清除已有回调）
pub fn install_sqlite_tracing_with(conn: &mut Connection, settings: SqlPerfSettings) {
    if !settings.enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let threshold = if settings.slow_sql_ms == 0 {
        u64::MAX
    } else {
        settings.slow_sql_ms
    };
    SLOW_THRESHOLD_MS.store(threshold, Ordering::Relaxed);

    conn.trace(Some(count_statement));
    conn.profile(Some(check_slow_statement));
}

fn count_statement(_sql: &str) {
    bump(|t| t.statements = t.statements.saturating_add(1));
}

fn check_slow_statement(sql: &str, duration: Duration) {
    let ms = duration.as_millis() as u64;
    if ms < SLOW_THRESHOLD_MS.load(Ordering::Relaxed) {
        return;
    }

    let compact: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let shown: String = compact.chars().take(300).collect();
    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %shown, "慢 SQL");
    bump(|t| t.slow = t.slow.saturating_add(1));
}

/// 一次操作的统计结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfReport {
    pub op: &'static str,
    pub elapsed_ms: u64,
    pub sql_count: u64,
    pub slow_sql_count: u64,
}

/// 操作级统计作用域；离开作用域时输出 target = "perf" 的 info 日志
///
/// ```ignore
/// let _perf = indicador_carimbadeira::perf::PerfGuard::new("etiqueta_submit");
/// ```
pub struct PerfGuard {
    op: &'static str,
    started: Instant,
    baseline: Tally,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        OPEN_SCOPES.with(|s| s.set(s.get().saturating_add(1)));
        Self {
            op,
            started: Instant::now(),
            baseline: TALLY.with(|t| t.get()),
        }
    }

    /// 截至目前的统计（不结束作用域）
    pub fn report(&self) -> PerfReport {
        let now = TALLY.with(|t| t.get());
        PerfReport {
            op: self.op,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            sql_count: now.statements.saturating_sub(self.baseline.statements),
            slow_sql_count: now.slow.saturating_sub(self.baseline.slow),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let r = self.report();
        OPEN_SCOPES.with(|s| s.set(s.get().saturating_sub(1)));

        tracing::info!(
            target: "perf",
            op = r.op,
            elapsed_ms = r.elapsed_ms,
            sql_count = r.sql_count,
            slow_sql_count = r.slow_sql_count,
            "done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_only_statements_inside_guard() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing_with(
            &mut conn,
            SqlPerfSettings {
                enabled: true,
                slow_sql_ms: 0,
            },
        );

        conn.execute("CREATE TABLE t (n INTEGER)", []).unwrap();

        let guard = PerfGuard::new("insert_two");
        conn.execute("INSERT INTO t (n) VALUES (1)", []).unwrap();
        conn.execute("INSERT INTO t (n) VALUES (2)", []).unwrap();
        let report = guard.report();

        assert_eq!(report.op, "insert_two");
        assert_eq!(report.sql_count, 2);
        assert_eq!(report.slow_sql_count, 0);
    }

    #[test]
    fn test_nested_guards_share_counts() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing_with(
            &mut conn,
            SqlPerfSettings {
                enabled: true,
                slow_sql_ms: 0,
            },
        );

        conn.execute("CREATE TABLE t (n INTEGER)", []).unwrap();

        let outer = PerfGuard::new("outer");
        conn.execute("INSERT INTO t (n) VALUES (0)", []).unwrap();
        {
            let inner = PerfGuard::new("inner");
            conn.execute("INSERT INTO t (n) VALUES (1)", []).unwrap();
            assert_eq!(inner.report().sql_count, 1);
        }
        assert_eq!(outer.report().sql_count, 2);
    }
}
