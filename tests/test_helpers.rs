// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据写入等功能
// ==========================================

#![allow(dead_code)]

use indicador_carimbadeira::db::{ensure_schema, open_sqlite_connection};
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
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入一组非默认目录配置
pub fn insert_test_config(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let rows = [
        ("carimbadeiras", "CB-10, CB-20"),
        ("componentes", "ROTULO,TAMPA"),
        ("order_code_style", "DIGITS_ONLY"),
        ("order_code_max_digits", "6"),
        ("componente_obrigatorio", "false"),
    ];

    for (key, value) in rows {
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
    }
    Ok(())
}

/// 直接插入一条记录（绕过 API，用于固定 created_at）
pub fn insert_raw_etiqueta(
    conn: &Connection,
    op: &str,
    carimbadeira: &str,
    componente: Option<&str>,
    expected: i64,
    actual: i64,
    created_at: &str,
) -> Result<i64, Box<dyn Error>> {
    let percent = (actual - expected) as f64 / expected as f64 * 100.0;
    conn.execute(
        r#"
        INSERT INTO etiquetas (
            op, carimbadeira, componente,
            quantidade_etiqueta, quantidade_maquina,
            percentual_erro, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![op, carimbadeira, componente, expected, actual, percent, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}
