// ==========================================
// Indicador Carimbadeira - 标签记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑（不计算误差、不校验目录）
// 红线: 只有 insert / list_all，记录不可修改、不可删除
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema};
use crate::domain::etiqueta::{Etiqueta, NovaEtiqueta};
use crate::perf::PerfGuard;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, SubsecRound};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// created_at 存储格式（微秒精度，字典序 = 时间序）
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ==========================================
// Trait: RecordStore
// ==========================================
// 用途: 外部记录存储的窄接口
// 实现者: SqliteEtiquetaRepository
pub trait RecordStore: Send + Sync {
    /// 追加一条记录；id 与 created_at 由存储分配
    ///
    /// # 返回
    /// - Ok(Etiqueta): 已持久化的完整记录
    /// - Err: 约束违反 / 连接失败
    fn insert(&self, nova: &NovaEtiqueta) -> RepositoryResult<Etiqueta>;

    /// 返回全部记录，按 created_at 降序（同一时刻按 id 降序）
    fn list_all(&self) -> RepositoryResult<Vec<Etiqueta>>;
}

// ==========================================
// SqliteEtiquetaRepository - SQLite 实现
// ==========================================
pub struct SqliteEtiquetaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEtiquetaRepository {
    /// 打开数据库文件并确保表结构存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（均幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 统计记录数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM etiquetas", [], |row| row.get(0))?;
        Ok(n)
    }
}

impl RecordStore for SqliteEtiquetaRepository {
    fn insert(&self, nova: &NovaEtiqueta) -> RepositoryResult<Etiqueta> {
        let _perf = PerfGuard::new("etiqueta_insert");
        // 截断到存储精度，保证返回值与读回值一致
        let created_at = chrono::Utc::now().naive_utc().trunc_subsecs(6);

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO etiquetas (
                op, carimbadeira, componente,
                quantidade_etiqueta, quantidade_maquina,
                percentual_erro, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                nova.op,
                nova.carimbadeira,
                nova.componente,
                nova.quantidade_etiqueta,
                nova.quantidade_maquina,
                nova.percentual_erro,
                created_at.format(CREATED_AT_FORMAT).to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(id, op = %nova.op, "etiqueta inserida");

        Ok(Etiqueta {
            id,
            op: nova.op.clone(),
            carimbadeira: nova.carimbadeira.clone(),
            componente: nova.componente.clone(),
            quantidade_etiqueta: nova.quantidade_etiqueta,
            quantidade_maquina: nova.quantidade_maquina,
            percentual_erro: nova.percentual_erro,
            created_at,
        })
    }

    fn list_all(&self) -> RepositoryResult<Vec<Etiqueta>> {
        let _perf = PerfGuard::new("etiqueta_list_all");
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, op, carimbadeira, componente,
                quantidade_etiqueta, quantidade_maquina,
                percentual_erro, created_at
            FROM etiquetas
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let records = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<Etiqueta> {
    let raw_created_at: String = row.get(7)?;
    let created_at = parse_created_at(&raw_created_at).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Etiqueta {
        id: row.get(0)?,
        op: row.get(1)?,
        carimbadeira: row.get(2)?,
        componente: row.get(3)?,
        quantidade_etiqueta: row.get(4)?,
        quantidade_maquina: row.get(5)?,
        percentual_erro: row.get(6)?,
        created_at,
    })
}

/// 兼容秒级精度的旧数据
fn parse_created_at(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
}
