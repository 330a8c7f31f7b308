// ==========================================
// Indicador Carimbadeira - 汇总视图 API
// ==========================================
// 职责: 持有记录快照、刷新、汇总、导出
// 规则: 快照整体替换，不在原处修改
// 规则: 刷新失败时保留上一次成功的快照
// 规则: 写入成功后 invalidate → 下次读取时重新拉取
// 规则: 拉取期间发生 invalidate 的结果不得安装（代次校验）
// ==========================================

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::notification::Notification;
use crate::config::config_manager::ConfigManager;
use crate::domain::etiqueta::Etiqueta;
use crate::domain::summary::ErrorSummary;
use crate::engine::{format_percent, AggregationEngine};
use crate::perf::PerfGuard;
use crate::repository::etiqueta_repo::RecordStore;

/// 一次成功拉取的记录快照
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot {
    pub records: Vec<Etiqueta>,
    /// 拉取时间；None 表示尚未成功拉取过
    pub fetched_at: Option<NaiveDateTime>,
}

impl RecordSnapshot {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            fetched_at: None,
        }
    }
}

/// 列表行（前端展示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtiquetaInfo {
    pub id: i64,
    pub op: String,
    pub carimbadeira: String,
    pub componente: Option<String>,
    pub quantidade_etiqueta: i64,
    pub quantidade_maquina: i64,
    pub percentual_erro: f64,
    pub percentual_erro_display: String,
    pub created_at: String,
}

impl From<&Etiqueta> for EtiquetaInfo {
    fn from(r: &Etiqueta) -> Self {
        Self {
            id: r.id,
            op: r.op.clone(),
            carimbadeira: r.carimbadeira.clone(),
            componente: r.componente.clone(),
            quantidade_etiqueta: r.quantidade_etiqueta,
            quantidade_maquina: r.quantidade_maquina,
            percentual_erro: r.percentual_erro,
            percentual_erro_display: format_percent(r.percentual_erro),
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 完整视图：记录列表 + 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub records: Vec<EtiquetaInfo>,
    pub summary: ErrorSummary,
    pub fetched_at: Option<String>,
}

/// 加载结果：始终带视图；刷新失败时附带错误通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLoad {
    pub view: DashboardView,
    pub notification: Option<Notification>,
}

// ==========================================
// DashboardApi - 汇总视图 API
// ==========================================
pub struct DashboardApi {
    store: Arc<dyn RecordStore>,
    config_manager: Arc<ConfigManager>,
    engine: AggregationEngine,
    snapshot: RwLock<Arc<RecordSnapshot>>,
    /// 每次 invalidate 递增
    generation: AtomicU64,
    /// 当前快照对应的代次；与 generation 不等即为过期
    installed_generation: AtomicU64,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例（快照为空且标记为过期）
    pub fn new(store: Arc<dyn RecordStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
            engine: AggregationEngine::new(),
            snapshot: RwLock::new(Arc::new(RecordSnapshot::empty())),
            generation: AtomicU64::new(1),
            installed_generation: AtomicU64::new(0),
        }
    }

    /// 标记快照过期（写入成功后调用）
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_stale(&self) -> bool {
        self.installed_generation.load(Ordering::Acquire) != self.generation.load(Ordering::Acquire)
    }

    /// 当前快照（不触发拉取）
    pub fn snapshot(&self) -> ApiResult<Arc<RecordSnapshot>> {
        self.snapshot
            .read()
            .map(|s| Arc::clone(&s))
            .map_err(|e| ApiError::InternalError(format!("快照锁获取失败: {}", e)))
    }

    /// 全量拉取并整体替换快照
    ///
    /// 拉取开始后若发生过 invalidate，结果只返回给调用方，不安装，快照保持过期。
    ///
    /// # 返回
    /// - Ok: 本次拉取的快照
    /// - Err: 存储错误；旧快照保持不变，过期标记保持
    pub fn refresh(&self) -> ApiResult<Arc<RecordSnapshot>> {
        let _perf = PerfGuard::new("dashboard_refresh");
        let observed = self.generation.load(Ordering::Acquire);

        let records = self.store.list_all().map_err(|e| {
            tracing::warn!(error = %e, "刷新记录失败，保留上一次快照");
            ApiError::from(e)
        })?;

        let fresh = Arc::new(RecordSnapshot {
            records,
            fetched_at: Some(chrono::Utc::now().naive_utc()),
        });

        let mut slot = self
            .snapshot
            .write()
            .map_err(|e| ApiError::InternalError(format!("快照锁获取失败: {}", e)))?;

        let superseded = self.generation.load(Ordering::Acquire) != observed
            || self.installed_generation.load(Ordering::Acquire) > observed;
        if superseded {
            tracing::debug!(observed, "拉取期间快照已失效，丢弃本次结果");
            return Ok(fresh);
        }

        *slot = Arc::clone(&fresh);
        self.installed_generation.store(observed, Ordering::Release);
        drop(slot);

        tracing::debug!(count = fresh.records.len(), generation = observed, "快照已刷新");
        Ok(fresh)
    }

    /// 若快照过期则刷新，否则返回当前快照
    pub fn ensure_fresh(&self) -> ApiResult<Arc<RecordSnapshot>> {
        if self.is_stale() {
            self.refresh()
        } else {
            self.snapshot()
        }
    }

    /// 基于给定快照计算汇总（目录按当前配置读取）
    pub fn summarize(&self, snapshot: &RecordSnapshot) -> ApiResult<ErrorSummary> {
        let catalog = self
            .config_manager
            .load_catalog()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(self
            .engine
            .summarize(&snapshot.records, &catalog.carimbadeiras, &catalog.componentes))
    }

    /// 列表（必要时刷新）
    pub fn list_records(&self) -> ApiResult<Vec<EtiquetaInfo>> {
        let snapshot = self.ensure_fresh()?;
        Ok(snapshot.records.iter().map(EtiquetaInfo::from).collect())
    }

    /// 汇总（必要时刷新）
    pub fn get_summary(&self) -> ApiResult<ErrorSummary> {
        let snapshot = self.ensure_fresh()?;
        self.summarize(&snapshot)
    }

    /// 加载完整视图；刷新失败时退回上一次快照并附带错误通知
    pub fn load_view(&self) -> ApiResult<DashboardLoad> {
        let (snapshot, notification) = match self.ensure_fresh() {
            Ok(s) => (s, None),
            Err(e) if e.is_store_error() => (self.snapshot()?, Some(Notification::load_failed(&e))),
            Err(e) => return Err(e),
        };

        let summary = self.summarize(&snapshot)?;
        Ok(DashboardLoad {
            view: DashboardView {
                records: snapshot.records.iter().map(EtiquetaInfo::from).collect(),
                summary,
                fetched_at: snapshot
                    .fetched_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            },
            notification,
        })
    }

    /// 将当前快照导出为 CSV
    ///
    /// # 返回
    /// - Ok(usize): 导出的记录数
    pub fn export_csv<W: Write>(&self, writer: W) -> ApiResult<usize> {
        let snapshot = self.ensure_fresh()?;
        write_records_csv(&snapshot.records, writer)
    }
}

/// 列与记录表格一致: OP / Carimbadeira / Componente / Qtd. Etiquetas / Qtd. Máquina / Erro (%)
fn write_records_csv<W: Write>(records: &[Etiqueta], writer: W) -> ApiResult<usize> {
    let export_err = |e: csv::Error| ApiError::ExportError(e.to_string());

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "OP",
        "Carimbadeira",
        "Componente",
        "Qtd. Etiquetas",
        "Qtd. Máquina",
        "Erro (%)",
    ])
    .map_err(export_err)?;

    for r in records {
        wtr.write_record([
            r.op.clone(),
            r.carimbadeira.clone(),
            r.componente.clone().unwrap_or_default(),
            r.quantidade_etiqueta.to_string(),
            r.quantidade_maquina.to_string(),
            format!("{:.2}", r.percentual_erro),
        ])
        .map_err(export_err)?;
    }

    wtr.flush()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    Ok(records.len())
}
