// ==========================================
// Indicador Carimbadeira - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 流程: 提交 → 成功则清空表单并使快照失效 → 重新拉取并汇总
// ==========================================

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::{
    ConfigApi, DashboardApi, DashboardView, EtiquetaApi, EtiquetaInfo, Notification,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::etiqueta::EntryForm;
use crate::repository::etiqueta_repo::{RecordStore, SqliteEtiquetaRepository};

/// 一次提交的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// 保存成功的记录
    pub record: Option<EtiquetaInfo>,
    /// 提交结果通知（成功 / 校验失败 / 存储失败）
    pub notification: Notification,
    /// 提交后的表单：成功时已清空，失败时原样保留
    pub form: EntryForm,
    /// 提交成功后重新拉取的视图
    pub view: Option<DashboardView>,
    /// 重新拉取失败时的通知（写入本身已成功）
    pub refresh_notification: Option<Notification>,
}

/// 应用状态
///
/// 包含所有API实例和共享资源，在Tauri应用中作为全局状态管理
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 录入API
    pub etiqueta_api: Arc<EtiquetaApi>,

    /// 汇总视图API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);
        crate::i18n::init_locale();

        let mut conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        let store: Arc<dyn RecordStore> = Arc::new(
            SqliteEtiquetaRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建SqliteEtiquetaRepository: {}", e))?,
        );
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let state = Self::from_parts(db_path, store, config_manager);
        tracing::info!("AppState初始化完成");
        Ok(state)
    }

    /// 使用自定义记录存储装配（测试/替换存储实现）
    pub fn from_parts(
        db_path: String,
        store: Arc<dyn RecordStore>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            db_path,
            etiqueta_api: Arc::new(EtiquetaApi::new(store.clone(), config_manager.clone())),
            dashboard_api: Arc::new(DashboardApi::new(store, config_manager.clone())),
            config_api: Arc::new(ConfigApi::new(config_manager)),
        }
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 提交表单：写入 → 失效 → 重读
    ///
    /// 任何失败都转为通知返回；失败时表单保持不变以便重试。
    pub fn submit_form(&self, form: &mut EntryForm) -> SubmitOutcome {
        let record = match self.etiqueta_api.submit(form) {
            Ok(record) => record,
            Err(e) => {
                return SubmitOutcome {
                    record: None,
                    notification: Notification::submit_failed(&e),
                    form: form.clone(),
                    view: None,
                    refresh_notification: None,
                };
            }
        };

        form.clear();
        self.dashboard_api.invalidate();

        let (view, refresh_notification) = match self.dashboard_api.load_view() {
            Ok(load) => (Some(load.view), load.notification),
            Err(e) => {
                tracing::warn!(error = %e, "提交后加载视图失败");
                (None, Some(Notification::load_failed(&e)))
            }
        };

        SubmitOutcome {
            record: Some(EtiquetaInfo::from(&record)),
            notification: Notification::saved(),
            form: form.clone(),
            view,
            refresh_notification,
        }
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - INDICADOR_DB_PATH 环境变量（若设置）
/// - 开发环境: 用户数据目录/indicador-carimbadeira-dev/indicador_carimbadeira.db
/// - 生产环境: 用户数据目录/indicador-carimbadeira/indicador_carimbadeira.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("INDICADOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./indicador_carimbadeira.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = if cfg!(debug_assertions) {
            data_dir.join("indicador-carimbadeira-dev")
        } else {
            data_dir.join("indicador-carimbadeira")
        };

        // best-effort: 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("indicador_carimbadeira.db");
        }
    }

    path.to_string_lossy().to_string()
}
