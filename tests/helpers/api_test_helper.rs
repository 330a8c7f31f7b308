// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use indicador_carimbadeira::api::ApiError;
use indicador_carimbadeira::app::AppState;
use indicador_carimbadeira::config::ConfigManager;
use indicador_carimbadeira::repository::{RecordStore, SqliteEtiquetaRepository};
use indicador_carimbadeira::EntryForm;

use super::mock_store::SwitchableStore;

pub use test_helpers::{insert_raw_etiqueta, insert_test_config, open_test_connection};

/// API测试环境
///
/// 持有临时数据库文件；drop 时文件随之删除
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub repo: Arc<SqliteEtiquetaRepository>,
    pub config_manager: Arc<ConfigManager>,
    pub state: AppState,
}

impl ApiTestEnv {
    /// 使用 SQLite 存储创建测试环境
    pub fn new() -> Result<Self, String> {
        Self::with_store(|repo| repo)
    }

    /// 用自定义存储包装 SQLite 存储
    pub fn with_store<F>(wrap: F) -> Result<Self, String>
    where
        F: FnOnce(Arc<dyn RecordStore>) -> Arc<dyn RecordStore>,
    {
        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = open_test_connection(&db_path).map_err(|e| e.to_string())?;
        let conn = Arc::new(Mutex::new(conn));

        let repo = Arc::new(
            SqliteEtiquetaRepository::from_connection(conn.clone()).map_err(|e| e.to_string())?,
        );
        let config_manager =
            Arc::new(ConfigManager::from_connection(conn).map_err(|e| e.to_string())?);

        let store = wrap(repo.clone());
        let state = AppState::from_parts(db_path.clone(), store, config_manager.clone());

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            repo,
            config_manager,
            state,
        })
    }
}

impl ApiTestEnv {
    /// 使用可切换失败的存储创建测试环境
    pub fn with_switchable_store() -> Result<(Self, Arc<SwitchableStore>), String> {
        let mut handle: Option<Arc<SwitchableStore>> = None;
        let env = Self::with_store(|repo| {
            let store = Arc::new(SwitchableStore::new(repo));
            handle = Some(store.clone());
            let store: Arc<dyn RecordStore> = store;
            store
        })?;
        let store = handle.ok_or("SwitchableStore 未创建")?;
        Ok((env, store))
    }
}

/// 构造一张完整表单
pub fn form(op: &str, carimbadeira: &str, componente: &str, expected: &str, actual: &str) -> EntryForm {
    EntryForm {
        op: op.to_string(),
        carimbadeira: carimbadeira.to_string(),
        componente: componente.to_string(),
        quantidade_etiqueta: expected.to_string(),
        quantidade_maquina: actual.to_string(),
    }
}

/// 断言校验失败且指向给定字段
pub fn assert_validation_failed(result: Result<impl std::fmt::Debug, ApiError>, field: &str) {
    match result {
        Err(ApiError::ValidationFailed(v)) => {
            assert_eq!(v.field(), field, "校验失败字段不符: {:?}", v);
        }
        other => panic!("Expected ValidationFailed({}), got {:?}", field, other),
    }
}
