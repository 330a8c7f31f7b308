// ==========================================
// Indicador Carimbadeira - API 层
// ==========================================
// 职责: 提供业务 API 接口,供应用层 / Tauri 命令调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod etiqueta_api;
pub mod notification;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use dashboard_api::{DashboardApi, DashboardLoad, DashboardView, EtiquetaInfo, RecordSnapshot};
pub use error::{ApiError, ApiResult};
pub use etiqueta_api::EtiquetaApi;
pub use notification::{Notification, NotificationKind};
