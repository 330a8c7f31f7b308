// ==========================================
// Indicador Carimbadeira - 配置层
// ==========================================
// 职责: 机台/部件目录与输入选项管理
// 存储: config_kv 表 (scope_id = 'global')
// ==========================================

pub mod catalog;
pub mod config_manager;

// 重导出核心配置管理器
pub use catalog::Catalog;
pub use config_manager::{config_keys, ConfigManager};
