// ==========================================
// Indicador Carimbadeira - 应用层
// ==========================================
// 职责: 状态装配、写入→失效→重读流程、Tauri 集成
// ==========================================

pub mod state;
pub mod tauri_commands;

// 重导出
pub use state::{get_default_db_path, AppState, SubmitOutcome};

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
