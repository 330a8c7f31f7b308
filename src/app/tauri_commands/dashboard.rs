use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 汇总视图相关命令
// ==========================================

/// 加载完整视图（列表 + 汇总）；刷新失败时返回上一次快照与错误通知
#[tauri::command(rename_all = "snake_case")]
pub async fn load_dashboard(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let load = state.dashboard_api.load_view().map_err(map_api_error)?;
    to_json(&load)
}

/// 查询记录列表（按创建时间降序）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_etiquetas(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let records = state.dashboard_api.list_records().map_err(map_api_error)?;
    to_json(&records)
}

/// 查询误差汇总
#[tauri::command(rename_all = "snake_case")]
pub async fn get_error_summary(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let summary = state.dashboard_api.get_summary().map_err(map_api_error)?;
    to_json(&summary)
}

/// 强制重新拉取
#[tauri::command(rename_all = "snake_case")]
pub async fn refresh_dashboard(state: tauri::State<'_, AppState>) -> Result<String, String> {
    state.dashboard_api.invalidate();
    let load = state.dashboard_api.load_view().map_err(map_api_error)?;
    to_json(&load)
}

/// 导出记录为 CSV 文件
#[tauri::command(rename_all = "snake_case")]
pub async fn export_etiquetas_csv(
    state: tauri::State<'_, AppState>,
    path: String,
) -> Result<String, String> {
    let file = std::fs::File::create(&path).map_err(|e| format!("无法创建文件: {}", e))?;
    let count = state.dashboard_api.export_csv(file).map_err(map_api_error)?;

    tracing::info!(path = %path, count, "CSV 导出完成");
    to_json(&serde_json::json!({ "path": path, "count": count }))
}
