use crate::app::state::AppState;
use crate::domain::types::OrderCodeStyle;

use super::common::{map_api_error, to_json};

// ==========================================
// 配置管理相关命令
// ==========================================

/// 查询目录（机台 / 部件 / 订单号格式）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_catalog(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let catalog = state.config_api.get_catalog().map_err(map_api_error)?;
    to_json(&catalog)
}

/// 覆写目录（kind: CARIMBADEIRA / COMPONENTE）
#[tauri::command(rename_all = "snake_case")]
pub async fn update_catalog(
    state: tauri::State<'_, AppState>,
    kind: String,
    values: Vec<String>,
) -> Result<String, String> {
    let saved = state
        .config_api
        .update_catalog(&kind, values)
        .map_err(map_api_error)?;

    to_json(&saved)
}

/// 设置订单号格式
#[tauri::command(rename_all = "snake_case")]
pub async fn set_order_code_style(
    state: tauri::State<'_, AppState>,
    style: OrderCodeStyle,
) -> Result<String, String> {
    state
        .config_api
        .set_order_code_style(style)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 设置部件是否必填
#[tauri::command(rename_all = "snake_case")]
pub async fn set_componente_obrigatorio(
    state: tauri::State<'_, AppState>,
    required: bool,
) -> Result<String, String> {
    state
        .config_api
        .set_componente_obrigatorio(required)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}
