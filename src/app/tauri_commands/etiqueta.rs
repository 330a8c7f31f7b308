use crate::app::state::AppState;
use crate::domain::etiqueta::EntryForm;

use super::common::{map_api_error, to_json};

// ==========================================
// 录入相关命令
// ==========================================

/// 提交录入表单（写入 → 失效 → 重读）
///
/// 失败不会以 Err 返回：结果中的 notification 描述失败原因，form 原样返回。
#[tauri::command(rename_all = "snake_case")]
pub async fn submit_etiqueta(
    state: tauri::State<'_, AppState>,
    form: EntryForm,
) -> Result<String, String> {
    let mut form = form;
    let outcome = state.submit_form(&mut form);
    to_json(&outcome)
}

/// 键入时格式化订单号
#[tauri::command(rename_all = "snake_case")]
pub async fn format_order_code(
    state: tauri::State<'_, AppState>,
    raw: String,
) -> Result<String, String> {
    let formatted = state
        .etiqueta_api
        .format_order_code(&raw)
        .map_err(map_api_error)?;

    to_json(&formatted)
}

/// 是否有提交在途（前端据此禁用保存按钮）
#[tauri::command(rename_all = "snake_case")]
pub async fn is_submitting(state: tauri::State<'_, AppState>) -> Result<String, String> {
    to_json(&state.etiqueta_api.is_submitting())
}
