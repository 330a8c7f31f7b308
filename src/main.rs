// ==========================================
// Indicador Carimbadeira - 主入口
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 系统定位: 贴标机标签计数误差跟踪
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use indicador_carimbadeira::app::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
fn main() {
    use indicador_carimbadeira::app::tauri_commands::*;

    indicador_carimbadeira::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 标签误差指标", indicador_carimbadeira::APP_NAME);
    tracing::info!("系统版本: {}", indicador_carimbadeira::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path).expect("无法初始化AppState");
    tracing::info!("AppState初始化成功，启动Tauri应用...");

    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 录入相关命令
            // ==========================================
            submit_etiqueta,
            format_order_code,
            is_submitting,

            // ==========================================
            // 汇总视图相关命令
            // ==========================================
            load_dashboard,
            list_etiquetas,
            get_error_summary,
            refresh_dashboard,
            export_etiquetas_csv,

            // ==========================================
            // 配置管理相关命令
            // ==========================================
            get_catalog,
            update_catalog,
            set_order_code_style,
            set_componente_obrigatorio,
        ])
        .run(tauri::generate_context!())
        .expect("启动Tauri应用失败");

    tracing::info!("Tauri应用已退出");
}

/// 无界面模式：打印当前数据库的误差汇总
#[cfg(not(feature = "tauri-app"))]
fn main() -> anyhow::Result<()> {
    use indicador_carimbadeira::engine::format_percent;

    indicador_carimbadeira::logging::init();

    println!("==================================================");
    println!("{} - 标签误差指标", indicador_carimbadeira::APP_NAME);
    println!("系统版本: {}", indicador_carimbadeira::VERSION);
    println!("==================================================");

    let db_path = get_default_db_path();
    let state = AppState::new(db_path.clone()).map_err(anyhow::Error::msg)?;
    let load = state.dashboard_api.load_view()?;

    if let Some(n) = &load.notification {
        println!("[{}] {}", n.title, n.description);
    }

    let summary = &load.view.summary;
    println!("数据库: {}", db_path);
    println!("记录数: {}", summary.total_records);
    println!("平均误差: {}", format_percent(summary.overall_mean));
    println!();

    println!("按 Carimbadeira:");
    for g in &summary.by_carimbadeira {
        println!("  {:<12} {:>9} ({} 条)", g.value, format_percent(g.mean), g.count);
    }
    println!("按 Componente:");
    for g in &summary.by_componente {
        println!("  {:<12} {:>9} ({} 条)", g.value, format_percent(g.mean), g.count);
    }
    println!();

    for r in load.view.records.iter().take(10) {
        println!(
            "  {} {:<16} {:<8} {:<10} {:>6} / {:<6} {}",
            r.created_at,
            r.op,
            r.carimbadeira,
            r.componente.as_deref().unwrap_or("-"),
            r.quantidade_etiqueta,
            r.quantidade_maquina,
            r.percentual_erro_display,
        );
    }

    println!();
    println!("图形界面需要启用 tauri-app 特性: cargo run --features tauri-app");
    Ok(())
}
