// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 快照刷新、失效、失败保留、汇总与导出
// ==========================================

mod helpers;

use std::sync::{mpsc, Arc};
use std::thread;

use helpers::api_test_helper::*;
use helpers::mock_store::GatedListStore;
use indicador_carimbadeira::api::{ApiError, NotificationKind};
use indicador_carimbadeira::repository::RecordStore;

#[test]
fn test_empty_store_yields_empty_summary() {
    let env = ApiTestEnv::new().unwrap();
    let load = env.state.dashboard_api.load_view().unwrap();

    assert!(load.notification.is_none());
    assert!(load.view.records.is_empty());
    assert_eq!(load.view.summary.total_records, 0);
    assert_eq!(load.view.summary.overall_mean, 0.0);
    assert_eq!(load.view.summary.by_carimbadeira.len(), 4);
    assert!(load.view.summary.by_carimbadeira.iter().all(|g| g.count == 0 && g.mean == 0.0));
    assert!(load.view.fetched_at.is_some());
}

#[test]
fn test_snapshot_is_reused_until_invalidated() {
    let (env, store) = ApiTestEnv::with_switchable_store().unwrap();
    let dashboard = &env.state.dashboard_api;

    assert!(dashboard.is_stale());
    dashboard.list_records().unwrap();
    dashboard.get_summary().unwrap();
    assert_eq!(store.list_calls(), 1);
    assert!(!dashboard.is_stale());

    // 直接经 EtiquetaApi 写入不会触发失效，视图保持不变
    env.state
        .etiqueta_api
        .submit(&form("1", "CB-01", "ABA", "10", "9"))
        .unwrap();
    assert!(dashboard.list_records().unwrap().is_empty());

    dashboard.invalidate();
    assert_eq!(dashboard.list_records().unwrap().len(), 1);
    assert_eq!(store.list_calls(), 2);
}

#[test]
fn test_failed_refresh_keeps_last_snapshot() {
    indicador_carimbadeira::logging::init_test();
    let (env, store) = ApiTestEnv::with_switchable_store().unwrap();
    let dashboard = &env.state.dashboard_api;

    env.state
        .etiqueta_api
        .submit(&form("1", "CB-01", "ABA", "100", "95"))
        .unwrap();
    let first = dashboard.load_view().unwrap();
    assert_eq!(first.view.records.len(), 1);

    store.set_fail_reads(true);
    dashboard.invalidate();

    let err = dashboard.refresh().unwrap_err();
    assert!(matches!(err, ApiError::DatabaseConnectionError(_)));

    let load = dashboard.load_view().unwrap();
    let notification = load.notification.expect("load failure should be notified");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(load.view.records, first.view.records);
    assert_eq!(load.view.summary, first.view.summary);
    assert!(dashboard.is_stale());

    store.set_fail_reads(false);
    let load = dashboard.load_view().unwrap();
    assert!(load.notification.is_none());
    assert!(!dashboard.is_stale());
}

#[test]
fn test_list_is_most_recent_first() {
    let env = ApiTestEnv::new().unwrap();
    let conn = open_test_connection(&env.db_path).unwrap();

    insert_raw_etiqueta(&conn, "100", "CB-01", Some("ABA"), 10, 10, "2024-03-01 08:00:00.000000").unwrap();
    insert_raw_etiqueta(&conn, "300", "CB-02", Some("ABA"), 10, 11, "2024-03-03 08:00:00.000000").unwrap();
    insert_raw_etiqueta(&conn, "200", "CB-03", None, 10, 9, "2024-03-02 08:00:00.000000").unwrap();

    let ops: Vec<String> = env
        .state
        .dashboard_api
        .list_records()
        .unwrap()
        .into_iter()
        .map(|r| r.op)
        .collect();
    assert_eq!(ops, vec!["300", "200", "100"]);
}

#[test]
fn test_summary_follows_catalog_order_and_ignores_unknown_values() {
    let env = ApiTestEnv::new().unwrap();
    let conn = open_test_connection(&env.db_path).unwrap();

    insert_raw_etiqueta(&conn, "1", "CB-04", Some("TAMPA"), 100, 90, "2024-03-01 08:00:00.000000").unwrap();
    insert_raw_etiqueta(&conn, "2", "CB-04", Some("TAMPA"), 100, 100, "2024-03-01 09:00:00.000000").unwrap();
    // 已退役机台：计入总体平均，不出现在分组中
    insert_raw_etiqueta(&conn, "3", "CB-OLD", None, 100, 130, "2024-03-01 10:00:00.000000").unwrap();

    let summary = env.state.dashboard_api.get_summary().unwrap();

    assert_eq!(summary.total_records, 3);
    assert!((summary.overall_mean - 20.0 / 3.0).abs() < 1e-9);

    let values: Vec<&str> = summary.by_carimbadeira.iter().map(|g| g.value.as_str()).collect();
    assert_eq!(values, vec!["CB-01", "CB-02", "CB-03", "CB-04"]);

    let cb04 = &summary.by_carimbadeira[3];
    assert_eq!(cb04.count, 2);
    assert!((cb04.mean + 5.0).abs() < 1e-9);

    let tampa = summary.by_componente.iter().find(|g| g.value == "TAMPA").unwrap();
    assert_eq!(tampa.count, 2);
}

#[test]
fn test_export_csv() {
    let env = ApiTestEnv::new().unwrap();
    env.state
        .etiqueta_api
        .submit(&form("1234567", "CB-03", "VÁLVULA", "200", "201"))
        .unwrap();

    let mut buf = Vec::new();
    let count = env.state.dashboard_api.export_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(count, 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "OP,Carimbadeira,Componente,Qtd. Etiquetas,Qtd. Máquina,Erro (%)");
    assert_eq!(lines[1], "123.456/7,CB-03,VÁLVULA,200,201,0.50");
}

#[test]
fn test_slow_refresh_does_not_hide_newer_write() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();

    let mut gate: Option<Arc<GatedListStore>> = None;
    let env = Arc::new(
        ApiTestEnv::with_store(|repo| {
            let store = Arc::new(GatedListStore::new(repo, entered_tx, release_rx));
            gate = Some(store.clone());
            let store: Arc<dyn RecordStore> = store;
            store
        })
        .unwrap(),
    );
    let gate = gate.unwrap();

    // 后台刷新读到空表后暂停
    gate.arm();
    let env_bg = env.clone();
    let slow = thread::spawn(move || env_bg.state.dashboard_api.refresh());
    entered_rx.recv().unwrap();

    let mut entry = form("1234", "CB-01", "ABA", "100", "97");
    let outcome = env.state.submit_form(&mut entry);
    assert_eq!(outcome.view.map(|v| v.records.len()), Some(1));

    release_tx.send(()).unwrap();
    let stale_result = slow.join().unwrap().unwrap();
    assert!(stale_result.records.is_empty());

    let dashboard = &env.state.dashboard_api;
    assert_eq!(dashboard.snapshot().unwrap().records.len(), 1);
    assert!(!dashboard.is_stale());
    assert_eq!(dashboard.list_records().unwrap().len(), 1);
}

#[test]
fn test_refresh_overtaken_by_invalidate_stays_stale() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();

    let mut gate: Option<Arc<GatedListStore>> = None;
    let env = Arc::new(
        ApiTestEnv::with_store(|repo| {
            let store = Arc::new(GatedListStore::new(repo, entered_tx, release_rx));
            gate = Some(store.clone());
            let store: Arc<dyn RecordStore> = store;
            store
        })
        .unwrap(),
    );
    let gate = gate.unwrap();

    gate.arm();
    let env_bg = env.clone();
    let slow = thread::spawn(move || env_bg.state.dashboard_api.refresh());
    entered_rx.recv().unwrap();

    env.state
        .etiqueta_api
        .submit(&form("1", "CB-02", "TAMPA", "10", "10"))
        .unwrap();
    env.state.dashboard_api.invalidate();

    release_tx.send(()).unwrap();
    slow.join().unwrap().unwrap();

    // 未安装过期结果，下次读取重新拉取
    assert!(env.state.dashboard_api.is_stale());
    assert_eq!(env.state.dashboard_api.list_records().unwrap().len(), 1);
}

#[test]
fn test_fetched_at_uses_same_clock_as_created_at() {
    let env = ApiTestEnv::new().unwrap();
    let record = env
        .state
        .etiqueta_api
        .submit(&form("1", "CB-01", "ABA", "10", "10"))
        .unwrap();

    let snapshot = env.state.dashboard_api.refresh().unwrap();
    let fetched_at = snapshot.fetched_at.expect("refresh sets fetched_at");
    let now_utc = chrono::Utc::now().naive_utc();

    assert!(fetched_at >= record.created_at);
    assert!(fetched_at <= now_utc);
}
