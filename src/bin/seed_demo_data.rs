// Dev utility: reset the database and seed demo label-count records.
//
// Usage:
//   cargo run --bin seed_demo_data -- [db_path] [record_count]
//
// Records go through EtiquetaApi, so they are normalized and validated
// exactly like records entered in the UI.

use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use indicador_carimbadeira::app::{get_default_db_path, AppState};
use indicador_carimbadeira::engine::format_percent;
use indicador_carimbadeira::EntryForm;

const DEFAULT_RECORD_COUNT: usize = 60;

fn main() -> Result<(), Box<dyn Error>> {
    indicador_carimbadeira::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    let record_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_RECORD_COUNT)
        .max(1);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;
    let catalog = state.config_api.get_catalog()?;

    let mut rng = Lcg(0x5eed_cafe);
    for i in 0..record_count {
        let carimbadeira = &catalog.carimbadeiras[i % catalog.carimbadeiras.len()];
        let componente = &catalog.componentes[rng.next(catalog.componentes.len() as u64) as usize];

        let expected = 500 + rng.next(4500) as i64;
        // -8% .. +6%
        let drift = rng.next(1401) as i64 - 800;
        let actual = (expected + expected * drift / 10_000).max(0);

        let form = EntryForm {
            op: format!("{:010}", 1_000_000_000 + rng.next(1_000_000_000)),
            carimbadeira: carimbadeira.clone(),
            componente: componente.clone(),
            quantidade_etiqueta: expected.to_string(),
            quantidade_maquina: actual.to_string(),
        };
        state.etiqueta_api.submit(&form)?;
    }

    state.dashboard_api.invalidate();
    let summary = state.dashboard_api.get_summary()?;

    println!("db_path={}", db_path);
    println!("records={}", summary.total_records);
    println!("overall_mean={}", format_percent(summary.overall_mean));
    for g in summary.by_carimbadeira.iter().chain(summary.by_componente.iter()) {
        println!("  {}={} (n={})", g.value, format_percent(g.mean), g.count);
    }

    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup = format!("{}.bak_{}", db_path, ts);
    fs::rename(path, &backup)?;
    println!("backup={}", backup);

    for suffix in ["-wal", "-shm"] {
        let side = format!("{}{}", db_path, suffix);
        if Path::new(&side).exists() {
            fs::remove_file(&side)?;
        }
    }
    Ok(())
}

/// 线性同余发生器（演示数据可复现即可）
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound.max(1)
    }
}
