// ==========================================
// Resto Supply - batch entrypoint
// ==========================================
// Runs the weekly cost recomputation over all active items. The
// surrounding application invokes everything else through AppState; this
// binary exists for the cron trigger.
// ==========================================

use resto_supply::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    resto_supply::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - weekly cost recomputation", resto_supply::APP_NAME);
    tracing::info!("version: {}", resto_supply::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!("using database: {}", db_path);

    let state = AppState::new(db_path)?;

    let summary = state.cost_api.standardize_all()?;
    tracing::info!(
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "done"
    );

    // Machine-readable result line for the invoking scheduler.
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
