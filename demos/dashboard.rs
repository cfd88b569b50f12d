use coin_dashboard::{Dashboard, DashboardConfig, FileStorage, SortKey, SortOrder};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let storage_path = std::env::temp_dir()
        .join("coin-dashboard")
        .join("storage.json");
    println!("Coin Dashboard (favorites stored in {})", storage_path.display());
    println!("==================================================");

    let storage = Arc::new(FileStorage::new(&storage_path));
    let mut dashboard = Dashboard::with_coingecko(storage, DashboardConfig::default())?;
    dashboard.start();

    // 1. First poll fires immediately
    if !dashboard.process_next().await {
        return Err("market poller is not running".into());
    }
    let health = dashboard.health_check();
    println!("Health: {:?} ({})", health.status, health.message.unwrap_or_default());

    // 2. Search and favorite
    dashboard.search("bit");
    if !dashboard.state().is_favorite("bitcoin") {
        dashboard.toggle_favorite("bitcoin");
    }
    dashboard.set_sort(Some(SortOrder::descending(SortKey::Change24h)));
    println!("\n{}", dashboard.render());

    // 3. Detail view
    dashboard.navigate("/coin/bitcoin");
    println!("{}", dashboard.render());
    dashboard.process_next().await;
    println!("{}", dashboard.render());

    // 4. A coin that does not exist
    dashboard.navigate("/coin/not-a-real-coin");
    dashboard.process_next().await;
    println!("{}", dashboard.render());

    dashboard.back();
    dashboard.shutdown();

    let metrics = dashboard.metrics();
    println!(
        "Provider {}: p50={:.0}ms, p99={:.0}ms, success_rate={:.1}%",
        metrics.provider_name,
        metrics.latency_p50_ms,
        metrics.latency_p99_ms,
        metrics.success_rate * 100.0
    );

    Ok(())
}
