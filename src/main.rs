use dotenvy::dotenv;
use stock_buddy::{
    config::{database, operator, seed},
    core::view::stock_status,
    errors::Result,
    tracker::Tracker,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the seed configuration
    let config = seed::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect to the database and make sure the tables exist
    let database_url = database::get_database_url();
    let db = database::init_db(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Load stored collections, seeding anything missing
    let tracker = Tracker::open(db, &config, operator::get_operator())
        .await
        .inspect_err(|e| error!("Failed to load inventory: {}", e))?;

    // 6. Report current stock
    for stats in tracker.category_stats() {
        info!(
            "{} {}: {} items, {} units",
            stats.icon, stats.name, stats.item_count, stats.total_quantity
        );
    }
    for item in tracker.inventory().items() {
        let status = stock_status(item.quantity);
        if item.quantity == 0 {
            warn!("{} ({}) {}", item.name, item.id, status.label());
        } else {
            info!(
                "{} ({}): {} {} {}",
                item.name,
                item.id,
                item.quantity,
                item.unit,
                status.label()
            );
        }
    }

    let summary = tracker.summary();
    info!(
        items = summary.item_count,
        units = summary.total_quantity,
        out_of_stock = summary.out_of_stock,
        low_stock = summary.low_stock,
        "Stock summary"
    );

    Ok(())
}
