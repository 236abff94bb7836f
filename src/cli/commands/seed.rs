use crate::config::Config;
use crate::db::Store;

pub async fn run(config: &Config, force: bool) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.database.path,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    let inserted = store.seed_catalog(config, force).await?;

    if inserted == 0 {
        println!("Catalog already seeded; nothing to do. Use --force to re-seed.");
    } else {
        println!("✓ Seeded {inserted} products");
    }

    Ok(())
}
