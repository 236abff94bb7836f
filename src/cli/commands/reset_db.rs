use std::io::Write as _;

use crate::config::Config;
use crate::db::Store;

pub async fn run(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes {
        print!("This deletes ALL users, sessions, carts, orders and products. Type 'yes' to continue: ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let store = Store::new(&config.database.path).await?;
    store.reset().await?;

    println!("Database reset!");
    Ok(())
}
