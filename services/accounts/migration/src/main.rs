use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(errant_accounts_migration::Migrator).await;
}
