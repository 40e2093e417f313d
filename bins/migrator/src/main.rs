//! Database migration runner for the attachments table.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop all tables and apply every migration
//!
//! The connection string is read from `DATABASE_URL`.

use chewy_db::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
