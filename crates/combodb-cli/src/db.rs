//! `db` command handlers: connectivity, migrations, and catalog seeding.

use std::path::{Path, PathBuf};

use clap::Subcommand;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load restaurants, combos, and serving dates from a seed file
    Seed {
        /// Seed file to load (defaults to `COMBODB_SEED_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub(crate) async fn run_db_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    combodb_db::health_check(pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_db_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = combodb_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Validate `path` and upsert its contents in one transaction.
///
/// # Errors
///
/// Returns an error if the file fails to load or validate, or if any write
/// fails (in which case nothing is committed).
pub(crate) async fn run_db_seed(pool: &sqlx::PgPool, path: &Path) -> anyhow::Result<()> {
    let seed = combodb_core::load_seed(path)?;
    let summary = combodb_db::seed_catalog(pool, &seed).await?;
    tracing::info!(
        path = %path.display(),
        restaurants = summary.restaurants,
        combos = summary.combos,
        serving_dates = summary.serving_dates,
        "seed complete"
    );
    println!(
        "seeded {} restaurant(s), {} combo(s), {} serving date(s) from {}",
        summary.restaurants,
        summary.combos,
        summary.serving_dates,
        path.display()
    );
    Ok(())
}
