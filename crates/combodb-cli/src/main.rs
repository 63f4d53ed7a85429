mod db;
mod discover;
mod history;
mod locations;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::history::HistoryCommands;
use crate::locations::LocationsCommands;

#[derive(Debug, Parser)]
#[command(name = "combodb-cli")]
#[command(about = "ComboDB command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Stored restaurant locations
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
    /// Combo serving-date history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Print the combos served near a zip code or coordinate this coming week
    Discover {
        /// Zip code to search around
        #[arg(long, required_unless_present = "latitude", conflicts_with = "latitude")]
        zip: Option<String>,
        /// Latitude of the search center (requires --longitude)
        #[arg(long, requires = "longitude", allow_negative_numbers = true)]
        latitude: Option<f64>,
        /// Longitude of the search center (requires --latitude)
        #[arg(long, requires = "latitude", allow_negative_numbers = true)]
        longitude: Option<f64>,
        /// `cuisine` (default) or `date`
        #[arg(long)]
        sort_by: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("combodb-cli: run with --help to list commands");
        return Ok(());
    };

    let config = combodb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = combodb_db::PoolConfig::from_app_config(&config);
    let pool = combodb_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_db_ping(&pool).await?,
            DbCommands::Migrate => db::run_db_migrate(&pool).await?,
            DbCommands::Seed { path } => {
                let path = path.unwrap_or_else(|| config.seed_path.clone());
                db::run_db_seed(&pool, &path).await?;
            }
        },
        Commands::Locations { command } => match command {
            LocationsCommands::Geocode { limit, dry_run } => {
                locations::run_locations_geocode(pool, &config, limit, dry_run).await?;
            }
        },
        Commands::History { command } => match command {
            HistoryCommands::Add { combo, date } => {
                history::run_history_add(&pool, combo, date).await?;
            }
            HistoryCommands::List { combo } => history::run_history_list(pool, combo).await?,
        },
        Commands::Discover {
            zip,
            latitude,
            longitude,
            sort_by,
        } => {
            let center = discover::Center::from_args(zip, latitude, longitude)?;
            discover::run_discover(pool, &config, center, sort_by.as_deref()).await?;
        }
    }

    Ok(())
}
