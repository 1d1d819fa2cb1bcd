use crate::{
    conn::{ConnectionPinger, ConnectionTarget, ErpConnectionPinger, MySqlConnectionPinger},
    env::EnvManager,
    error::CliError,
};
use clap::Parser;
use commands::Commands;
use engine_config::{
    catalog::{Catalog, EntityKind},
    settings::{self, BulkSyncSettings, RowSyncSettings},
};
use engine_runtime::execution::executor;
use model::entity::SyncEntity;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "erpsync",
    version = "0.1.0",
    about = "Pushes pending store records to the Sankhya ERP"
)]
struct Cli {
    #[arg(long, global = true, help = "Env file to load instead of ./.env")]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let env = EnvManager::load(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Sync {
            entity,
            all,
            token_policy,
            output,
            report,
        } => {
            let mut settings = RowSyncSettings::from_vars(env.all())?;
            if let Some(policy) = token_policy {
                settings.token_policy = policy.parse()?;
            }

            let entities = select_entities(entity.as_deref(), all)?;
            let summaries = executor::run_entities(&settings, &entities).await?;
            output::emit(&summaries, output.as_deref(), report).await?;
        }
        Commands::Municipalities {
            chunk_size,
            output,
            report,
        } => {
            let mut settings = BulkSyncSettings::from_vars(env.all())?;
            if let Some(chunk_size) = chunk_size {
                settings.bulk = settings.bulk.with_chunk_size(chunk_size)?;
            }

            let summary = executor::run_municipalities(&settings).await?;
            output::emit(&[summary], output.as_deref(), report).await?;
        }
        Commands::Entities => {
            let json = serde_json::to_string_pretty(&Catalog::builtin())?;
            println!("{json}");
        }
        Commands::TestConn { target } => match target.parse::<ConnectionTarget>()? {
            ConnectionTarget::MySql => {
                let database = settings::database_from_vars(env.all())?;
                MySqlConnectionPinger {
                    params: database.connect,
                }
                .ping()
                .await?;
            }
            ConnectionTarget::Erp => {
                let erp = settings::erp_from_vars(env.all())?;
                ErpConnectionPinger { settings: erp }.ping().await?;
            }
        },
    }

    Ok(())
}

fn select_entities(entity: Option<&str>, all: bool) -> Result<Vec<SyncEntity>, CliError> {
    let kinds = match entity {
        Some(name) if !all => vec![name.parse::<EntityKind>()?],
        _ => EntityKind::ALL.to_vec(),
    };

    info!(
        "Entities selected: {}",
        kinds
            .iter()
            .map(EntityKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(kinds.iter().map(EntityKind::entity).collect())
}
