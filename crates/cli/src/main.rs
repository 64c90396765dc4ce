//! # pdns-cof
//!
//! Passive DNS collector for D4 sensors: drains the analyzer queue into a
//! Redis-compatible store and serves the aggregates as COF over HTTP.

mod bootstrap;
mod di;
mod server;

use clap::{Parser, Subcommand};
use pdns_cof_domain::CliOverrides;
use pdns_cof_infrastructure::import::{FileImporter, ImportFormat};
use pdns_cof_infrastructure::queue::RedisEventQueue;
use pdns_cof_jobs::{IngestionJob, JobRunner};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "pdns-cof")]
#[command(version)]
#[command(about = "Passive DNS aggregation for D4 sensors, served as COF")]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// Aggregation store host
    #[arg(long, global = true)]
    store_host: Option<String>,

    /// Aggregation store port
    #[arg(long, global = true)]
    store_port: Option<u16>,

    /// HTTP bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// HTTP port
    #[arg(short = 'w', long, global = true)]
    web_port: Option<u16>,

    /// Analyzer UUID registered on the D4 server
    #[arg(long, global = true)]
    uuid: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Keep aggregates in process memory instead of the store
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /query, /fquery and /info
    Serve {
        /// Also drain the D4 analyzer queue in this process
        #[arg(long)]
        ingest: bool,
    },
    /// Drain the D4 analyzer queue into the store
    Ingest,
    /// Load a file of COF records or raw sensor lines
    Import {
        #[arg(short = 'f', long)]
        file: PathBuf,

        /// ndjson, json-array or lines
        #[arg(long, default_value = "ndjson")]
        format: ImportFormat,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            store_host: self.store_host.clone(),
            store_port: self.store_port,
            bind_address: self.bind.clone(),
            web_port: self.web_port,
            queue_uuid: self.uuid.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);
    bootstrap::log_config(cli.config.as_deref(), &config);

    let shutdown = CancellationToken::new();
    bootstrap::shutdown_on_signal(shutdown.clone());

    let kv = bootstrap::connect_store(&config.store, cli.memory).await?;
    let services = di::Services::new(&config, kv)?;

    match cli.command {
        Command::Serve { ingest } => {
            if ingest {
                config.validate_for_ingest()?;
                let job = ingestion_job(&config, &services, shutdown.clone()).await?;
                JobRunner::new().with_ingestion(job).start().await;
            }

            let router = pdns_cof_api::create_api_routes(services.app_state());
            server::start_web_server(config.server.listen_address(), router, shutdown).await?;
        }
        Command::Ingest => {
            config.validate_for_ingest()?;
            let job = ingestion_job(&config, &services, shutdown).await?;
            job.run().await;
        }
        Command::Import { file, format } => {
            let summary = FileImporter::new(services.ingest.clone())
                .import(&file, format)
                .await?;
            if summary.failed > 0 {
                anyhow::bail!(
                    "{} record(s) from {} could not be stored",
                    summary.failed,
                    file.display()
                );
            }
        }
    }

    info!("pdns-cof stopped");
    Ok(())
}

async fn ingestion_job(
    config: &pdns_cof_domain::Config,
    services: &di::Services,
    shutdown: CancellationToken,
) -> anyhow::Result<IngestionJob> {
    let queue = RedisEventQueue::connect(&config.queue).await?;
    Ok(IngestionJob::new(Arc::new(queue), services.ingest.clone())
        .with_idle_backoff(Duration::from_millis(config.ingest.idle_backoff_ms))
        .with_max_retries(config.ingest.max_retries)
        .with_dead_letter(config.queue.dead_letter)
        .with_cancellation(shutdown))
}
