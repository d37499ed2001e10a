use clap::Parser;
use ferrous_zone_application::ports::ZoneCatalog;
use ferrous_zone_application::use_cases::HandleZoneQueryUseCase;
use ferrous_zone_domain::CliOverrides;
use ferrous_zone_infrastructure::dns::{RefusedHandler, WireRecordConverter, ZoneServerHandler};
use ferrous_zone_infrastructure::repositories::ZoneRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-zone")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Zone - Authoritative DNS server for file-backed zones")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Directory holding the zone files
    #[arg(short = 'z', long, value_name = "DIR")]
    zones: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        zones_directory: cli.zones.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Zone v{}", env!("CARGO_PKG_VERSION"));

    let repository = Arc::new(ZoneRepository::new(
        &config.zones.directory,
        Duration::from_secs(config.zones.reload_interval_secs),
    ));
    match repository.load_zones().await {
        Ok(count) => info!(zones = count, directory = %config.zones.directory, "Initial zone load"),
        Err(e) => warn!(error = %e, "Initial zone load failed, will retry on next query"),
    }

    let shutdown = CancellationToken::new();
    let converter = Arc::new(WireRecordConverter::new(
        repository.clone(),
        config.zones.default_ttl,
    ));
    let use_case = HandleZoneQueryUseCase::new(
        repository.clone(),
        repository,
        converter,
        Arc::new(RefusedHandler),
    )
    .with_transfer_length(config.zones.transfer_length)
    .with_cancellation(shutdown.clone());

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let handler = ZoneServerHandler::new(Arc::new(use_case));
    let tcp_timeout = Duration::from_secs(config.server.tcp_timeout_secs);

    let server_shutdown = shutdown.clone();
    let mut server_task = tokio::spawn(async move {
        server::start_dns_server(dns_addr, handler, tcp_timeout, server_shutdown).await
    });

    let finished = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        result = &mut server_task => Some(result),
    };
    let result = match finished {
        Some(result) => result,
        None => {
            info!("Shutdown signal received");
            shutdown.cancel();
            server_task.await
        }
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "DNS server error"),
        Err(e) => error!(error = %e, "DNS server task failed"),
    }

    info!("Server shutdown complete");
    Ok(())
}
