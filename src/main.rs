use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::{error, info};

mod api;
mod cli;
mod client;
mod config;
mod controller;
mod jobs;
mod logging;
mod render;
mod shutdown;

use crate::api::{routes_config, validation};
use crate::cli::{Cmd, SubCommandType};
use crate::controller::{DataSource, SessionRegistry, ViewController};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cmd::parse();

    // Load configuration from environment
    let config = config::Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    logging::init(&config.log_dir)?;
    let invalid = |e: client::ApiError| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string());

    match args.command.unwrap_or(SubCommandType::Serve) {
        SubCommandType::Serve => {}
        command => {
            let source = DataSource::from_config(&config).map_err(invalid)?;
            let controller = ViewController::new(source, config.search_debounce, config.recent_jobs_limit);
            return cli::run(command, controller).await.map_err(|e| {
                error!("{}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            });
        }
    }

    let registry = SessionRegistry::from_config(&config).map_err(invalid)?;

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Mode: {}", config.mode);
    match config.mode {
        config::DataMode::Backed => info!("  - Backend URL: {}", config.backend_url),
        config::DataMode::Static => info!("  - Jobs file: {}", config.jobs_file),
    }
    info!("  - Search debounce: {:?}", config.search_debounce);
    info!("  - Recent jobs: {}", config.recent_jobs_limit);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Session idle timeout: {:?}", config.session_idle_timeout);

    // A failed load is reported on the page and by the health probes
    let health = registry.health().await;
    if !health.available {
        error!("Initial job load failed; serving anyway: {:?}", health.error);
    }

    let max_payload_size = config.max_payload_size;
    let shared = web::Data::new(registry);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(shared.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::form_config(max_payload_size))
            .app_data(validation::query_config())
            .configure(routes_config)
    });

    info!("Server starting on http://{}:{}", config.bind_address, config.port);

    let server = server
        .bind((config.bind_address.as_str(), config.port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}
