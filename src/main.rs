use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use sluglink::api::{ApiSettings, api_config};
use sluglink::config::{DEFAULT_CONFIG_PATH, get_config, init_config};
use sluglink::services::LinkService;
use sluglink::storage::StoreFactory;
use sluglink::system::init_logging;

/// Slug-keyed short-link service
#[derive(Debug, Parser)]
#[command(name = "sluglink", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Print a sample configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", sluglink::config::StaticConfig::generate_sample_config());
        return Ok(());
    }

    dotenvy::dotenv().ok();

    if let Err(e) = init_config(&args.config) {
        eprintln!("{}", e.format_colored());
        return Err(e).context("Failed to load configuration");
    }
    let config = get_config();
    let _log_guard = init_logging(&config.logging)?;

    let store = StoreFactory::create(&config.store)
        .await
        .context("Failed to initialize key-value store")?;
    let service = web::Data::new(
        LinkService::new(store, config.links.service_config())
            .context("Invalid link settings")?,
    );
    let settings = web::Data::new(ApiSettings::from_config(&config));

    if config.links.preview_mode {
        warn!(
            "Preview mode enabled: edits are disabled and links expire within {}s",
            config.links.preview_ttl
        );
    }
    if settings.token.is_none() {
        warn!("api.token is not set, the link API is unauthenticated");
    }

    let prefix = config.api.prefix.clone();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.cpu_count.clamp(1, 32);
    info!(
        "Starting server at http://{}{} with {} workers",
        bind_address, prefix, workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(settings.clone())
            .app_data(web::PayloadConfig::new(64 * 1024))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(api_config(&prefix))
    })
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
