use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use tracing::{info, warn};

use linksnap::api::configure_routes;
use linksnap::cache::{LinkCache, MemoryCache};
use linksnap::config::{StaticConfig, get_config, init_config};
use linksnap::errors::Result;
use linksnap::services::LinkService;
use linksnap::storage::SeaOrmStore;
use linksnap::system::logging::init_logging;

/// Build CORS middleware from configuration.
///
/// An empty origin list allows any origin; otherwise only the listed
/// origins are accepted.
fn build_cors_middleware(config: &StaticConfig) -> Cors {
    let origins = &config.server.cors_allowed_origins;

    if origins.is_empty() {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
    }

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_config();

    let config = get_config();
    let _log_guard = init_logging(&config.logging);

    let store = Arc::new(SeaOrmStore::new(&config.database.database_url).await?);

    let cache = Arc::new(MemoryCache::new(Duration::from_secs(
        config.cache.default_ttl_secs,
    )));
    let sweeper = cache.spawn_sweeper(Duration::from_secs(config.cache.sweep_interval_secs));

    let link_service = Arc::new(LinkService::new(
        Arc::clone(&store),
        Arc::clone(&cache) as Arc<dyn LinkCache>,
    ));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let app_config = Arc::clone(&config);
    HttpServer::new(move || {
        let cors = build_cors_middleware(&app_config);

        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(Arc::clone(&link_service)))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    sweeper.abort();
    warn!("Server stopped");

    Ok(())
}
