//! HTTP services
//!
//! Route layout:
//! - `POST /api/shorten` - create a short link (rate limited)
//! - `GET /api/stats/{slug}` - per-link statistics
//! - `GET /api/health` - liveness probe
//! - `GET /{slug}` - redirect to the destination URL

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;

use actix_governor::{Governor, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_web::web;
use governor::middleware::NoOpMiddleware;
use tracing::debug;

use crate::config::get_config;

pub use health::HealthService;
pub use redirect::RedirectService;
pub use shorten::ShortenService;
pub use stats::StatsService;

/// Per-IP rate limiter for the shorten endpoint.
///
/// Over-limit requests get HTTP 429 Too Many Requests.
pub fn shorten_rate_limiter() -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let rate_limit = &get_config().server.rate_limit;

    let config = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst)
        .finish()
        .expect("Invalid rate limit config");

    debug!(
        "Shorten rate limiter created: {} req/s, burst {}",
        rate_limit.per_second, rate_limit.burst
    );
    Governor::new(&config)
}

/// Register all routes on an actix app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/shorten")
                    .wrap(shorten_rate_limiter())
                    .route(web::post().to(ShortenService::shorten)),
            )
            .route("/stats/{slug}", web::get().to(StatsService::stats))
            .route("/health", web::get().to(HealthService::health_check)),
    )
    .route("/", web::get().to(RedirectService::handle_root))
    .route("/{slug}", web::get().to(RedirectService::handle_redirect))
    .route("/{slug}", web::head().to(RedirectService::handle_redirect));
}
