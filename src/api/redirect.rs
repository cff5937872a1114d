//! Redirect endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::services::LinkService;
use crate::utils::is_valid_slug;

pub struct RedirectService;

impl RedirectService {
    /// `GET /` has no slug to resolve; send visitors to the configured
    /// default destination.
    pub async fn handle_root() -> impl Responder {
        let default_url = get_config().server.default_redirect_url.clone();
        HttpResponse::TemporaryRedirect()
            .insert_header(("Location", default_url))
            .finish()
    }

    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let slug = path.into_inner();

        if !is_valid_slug(&slug) {
            // Malformed slug, skip the cache and store entirely
            trace!("Invalid slug rejected: {}", &slug);
            return Self::not_found_response();
        }

        match service.find_link_by_slug(&slug).await {
            Ok(Some(link)) => {
                // Count after resolution so a failed lookup never records
                // a click; counting runs off the response path.
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.increment_clicks(&slug).await;
                });

                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", link.url))
                    .finish()
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", &slug);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Lookup failed during redirect: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Cache-Control", "public, max-age=60"))
            .json(json!({ "error": "Short link not found" }))
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .json(json!({ "error": "Internal server error" }))
    }
}
