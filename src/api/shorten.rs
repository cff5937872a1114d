//! Link creation endpoint.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::get_config;
use crate::errors::Result;
use crate::services::LinkService;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub slug: String,
    pub short_url: String,
    pub url: String,
}

pub struct ShortenService;

impl ShortenService {
    pub async fn shorten(
        req: HttpRequest,
        body: web::Json<ShortenRequest>,
        service: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse> {
        trace!("Received shorten request");

        let base_url = resolve_base_url(&req);
        let result = service.create_link(&body.url, &base_url).await?;

        Ok(HttpResponse::Ok().json(ShortenResponse {
            slug: result.slug,
            short_url: result.short_url,
            url: result.url,
        }))
    }
}

/// Public base for short URLs: configured value if set, otherwise derived
/// from the incoming request's connection info.
fn resolve_base_url(req: &HttpRequest) -> String {
    if let Some(base) = get_config().server.base_url.clone() {
        return base;
    }

    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}
