//! Per-link statistics endpoint.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::errors::{LinksnapError, Result};
use crate::services::LinkService;
use crate::utils::is_valid_slug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub slug: String,
    pub url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

pub struct StatsService;

impl StatsService {
    /// Stats exist only while the link resolves; a deactivated or expired
    /// link 404s here just like on the redirect path.
    pub async fn stats(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse> {
        let slug = path.into_inner();
        trace!("Received stats request for {}", slug);

        if !is_valid_slug(&slug) {
            return Err(LinksnapError::not_found("Short link not found"));
        }

        match service.get_link_stats(&slug).await? {
            Some(stats) => Ok(HttpResponse::Ok().json(StatsResponse {
                slug: stats.slug,
                url: stats.url,
                clicks: stats.clicks,
                created_at: stats.created_at,
            })),
            None => Err(LinksnapError::not_found("Short link not found")),
        }
    }
}
