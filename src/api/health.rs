//! Health check endpoint.
//!
//! Talks to the store directly rather than through LinkService; probes
//! should stay simple and fast.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{error, trace};

use crate::services::LinkService;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(service: web::Data<Arc<LinkService>>) -> impl Responder {
        trace!("Received health check request");

        match service.store().ping().await {
            Ok(()) => HttpResponse::Ok().json(HealthResponse {
                status: "ok",
                database: "up",
            }),
            Err(e) => {
                error!("Health check database ping failed: {}", e);
                HttpResponse::ServiceUnavailable().json(HealthResponse {
                    status: "degraded",
                    database: "down",
                })
            }
        }
    }
}
