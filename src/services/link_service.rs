//! Link management service
//!
//! Provides the core registry operations: link creation with slug retry,
//! cached resolution for redirects, click counting, and stats.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::LinkCache;
use crate::constants::{LINK_CACHE_PREFIX, MAX_SLUG_RETRIES, SLUG_LENGTH};
use crate::errors::{LinksnapError, Result};
use crate::storage::{InsertOutcome, Link, SeaOrmStore};
use crate::utils::generate_slug;
use crate::utils::url_validator::sanitize_and_normalize;

/// Result of link creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateLinkResult {
    /// The generated slug
    pub slug: String,
    /// Fully qualified short URL
    pub short_url: String,
    /// The normalized destination URL as stored
    pub url: String,
}

/// Per-link statistics projection
#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub slug: String,
    pub url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Unified link business logic, shared by all HTTP handlers.
pub struct LinkService {
    store: Arc<SeaOrmStore>,
    cache: Arc<dyn LinkCache>,
}

impl LinkService {
    pub fn new(store: Arc<SeaOrmStore>, cache: Arc<dyn LinkCache>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<SeaOrmStore> {
        &self.store
    }

    /// Validate and normalize the destination, then insert under a fresh
    /// random slug, regenerating on collision up to the retry cap.
    ///
    /// Validation failures surface before any slug is generated. Retries are
    /// spent only on duplicate-slug outcomes; any other store failure aborts
    /// immediately.
    pub async fn create_link(&self, raw_url: &str, base_url: &str) -> Result<CreateLinkResult> {
        let url = sanitize_and_normalize(raw_url)
            .map_err(|e| LinksnapError::validation(e.to_string()))?;

        for attempt in 1..=MAX_SLUG_RETRIES {
            let slug = generate_slug(SLUG_LENGTH);

            match self.store.insert(&slug, &url).await? {
                InsertOutcome::Inserted(link) => {
                    info!("Created link {} -> {}", link.slug, link.url);

                    let key = cache_key(&link.slug);
                    self.cache.insert(&key, link.clone(), None).await;

                    let short_url =
                        format!("{}/{}", base_url.trim_end_matches('/'), link.slug);
                    return Ok(CreateLinkResult {
                        slug: link.slug,
                        short_url,
                        url: link.url,
                    });
                }
                InsertOutcome::DuplicateSlug => {
                    warn!(
                        "Slug collision on attempt {}/{}, regenerating",
                        attempt, MAX_SLUG_RETRIES
                    );
                }
            }
        }

        error!(
            "Slug keyspace pressure: no unique slug after {} attempts",
            MAX_SLUG_RETRIES
        );
        Err(LinksnapError::database(format!(
            "Failed to generate a unique slug after {} attempts",
            MAX_SLUG_RETRIES
        )))
    }

    /// Resolve a slug to its link, read-through: cache first, then store.
    ///
    /// Cached entries are re-checked for resolvability on every hit, so a
    /// link that expired or was deactivated after being cached stops
    /// resolving immediately; the stale entry is evicted on that path.
    pub async fn find_link_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let key = cache_key(slug);

        if let Some(link) = self.cache.get(&key).await {
            if link.is_resolvable() {
                return Ok(Some(link));
            }
            self.cache.remove(&key).await;
        }

        match self.store.find_by_slug(slug).await? {
            Some(link) => {
                self.cache.insert(&key, link.clone(), None).await;
                Ok(Some(link))
            }
            None => Ok(None),
        }
    }

    /// Record one click against a slug. Counting failures are logged and
    /// swallowed so they can never break a redirect that already happened.
    ///
    /// The cached snapshot is invalidated unconditionally: its click count
    /// is stale either way, and the next lookup reloads from the store.
    pub async fn increment_clicks(&self, slug: &str) {
        if let Err(e) = self.store.increment_clicks(slug).await {
            error!("Failed to increment clicks for {}: {}", slug, e);
        }
        self.cache.remove(&cache_key(slug)).await;
    }

    /// Fetch the stats projection for a slug. A link that no longer
    /// resolves has no stats either; absent, inactive and expired stay
    /// indistinguishable here too.
    pub async fn get_link_stats(&self, slug: &str) -> Result<Option<LinkStats>> {
        let link = self.find_link_by_slug(slug).await?;

        Ok(link.map(|link| LinkStats {
            slug: link.slug,
            url: link.url,
            clicks: link.clicks,
            created_at: link.created_at,
        }))
    }
}

fn cache_key(slug: &str) -> String {
    format!("{}{}", LINK_CACHE_PREFIX, slug)
}
