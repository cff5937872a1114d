//! LinkService tests
//!
//! Tests for the link management service layer: creation, resolution,
//! click accounting, and lifecycle behavior.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;

use linksnap::cache::{LinkCache, MemoryCache};
use linksnap::constants::{MAX_URL_LENGTH, SLUG_LENGTH};
use linksnap::errors::LinksnapError;
use linksnap::services::LinkService;
use linksnap::storage::{InsertOutcome, SeaOrmStore};

const BASE_URL: &str = "http://localhost:4000";

// =============================================================================
// Test Setup
// =============================================================================

/// Create a test service with temporary storage and a real memory cache.
async fn create_test_service() -> (LinkService, Arc<SeaOrmStore>, Arc<MemoryCache>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test_service.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let store = Arc::new(
        SeaOrmStore::new(&db_url)
            .await
            .expect("Failed to create store"),
    );
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300)));

    let service = LinkService::new(
        Arc::clone(&store),
        Arc::clone(&cache) as Arc<dyn LinkCache>,
    );

    (service, store, cache, temp_dir)
}

// =============================================================================
// Create Link Tests
// =============================================================================

#[cfg(test)]
mod create_link_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_link_roundtrip() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service
            .create_link("https://example.com/some/page", BASE_URL)
            .await
            .unwrap();

        assert_eq!(result.slug.len(), SLUG_LENGTH);
        assert!(
            result
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        );
        assert_eq!(result.url, "https://example.com/some/page");
        assert_eq!(result.short_url, format!("{}/{}", BASE_URL, result.slug));
    }

    #[tokio::test]
    async fn test_create_link_normalizes_bare_domain() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service.create_link("example.com", BASE_URL).await.unwrap();

        assert_eq!(result.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_link_lowercases_scheme() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service
            .create_link("HTTPS://Example.com/Path", BASE_URL)
            .await
            .unwrap();

        assert_eq!(result.url, "https://Example.com/Path");
    }

    #[tokio::test]
    async fn test_create_link_trailing_slash_base_url() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service
            .create_link("https://example.com", "http://localhost:4000/")
            .await
            .unwrap();

        assert_eq!(
            result.short_url,
            format!("http://localhost:4000/{}", result.slug)
        );
    }

    #[tokio::test]
    async fn test_create_link_dangerous_protocol() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service.create_link("javascript:alert(1)", BASE_URL).await;

        match result.unwrap_err() {
            LinksnapError::Validation(msg) => {
                assert!(msg.contains("Dangerous protocol"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_link_missing_domain() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service.create_link("notadomain", BASE_URL).await;

        assert!(matches!(
            result.unwrap_err(),
            LinksnapError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_create_link_too_long() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let long_url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        let result = service.create_link(&long_url, BASE_URL).await;

        assert!(matches!(
            result.unwrap_err(),
            LinksnapError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_create_link_empty_url() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let result = service.create_link("   ", BASE_URL).await;

        assert!(matches!(
            result.unwrap_err(),
            LinksnapError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_create_link_generates_distinct_slugs() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let mut slugs = std::collections::HashSet::new();
        for _ in 0..20 {
            let result = service
                .create_link("https://example.com", BASE_URL)
                .await
                .unwrap();
            assert!(slugs.insert(result.slug));
        }
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_slugs() {
        let (service, store, cache, _temp) = create_test_service().await;
        drop(service);

        let service = Arc::new(LinkService::new(
            store,
            cache as Arc<dyn LinkCache>,
        ));

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create_link(&format!("https://example.com/page/{}", i), BASE_URL)
                    .await
                    .unwrap()
                    .slug
            }));
        }

        let mut slugs = std::collections::HashSet::new();
        for handle in handles {
            assert!(slugs.insert(handle.await.unwrap()));
        }
        assert_eq!(slugs.len(), 20);
    }
}

// =============================================================================
// Resolution Tests
// =============================================================================

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_link_by_slug() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com/target", BASE_URL)
            .await
            .unwrap();

        let link = service
            .find_link_by_slug(&created.slug)
            .await
            .unwrap()
            .expect("link should resolve");

        assert_eq!(link.slug, created.slug);
        assert_eq!(link.url, "https://example.com/target");
        assert!(link.is_active);
    }

    #[tokio::test]
    async fn test_find_unknown_slug() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let link = service.find_link_by_slug("nosuch1").await.unwrap();
        assert!(link.is_none());
    }

    #[tokio::test]
    async fn test_find_survives_cache_purge() {
        let (service, _store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        cache.clear().await;

        let link = service.find_link_by_slug(&created.slug).await.unwrap();
        assert!(link.is_some());
        // The miss repopulated the cache
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_inactive_link_does_not_resolve() {
        let (service, store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        store.set_active(&created.slug, false).await.unwrap();
        cache.clear().await;

        let link = service.find_link_by_slug(&created.slug).await.unwrap();
        assert!(link.is_none());
    }

    #[tokio::test]
    async fn test_expired_link_does_not_resolve() {
        let (service, store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        let past = Utc::now() - chrono::Duration::seconds(10);
        store.set_expiry(&created.slug, Some(past)).await.unwrap();
        cache.clear().await;

        let link = service.find_link_by_slug(&created.slug).await.unwrap();
        assert!(link.is_none());
    }

    #[tokio::test]
    async fn test_stale_cached_snapshot_is_evicted() {
        let (service, store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        // Give the link an expiry just ahead of now and re-cache that
        // snapshot, then let it lapse.
        let soon = Utc::now() + chrono::Duration::milliseconds(50);
        store.set_expiry(&created.slug, Some(soon)).await.unwrap();
        cache.clear().await;

        let link = service.find_link_by_slug(&created.slug).await.unwrap();
        assert!(link.is_some());
        assert_eq!(cache.size().await, 1);

        tokio::time::sleep(Duration::from_millis(80)).await;

        let link = service.find_link_by_slug(&created.slug).await.unwrap();
        assert!(link.is_none());
        assert_eq!(cache.size().await, 0);
    }
}

// =============================================================================
// Click Accounting Tests
// =============================================================================

#[cfg(test)]
mod click_tests {
    use super::*;

    #[tokio::test]
    async fn test_clicks_start_at_zero() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        let stats = service
            .get_link_stats(&created.slug)
            .await
            .unwrap()
            .expect("stats should exist");
        assert_eq!(stats.clicks, 0);
    }

    #[tokio::test]
    async fn test_increment_clicks_exact_count() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        for _ in 0..5 {
            service.increment_clicks(&created.slug).await;
        }

        let stats = service.get_link_stats(&created.slug).await.unwrap().unwrap();
        assert_eq!(stats.clicks, 5);
    }

    #[tokio::test]
    async fn test_concurrent_increments_lose_nothing() {
        let (service, store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        let service = Arc::new(LinkService::new(
            Arc::clone(&store),
            Arc::clone(&cache) as Arc<dyn LinkCache>,
        ));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = Arc::clone(&service);
            let slug = created.slug.clone();
            handles.push(tokio::spawn(async move {
                service.increment_clicks(&slug).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = service.get_link_stats(&created.slug).await.unwrap().unwrap();
        assert_eq!(stats.clicks, 20);
    }

    #[tokio::test]
    async fn test_increment_invalidates_cached_snapshot() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();

        // Prime the cache, then click
        service.find_link_by_slug(&created.slug).await.unwrap();
        service.increment_clicks(&created.slug).await;

        let link = service
            .find_link_by_slug(&created.slug)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(link.clicks, 1);
    }

    #[tokio::test]
    async fn test_increment_unknown_slug_is_noop() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        // Must not panic or error
        service.increment_clicks("missing1").await;
    }
}

// =============================================================================
// Stats Tests
// =============================================================================

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_for_unknown_slug() {
        let (service, _store, _cache, _temp) = create_test_service().await;

        let stats = service.get_link_stats("nosuch1").await.unwrap();
        assert!(stats.is_none());
    }

    #[tokio::test]
    async fn test_stats_vanish_with_the_link() {
        let (service, store, cache, _temp) = create_test_service().await;

        let created = service
            .create_link("https://example.com", BASE_URL)
            .await
            .unwrap();
        service.increment_clicks(&created.slug).await;

        let stats = service.get_link_stats(&created.slug).await.unwrap().unwrap();
        assert_eq!(stats.clicks, 1);
        assert_eq!(stats.url, "https://example.com");

        store.set_active(&created.slug, false).await.unwrap();
        cache.clear().await;

        // Deactivated links are absent on the stats path too
        assert!(service.get_link_stats(&created.slug).await.unwrap().is_none());
    }
}

// =============================================================================
// Store-level Tests
// =============================================================================

#[cfg(test)]
mod store_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_slug_is_tagged_not_an_error() {
        let (_service, store, _cache, _temp) = create_test_service().await;

        let first = store.insert("abc1234", "https://example.com").await.unwrap();
        assert!(matches!(first, InsertOutcome::Inserted(_)));

        let second = store.insert("abc1234", "https://other.com").await.unwrap();
        assert!(matches!(second, InsertOutcome::DuplicateSlug));

        // First write is untouched
        let link = store.find_by_slug("abc1234").await.unwrap().unwrap();
        assert_eq!(link.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_find_any_bypasses_the_resolvability_filter() {
        let (_service, store, _cache, _temp) = create_test_service().await;

        store.insert("abc1234", "https://example.com").await.unwrap();
        store.set_active("abc1234", false).await.unwrap();

        assert!(store.find_by_slug("abc1234").await.unwrap().is_none());

        let row = store
            .find_by_slug_any("abc1234")
            .await
            .unwrap()
            .expect("row still exists");
        assert!(!row.is_active);
    }

    #[tokio::test]
    async fn test_set_active_unknown_slug() {
        let (_service, store, _cache, _temp) = create_test_service().await;

        let result = store.set_active("missing1", false).await;
        assert!(matches!(
            result.unwrap_err(),
            LinksnapError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_ping() {
        let (_service, store, _cache, _temp) = create_test_service().await;
        store.ping().await.unwrap();
    }
}
