//! SeaORM store backend over SQLite.
//!
//! The store is the sole arbiter of slug uniqueness: callers always attempt
//! the insert and branch on the tagged outcome, never check-then-insert.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, SqlErr, SqlxSqliteConnector, sea_query::Expr,
};
use tracing::info;

use crate::errors::{LinksnapError, Result};
use crate::storage::models::Link;

use migration::{Migrator, MigratorTrait, entities::link};

/// Tagged result of an insert attempt.
///
/// A duplicate slug is a recoverable condition the registry retries around,
/// not an error; anything else is fatal for the request.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(Link),
    DuplicateSlug,
}

/// SQLite-backed link store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Connect, apply migrations, and return a ready store.
    pub async fn new(database_url: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinksnapError::database("DATABASE_URL is not set"));
        }

        let db = connect_sqlite(database_url).await?;
        run_migrations(&db).await?;

        info!("SQLite store initialized at {}", database_url);
        Ok(SeaOrmStore { db })
    }

    /// Liveness probe for the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| LinksnapError::database(format!("Database ping failed: {}", e)))
    }

    /// Insert a new link. Writes are durable once this returns: the
    /// connection runs in WAL mode with synchronous=NORMAL and no
    /// in-process write buffering.
    pub async fn insert(&self, slug: &str, url: &str) -> Result<InsertOutcome> {
        let model = link::ActiveModel {
            slug: Set(slug.to_string()),
            url: Set(url.to_string()),
            clicks: Set(0),
            created_at: Set(Utc::now()),
            expires_at: Set(None),
            is_active: Set(true),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(InsertOutcome::Inserted(model_to_link(inserted))),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::DuplicateSlug),
            Err(e) => Err(LinksnapError::database(format!(
                "Failed to insert link: {}",
                e
            ))),
        }
    }

    /// Look up a resolvable link: active, and either without expiry or with
    /// an expiry strictly in the future. The comparison happens on real
    /// timestamps at query time, never on strings.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Slug.eq(slug))
            .filter(link::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(link::Column::ExpiresAt.is_null())
                    .add(link::Column::ExpiresAt.gt(Utc::now())),
            )
            .one(&self.db)
            .await
            .map_err(|e| LinksnapError::database(format!("Failed to find link: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    /// Look up a link regardless of lifecycle state.
    pub async fn find_by_slug_any(&self, slug: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| LinksnapError::database(format!("Failed to find link: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    /// Atomic `clicks = clicks + 1`, performed store-side so concurrent
    /// redirects never lose updates.
    pub async fn increment_clicks(&self, slug: &str) -> Result<()> {
        // Scoped import: ExprTrait's blanket impls would otherwise make
        // plain integer method calls ambiguous elsewhere in this module.
        use sea_orm::ExprTrait;

        link::Entity::update_many()
            .col_expr(
                link::Column::Clicks,
                Expr::col(link::Column::Clicks).add(1),
            )
            .filter(link::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(|e| LinksnapError::database(format!("Failed to increment clicks: {}", e)))?;

        Ok(())
    }

    /// Soft lifecycle switch; the only removal path in the data model.
    pub async fn set_active(&self, slug: &str, active: bool) -> Result<()> {
        let result = link::Entity::update_many()
            .col_expr(link::Column::IsActive, Expr::value(active))
            .filter(link::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(|e| LinksnapError::database(format!("Failed to update link: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(LinksnapError::not_found(format!(
                "Link '{}' not found",
                slug
            )));
        }
        Ok(())
    }

    /// Set or clear a link's expiry.
    pub async fn set_expiry(
        &self,
        slug: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let result = link::Entity::update_many()
            .col_expr(link::Column::ExpiresAt, Expr::value(expires_at))
            .filter(link::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(|e| LinksnapError::database(format!("Failed to update link: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(LinksnapError::not_found(format!(
                "Link '{}' not found",
                slug
            )));
        }
        Ok(())
    }
}

/// Connect to SQLite with auto-creation and the usual performance pragmas.
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| LinksnapError::database(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePool::connect_with(opt)
        .await
        .map_err(|e| LinksnapError::database(format!("Failed to connect to SQLite: {}", e)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| LinksnapError::database(format!("Migration failed: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}

fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        slug: model.slug,
        url: model.url,
        clicks: model.clicks.max(0) as u64,
        created_at: model.created_at,
        expires_at: model.expires_at,
        is_active: model.is_active,
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
