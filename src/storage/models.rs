use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted short link.
///
/// `slug`, `url` and `created_at` are immutable once created; `clicks` only
/// ever grows; `is_active` and `expires_at` drive the soft lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: i32,
    pub slug: String,
    pub url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Link {
    /// A link resolves iff it is active and its expiry (when set) is
    /// strictly in the future.
    pub fn is_resolvable(&self) -> bool {
        self.is_active && self.expires_at.is_none_or(|t| t > Utc::now())
    }
}
