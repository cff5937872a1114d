//! Service layer for business logic
//!
//! The link service owns the slug registry semantics: slug generation with
//! retry, the read-through cache, and click accounting.

pub mod link_service;

pub use link_service::{CreateLinkResult, LinkService, LinkStats};
