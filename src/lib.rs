//! Linksnap - a URL shortening service
//!
//! This library provides the core functionality for the Linksnap service:
//! slug generation, a read-through TTL cache in front of a SQLite link
//! store, click accounting, and the HTTP API.
//!
//! # Architecture
//! - `api`: HTTP handlers and routing
//! - `cache`: In-memory TTL cache for hot links
//! - `storage`: SeaORM store and the link model
//! - `services`: Business logic shared by the handlers
//! - `config`: Configuration management
//! - `system`: Logging setup

pub mod api;
pub mod cache;
pub mod config;
pub mod constants;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
