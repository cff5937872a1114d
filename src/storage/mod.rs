pub mod backend;
pub mod models;

pub use backend::{InsertOutcome, SeaOrmStore};
pub use models::Link;
