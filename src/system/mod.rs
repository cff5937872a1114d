//! System-level modules
//!
//! Process-wide wiring that sits outside the request path, currently just
//! the tracing subscriber setup.

pub mod logging;
