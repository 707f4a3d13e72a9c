//! NASA mock runner - a local test harness for NASA open API collections
//!
//! This library provides a fixture server emulating a handful of NASA open
//! API endpoints, a small collection engine that replays YAML request
//! collections with declarative assertions, and the orchestration that ties
//! the two together.

pub mod cli;
pub mod commands;
pub mod common;
pub mod engine;
pub mod fixture;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use fixture::FixtureServer;
