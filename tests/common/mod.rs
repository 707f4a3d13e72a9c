//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use nasa_mock_runner::fixture::{loopback, Clock, FixedClock, FixtureServer};

/// Date the fixed clock reports; the default date is two days earlier
pub const TODAY: (i32, u32, u32) = (2024, 3, 15);
pub const DEFAULT_DATE: &str = "2024-03-13";

/// Clock pinned to [`TODAY`]
pub fn fixed_clock() -> Arc<dyn Clock> {
    let (y, m, d) = TODAY;
    Arc::new(FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
}

/// Start a fixture server on a free loopback port with a pinned clock
pub async fn start_server() -> FixtureServer {
    FixtureServer::start(loopback(0), fixed_clock())
        .await
        .expect("Failed to start fixture server")
}

/// HTTP client that never goes through a proxy
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// The bundled postman/ directory
pub fn bundled_collections_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("postman")
}

/// Copy the bundled collections into `root/postman`
pub fn copy_collections(root: &Path) {
    let target = root.join("postman");
    std::fs::create_dir_all(&target).expect("Failed to create postman dir");
    for entry in std::fs::read_dir(bundled_collections_dir()).expect("Failed to read postman dir") {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), target.join(entry.file_name())).expect("Failed to copy fixture");
    }
}

/// Reserve a free loopback port and release it again
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().unwrap().port()
}

/// Whether `port` can be bound right now
pub fn port_is_free(port: u16) -> bool {
    std::net::TcpListener::bind(("127.0.0.1", port)).is_ok()
}
