//! Fixture server emulating the NASA open API endpoints
//!
//! A stateless HTTP server answering a fixed set of GET endpoints with
//! canned JSON. Non-GET requests get 405 and unknown paths get 404.

mod clock;
mod payloads;
mod routes;
mod server;

pub use clock::{Clock, FixedClock, SystemClock};
pub use routes::{DonkiEvent, QueryParams, Route};
pub use server::{router, FixtureServer};

use std::net::{Ipv4Addr, SocketAddr};

/// The fixture server only ever binds the loopback host
pub const HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Loopback socket address for `port`
pub fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from((HOST, port))
}
