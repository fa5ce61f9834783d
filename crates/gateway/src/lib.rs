//! HTTP gateway: routing, session endpoints, and the access-control
//! middleware in front of the education-center portals.

pub mod app;
pub mod config;
pub mod context;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod session;

#[cfg(feature = "dev-bypass")]
pub mod dev;
