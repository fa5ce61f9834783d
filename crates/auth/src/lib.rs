//! `eduhub-auth` — pure access-control domain for the portal gateway.
//!
//! This crate is intentionally decoupled from HTTP and storage: everything
//! here is a deterministic function of data the gateway boundary hands in.

pub mod claims;
pub mod decision;
pub mod roles;
pub mod routes;
pub mod verify;

pub use claims::{Claims, TokenError, validate_claims};
pub use decision::{AccessDecision, decide};
pub use roles::Role;
pub use routes::{
    Classification, FORBIDDEN_PATH, LOGIN_PATH, PORTAL_ROOT, RouteRule, RouteTable,
    RouteTableError, SUPPORTED_LOCALES,
};
pub use verify::{Hs256Verifier, TokenVerifier};
