//! Standalone JWT issuance and verification service.
//!
//! The crate is a library: credential verification, HS256 token pairs,
//! refresh rotation with reuse detection, and revocation, behind the
//! [`services::TokenService`] facade. Transport (HTTP, gRPC, ...) is the
//! embedding application's business.

pub mod domain;
pub mod errors;
pub mod services;
pub mod utils;

pub use errors::AuthError;
pub use services::TokenService;
