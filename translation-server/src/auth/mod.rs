//! Bearer token authentication backed by OAuth 2.0 token introspection (RFC 7662)
//!
//! ## Flow
//! 1. The [`gate::AuthorizationGate`] extracts the bearer token from the
//!    `Authorization` header.
//! 2. The [`introspection::IntrospectionClient`] resolves the token, from the
//!    credential cache when possible and from the authorization server otherwise.
//! 3. The gate checks, in order, that the token is active, that its audience
//!    matches and that it carries every required scope.
//! 4. Route handlers apply [`policy::require_role`] on top of the resolved principal.

pub mod error;
pub mod gate;
pub mod introspection;
pub mod models;
pub mod policy;

pub use gate::AuthorizationGate;
pub use models::Principal;
pub use policy::require_role;
