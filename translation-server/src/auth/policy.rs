//! Audience, scope and role checks applied to an introspection result

use crate::auth::error::AuthError;
use crate::auth::models::{IntrospectionResult, Principal};
use log::debug;
use std::collections::HashSet;

/// Token requirements fixed at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredPolicy {
    audience: Option<String>,
    scopes: HashSet<String>,
}

impl RequiredPolicy {
    /// Build a policy from the configured audience and space-separated scope list.
    /// Blank values disable the corresponding check.
    pub fn new(audience: &str, scopes: &str) -> Self {
        let audience = audience.trim();
        Self {
            audience: (!audience.is_empty()).then(|| audience.to_string()),
            scopes: scopes.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn scopes(&self) -> &HashSet<String> {
        &self.scopes
    }

    /// Rejects a token whose audience claim differs from the required audience.
    ///
    /// A token without an audience claim is accepted.
    pub fn check_audience(&self, result: &IntrospectionResult) -> Result<(), AuthError> {
        match (self.audience.as_deref(), result.audience.as_deref()) {
            (Some(required), Some(claimed)) if required != claimed => {
                debug!(
                    "Audience mismatch: required '{}', token carries '{}'",
                    required, claimed
                );
                Err(AuthError::InvalidAudience)
            }
            _ => Ok(()),
        }
    }

    /// Rejects a token that does not carry every required scope
    pub fn check_scopes(&self, result: &IntrospectionResult) -> Result<(), AuthError> {
        if has_scopes(&result.scopes(), &self.scopes) {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope)
        }
    }
}

/// Whether `provided` contains every scope in `required`. An empty requirement always holds.
pub fn has_scopes(provided: &HashSet<&str>, required: &HashSet<String>) -> bool {
    required.iter().all(|scope| provided.contains(scope.as_str()))
}

/// Fails unless the principal's role matches `required_role`, ignoring case
pub fn require_role(principal: &Principal, required_role: &str) -> Result<(), AuthError> {
    match principal.role.as_deref() {
        Some(role) if role.to_lowercase() == required_role.to_lowercase() => Ok(()),
        _ => Err(AuthError::ForbiddenRole(required_role.to_string())),
    }
}
