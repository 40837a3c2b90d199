//! Session context
//!
//! The authenticated session is an explicit value passed into every
//! access-layer call, never ambient global state. This keeps repository
//! functions deterministic and testable without a live identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// Authenticated caller identity for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Profile id of the authenticated user
    pub user_id: Uuid,

    /// Role from the user profile record
    pub role: Role,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl Session {
    /// Create a session for a user
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            correlation_id: None,
        }
    }

    /// Attach a correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}
