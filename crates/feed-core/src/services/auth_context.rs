use uuid::Uuid;

use crate::error::DomainError;

/// Authentication result for one request.
///
/// Produced once per request from the bearer token and passed by value or
/// reference into every service call. An invalid or missing token yields
/// `Anonymous`; each operation decides whether that is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated {
        user_id: Uuid,
    },
}

impl AuthContext {
    pub fn authenticated(user_id: Uuid) -> Self {
        Self::Authenticated { user_id }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Authenticated { user_id } => Some(*user_id),
            Self::Anonymous => None,
        }
    }

    /// The acting user's id, or `Unauthenticated`.
    pub fn require(&self) -> Result<Uuid, DomainError> {
        self.user_id()
            .ok_or(DomainError::Unauthenticated("Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_rejected() {
        let auth = AuthContext::default();
        assert!(!auth.is_authenticated());
        assert!(matches!(
            auth.require(),
            Err(DomainError::Unauthenticated("Not authenticated"))
        ));
    }

    #[test]
    fn test_authenticated_yields_user() {
        let id = Uuid::new_v4();
        let auth = AuthContext::authenticated(id);
        assert!(auth.is_authenticated());
        assert_eq!(auth.require().unwrap(), id);
    }
}
