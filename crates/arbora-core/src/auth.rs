//! Authentication collaborator seam
//!
//! The pipeline does not manage sessions; it only needs the identity of the
//! current owner. The host application implements [`AuthSession`] over its
//! real session store. `StaticSession` covers tests and single-user tools.

use uuid::Uuid;

/// Supplies the currently authenticated owner, if any.
///
/// An absent owner is a precondition failure for the upload pipeline: the
/// orchestrator refuses to start rather than produce an unowned record.
pub trait AuthSession: Send + Sync {
    fn current_owner(&self) -> Option<Uuid>;
}

/// Fixed-owner session for tests and CLI tooling.
pub struct StaticSession {
    owner: Option<Uuid>,
}

impl StaticSession {
    pub fn authenticated(owner: Uuid) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn anonymous() -> Self {
        Self { owner: None }
    }
}

impl AuthSession for StaticSession {
    fn current_owner(&self) -> Option<Uuid> {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_session() {
        let owner = Uuid::new_v4();
        assert_eq!(
            StaticSession::authenticated(owner).current_owner(),
            Some(owner)
        );
        assert_eq!(StaticSession::anonymous().current_owner(), None);
    }
}
