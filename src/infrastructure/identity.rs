use crate::domain::{Identity, IdentityProvider};

/// Identity fixed for the lifetime of the process, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    identity: Option<Identity>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn signed_in(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self { identity: Some(Identity { id: user_id.into(), is_admin }) }
    }

    /// Admin rights need a user id; `--admin` alone stays anonymous.
    pub fn from_flags(user_id: Option<String>, is_admin: bool) -> Self {
        match user_id {
            Some(id) if !id.is_empty() => Self::signed_in(id, is_admin),
            _ => Self::anonymous(),
        }
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(SessionIdentity::from_flags(None, true).current_identity(), None);
        assert_eq!(SessionIdentity::from_flags(Some(String::new()), false).current_identity(), None);
        assert_eq!(
            SessionIdentity::from_flags(Some("u1".to_string()), true).current_identity(),
            Some(Identity::admin("u1"))
        );
        assert_eq!(
            SessionIdentity::from_flags(Some("u2".to_string()), false).current_identity(),
            Some(Identity::user("u2"))
        );
    }
}
