//! Bearer credential supplied by the surrounding session.

use std::fmt;

/// Access token sent as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token; blank tokens mean "not signed in".
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Looks up the current session's credential.
pub trait SessionProvider: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// Session backed by a fixed token (config file or environment).
#[derive(Clone, Debug, Default)]
pub struct StaticSession(Option<Credential>);

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Credential::new(token))
    }
}

impl SessionProvider for StaticSession {
    fn credential(&self) -> Option<Credential> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_no_credential() {
        assert!(Credential::new("  ").is_none());
        assert!(StaticSession::new("").credential().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let c = Credential::new(" secret ").unwrap();
        assert_eq!(c.token(), "secret");
        assert_eq!(format!("{c:?}"), "Credential(***)");
    }
}
