//! Token scopes.
//!
//! These strings must match the `CHECK` constraint on `tokens.scope` in
//! `20260301000002_create_tokens_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const SCOPE_SESSION: &str = "*";
pub const SCOPE_PASSWORD_RESET: &str = "password_reset";
pub const SCOPE_EMAIL_VERIFY: &str = "email_verify";

/// The purpose a token was issued for.
///
/// Session tokens authenticate API requests until they expire or are
/// revoked. The other two scopes are single-use and are deleted by the
/// operation that consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenScope {
    Session,
    PasswordReset,
    EmailVerify,
}

impl TokenScope {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenScope::Session => SCOPE_SESSION,
            TokenScope::PasswordReset => SCOPE_PASSWORD_RESET,
            TokenScope::EmailVerify => SCOPE_EMAIL_VERIFY,
        }
    }

    /// Whether a successful use deletes the token.
    pub fn is_one_shot(self) -> bool {
        !matches!(self, TokenScope::Session)
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token scope: {0}")]
pub struct UnknownScope(pub String);

impl FromStr for TokenScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SCOPE_SESSION => Ok(TokenScope::Session),
            SCOPE_PASSWORD_RESET => Ok(TokenScope::PasswordReset),
            SCOPE_EMAIL_VERIFY => Ok(TokenScope::EmailVerify),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

impl TryFrom<String> for TokenScope {
    type Error = UnknownScope;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenScope> for String {
    fn from(value: TokenScope) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_strings_parse_back() {
        for scope in [
            TokenScope::Session,
            TokenScope::PasswordReset,
            TokenScope::EmailVerify,
        ] {
            assert_eq!(scope.as_str().parse::<TokenScope>(), Ok(scope));
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        assert_eq!(
            "admin".parse::<TokenScope>(),
            Err(UnknownScope("admin".to_string()))
        );
    }

    #[test]
    fn only_session_tokens_are_reusable() {
        assert!(!TokenScope::Session.is_one_shot());
        assert!(TokenScope::PasswordReset.is_one_shot());
        assert!(TokenScope::EmailVerify.is_one_shot());
    }

    #[test]
    fn serializes_as_wire_string() {
        let json = serde_json::to_string(&TokenScope::Session).unwrap();
        assert_eq!(json, "\"*\"");
        let back: TokenScope = serde_json::from_str("\"email_verify\"").unwrap();
        assert_eq!(back, TokenScope::EmailVerify);
    }
}
