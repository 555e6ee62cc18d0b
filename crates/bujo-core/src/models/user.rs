//! User profile and session types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An authenticated user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Derived display name, `firstName + " " + lastName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// Display name with the same fallback chain the UI uses:
    /// explicit name, first+last, first, email, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if !first.is_empty() && !last.is_empty() {
            return format!("{first} {last}");
        }
        if !first.is_empty() {
            return first.to_string();
        }
        if !self.email.trim().is_empty() {
            return self.email.trim().to_string();
        }
        "User".to_string()
    }
}

/// A persisted session: profile plus bearer tokens.
///
/// A present session always carries an access token; the refresh token is
/// optional because some backends only hand one out at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Email/password pair for login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// User-submitted signup form, validated locally before any remote call.
#[derive(Debug, Clone)]
pub struct SignupData {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str, email: &str) -> User {
        User {
            id: None,
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_number: None,
            name: None,
            created_at: None,
        }
    }

    #[test]
    fn display_name_prefers_explicit_name() {
        let mut u = user("Ada", "Lovelace", "ada@example.com");
        u.name = Some("Ada L.".to_string());
        assert_eq!(u.display_name(), "Ada L.");
    }

    #[test]
    fn display_name_falls_back_through_chain() {
        assert_eq!(
            user("Ada", "Lovelace", "ada@example.com").display_name(),
            "Ada Lovelace"
        );
        assert_eq!(user("Ada", "", "ada@example.com").display_name(), "Ada");
        assert_eq!(
            user("", "", "ada@example.com").display_name(),
            "ada@example.com"
        );
        assert_eq!(user("", "", "").display_name(), "User");
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = Session {
            user: user("Ada", "Lovelace", "ada@example.com"),
            access_token: "secret-access-token".to_string(),
            refresh_token: Some("secret-refresh-token".to_string()),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
