//! Signed-in user identity.
//!
//! `Credentials` is what the store holds for the current viewer; the token is
//! wrapped in [`SecureString`] so it never ends up in logs.

use serde::{Deserialize, Serialize};

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Identity of the current viewer.
///
/// `username` and `token` are either both present or both absent; use
/// [`Credentials::normalized`] after building one from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SecureString>,
}

impl Credentials {
    /// True when both a username and a token are present.
    pub fn is_authenticated(&self) -> bool {
        let has_username = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let has_token = self.token.as_ref().is_some_and(|t| !t.is_empty());
        has_username && has_token
    }

    /// Drops a dangling username or token so the pair is all-or-nothing.
    pub fn normalized(mut self) -> Self {
        if !self.is_authenticated() {
            self.username = None;
            self.token = None;
        }
        self
    }

    /// The fields written to the local cache. Email is never persisted.
    pub fn persisted(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: None,
            image: self.image.clone().filter(|i| !i.is_empty()),
            token: self.token.clone(),
        }
    }

    /// Shallow-merge `patch` into a copy of these credentials.
    pub fn merged(&self, patch: CredentialsPatch) -> Self {
        Self {
            username: patch.username.or_else(|| self.username.clone()),
            email: patch.email.or_else(|| self.email.clone()),
            image: match patch.image {
                Some(image) => image,
                None => self.image.clone(),
            },
            token: patch.token.or_else(|| self.token.clone()),
        }
        .normalized()
    }
}

/// Partial credentials for an incremental update.
///
/// `None` leaves the current value in place. `image` is doubly optional so a
/// profile edit can clear the avatar with `Some(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialsPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image: Option<Option<String>>,
    pub token: Option<SecureString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> Credentials {
        Credentials {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            image: Some("https://img.example.com/a.png".to_string()),
            token: Some(SecureString::new("jwt-token")),
        }
    }

    #[test]
    fn test_secure_string_does_not_leak() {
        let secret = SecureString::new("my-secret-key");

        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("my-secret-key"));

        let display_output = format!("{}", secret);
        assert!(!display_output.contains("my-secret-key"));

        assert_eq!(secret.expose(), "my-secret-key");
    }

    #[test]
    fn test_credentials_debug_masks_token() {
        let output = format!("{:?}", signed_in());
        assert!(!output.contains("jwt-token"));
    }

    #[test]
    fn test_authenticated_requires_username_and_token() {
        assert!(signed_in().is_authenticated());

        let mut no_token = signed_in();
        no_token.token = None;
        assert!(!no_token.is_authenticated());

        let mut empty_username = signed_in();
        empty_username.username = Some(String::new());
        assert!(!empty_username.is_authenticated());
    }

    #[test]
    fn test_normalized_drops_dangling_half() {
        let creds = Credentials {
            username: Some("alice".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(creds.username, None);
        assert_eq!(creds.token, None);
    }

    #[test]
    fn test_persisted_omits_email() {
        let persisted = signed_in().persisted();
        assert_eq!(persisted.email, None);
        assert_eq!(persisted.username.as_deref(), Some("alice"));

        let json = serde_json::to_string(&persisted).unwrap();
        assert!(!json.contains("email"));
        assert!(json.contains("\"token\":\"jwt-token\""));
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let merged = signed_in().merged(CredentialsPatch {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.email.as_deref(), Some("new@example.com"));
        assert_eq!(merged.username.as_deref(), Some("alice"));
        assert!(merged.is_authenticated());
    }

    #[test]
    fn test_merge_can_clear_image() {
        let merged = signed_in().merged(CredentialsPatch {
            image: Some(None),
            ..Default::default()
        });
        assert_eq!(merged.image, None);
    }
}
