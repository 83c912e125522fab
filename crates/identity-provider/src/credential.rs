//! Provider credential types.

use crate::IdentityProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Scopes requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    FullName,
    Email,
}

/// Scopes the shell always asks for.
pub const DEFAULT_SCOPES: [Scope; 2] = [Scope::FullName, Scope::Email];

/// Name components as delivered by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

impl PersonName {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: Some(given_name.into()),
            family_name: Some(family_name.into()),
        }
    }

    /// `"given family"`, a lone component, or `None` when both are blank.
    pub fn formatted(&self) -> Option<String> {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Result of a successful interactive sign-in.
///
/// Name and email are only populated on the very first authorization of the
/// app; later sign-ins carry the identifier and a fresh code only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCredential {
    pub user_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<PersonName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Single-use code exchanged with the backend.
    pub authorization_code: String,
}

impl IdentityCredential {
    /// Reject credentials missing the identifier or the code.
    pub fn validate(&self) -> Result<(), IdentityProviderError> {
        if self.user_identifier.trim().is_empty() {
            return Err(IdentityProviderError::InvalidCredential(
                "missing user identifier".to_string(),
            ));
        }
        if self.authorization_code.trim().is_empty() {
            warn!(user_id = %self.user_identifier, "Provider credential has no authorization code");
            return Err(IdentityProviderError::InvalidCredential(
                "missing authorization code".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for IdentityCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredential")
            .field("user_identifier", &self.user_identifier)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("authorization_code", &"[REDACTED]")
            .finish()
    }
}

/// Provider-side status of a previously authorized user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    Authorized,
    Revoked,
    NotFound,
    Transferred,
}

impl CredentialState {
    pub fn is_authorized(self) -> bool {
        matches!(self, CredentialState::Authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_formatting() {
        assert_eq!(
            PersonName::new("Nayeon", "Koo").formatted().as_deref(),
            Some("Nayeon Koo")
        );

        let given_only = PersonName {
            given_name: Some("Nayeon".to_string()),
            family_name: None,
        };
        assert_eq!(given_only.formatted().as_deref(), Some("Nayeon"));

        let family_only = PersonName {
            given_name: Some("  ".to_string()),
            family_name: Some("Koo".to_string()),
        };
        assert_eq!(family_only.formatted().as_deref(), Some("Koo"));

        assert_eq!(PersonName::default().formatted(), None);
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let credential = IdentityCredential {
            user_identifier: "001234.abcd".to_string(),
            full_name: None,
            email: None,
            authorization_code: String::new(),
        };
        assert!(matches!(
            credential.validate(),
            Err(IdentityProviderError::InvalidCredential(_))
        ));

        let credential = IdentityCredential {
            user_identifier: " ".to_string(),
            authorization_code: "code".to_string(),
            ..credential
        };
        assert!(credential.validate().is_err());
    }

    #[test]
    fn test_credential_wire_shape() {
        let json = r#"{
            "userIdentifier": "001234.abcd",
            "fullName": { "givenName": "Nayeon", "familyName": "Koo" },
            "authorizationCode": "c-1"
        }"#;
        let credential: IdentityCredential = serde_json::from_str(json).unwrap();
        assert_eq!(credential.user_identifier, "001234.abcd");
        assert_eq!(credential.email, None);
        assert_eq!(
            credential.full_name.and_then(|n| n.formatted()).as_deref(),
            Some("Nayeon Koo")
        );
    }

    #[test]
    fn test_credential_state_wire_names() {
        let state: CredentialState = serde_json::from_str("\"not_found\"").unwrap();
        assert_eq!(state, CredentialState::NotFound);
        assert!(CredentialState::Authorized.is_authorized());
        assert!(!CredentialState::Transferred.is_authorized());
    }

    #[test]
    fn test_debug_hides_authorization_code() {
        let credential = IdentityCredential {
            user_identifier: "u".to_string(),
            full_name: None,
            email: None,
            authorization_code: "very-secret-code".to_string(),
        };
        assert!(!format!("{:?}", credential).contains("very-secret-code"));
    }
}
