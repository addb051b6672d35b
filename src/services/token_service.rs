use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use thiserror::Error;

use crate::types::internal::{Claims, Principal, Role};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Failed to create token: {0}")]
    Creation(String),
}

/// Validates the identity collaborator's JWT bearer tokens and derives the
/// typed principal the services consume. Issuing is kept for tooling and
/// tests; production tokens come from the collaborator.
pub struct TokenService {
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_ttl_minutes: 24 * 60,
        }
    }

    /// Mint a token carrying `{id, role}` claims
    pub fn issue(&self, member_id: i64, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: member_id.to_string(),
            role,
            exp: now + self.token_ttl_minutes * 60,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| TokenError::Creation(e.to_string()))
    }

    /// Validate a bearer token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }

    /// Validate a bearer token straight to the typed principal
    pub fn principal_from_token(&self, token: &str) -> Result<Principal, TokenError> {
        self.validate(token)?
            .to_principal()
            .ok_or(TokenError::Invalid)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-key-minimum-32-characters-long".to_string())
    }

    #[test]
    fn test_issue_and_validate_round_trips_principal() {
        let service = service();

        let token = service.issue(42, Role::Admin).expect("issue failed");
        let principal = service.principal_from_token(&token).expect("validate failed");

        assert_eq!(principal.id, 42);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_validate_rejects_tampered_token() {
        let service = service();

        let mut token = service.issue(7, Role::User).unwrap();
        token.push('x');

        match service.validate(&token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_foreign_secret() {
        let issuing = TokenService::new("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string());
        let validating = service();

        let token = issuing.issue(7, Role::User).unwrap();
        assert!(validating.validate(&token).is_err());
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-member-id".to_string(),
            role: Role::User,
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-key-minimum-32-characters-long".as_bytes()),
        )
        .unwrap();

        match service.principal_from_token(&token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }
}
