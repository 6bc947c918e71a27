//! JWT token service
//!
//! Issues and validates HS256 access tokens. The token carries the
//! caller's role names and permission keys, so request authorization
//! never touches the database.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token signing configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret (at least 32 bytes in production)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Display name
    pub name: String,
    pub roles: Vec<String>,
    /// Permission keys; the authorization gate checks membership here
    pub permissions: Vec<String>,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Random printable secret for development runs without `JWT_SECRET`
pub fn generate_printable_secret() -> Result<String, JwtError> {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("Failed to generate random secret".into()))?;

    Ok(bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect())
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token valid for `expiration_minutes` from now
    pub fn generate_token(
        &self,
        user_id: i64,
        name: &str,
        roles: &[String],
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            permissions: permissions.to_vec(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        self.encode_claims(&claims)
    }

    /// Sign arbitrary claims with this service's key
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate signature, expiry, issuer and audience, then decode
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Strip the `Bearer ` scheme from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Authenticated caller, built from validated claims
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("subject is not a user id: {}", claims.sub)))?;

        Ok(Self {
            id,
            name: claims.name,
            roles: claims.roles,
            permissions: claims.permissions,
        })
    }
}

impl CurrentUser {
    /// Exact, case-sensitive membership. No wildcard, no role shortcut.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".into(),
            expiration_minutes: 120,
            issuer: "eventia-api".into(),
            audience: "eventia-admin".into(),
        })
    }

    #[test]
    fn test_generate_and_validate() {
        let service = service();
        let token = service
            .generate_token(
                7,
                "Ana",
                &["Editor".to_string()],
                &["MANAGE_EVENTS".to_string(), "MANAGE_TICKETS".to_string()],
            )
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.roles, vec!["Editor"]);
        assert_eq!(claims.permissions, vec!["MANAGE_EVENTS", "MANAGE_TICKETS"]);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_token_lives_two_hours() {
        let service = service();
        let token = service.generate_token(1, "Ana", &[], &[]).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".into(),
            name: "Ana".into(),
            roles: vec![],
            permissions: vec![],
            token_type: "access".into(),
            exp: now - 3 * 60 * 60,
            iat: now - 5 * 60 * 60,
            iss: "eventia-api".into(),
            aud: "eventia-admin".into(),
        };
        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_foreign_key_is_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "a-completely-different-secret-value-123".into(),
            ..service().config
        });
        let token = other.generate_token(1, "Ana", &[], &[]).unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let other = JwtService::new(JwtConfig {
            audience: "someone-else".into(),
            ..service().config
        });
        let token = other.generate_token(1, "Ana", &[], &[]).unwrap();
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_permission_check_is_exact() {
        let user = CurrentUser {
            id: 1,
            name: "Ana".into(),
            roles: vec!["Admin".into()],
            permissions: vec!["MANAGE_EVENTS".into()],
        };
        assert!(user.has_permission("MANAGE_EVENTS"));
        assert!(!user.has_permission("manage_events"));
        assert!(!user.has_permission("MANAGE_ROLES"));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_printable_secret().unwrap();
        let b = generate_printable_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
