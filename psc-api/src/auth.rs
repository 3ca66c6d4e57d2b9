//! Authentication Module
//!
//! JWT bearer authentication for the PSC API. Tokens are issued by the
//! identity provider and validated here with a shared HS256 secret. The
//! authenticated operator's email becomes the actor label stamped into
//! `criado_por` / `atualizado_por` and observation authorship.

use crate::error::{ApiError, ApiResult};
use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Actor label used when no operator identity is available.
pub const ACTOR_SISTEMA: &str = "Sistema";

// ============================================================================
// AUTH CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl AuthConfig {
    /// Create a config with an explicit secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            leeway_secs: 30,
        }
    }

    /// Load the configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PSC_JWT_SECRET`: shared HS256 signing secret (required)
    /// - `PSC_JWT_LEEWAY_SECS`: clock skew tolerance (default: 30)
    pub fn from_env() -> ApiResult<Self> {
        let jwt_secret = std::env::var("PSC_JWT_SECRET")
            .map_err(|_| ApiError::internal_error("PSC_JWT_SECRET não configurado"))?;
        if jwt_secret.len() < 32 {
            return Err(ApiError::internal_error(
                "PSC_JWT_SECRET deve ter pelo menos 32 bytes",
            ));
        }
        let leeway_secs = std::env::var("PSC_JWT_LEEWAY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        Ok(Self {
            jwt_secret,
            leeway_secs,
        })
    }
}

// ============================================================================
// CLAIMS
// ============================================================================

/// JWT claims carried by operator tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator ID
    pub sub: String,
    /// Operator email, used as the actor label
    pub email: Option<String>,
    /// Issued-at (epoch seconds)
    pub iat: i64,
    /// Expiry (epoch seconds)
    pub exp: i64,
}

/// Validate a bearer token and return its claims.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_secs;
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::token_expired(),
            _ => ApiError::invalid_token(format!("Token inválido: {}", e)),
        }
    })?;

    Ok(data.claims)
}

// ============================================================================
// CURRENT USER EXTRACTOR
// ============================================================================

/// The authenticated operator, extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
}

impl CurrentUser {
    /// Actor label for audit fields: the operator's email, or "Sistema"
    /// when the token carries none.
    pub fn actor_label(&self) -> String {
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(ACTOR_SISTEMA)
            .to_string()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AuthConfig>: axum::extract::FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config: Arc<AuthConfig> = axum::extract::FromRef::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Usuário não autenticado"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::invalid_token("Header Authorization deve ser 'Bearer <token>'"))?;

        let claims = validate_jwt_token(&config, token)?;
        Ok(CurrentUser::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-with-at-least-32-bytes!!";

    fn make_token(claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "operador-1".to_string(),
            email: Some("operador@socorro.se.gov.br".to_string()),
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn test_validate_roundtrip() {
        let config = AuthConfig::new(SECRET);
        let token = make_token(&valid_claims());

        let claims = validate_jwt_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "operador-1");
        assert_eq!(claims.email.as_deref(), Some("operador@socorro.se.gov.br"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig::new(SECRET);
        let now = chrono::Utc::now().timestamp();
        let token = make_token(&Claims {
            sub: "operador-1".to_string(),
            email: None,
            iat: now - 7200,
            exp: now - 3600,
        });

        let err = validate_jwt_token(&config, &token).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TokenExpired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = AuthConfig::new("another-secret-with-32-bytes-minimum");
        let token = make_token(&valid_claims());

        let err = validate_jwt_token(&config, &token).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidToken);
    }

    #[test]
    fn test_actor_label_falls_back_to_sistema() {
        let user = CurrentUser {
            id: "operador-1".to_string(),
            email: None,
        };
        assert_eq!(user.actor_label(), "Sistema");

        let user = CurrentUser {
            id: "operador-1".to_string(),
            email: Some("gestor@socorro.se.gov.br".to_string()),
        };
        assert_eq!(user.actor_label(), "gestor@socorro.se.gov.br");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new(SECRET);
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
