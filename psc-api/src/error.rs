//! Error Types for the PSC API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - Remapping of raw Postgres errors into user-readable messages
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.
//! Messages are user-facing and therefore in Portuguese; the verbatim
//! backend message is carried in `details` for diagnostics.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use psc_core::{PscError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code and represents
/// a category of error that can occur during API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Authentication Errors (401, 403)
    // ========================================================================
    /// Request lacks valid authentication credentials
    Unauthorized,

    /// Authentication token is invalid or malformed
    InvalidToken,

    /// Authentication token has expired
    TokenExpired,

    /// Request is authenticated but a database policy denied the operation
    PermissionDenied,

    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field format is incorrect
    InvalidFormat,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested entity does not exist
    EntityNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// A beneficiary with the same process number or name already exists
    DuplicateRecord,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Database operation failed
    DatabaseError,

    /// An expected table is missing from the database schema
    MissingTable,

    /// Object-storage bucket is missing or misconfigured
    BucketMisconfigured,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Database connection pool exhausted
    ConnectionPoolExhausted,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized | ErrorCode::InvalidToken | ErrorCode::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }

            ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,

            ErrorCode::DuplicateRecord => StatusCode::CONFLICT,

            ErrorCode::ServiceUnavailable | ErrorCode::ConnectionPoolExhausted => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::MissingTable
            | ErrorCode::BucketMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "Usuário não autenticado",
            ErrorCode::InvalidToken => "Token de autenticação inválido",
            ErrorCode::TokenExpired => "Token de autenticação expirado",
            ErrorCode::PermissionDenied => {
                "Erro de permissão: Você não tem permissão para realizar esta ação. Verifique as políticas RLS."
            }

            ErrorCode::ValidationFailed => "Falha na validação dos dados",
            ErrorCode::InvalidInput => "Dados de entrada inválidos",
            ErrorCode::MissingField => "Campo obrigatório faltando",
            ErrorCode::InvalidFormat => "Formato inválido",

            ErrorCode::EntityNotFound => "Registro não encontrado",

            ErrorCode::DuplicateRecord => {
                "Já existe um beneficiário com este número de processo ou nome."
            }

            ErrorCode::InternalError => "Erro interno do servidor",
            ErrorCode::DatabaseError => "Erro desconhecido ao salvar",
            ErrorCode::MissingTable => {
                "Erro de banco de dados. Tabela não encontrada. Verifique as migrações do banco."
            }
            ErrorCode::BucketMisconfigured => {
                "Erro de configuração de armazenamento. Verifique as configurações."
            }
            ErrorCode::ServiceUnavailable => "Serviço temporariamente indisponível",
            ErrorCode::ConnectionPoolExhausted => "Pool de conexões esgotado",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// This type is returned by all API endpoints when an error occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message (Portuguese, user-facing)
    pub message: String,

    /// Optional additional details (verbatim backend message, field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create an InvalidToken error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    /// Create a TokenExpired error.
    pub fn token_expired() -> Self {
        Self::from_code(ErrorCode::TokenExpired)
    }

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Campo obrigatório faltando: {}", field),
        )
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Campo '{}' com formato inválido, esperado {}", field, expected),
        )
    }

    /// Create an EntityNotFound error.
    pub fn entity_not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("{} com id {} não encontrado", entity_type, id),
        )
    }

    /// Create a DuplicateRecord error.
    pub fn duplicate_record() -> Self {
        Self::from_code(ErrorCode::DuplicateRecord)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a BucketMisconfigured error.
    pub fn bucket_misconfigured() -> Self {
        Self::from_code(ErrorCode::BucketMisconfigured)
    }

    /// Create a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Create a ConnectionPoolExhausted error.
    pub fn connection_pool_exhausted() -> Self {
        Self::from_code(ErrorCode::ConnectionPoolExhausted)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// POSTGRES ERROR CLASSIFICATION
// ============================================================================

/// Remap a raw database error into a user-readable ApiError.
///
/// SQLSTATE codes take precedence; message substrings catch the cases the
/// driver reports without a code (storage policies, missing relations).
/// The raw message always travels in `details` so operators can diagnose
/// the original failure.
pub fn classify_db_error(sqlstate: Option<&str>, raw_message: &str) -> ApiError {
    let err = match sqlstate {
        Some("23505") => ApiError::duplicate_record(),
        Some("23502") => ApiError::new(
            ErrorCode::MissingField,
            "Campo obrigatório faltando: Verifique todos os campos obrigatórios.",
        ),
        Some("23503") => ApiError::new(
            ErrorCode::InvalidInput,
            "Erro de referência: Verifique se o usuário está corretamente autenticado.",
        ),
        Some("42501") => ApiError::from_code(ErrorCode::PermissionDenied),
        Some("42P01") => ApiError::from_code(ErrorCode::MissingTable),
        _ => {
            let msg = raw_message.to_lowercase();
            if msg.contains("bucket") {
                ApiError::bucket_misconfigured()
            } else if msg.contains("policy") || msg.contains("permission") {
                ApiError::from_code(ErrorCode::PermissionDenied)
            } else if msg.contains("relation") || msg.contains("does not exist") {
                ApiError::from_code(ErrorCode::MissingTable)
            } else if msg.contains("violates not-null constraint") {
                ApiError::new(
                    ErrorCode::MissingField,
                    "Campo obrigatório não preenchido: Verifique todos os campos.",
                )
            } else if msg.contains("violates check constraint") {
                ApiError::new(
                    ErrorCode::InvalidInput,
                    "Valor inválido: Verifique os dados informados.",
                )
            } else {
                ApiError::from_code(ErrorCode::DatabaseError)
            }
        }
    };
    err.with_details(serde_json::json!({ "backend": raw_message }))
}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling
/// in Axum handlers.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM STANDARD ERRORS
// ============================================================================

/// Convert from tokio_postgres::Error to ApiError.
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!("Database error: {:?}", err);

        let sqlstate = err.code().map(|c| c.code().to_string());
        let raw = err
            .as_db_error()
            .map(|db| db.message().to_string())
            .unwrap_or_else(|| err.to_string());
        classify_db_error(sqlstate.as_deref(), &raw)
    }
}

/// Convert from deadpool_postgres::PoolError to ApiError.
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        match err {
            deadpool_postgres::PoolError::Timeout(_) => ApiError::connection_pool_exhausted(),
            deadpool_postgres::PoolError::Closed => {
                ApiError::service_unavailable("Pool de conexões com o banco está fechado")
            }
            _ => ApiError::database_error("Falha ao obter conexão com o banco"),
        }
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("JSON inválido: {}", err))
    }
}

/// Convert from uuid::Error to ApiError.
impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        ApiError::invalid_format("id", &format!("UUID válido: {}", err))
    }
}

/// Convert domain errors into API errors.
impl From<PscError> for ApiError {
    fn from(err: PscError) -> Self {
        match err {
            PscError::Storage(storage) => match storage {
                StorageError::NotFound { entity, id } => ApiError::entity_not_found(entity, id),
                StorageError::Duplicate { .. } => ApiError::duplicate_record(),
                StorageError::ObjectStore { reason, .. } => {
                    ApiError::bucket_misconfigured()
                        .with_details(serde_json::json!({ "backend": reason }))
                }
                other => ApiError::database_error(other.to_string()),
            },
            PscError::Validation(validation) => ApiError::from(validation),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation_failed(err.to_string())
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DuplicateRecord.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::MissingTable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ErrorCode::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_classify_duplicate_sqlstate() {
        let err = classify_db_error(Some("23505"), "duplicate key value violates unique constraint");
        assert_eq!(err.code, ErrorCode::DuplicateRecord);
        assert_eq!(
            err.message,
            "Já existe um beneficiário com este número de processo ou nome."
        );
        assert!(err.details.is_some());
    }

    #[test]
    fn test_classify_permission_sqlstate() {
        let err = classify_db_error(Some("42501"), "permission denied for table beneficiarios");
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_classify_missing_table() {
        let err = classify_db_error(Some("42P01"), "relation \"beneficiarios\" does not exist");
        assert_eq!(err.code, ErrorCode::MissingTable);

        // Same remap without a SQLSTATE, from the message alone.
        let err = classify_db_error(None, "relation \"observacoes\" does not exist");
        assert_eq!(err.code, ErrorCode::MissingTable);
    }

    #[test]
    fn test_classify_bucket_substring() {
        let err = classify_db_error(None, "Bucket not found");
        assert_eq!(err.code, ErrorCode::BucketMisconfigured);
    }

    #[test]
    fn test_classify_policy_substring() {
        let err = classify_db_error(None, "new row violates row-level security policy");
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_classify_unknown_falls_back() {
        let err = classify_db_error(None, "connection reset by peer");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Erro desconhecido ao salvar");
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "backend": "connection reset by peer" }))
        );
    }

    #[test]
    fn test_validation_error_conversion() {
        let err = ApiError::from(ValidationError::FotoObrigatoria);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Foto é obrigatória");
    }

    #[test]
    fn test_storage_error_conversion() {
        let id = uuid::Uuid::now_v7();
        let err = ApiError::from(PscError::Storage(StorageError::NotFound {
            entity: "beneficiario",
            id,
        }));
        assert_eq!(err.code, ErrorCode::EntityNotFound);
        assert!(err.message.contains(&id.to_string()));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::unauthorized("Usuário não autenticado");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("UNAUTHORIZED"));
        assert!(json.contains("Usuário não autenticado"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }
}
