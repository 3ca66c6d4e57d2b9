//! Error types for PSC operations

use thiserror::Error;
use uuid::Uuid;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Insert failed for {entity}: {reason}")]
    InsertFailed { entity: &'static str, reason: String },

    #[error("Update failed for {entity} with id {id}: {reason}")]
    UpdateFailed {
        entity: &'static str,
        id: Uuid,
        reason: String,
    },

    #[error("Duplicate record: beneficiário with processo {numero_processo} or a similar name already exists")]
    Duplicate { numero_processo: String },

    #[error("Object storage error on bucket {bucket}: {reason}")]
    ObjectStore { bucket: String, reason: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: &'static str },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Foto é obrigatória")]
    FotoObrigatoria,

    #[error("Formato inválido. Use JPG, PNG ou WEBP.")]
    FotoFormatoInvalido,

    #[error("Arquivo muito grande. Máximo 5MB.")]
    FotoMuitoGrande,

    #[error("Apenas arquivos PDF são aceitos")]
    PdfFormatoInvalido,

    #[error("Data não pode ser futura")]
    DataFutura,
}

/// Master error type for all PSC errors.
#[derive(Debug, Clone, Error)]
pub enum PscError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for PSC operations.
pub type PscResult<T> = Result<T, PscError>;
