//! PSC Core - Entity Types and Domain Logic
//!
//! Data types and the pure domain rules of the beneficiary registry:
//! hours reconciliation, search/filter, and input validation.
//! All other crates depend on this.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod hours;
pub mod validation;

pub use entities::{
    ArquivoDigital, Beneficiario, DocumentoPdf, FotoUpload, NovoBeneficiario, Observacao,
};
pub use enums::{CorLapso, StatusVida, StatusVidaParseError, TipoDocumento};
pub use error::{PscError, PscResult, StorageError, ValidationError};
pub use filter::{buscar_beneficiarios, FiltroBeneficiario};
pub use hours::HoursLedger;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Tolerance used when comparing fractional hours for equality.
/// The registry allows 0.5-hour steps, so anything below this is noise.
pub const HORAS_EPSILON: f64 = 0.01;
