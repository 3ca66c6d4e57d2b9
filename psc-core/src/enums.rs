//! Enum types for PSC entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// LIFE STATUS
// ============================================================================

/// Life/legal status of a beneficiary. Gates how the record is treated
/// throughout the registry.
///
/// The serialized form matches the Portuguese display strings stored in the
/// `status_vida` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum StatusVida {
    Vivo,
    Morto,
    Preso,
    Enfermo,
    #[serde(rename = "Licença Maternidade")]
    LicencaMaternidade,
    Devolvido,
    Concludente,
    #[serde(rename = "Aguardando Sentença")]
    AguardandoSentenca,
}

impl StatusVida {
    /// All variants, in the order the intake form presents them.
    pub const ALL: [StatusVida; 8] = [
        StatusVida::Vivo,
        StatusVida::Morto,
        StatusVida::Preso,
        StatusVida::Enfermo,
        StatusVida::LicencaMaternidade,
        StatusVida::Devolvido,
        StatusVida::Concludente,
        StatusVida::AguardandoSentenca,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            StatusVida::Vivo => "Vivo",
            StatusVida::Morto => "Morto",
            StatusVida::Preso => "Preso",
            StatusVida::Enfermo => "Enfermo",
            StatusVida::LicencaMaternidade => "Licença Maternidade",
            StatusVida::Devolvido => "Devolvido",
            StatusVida::Concludente => "Concludente",
            StatusVida::AguardandoSentenca => "Aguardando Sentença",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, StatusVidaParseError> {
        match s.trim() {
            "Vivo" => Ok(StatusVida::Vivo),
            "Morto" => Ok(StatusVida::Morto),
            "Preso" => Ok(StatusVida::Preso),
            "Enfermo" => Ok(StatusVida::Enfermo),
            "Licença Maternidade" => Ok(StatusVida::LicencaMaternidade),
            "Devolvido" => Ok(StatusVida::Devolvido),
            "Concludente" => Ok(StatusVida::Concludente),
            "Aguardando Sentença" => Ok(StatusVida::AguardandoSentenca),
            _ => Err(StatusVidaParseError(s.to_string())),
        }
    }

    /// Whether the obligation is still being served under this status.
    pub fn em_cumprimento(&self) -> bool {
        matches!(self, StatusVida::Vivo | StatusVida::AguardandoSentenca)
    }
}

impl fmt::Display for StatusVida {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for StatusVida {
    type Err = StatusVidaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusVidaParseError(pub String);

impl fmt::Display for StatusVidaParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid status de vida: {}", self.0)
    }
}

impl std::error::Error for StatusVidaParseError {}

// ============================================================================
// DOCUMENT TYPE
// ============================================================================

/// Type tag for an attached PDF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TipoDocumento {
    /// Attendance record sheet
    Frequencia,
    /// Supporting case documentation
    Documentacao,
}

impl TipoDocumento {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TipoDocumento::Frequencia => "frequencia",
            TipoDocumento::Documentacao => "documentacao",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, StatusVidaParseError> {
        match s.trim().to_lowercase().as_str() {
            "frequencia" => Ok(TipoDocumento::Frequencia),
            "documentacao" => Ok(TipoDocumento::Documentacao),
            _ => Err(StatusVidaParseError(s.to_string())),
        }
    }
}

impl fmt::Display for TipoDocumento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ============================================================================
// LAPSO BANDING
// ============================================================================

/// Urgency band derived from the intake-age lapso, used to color-code
/// how long a record has been in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CorLapso {
    Normal,
    Warning,
    Danger,
    Critical,
}

impl CorLapso {
    /// Band a lapso (days since intake).
    pub fn from_dias(dias: i64) -> Self {
        if dias < 30 {
            CorLapso::Normal
        } else if dias < 60 {
            CorLapso::Warning
        } else if dias < 90 {
            CorLapso::Danger
        } else {
            CorLapso::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vida_roundtrip() {
        for status in StatusVida::ALL {
            let parsed = StatusVida::from_db_str(status.as_db_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_vida_serde_uses_display_strings() {
        let json = serde_json::to_string(&StatusVida::LicencaMaternidade).unwrap();
        assert_eq!(json, "\"Licença Maternidade\"");

        let parsed: StatusVida = serde_json::from_str("\"Aguardando Sentença\"").unwrap();
        assert_eq!(parsed, StatusVida::AguardandoSentenca);
    }

    #[test]
    fn test_status_vida_parse_invalid() {
        let err = StatusVida::from_db_str("Desaparecido").unwrap_err();
        assert!(err.to_string().contains("Desaparecido"));
    }

    #[test]
    fn test_tipo_documento_roundtrip() {
        assert_eq!(
            TipoDocumento::from_db_str("frequencia").unwrap(),
            TipoDocumento::Frequencia
        );
        assert_eq!(
            TipoDocumento::from_db_str("Documentacao").unwrap(),
            TipoDocumento::Documentacao
        );
        assert!(TipoDocumento::from_db_str("laudo").is_err());
    }

    #[test]
    fn test_cor_lapso_bands() {
        assert_eq!(CorLapso::from_dias(0), CorLapso::Normal);
        assert_eq!(CorLapso::from_dias(29), CorLapso::Normal);
        assert_eq!(CorLapso::from_dias(30), CorLapso::Warning);
        assert_eq!(CorLapso::from_dias(59), CorLapso::Warning);
        assert_eq!(CorLapso::from_dias(60), CorLapso::Danger);
        assert_eq!(CorLapso::from_dias(90), CorLapso::Critical);
        assert_eq!(CorLapso::from_dias(365), CorLapso::Critical);
    }
}
