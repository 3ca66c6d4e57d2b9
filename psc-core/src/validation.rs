//! Input validation
//!
//! All intake-form validation lives here so the API layer and any future
//! front end enforce the same rules. Error messages are user-facing and
//! therefore in Portuguese.

use crate::{CorLapso, FotoUpload, NovoBeneficiario, ValidationError};
use chrono::{NaiveDate, Utc};

/// Maximum accepted photo size, 5MB.
pub const FOTO_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Photo MIME types accepted by the intake form.
pub const FOTO_TIPOS_PERMITIDOS: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// MIME type required for document attachments.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Validate a photo upload: accepted format and within the size limit.
pub fn validar_foto(foto: &FotoUpload) -> Result<(), ValidationError> {
    if !FOTO_TIPOS_PERMITIDOS.contains(&foto.content_type.as_str()) {
        return Err(ValidationError::FotoFormatoInvalido);
    }
    if foto.tamanho > FOTO_MAX_BYTES {
        return Err(ValidationError::FotoMuitoGrande);
    }
    Ok(())
}

/// Validate that an attachment is a PDF.
pub fn validar_pdf(content_type: &str) -> Result<(), ValidationError> {
    if content_type != PDF_CONTENT_TYPE {
        return Err(ValidationError::PdfFormatoInvalido);
    }
    Ok(())
}

/// Validate a Brazilian phone number: 10 or 11 digits once punctuation is
/// stripped.
pub fn validar_telefone(telefone: &str) -> bool {
    let digitos = telefone.chars().filter(char::is_ascii_digit).count();
    digitos == 10 || digitos == 11
}

/// Format a phone number for display as `(00) 00000-0000` or
/// `(00) 0000-0000`. Inputs that are not 10 or 11 digits are returned
/// unchanged.
pub fn formatar_telefone(telefone: &str) -> String {
    let limpo: String = telefone.chars().filter(char::is_ascii_digit).collect();
    match limpo.len() {
        11 => format!("({}) {}-{}", &limpo[0..2], &limpo[2..7], &limpo[7..11]),
        10 => format!("({}) {}-{}", &limpo[0..2], &limpo[2..6], &limpo[6..10]),
        _ => telefone.to_string(),
    }
}

/// Days elapsed since the intake date, at day granularity. Future dates
/// report zero.
pub fn calcular_lapso(data_recebimento: NaiveDate) -> i64 {
    let hoje = Utc::now().date_naive();
    (hoje - data_recebimento).num_days().max(0)
}

/// Urgency band for a record given its lapse in days.
pub fn cor_lapso(dias: i64) -> CorLapso {
    CorLapso::from_dias(dias)
}

/// Placeholder avatar URL derived from the beneficiary's name, used when
/// the photo upload fails but a capture was made.
pub fn placeholder_avatar_url(nome: &str) -> String {
    let mut seed = String::with_capacity(nome.len());
    for b in nome.bytes() {
        if b.is_ascii_alphanumeric() {
            seed.push(b as char);
        } else {
            seed.push_str(&format!("%{b:02X}"));
        }
    }
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}")
}

/// Validate the intake form as a whole. Returns the first violated rule.
///
/// Rules: name of at least two characters, non-empty process number,
/// intake date not in the future, non-empty assignment location,
/// non-negative hours, and a photo (a usable preview URL counts when the
/// raw upload is absent).
pub fn validar_novo_beneficiario(novo: &NovoBeneficiario) -> Result<(), ValidationError> {
    if novo.nome.trim().len() < 2 {
        return Err(ValidationError::RequiredFieldMissing { field: "nome" });
    }
    if novo.numero_processo.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "numero_processo",
        });
    }
    if novo.data_recebimento > Utc::now().date_naive() {
        return Err(ValidationError::DataFutura);
    }
    if novo.local_lotacao.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "local_lotacao",
        });
    }
    if novo.horas_cumpridas < 0.0 || novo.horas_restantes < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "horas",
            reason: "horas não podem ser negativas".to_string(),
        });
    }
    if let Some(ref telefone) = novo.telefone_principal {
        if !telefone.trim().is_empty() && !validar_telefone(telefone) {
            return Err(ValidationError::InvalidValue {
                field: "telefone_principal",
                reason: "telefone deve ter 10 ou 11 dígitos".to_string(),
            });
        }
    }
    if let Some(ref telefone) = novo.telefone_secundario {
        if !telefone.trim().is_empty() && !validar_telefone(telefone) {
            return Err(ValidationError::InvalidValue {
                field: "telefone_secundario",
                reason: "telefone deve ter 10 ou 11 dígitos".to_string(),
            });
        }
    }
    match (&novo.foto, &novo.foto_preview) {
        (Some(foto), _) => validar_foto(foto),
        (None, Some(preview)) if !preview.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::FotoObrigatoria),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusVida;
    use chrono::Duration;

    fn novo_valido() -> NovoBeneficiario {
        NovoBeneficiario {
            nome: "Ana Souza".to_string(),
            numero_processo: "2024.001.0042".to_string(),
            data_recebimento: Utc::now().date_naive(),
            status_vida: StatusVida::Vivo,
            local_lotacao: "Secretaria de Obras".to_string(),
            telefone_principal: Some("(79) 99999-0000".to_string()),
            telefone_secundario: None,
            horas_cumpridas: 0.0,
            horas_restantes: 120.0,
            observacao_inicial: None,
            foto: Some(FotoUpload {
                nome: "foto.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                tamanho: 1024,
            }),
            foto_preview: None,
        }
    }

    #[test]
    fn test_novo_valido_passes() {
        assert!(validar_novo_beneficiario(&novo_valido()).is_ok());
    }

    #[test]
    fn test_nome_too_short() {
        let mut novo = novo_valido();
        novo.nome = "A".to_string();
        assert!(matches!(
            validar_novo_beneficiario(&novo),
            Err(ValidationError::RequiredFieldMissing { field: "nome" })
        ));
    }

    #[test]
    fn test_processo_required() {
        let mut novo = novo_valido();
        novo.numero_processo = "   ".to_string();
        assert!(matches!(
            validar_novo_beneficiario(&novo),
            Err(ValidationError::RequiredFieldMissing { .. })
        ));
    }

    #[test]
    fn test_data_futura_rejected() {
        let mut novo = novo_valido();
        novo.data_recebimento = Utc::now().date_naive() + Duration::days(1);
        assert!(matches!(
            validar_novo_beneficiario(&novo),
            Err(ValidationError::DataFutura)
        ));
    }

    #[test]
    fn test_horas_negativas_rejected() {
        let mut novo = novo_valido();
        novo.horas_restantes = -1.0;
        assert!(matches!(
            validar_novo_beneficiario(&novo),
            Err(ValidationError::InvalidValue { field: "horas", .. })
        ));
    }

    #[test]
    fn test_foto_obrigatoria() {
        let mut novo = novo_valido();
        novo.foto = None;
        assert!(matches!(
            validar_novo_beneficiario(&novo),
            Err(ValidationError::FotoObrigatoria)
        ));
    }

    #[test]
    fn test_preview_substitutes_foto() {
        let mut novo = novo_valido();
        novo.foto = None;
        novo.foto_preview = Some("blob:local-preview".to_string());
        assert!(validar_novo_beneficiario(&novo).is_ok());
    }

    #[test]
    fn test_validar_foto_formato() {
        let foto = FotoUpload {
            nome: "scan.tiff".to_string(),
            content_type: "image/tiff".to_string(),
            tamanho: 1024,
        };
        let err = validar_foto(&foto).unwrap_err();
        assert_eq!(err.to_string(), "Formato inválido. Use JPG, PNG ou WEBP.");
    }

    #[test]
    fn test_validar_foto_tamanho() {
        let foto = FotoUpload {
            nome: "foto.png".to_string(),
            content_type: "image/png".to_string(),
            tamanho: FOTO_MAX_BYTES + 1,
        };
        let err = validar_foto(&foto).unwrap_err();
        assert_eq!(err.to_string(), "Arquivo muito grande. Máximo 5MB.");
    }

    #[test]
    fn test_validar_pdf() {
        assert!(validar_pdf("application/pdf").is_ok());
        assert!(validar_pdf("image/png").is_err());
    }

    #[test]
    fn test_telefone_digits() {
        assert!(validar_telefone("(79) 99999-0000"));
        assert!(validar_telefone("7999990000"));
        assert!(!validar_telefone("999-0000"));
        assert!(!validar_telefone("791234567890"));
    }

    #[test]
    fn test_formatar_telefone() {
        assert_eq!(formatar_telefone("79999990000"), "(79) 99999-0000");
        assert_eq!(formatar_telefone("7933334444"), "(79) 3333-4444");
        assert_eq!(formatar_telefone("123"), "123");
    }

    #[test]
    fn test_lapso_future_date_clamps() {
        let amanha = Utc::now().date_naive() + Duration::days(1);
        assert_eq!(calcular_lapso(amanha), 0);
        let ontem = Utc::now().date_naive() - Duration::days(45);
        assert_eq!(calcular_lapso(ontem), 45);
    }

    #[test]
    fn test_placeholder_avatar_escapes_seed() {
        let url = placeholder_avatar_url("Ana Souza");
        assert!(url.starts_with("https://api.dicebear.com/7.x/avataaars/svg?seed="));
        assert!(url.contains("Ana%20Souza"));
    }
}
