//! Core entity structures

use crate::{EntityId, StatusVida, TipoDocumento, Timestamp};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Beneficiário - a program participant serving a community-service
/// obligation. Top-level record of the registry; owns its observations
/// and PDF documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Beneficiario {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub beneficiario_id: EntityId,
    pub nome: String,
    pub foto_url: String,
    pub numero_processo: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub data_recebimento: NaiveDate,
    pub status_vida: StatusVida,
    pub local_lotacao: String,
    pub telefone_principal: Option<String>,
    pub telefone_secundario: Option<String>,
    /// Hours already served. Never negative.
    pub horas_cumpridas: f64,
    /// Hours still owed. Never negative.
    pub horas_restantes: f64,
    /// Observations scoped to this record, newest-first.
    pub observacoes: Vec<Observacao>,
    /// PDF attachments scoped to this record, newest-first.
    pub documentos_pdf: Vec<DocumentoPdf>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub criado_em: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub atualizado_em: Timestamp,
    pub criado_por: String,
    pub atualizado_por: String,
}

impl Beneficiario {
    /// Create a new beneficiary record.
    pub fn new(
        nome: &str,
        foto_url: &str,
        numero_processo: &str,
        data_recebimento: NaiveDate,
        status_vida: StatusVida,
        local_lotacao: &str,
        criado_por: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            beneficiario_id: Uuid::now_v7(),
            nome: nome.trim().to_string(),
            foto_url: foto_url.to_string(),
            numero_processo: numero_processo.trim().to_string(),
            data_recebimento,
            status_vida,
            local_lotacao: local_lotacao.trim().to_string(),
            telefone_principal: None,
            telefone_secundario: None,
            horas_cumpridas: 0.0,
            horas_restantes: 0.0,
            observacoes: Vec::new(),
            documentos_pdf: Vec::new(),
            criado_em: now,
            atualizado_em: now,
            criado_por: criado_por.to_string(),
            atualizado_por: criado_por.to_string(),
        }
    }

    /// Set the hours pair. The pair is stored as given; reconciliation
    /// happens in [`crate::HoursLedger`] before values reach this point.
    pub fn with_horas(mut self, cumpridas: f64, restantes: f64) -> Self {
        self.horas_cumpridas = cumpridas.max(0.0);
        self.horas_restantes = restantes.max(0.0);
        self
    }

    /// Set the contact phone numbers.
    pub fn with_telefones(
        mut self,
        principal: Option<String>,
        secundario: Option<String>,
    ) -> Self {
        self.telefone_principal = principal.filter(|t| !t.trim().is_empty());
        self.telefone_secundario = secundario.filter(|t| !t.trim().is_empty());
        self
    }

    /// Total hours of the obligation as currently recorded.
    pub fn total_horas(&self) -> f64 {
        self.horas_cumpridas + self.horas_restantes
    }

    /// Mark the record as touched by an operator.
    pub fn touch(&mut self, atualizado_por: &str) {
        self.atualizado_em = Utc::now();
        self.atualizado_por = atualizado_por.to_string();
    }
}

/// Observação - free-text note attached to one beneficiary.
/// Append-only list displayed newest-first; editable and deletable by any
/// operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Observacao {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub observacao_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub beneficiario_id: EntityId,
    pub autor: String,
    pub texto: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub timestamp: Timestamp,
    pub anexo_url: Option<String>,
}

impl Observacao {
    /// Create a new observation for a beneficiary.
    pub fn new(beneficiario_id: EntityId, autor: &str, texto: &str) -> Self {
        Self {
            observacao_id: Uuid::now_v7(),
            beneficiario_id,
            autor: autor.to_string(),
            texto: texto.trim().to_string(),
            timestamp: Utc::now(),
            anexo_url: None,
        }
    }

    /// Attach a stored file URL.
    pub fn with_anexo(mut self, url: &str) -> Self {
        self.anexo_url = Some(url.to_string());
        self
    }
}

/// Documento PDF - an attached PDF file owned by exactly one beneficiary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentoPdf {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub documento_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub beneficiario_id: EntityId,
    /// Original filename as uploaded.
    pub nome: String,
    pub url: String,
    pub tipo: TipoDocumento,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub data_anexacao: Timestamp,
    /// Operator who attached the document.
    pub usuario: String,
}

impl DocumentoPdf {
    /// Create a new document reference.
    pub fn new(
        beneficiario_id: EntityId,
        nome: &str,
        url: &str,
        tipo: TipoDocumento,
        usuario: &str,
    ) -> Self {
        Self {
            documento_id: Uuid::now_v7(),
            beneficiario_id,
            nome: nome.to_string(),
            url: url.to_string(),
            tipo,
            data_anexacao: Utc::now(),
            usuario: usuario.to_string(),
        }
    }
}

/// Arquivo digital - a file in the beneficiary-independent digital archive,
/// organized by year and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ArquivoDigital {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub arquivo_id: EntityId,
    pub nome: String,
    pub descricao: Option<String>,
    pub arquivo_url: String,
    /// MIME type of the stored file.
    pub tipo_arquivo: String,
    /// Size in bytes, when the upload reported one.
    pub tamanho: Option<i64>,
    pub ano: i32,
    pub mes: Option<i32>,
    pub categoria: Option<String>,
    pub tags: Vec<String>,
    pub usuario_upload: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub criado_em: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub atualizado_em: Timestamp,
}

impl ArquivoDigital {
    /// Create a new archive entry.
    pub fn new(nome: &str, arquivo_url: &str, tipo_arquivo: &str, ano: i32, usuario: &str) -> Self {
        let now = Utc::now();
        Self {
            arquivo_id: Uuid::now_v7(),
            nome: nome.to_string(),
            descricao: None,
            arquivo_url: arquivo_url.to_string(),
            tipo_arquivo: tipo_arquivo.to_string(),
            tamanho: None,
            ano,
            mes: None,
            categoria: None,
            tags: Vec::new(),
            usuario_upload: usuario.to_string(),
            criado_em: now,
            atualizado_em: now,
        }
    }

    /// Set the optional description.
    pub fn with_descricao(mut self, descricao: &str) -> Self {
        self.descricao = Some(descricao.to_string());
        self
    }

    /// Set the category and month within the archive year.
    pub fn with_categoria(mut self, categoria: Option<String>, mes: Option<i32>) -> Self {
        self.categoria = categoria;
        self.mes = mes;
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// CREATE PAYLOAD
// ============================================================================

/// Metadata of an uploaded photo, used for client-side validation before
/// any bytes leave the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FotoUpload {
    /// Original filename.
    pub nome: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// Size in bytes.
    pub tamanho: u64,
}

/// Payload of the intake form for a new beneficiary. Validated as a whole
/// by [`crate::validation::validar_novo_beneficiario`] before any storage
/// or database call is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NovoBeneficiario {
    pub nome: String,
    pub numero_processo: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub data_recebimento: NaiveDate,
    pub status_vida: StatusVida,
    pub local_lotacao: String,
    pub telefone_principal: Option<String>,
    pub telefone_secundario: Option<String>,
    pub horas_cumpridas: f64,
    pub horas_restantes: f64,
    pub observacao_inicial: Option<String>,
    /// Captured or uploaded photo. Mandatory unless a usable preview URL
    /// is present.
    pub foto: Option<FotoUpload>,
    /// Local preview URL, used as fallback when the upload fails.
    pub foto_preview: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_beneficiario_new_trims_fields() {
        let b = Beneficiario::new(
            "  Ana Souza ",
            "https://cdn/foto.jpg",
            " 2024.001.0042 ",
            data(2024, 3, 10),
            StatusVida::Vivo,
            "  Secretaria de Obras ",
            "operador@socorro.se.gov.br",
        );
        assert_eq!(b.nome, "Ana Souza");
        assert_eq!(b.numero_processo, "2024.001.0042");
        assert_eq!(b.local_lotacao, "Secretaria de Obras");
        assert_eq!(b.criado_por, b.atualizado_por);
        assert!(b.observacoes.is_empty());
    }

    #[test]
    fn test_beneficiario_with_horas_clamps_negative() {
        let b = Beneficiario::new(
            "Ana",
            "url",
            "1",
            data(2024, 1, 1),
            StatusVida::Vivo,
            "Local",
            "Sistema",
        )
        .with_horas(-5.0, 40.0);
        assert_eq!(b.horas_cumpridas, 0.0);
        assert_eq!(b.horas_restantes, 40.0);
        assert_eq!(b.total_horas(), 40.0);
    }

    #[test]
    fn test_beneficiario_with_telefones_drops_blank() {
        let b = Beneficiario::new(
            "Ana",
            "url",
            "1",
            data(2024, 1, 1),
            StatusVida::Vivo,
            "Local",
            "Sistema",
        )
        .with_telefones(Some("(79) 99999-0000".to_string()), Some("   ".to_string()));
        assert_eq!(b.telefone_principal.as_deref(), Some("(79) 99999-0000"));
        assert!(b.telefone_secundario.is_none());
    }

    #[test]
    fn test_touch_updates_actor() {
        let mut b = Beneficiario::new(
            "Ana",
            "url",
            "1",
            data(2024, 1, 1),
            StatusVida::Vivo,
            "Local",
            "Sistema",
        );
        let before = b.atualizado_em;
        b.touch("gestor@socorro.se.gov.br");
        assert_eq!(b.atualizado_por, "gestor@socorro.se.gov.br");
        assert!(b.atualizado_em >= before);
    }

    #[test]
    fn test_observacao_new_trims_texto() {
        let obs = Observacao::new(Uuid::nil(), "Sistema", "  compareceu hoje  ");
        assert_eq!(obs.texto, "compareceu hoje");
        assert!(obs.anexo_url.is_none());
    }

    #[test]
    fn test_arquivo_digital_builders() {
        let arq = ArquivoDigital::new("relatorio.pdf", "https://cdn/x", "application/pdf", 2024, "u")
            .with_descricao("Relatório anual")
            .with_categoria(Some("relatorios".to_string()), Some(12))
            .with_tags(vec!["2024".to_string()]);
        assert_eq!(arq.descricao.as_deref(), Some("Relatório anual"));
        assert_eq!(arq.mes, Some(12));
        assert_eq!(arq.tags.len(), 1);
    }
}
