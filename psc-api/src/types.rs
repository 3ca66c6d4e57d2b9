//! Request and Response Types for the PSC API

use chrono::NaiveDate;
use psc_core::{Beneficiario, StatusVida};
use serde::{Deserialize, Serialize};

// ============================================================================
// BENEFICIÁRIO
// ============================================================================

/// Query parameters for GET /api/v1/beneficiarios.
#[derive(Debug, Clone, Default, Deserialize)]
#[derive(utoipa::IntoParams)]
pub struct ListBeneficiariosQuery {
    /// Free-text search over name, process number and location.
    pub busca: Option<String>,
    /// Filter by life status.
    pub status: Option<StatusVida>,
    /// Keep records still owing at least this many hours.
    pub horas_min: Option<f64>,
    /// Inclusive lower bound on the intake date.
    pub data_inicio: Option<NaiveDate>,
    /// Inclusive upper bound on the intake date.
    pub data_fim: Option<NaiveDate>,
}

/// Response for GET /api/v1/beneficiarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct ListBeneficiariosResponse {
    pub beneficiarios: Vec<Beneficiario>,
    pub total: usize,
}

/// Body for PATCH /api/v1/beneficiarios/{id}/horas.
///
/// Either field may be sent; the last-edited one drives the reconciliation
/// (served hours recompute the remainder against the fixed total, a new
/// remainder re-derives the total).
#[derive(Debug, Clone, Default, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct UpdateHorasRequest {
    pub horas_cumpridas: Option<f64>,
    pub horas_restantes: Option<f64>,
}

/// Body for PATCH /api/v1/beneficiarios/{id}/status.
#[derive(Debug, Clone, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status_vida: StatusVida,
}

// ============================================================================
// OBSERVAÇÃO
// ============================================================================

/// Body for POST /api/v1/beneficiarios/{id}/observacoes.
#[derive(Debug, Clone, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct CreateObservacaoRequest {
    pub texto: String,
    pub anexo_url: Option<String>,
}

/// Body for PATCH /api/v1/beneficiarios/{id}/observacoes/{observacao_id}.
#[derive(Debug, Clone, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct UpdateObservacaoRequest {
    pub texto: String,
}

// ============================================================================
// ARQUIVO DIGITAL
// ============================================================================

/// Metadata part of the multipart POST /api/v1/arquivos.
#[derive(Debug, Clone, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct CreateArquivoRequest {
    /// Display name; defaults to the uploaded filename.
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub ano: i32,
    pub mes: Option<i32>,
    pub categoria: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query parameters for GET /api/v1/arquivos.
#[derive(Debug, Clone, Default, Deserialize)]
#[derive(utoipa::IntoParams)]
pub struct ListArquivosQuery {
    pub ano: Option<i32>,
    pub categoria: Option<String>,
    /// Free-text term matched against name, description and tags.
    pub termo: Option<String>,
}

/// Body for PATCH /api/v1/arquivos/{id}.
#[derive(Debug, Clone, Default, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct UpdateArquivoRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub categoria: Option<String>,
    pub tags: Option<Vec<String>>,
}
