//! Documento PDF REST API Routes
//!
//! Sub-resource of a beneficiary: list newest-first, attach (multipart PDF
//! upload), delete. Deleting removes the stored object best-effort after
//! the database row is gone.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use psc_core::{validation, DocumentoPdf, TipoDocumento};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
    storage::{object_name, BUCKET_DOCUMENTOS},
};

/// Object name as stored in the bucket, recovered from a public URL.
fn object_name_from_url(url: &str) -> Option<&str> {
    url.rsplit_once('/').map(|(_, name)| name).filter(|n| !n.is_empty())
}

/// GET /api/v1/beneficiarios/{id}/documentos - List PDF documents
#[utoipa::path(
    get,
    path = "/api/v1/beneficiarios/{id}/documentos",
    tag = "Documentos",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 200, description = "Documentos, mais recentes primeiro", body = [DocumentoPdf]),
        (status = 404, description = "Beneficiário não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_documentos(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;

    let documentos = state.db.documento_list(id).await?;
    Ok(Json(documentos))
}

/// POST /api/v1/beneficiarios/{id}/documentos - Attach a PDF
///
/// Multipart form: `arquivo` (the PDF) and `tipo` (`frequencia` or
/// `documentacao`). Unlike creation-time attachments this upload is not
/// best-effort; the caller asked for exactly this document, so a storage
/// failure is surfaced.
#[utoipa::path(
    post,
    path = "/api/v1/beneficiarios/{id}/documentos",
    tag = "Documentos",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 201, description = "Documento anexado", body = DocumentoPdf),
        (status = 400, description = "Arquivo não é PDF", body = ApiError),
        (status = 404, description = "Beneficiário não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_documento(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;

    let mut tipo = TipoDocumento::Documentacao;
    let mut arquivo: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("Multipart inválido: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "tipo" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("Campo tipo ilegível: {}", e)))?;
                tipo = TipoDocumento::from_db_str(raw.trim())
                    .map_err(|_| ApiError::invalid_format("tipo", "frequencia ou documentacao"))?;
            }
            "arquivo" => {
                let filename = field.file_name().unwrap_or("documento.pdf").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("Arquivo ilegível: {}", e)))?
                    .to_vec();
                arquivo = Some((filename, content_type, bytes));
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        arquivo.ok_or_else(|| ApiError::missing_field("arquivo"))?;
    validation::validar_pdf(&content_type).map_err(ApiError::from)?;

    let actor = user.actor_label();
    let name = object_name(&actor, &filename);
    let url = state
        .object_store
        .upload(BUCKET_DOCUMENTOS, &name, bytes, &content_type)
        .await
        .map_err(ApiError::from)?;

    let documento = DocumentoPdf::new(id, &filename, &url, tipo, &actor);
    state.db.documento_insert(&documento).await?;

    Ok((StatusCode::CREATED, Json(documento)))
}

/// DELETE /api/v1/beneficiarios/{id}/documentos/{documento_id}
#[utoipa::path(
    delete,
    path = "/api/v1/beneficiarios/{id}/documentos/{documento_id}",
    tag = "Documentos",
    params(
        ("id" = Uuid, Path, description = "Beneficiary ID"),
        ("documento_id" = Uuid, Path, description = "Document ID"),
    ),
    responses(
        (status = 204, description = "Documento removido"),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_documento(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((_id, documento_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let documento = state
        .db
        .documento_get(documento_id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("documento_pdf", documento_id))?;

    state.db.documento_delete(documento_id).await?;

    // Best-effort object removal; the database row is authoritative.
    if let Some(name) = object_name_from_url(&documento.url) {
        if let Err(e) = state.object_store.remove(BUCKET_DOCUMENTOS, name).await {
            tracing::warn!("Erro ao remover objeto do documento {}: {}", documento_id, e);
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build the document router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/beneficiarios/:id/documentos",
            get(list_documentos).post(create_documento),
        )
        .route(
            "/api/v1/beneficiarios/:id/documentos/:documento_id",
            delete(delete_documento),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_from_url() {
        let url = "https://xyz.supabase.co/storage/v1/object/public/beneficiarios-documentos/op-17.pdf";
        assert_eq!(object_name_from_url(url), Some("op-17.pdf"));
        assert_eq!(object_name_from_url("sem-barras"), None);
        assert_eq!(object_name_from_url("termina/"), None);
    }
}
