//! Beneficiário REST API Routes
//!
//! List/search, detail, creation (multipart with photo and optional PDFs),
//! hours and status updates, and deletion with cascade.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use psc_core::{
    buscar_beneficiarios, validation, Beneficiario, DocumentoPdf, FiltroBeneficiario, FotoUpload,
    HoursLedger, NovoBeneficiario, Observacao, TipoDocumento,
};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
    storage::{object_name, BUCKET_DOCUMENTOS, BUCKET_FOTOS},
    types::{
        ListBeneficiariosQuery, ListBeneficiariosResponse, UpdateHorasRequest, UpdateStatusRequest,
    },
};

// ============================================================================
// MULTIPART PARSING
// ============================================================================

struct FilePart {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

struct CreateParts {
    novo: NovoBeneficiario,
    foto: Option<FilePart>,
    documentos: Vec<(TipoDocumento, FilePart)>,
}

/// Pull the intake form out of a multipart body. Expected parts:
/// `payload` (JSON), `foto` (image), `documento_frequencia` and
/// `documento_documentacao` (PDFs, both optional).
async fn parse_create_multipart(mut multipart: Multipart) -> ApiResult<CreateParts> {
    let mut payload: Option<NovoBeneficiario> = None;
    let mut foto: Option<FilePart> = None;
    let mut documentos: Vec<(TipoDocumento, FilePart)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("Multipart inválido: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "payload" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("Payload ilegível: {}", e)))?;
                payload = Some(serde_json::from_slice(&bytes)?);
            }
            "foto" | "documento_frequencia" | "documento_documentacao" => {
                let filename = field.file_name().unwrap_or("arquivo").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("Arquivo ilegível: {}", e)))?
                    .to_vec();
                let part = FilePart {
                    filename,
                    content_type,
                    bytes,
                };
                match name.as_str() {
                    "foto" => foto = Some(part),
                    "documento_frequencia" => documentos.push((TipoDocumento::Frequencia, part)),
                    _ => documentos.push((TipoDocumento::Documentacao, part)),
                }
            }
            // Unknown parts are ignored.
            _ => {}
        }
    }

    let mut novo = payload.ok_or_else(|| ApiError::missing_field("payload"))?;
    if let Some(ref f) = foto {
        novo.foto = Some(FotoUpload {
            nome: f.filename.clone(),
            content_type: f.content_type.clone(),
            tamanho: f.bytes.len() as u64,
        });
    }

    Ok(CreateParts {
        novo,
        foto,
        documentos,
    })
}

// ============================================================================
// HOURS RECONCILIATION
// ============================================================================

/// Resolve a submitted hours edit against the stored pair.
///
/// A full pair is taken as the edited state and normalized directly; the
/// stored pair only anchors the ledger when a single field arrives, so the
/// untouched field is re-derived from the stored total.
fn reconciliar_horas(
    atual: (f64, f64),
    horas_cumpridas: Option<f64>,
    horas_restantes: Option<f64>,
) -> (f64, f64) {
    match (horas_cumpridas, horas_restantes) {
        (Some(cumpridas), Some(restantes)) => HoursLedger::load(cumpridas, restantes).close(),
        (Some(cumpridas), None) => {
            let mut ledger = HoursLedger::load(atual.0, atual.1);
            ledger.set_cumpridas(cumpridas);
            ledger.close()
        }
        (None, Some(restantes)) => {
            let mut ledger = HoursLedger::load(atual.0, atual.1);
            ledger.set_restantes(restantes);
            ledger.close()
        }
        (None, None) => HoursLedger::load(atual.0, atual.1).close(),
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/beneficiarios - List with search and filters
#[utoipa::path(
    get,
    path = "/api/v1/beneficiarios",
    tag = "Beneficiários",
    params(ListBeneficiariosQuery),
    responses(
        (status = 200, description = "Lista de beneficiários", body = ListBeneficiariosResponse),
        (status = 401, description = "Não autenticado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_beneficiarios(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListBeneficiariosQuery>,
) -> ApiResult<impl IntoResponse> {
    let todos = state.db.beneficiario_list().await?;

    let filtro = FiltroBeneficiario {
        status: params.status,
        horas_restantes_min: params.horas_min,
        data_de: params.data_inicio,
        data_ate: params.data_fim,
    };
    let beneficiarios =
        buscar_beneficiarios(&todos, params.busca.as_deref().unwrap_or(""), &filtro);

    let total = beneficiarios.len();
    Ok(Json(ListBeneficiariosResponse {
        beneficiarios,
        total,
    }))
}

/// GET /api/v1/beneficiarios/{id} - Get a beneficiary
#[utoipa::path(
    get,
    path = "/api/v1/beneficiarios/{id}",
    tag = "Beneficiários",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 200, description = "Beneficiário", body = Beneficiario),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_beneficiario(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let beneficiario = state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;
    Ok(Json(beneficiario))
}

/// POST /api/v1/beneficiarios - Create a beneficiary
///
/// Multipart form: `payload` JSON plus `foto` and optional PDF parts.
/// Photo upload failure degrades to the submitted preview URL, then to a
/// generated placeholder avatar; PDF and initial-observation failures are
/// logged and never block the creation.
#[utoipa::path(
    post,
    path = "/api/v1/beneficiarios",
    tag = "Beneficiários",
    responses(
        (status = 201, description = "Beneficiário criado", body = Beneficiario),
        (status = 400, description = "Validação falhou", body = ApiError),
        (status = 409, description = "Registro duplicado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_beneficiario(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let parts = parse_create_multipart(multipart).await?;
    let novo = &parts.novo;
    let actor = user.actor_label();

    validation::validar_novo_beneficiario(novo).map_err(ApiError::from)?;
    for (_, doc) in &parts.documentos {
        validation::validar_pdf(&doc.content_type).map_err(ApiError::from)?;
    }

    // Duplicate probe before any write. The unique constraint remains the
    // backstop for concurrent submissions.
    if state
        .db
        .beneficiario_find_duplicate(novo.numero_processo.trim(), novo.nome.trim())
        .await?
        .is_some()
    {
        return Err(ApiError::duplicate_record());
    }

    // Photo upload with fallback chain: object store, then the client-side
    // preview, then a generated avatar.
    let foto_url = match &parts.foto {
        Some(foto) => {
            let name = object_name(&actor, &foto.filename);
            match state
                .object_store
                .upload(BUCKET_FOTOS, &name, foto.bytes.clone(), &foto.content_type)
                .await
            {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Erro no upload da foto, usando preview: {}", e);
                    novo.foto_preview
                        .clone()
                        .filter(|p| !p.trim().is_empty())
                        .unwrap_or_else(|| validation::placeholder_avatar_url(&novo.nome))
                }
            }
        }
        None => novo
            .foto_preview
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| validation::placeholder_avatar_url(&novo.nome)),
    };

    // Normalize the hours pair before it is persisted.
    let ledger = HoursLedger::load(novo.horas_cumpridas, novo.horas_restantes);
    let (horas_cumpridas, horas_restantes) = ledger.close();

    let beneficiario = Beneficiario::new(
        &novo.nome,
        &foto_url,
        &novo.numero_processo,
        novo.data_recebimento,
        novo.status_vida,
        &novo.local_lotacao,
        &actor,
    )
    .with_horas(horas_cumpridas, horas_restantes)
    .with_telefones(
        novo.telefone_principal.clone(),
        novo.telefone_secundario.clone(),
    );

    state.db.beneficiario_insert(&beneficiario).await?;

    // Best-effort PDF attachments.
    for (tipo, doc) in &parts.documentos {
        let name = object_name(&actor, &doc.filename);
        match state
            .object_store
            .upload(BUCKET_DOCUMENTOS, &name, doc.bytes.clone(), &doc.content_type)
            .await
        {
            Ok(url) => {
                let documento = DocumentoPdf::new(
                    beneficiario.beneficiario_id,
                    &doc.filename,
                    &url,
                    *tipo,
                    &actor,
                );
                if let Err(e) = state.db.documento_insert(&documento).await {
                    tracing::warn!("Erro ao registrar PDF, registro salvo sem o documento: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Erro no upload do PDF, registro salvo sem o documento: {}", e);
            }
        }
    }

    // Best-effort initial observation.
    if let Some(texto) = novo
        .observacao_inicial
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        let observacao = Observacao::new(beneficiario.beneficiario_id, &actor, texto);
        if let Err(e) = state.db.observacao_insert(&observacao).await {
            tracing::warn!("Erro ao inserir observação inicial (não crítico): {}", e);
        }
    }

    // Backend is authoritative: respond with a fresh fetch.
    let criado = state
        .db
        .beneficiario_get(beneficiario.beneficiario_id)
        .await?
        .ok_or_else(|| ApiError::internal_error("Falha ao recuperar beneficiário criado"))?;

    Ok((StatusCode::CREATED, Json(criado)))
}

/// PATCH /api/v1/beneficiarios/{id}/horas - Update the hours pair
#[utoipa::path(
    patch,
    path = "/api/v1/beneficiarios/{id}/horas",
    tag = "Beneficiários",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    request_body = UpdateHorasRequest,
    responses(
        (status = 200, description = "Horas atualizadas", body = Beneficiario),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_horas(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateHorasRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.horas_cumpridas.is_none() && req.horas_restantes.is_none() {
        return Err(ApiError::invalid_input(
            "Informe horas_cumpridas ou horas_restantes",
        ));
    }

    if req.horas_cumpridas.is_some_and(|v| v < 0.0)
        || req.horas_restantes.is_some_and(|v| v < 0.0)
    {
        return Err(ApiError::invalid_input("Horas não podem ser negativas"));
    }

    let atual = state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;

    let (horas_cumpridas, horas_restantes) = reconciliar_horas(
        (atual.horas_cumpridas, atual.horas_restantes),
        req.horas_cumpridas,
        req.horas_restantes,
    );

    state
        .db
        .beneficiario_update_horas(id, horas_cumpridas, horas_restantes, &user.actor_label())
        .await?;

    let atualizado = state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;
    Ok(Json(atualizado))
}

/// PATCH /api/v1/beneficiarios/{id}/status - Update the life status
#[utoipa::path(
    patch,
    path = "/api/v1/beneficiarios/{id}/status",
    tag = "Beneficiários",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status atualizado", body = Beneficiario),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .db
        .beneficiario_update_status(id, req.status_vida, &user.actor_label())
        .await?;

    let atualizado = state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;
    Ok(Json(atualizado))
}

/// DELETE /api/v1/beneficiarios/{id} - Delete a beneficiary
#[utoipa::path(
    delete,
    path = "/api/v1/beneficiarios/{id}",
    tag = "Beneficiários",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 204, description = "Beneficiário removido"),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_beneficiario(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.db.beneficiario_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER
// ============================================================================

/// Build the beneficiary router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/beneficiarios",
            get(list_beneficiarios).post(create_beneficiario),
        )
        .route(
            "/api/v1/beneficiarios/:id",
            get(get_beneficiario).delete(delete_beneficiario),
        )
        .route("/api/v1/beneficiarios/:id/horas", patch(update_horas))
        .route("/api/v1/beneficiarios/:id/status", patch(update_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciliar_horas_full_pair_wins_over_stored_state() {
        // Stored (40, 0); the dialog saves the already-computed pair (25, 15).
        assert_eq!(reconciliar_horas((40.0, 0.0), Some(25.0), Some(15.0)), (25.0, 15.0));
        // A submitted pair that does not sum cleanly still normalizes.
        assert_eq!(reconciliar_horas((10.0, 30.0), Some(50.0), Some(10.0)), (50.0, 10.0));
    }

    #[test]
    fn test_reconciliar_horas_cumpridas_only_rederives_restantes() {
        assert_eq!(reconciliar_horas((10.0, 30.0), Some(25.0), None), (25.0, 15.0));
        // Capped at the stored total.
        assert_eq!(reconciliar_horas((10.0, 30.0), Some(90.0), None), (40.0, 0.0));
    }

    #[test]
    fn test_reconciliar_horas_restantes_only_rederives_total() {
        assert_eq!(reconciliar_horas((10.0, 30.0), None, Some(5.0)), (10.0, 5.0));
    }
}
