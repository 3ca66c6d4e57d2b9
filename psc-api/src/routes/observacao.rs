//! Observação REST API Routes
//!
//! Sub-resource of a beneficiary: list newest-first, add, edit text,
//! delete. Any authenticated operator may edit or delete any observation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use psc_core::Observacao;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
    types::{CreateObservacaoRequest, UpdateObservacaoRequest},
};

/// GET /api/v1/beneficiarios/{id}/observacoes - List observations
#[utoipa::path(
    get,
    path = "/api/v1/beneficiarios/{id}/observacoes",
    tag = "Observações",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    responses(
        (status = 200, description = "Observações, mais recentes primeiro", body = [Observacao]),
        (status = 404, description = "Beneficiário não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_observacoes(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    // 404 on a missing parent instead of an empty list.
    state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;

    let observacoes = state.db.observacao_list(id).await?;
    Ok(Json(observacoes))
}

/// POST /api/v1/beneficiarios/{id}/observacoes - Add an observation
#[utoipa::path(
    post,
    path = "/api/v1/beneficiarios/{id}/observacoes",
    tag = "Observações",
    params(("id" = Uuid, Path, description = "Beneficiary ID")),
    request_body = CreateObservacaoRequest,
    responses(
        (status = 201, description = "Observação criada", body = Observacao),
        (status = 400, description = "Texto vazio", body = ApiError),
        (status = 404, description = "Beneficiário não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_observacao(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateObservacaoRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.texto.trim().is_empty() {
        return Err(ApiError::missing_field("texto"));
    }

    state
        .db
        .beneficiario_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("beneficiario", id))?;

    let mut observacao = Observacao::new(id, &user.actor_label(), &req.texto);
    if let Some(anexo) = req.anexo_url.filter(|a| !a.trim().is_empty()) {
        observacao = observacao.with_anexo(&anexo);
    }

    state.db.observacao_insert(&observacao).await?;
    Ok((StatusCode::CREATED, Json(observacao)))
}

/// PATCH /api/v1/beneficiarios/{id}/observacoes/{observacao_id} - Edit text
#[utoipa::path(
    patch,
    path = "/api/v1/beneficiarios/{id}/observacoes/{observacao_id}",
    tag = "Observações",
    params(
        ("id" = Uuid, Path, description = "Beneficiary ID"),
        ("observacao_id" = Uuid, Path, description = "Observation ID"),
    ),
    request_body = UpdateObservacaoRequest,
    responses(
        (status = 200, description = "Observações atualizadas, mais recentes primeiro", body = [Observacao]),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_observacao(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((id, observacao_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateObservacaoRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.texto.trim().is_empty() {
        return Err(ApiError::missing_field("texto"));
    }

    state
        .db
        .observacao_update_texto(observacao_id, &req.texto)
        .await?;

    // Refetch the sub-collection so the caller sees the authoritative state.
    let observacoes = state.db.observacao_list(id).await?;
    Ok(Json(observacoes))
}

/// DELETE /api/v1/beneficiarios/{id}/observacoes/{observacao_id}
#[utoipa::path(
    delete,
    path = "/api/v1/beneficiarios/{id}/observacoes/{observacao_id}",
    tag = "Observações",
    params(
        ("id" = Uuid, Path, description = "Beneficiary ID"),
        ("observacao_id" = Uuid, Path, description = "Observation ID"),
    ),
    responses(
        (status = 204, description = "Observação removida"),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_observacao(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((_id, observacao_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    state.db.observacao_delete(observacao_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the observation router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/beneficiarios/:id/observacoes",
            get(list_observacoes).post(create_observacao),
        )
        .route(
            "/api/v1/beneficiarios/:id/observacoes/:observacao_id",
            patch(update_observacao).delete(delete_observacao),
        )
}
