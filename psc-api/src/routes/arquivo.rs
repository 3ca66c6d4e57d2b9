//! Arquivo Digital REST API Routes
//!
//! Digital archive independent of beneficiaries, organized by year and
//! category. Files upload to their own bucket; metadata lives in
//! arquivos_digitais.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use psc_core::ArquivoDigital;
use psc_storage::{ArquivoFilter, ArquivoUpdate};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    state::AppState,
    storage::{object_name, BUCKET_ARQUIVOS},
    types::{CreateArquivoRequest, ListArquivosQuery, UpdateArquivoRequest},
};

/// GET /api/v1/arquivos - List archive entries
#[utoipa::path(
    get,
    path = "/api/v1/arquivos",
    tag = "Arquivos",
    params(ListArquivosQuery),
    responses(
        (status = 200, description = "Arquivos, mais recentes primeiro", body = [ArquivoDigital]),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_arquivos(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListArquivosQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ArquivoFilter {
        ano: params.ano,
        categoria: params.categoria,
        termo: params.termo,
    };
    let arquivos = state.db.arquivo_list(&filter).await?;
    Ok(Json(arquivos))
}

/// POST /api/v1/arquivos - Upload an archive file
///
/// Multipart form: `payload` (JSON metadata) and `arquivo` (the file).
#[utoipa::path(
    post,
    path = "/api/v1/arquivos",
    tag = "Arquivos",
    responses(
        (status = 201, description = "Arquivo criado", body = ArquivoDigital),
        (status = 400, description = "Requisição inválida", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_arquivo(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut payload: Option<CreateArquivoRequest> = None;
    let mut arquivo: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("Multipart inválido: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "payload" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(format!("Payload ilegível: {}", e)))?;
                payload = Some(serde_json::from_slice(&bytes)?);
            }
            "arquivo" => {
                let filename = field.file_name().unwrap_or("arquivo").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
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

    let req = payload.ok_or_else(|| ApiError::missing_field("payload"))?;
    let (filename, content_type, bytes) =
        arquivo.ok_or_else(|| ApiError::missing_field("arquivo"))?;

    let actor = user.actor_label();
    let tamanho = bytes.len() as i64;
    let name = object_name(&actor, &filename);
    let url = state
        .object_store
        .upload(BUCKET_ARQUIVOS, &name, bytes, &content_type)
        .await
        .map_err(ApiError::from)?;

    let mut entry = ArquivoDigital::new(
        req.nome.as_deref().unwrap_or(&filename),
        &url,
        &content_type,
        req.ano,
        &actor,
    )
    .with_categoria(req.categoria, req.mes)
    .with_tags(req.tags);
    entry.tamanho = Some(tamanho);
    if let Some(descricao) = req.descricao.filter(|d| !d.trim().is_empty()) {
        entry = entry.with_descricao(&descricao);
    }

    state.db.arquivo_insert(&entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /api/v1/arquivos/{id} - Update archive metadata
#[utoipa::path(
    patch,
    path = "/api/v1/arquivos/{id}",
    tag = "Arquivos",
    params(("id" = Uuid, Path, description = "Archive entry ID")),
    request_body = UpdateArquivoRequest,
    responses(
        (status = 200, description = "Arquivo atualizado", body = ArquivoDigital),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_arquivo(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateArquivoRequest>,
) -> ApiResult<impl IntoResponse> {
    let update = ArquivoUpdate {
        nome: req.nome,
        descricao: req.descricao,
        categoria: req.categoria,
        tags: req.tags,
    };
    state.db.arquivo_update(id, &update).await?;

    let atualizado = state
        .db
        .arquivo_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("arquivo_digital", id))?;
    Ok(Json(atualizado))
}

/// DELETE /api/v1/arquivos/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/arquivos/{id}",
    tag = "Arquivos",
    params(("id" = Uuid, Path, description = "Archive entry ID")),
    responses(
        (status = 204, description = "Arquivo removido"),
        (status = 404, description = "Não encontrado", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_arquivo(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let arquivo = state
        .db
        .arquivo_get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("arquivo_digital", id))?;

    state.db.arquivo_delete(id).await?;

    if let Some(name) = arquivo.arquivo_url.rsplit_once('/').map(|(_, n)| n) {
        if !name.is_empty() {
            if let Err(e) = state.object_store.remove(BUCKET_ARQUIVOS, name).await {
                tracing::warn!("Erro ao remover objeto do arquivo {}: {}", id, e);
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build the digital-archive router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/arquivos", get(list_arquivos).post(create_arquivo))
        .route(
            "/api/v1/arquivos/:id",
            patch(update_arquivo).delete(delete_arquivo),
        )
}
