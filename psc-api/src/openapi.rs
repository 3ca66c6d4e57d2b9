//! OpenAPI Specification for the PSC API
//!
//! Generated with utoipa from the route annotations and domain types.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{arquivo, beneficiario, documento, observacao};
use crate::types::{
    CreateArquivoRequest, CreateObservacaoRequest, ListBeneficiariosResponse, UpdateArquivoRequest,
    UpdateHorasRequest, UpdateObservacaoRequest, UpdateStatusRequest,
};

use psc_core::{
    ArquivoDigital, Beneficiario, CorLapso, DocumentoPdf, FiltroBeneficiario, FotoUpload,
    NovoBeneficiario, Observacao, StatusVida, TipoDocumento,
};

/// OpenAPI document for the PSC API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PSC API",
        version = "0.3.0",
        description = "Gestão de beneficiários em prestação de serviços à comunidade",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Beneficiários", description = "Registro de beneficiários e horas de serviço"),
        (name = "Observações", description = "Observações por beneficiário"),
        (name = "Documentos", description = "Documentos PDF por beneficiário"),
        (name = "Arquivos", description = "Arquivo digital por ano e categoria")
    ),
    paths(
        beneficiario::list_beneficiarios,
        beneficiario::get_beneficiario,
        beneficiario::create_beneficiario,
        beneficiario::update_horas,
        beneficiario::update_status,
        beneficiario::delete_beneficiario,
        observacao::list_observacoes,
        observacao::create_observacao,
        observacao::update_observacao,
        observacao::delete_observacao,
        documento::list_documentos,
        documento::create_documento,
        documento::delete_documento,
        arquivo::list_arquivos,
        arquivo::create_arquivo,
        arquivo::update_arquivo,
        arquivo::delete_arquivo,
    ),
    components(
        schemas(
            ApiError,
            ErrorCode,
            Beneficiario,
            NovoBeneficiario,
            FotoUpload,
            FiltroBeneficiario,
            Observacao,
            DocumentoPdf,
            ArquivoDigital,
            StatusVida,
            TipoDocumento,
            CorLapso,
            ListBeneficiariosResponse,
            UpdateHorasRequest,
            UpdateStatusRequest,
            CreateObservacaoRequest,
            UpdateObservacaoRequest,
            CreateArquivoRequest,
            UpdateArquivoRequest,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the bearer security scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/beneficiarios"));
        assert!(doc.paths.paths.contains_key("/api/v1/beneficiarios/{id}/horas"));
        assert!(doc.paths.paths.contains_key("/api/v1/arquivos"));

        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("Beneficiario"));
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
