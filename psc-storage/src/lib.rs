//! PSC Storage - Storage Trait and Mock Implementation
//!
//! Defines the persistence abstraction for PSC entities. The Postgres
//! implementation lives in psc-api; [`MockStorage`] backs unit tests and
//! local development.

pub mod object;

pub use object::{MockObjectStore, ObjectStore, StoredObject};

use psc_core::{
    ArquivoDigital, Beneficiario, DocumentoPdf, Observacao, PscError, PscResult, StatusVida,
    StorageError,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

// ============================================================================
// UPDATE TYPES
// ============================================================================

/// Update payload for beneficiaries. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BeneficiarioUpdate {
    pub nome: Option<String>,
    pub status_vida: Option<StatusVida>,
    pub local_lotacao: Option<String>,
    pub telefone_principal: Option<String>,
    pub telefone_secundario: Option<String>,
    pub foto_url: Option<String>,
    pub horas_cumpridas: Option<f64>,
    pub horas_restantes: Option<f64>,
    /// Operator performing the update, stamped into `atualizado_por`.
    pub atualizado_por: Option<String>,
}

/// Update payload for digital-archive entries.
#[derive(Debug, Clone, Default)]
pub struct ArquivoUpdate {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub categoria: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Filter for listing digital-archive entries.
#[derive(Debug, Clone, Default)]
pub struct ArquivoFilter {
    pub ano: Option<i32>,
    pub categoria: Option<String>,
    /// Free-text term matched against name, description and tags.
    pub termo: Option<String>,
}

impl ArquivoFilter {
    /// Whether an entry matches the free-text term, case-insensitively.
    pub fn termo_matches(&self, arquivo: &ArquivoDigital) -> bool {
        match self.termo.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(termo) => {
                let termo = termo.to_lowercase();
                arquivo.nome.to_lowercase().contains(&termo)
                    || arquivo
                        .descricao
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&termo))
                    || arquivo.tags.iter().any(|t| t.to_lowercase().contains(&termo))
            }
            None => true,
        }
    }
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for PSC entities.
/// Implementations provide persistence for beneficiaries, their
/// observations and PDF documents, and the digital archive.
pub trait StorageTrait: Send + Sync {
    // === Beneficiário Operations ===

    /// Insert a new beneficiary.
    fn beneficiario_insert(&self, b: &Beneficiario) -> PscResult<()>;

    /// Get a beneficiary by ID, with sub-collections hydrated newest-first.
    fn beneficiario_get(&self, id: Uuid) -> PscResult<Option<Beneficiario>>;

    /// List all beneficiaries ordered alphabetically by name.
    fn beneficiario_list(&self) -> PscResult<Vec<Beneficiario>>;

    /// Update a beneficiary.
    fn beneficiario_update(&self, id: Uuid, update: BeneficiarioUpdate) -> PscResult<()>;

    /// Delete a beneficiary, cascading to its observations and documents.
    fn beneficiario_delete(&self, id: Uuid) -> PscResult<()>;

    /// Probe for an existing record with the same process number or a
    /// name containing the given one (case-insensitive). Run before insert
    /// so the duplicate surfaces as a domain error rather than a
    /// constraint violation.
    fn beneficiario_find_duplicate(
        &self,
        numero_processo: &str,
        nome: &str,
    ) -> PscResult<Option<Beneficiario>>;

    // === Observação Operations ===

    /// Insert a new observation.
    fn observacao_insert(&self, o: &Observacao) -> PscResult<()>;

    /// Get an observation by ID.
    fn observacao_get(&self, id: Uuid) -> PscResult<Option<Observacao>>;

    /// List observations of a beneficiary, newest-first.
    fn observacao_list_by_beneficiario(&self, beneficiario_id: Uuid)
        -> PscResult<Vec<Observacao>>;

    /// Replace the text of an observation.
    fn observacao_update_texto(&self, id: Uuid, texto: &str) -> PscResult<()>;

    /// Delete an observation.
    fn observacao_delete(&self, id: Uuid) -> PscResult<()>;

    // === Documento Operations ===

    /// Insert a new PDF document reference.
    fn documento_insert(&self, d: &DocumentoPdf) -> PscResult<()>;

    /// Get a document by ID.
    fn documento_get(&self, id: Uuid) -> PscResult<Option<DocumentoPdf>>;

    /// List documents of a beneficiary, newest-first.
    fn documento_list_by_beneficiario(
        &self,
        beneficiario_id: Uuid,
    ) -> PscResult<Vec<DocumentoPdf>>;

    /// Delete a document reference.
    fn documento_delete(&self, id: Uuid) -> PscResult<()>;

    // === Arquivo Digital Operations ===

    /// Insert a new digital-archive entry.
    fn arquivo_insert(&self, a: &ArquivoDigital) -> PscResult<()>;

    /// Get an archive entry by ID.
    fn arquivo_get(&self, id: Uuid) -> PscResult<Option<ArquivoDigital>>;

    /// List archive entries matching the filter, newest-first.
    fn arquivo_list(&self, filter: &ArquivoFilter) -> PscResult<Vec<ArquivoDigital>>;

    /// Update an archive entry's metadata.
    fn arquivo_update(&self, id: Uuid, update: ArquivoUpdate) -> PscResult<()>;

    /// Delete an archive entry.
    fn arquivo_delete(&self, id: Uuid) -> PscResult<()>;
}

// ============================================================================
// MOCK STORAGE
// ============================================================================

/// In-memory mock storage for testing.
#[derive(Debug, Default)]
pub struct MockStorage {
    beneficiarios: Arc<RwLock<HashMap<Uuid, Beneficiario>>>,
    observacoes: Arc<RwLock<HashMap<Uuid, Observacao>>>,
    documentos: Arc<RwLock<HashMap<Uuid, DocumentoPdf>>>,
    arquivos: Arc<RwLock<HashMap<Uuid, ArquivoDigital>>>,
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.beneficiarios.write().unwrap().clear();
        self.observacoes.write().unwrap().clear();
        self.documentos.write().unwrap().clear();
        self.arquivos.write().unwrap().clear();
    }

    /// Count of stored beneficiaries.
    pub fn beneficiario_count(&self) -> usize {
        self.beneficiarios.read().unwrap().len()
    }

    /// Count of stored observations.
    pub fn observacao_count(&self) -> usize {
        self.observacoes.read().unwrap().len()
    }

    /// Count of stored documents.
    pub fn documento_count(&self) -> usize {
        self.documentos.read().unwrap().len()
    }

    /// Count of stored archive entries.
    pub fn arquivo_count(&self) -> usize {
        self.arquivos.read().unwrap().len()
    }

    fn hydrate(&self, mut b: Beneficiario) -> Beneficiario {
        b.observacoes = self
            .observacao_list_by_beneficiario(b.beneficiario_id)
            .unwrap_or_default();
        b.documentos_pdf = self
            .documento_list_by_beneficiario(b.beneficiario_id)
            .unwrap_or_default();
        b
    }
}

impl StorageTrait for MockStorage {
    // === Beneficiário Operations ===

    fn beneficiario_insert(&self, b: &Beneficiario) -> PscResult<()> {
        let mut beneficiarios = self.beneficiarios.write().unwrap();
        if beneficiarios.contains_key(&b.beneficiario_id) {
            return Err(PscError::Storage(StorageError::InsertFailed {
                entity: "beneficiario",
                reason: "already exists".to_string(),
            }));
        }
        if beneficiarios
            .values()
            .any(|other| other.numero_processo == b.numero_processo)
        {
            return Err(PscError::Storage(StorageError::Duplicate {
                numero_processo: b.numero_processo.clone(),
            }));
        }
        beneficiarios.insert(b.beneficiario_id, b.clone());
        Ok(())
    }

    fn beneficiario_get(&self, id: Uuid) -> PscResult<Option<Beneficiario>> {
        let found = self.beneficiarios.read().unwrap().get(&id).cloned();
        Ok(found.map(|b| self.hydrate(b)))
    }

    fn beneficiario_list(&self) -> PscResult<Vec<Beneficiario>> {
        let mut lista: Vec<Beneficiario> = self
            .beneficiarios
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.nome.to_lowercase().cmp(&b.nome.to_lowercase()));
        Ok(lista.into_iter().map(|b| self.hydrate(b)).collect())
    }

    fn beneficiario_update(&self, id: Uuid, update: BeneficiarioUpdate) -> PscResult<()> {
        let mut beneficiarios = self.beneficiarios.write().unwrap();
        let b = beneficiarios
            .get_mut(&id)
            .ok_or(PscError::Storage(StorageError::NotFound {
                entity: "beneficiario",
                id,
            }))?;

        if let Some(nome) = update.nome {
            b.nome = nome;
        }
        if let Some(status) = update.status_vida {
            b.status_vida = status;
        }
        if let Some(local) = update.local_lotacao {
            b.local_lotacao = local;
        }
        if let Some(telefone) = update.telefone_principal {
            b.telefone_principal = Some(telefone);
        }
        if let Some(telefone) = update.telefone_secundario {
            b.telefone_secundario = Some(telefone);
        }
        if let Some(url) = update.foto_url {
            b.foto_url = url;
        }
        if let Some(horas) = update.horas_cumpridas {
            b.horas_cumpridas = horas.max(0.0);
        }
        if let Some(horas) = update.horas_restantes {
            b.horas_restantes = horas.max(0.0);
        }
        if let Some(atualizado_por) = update.atualizado_por {
            b.atualizado_por = atualizado_por;
        }
        b.atualizado_em = chrono::Utc::now();

        Ok(())
    }

    fn beneficiario_delete(&self, id: Uuid) -> PscResult<()> {
        let mut beneficiarios = self.beneficiarios.write().unwrap();
        if beneficiarios.remove(&id).is_none() {
            return Err(PscError::Storage(StorageError::NotFound {
                entity: "beneficiario",
                id,
            }));
        }
        // Cascade, mirroring the ON DELETE CASCADE constraints.
        self.observacoes
            .write()
            .unwrap()
            .retain(|_, o| o.beneficiario_id != id);
        self.documentos
            .write()
            .unwrap()
            .retain(|_, d| d.beneficiario_id != id);
        Ok(())
    }

    fn beneficiario_find_duplicate(
        &self,
        numero_processo: &str,
        nome: &str,
    ) -> PscResult<Option<Beneficiario>> {
        let nome = nome.trim().to_lowercase();
        let found = self
            .beneficiarios
            .read()
            .unwrap()
            .values()
            .find(|b| {
                b.numero_processo == numero_processo
                    || (!nome.is_empty() && b.nome.to_lowercase().contains(&nome))
            })
            .cloned();
        Ok(found)
    }

    // === Observação Operations ===

    fn observacao_insert(&self, o: &Observacao) -> PscResult<()> {
        let mut observacoes = self.observacoes.write().unwrap();
        if observacoes.contains_key(&o.observacao_id) {
            return Err(PscError::Storage(StorageError::InsertFailed {
                entity: "observacao",
                reason: "already exists".to_string(),
            }));
        }
        observacoes.insert(o.observacao_id, o.clone());
        Ok(())
    }

    fn observacao_get(&self, id: Uuid) -> PscResult<Option<Observacao>> {
        Ok(self.observacoes.read().unwrap().get(&id).cloned())
    }

    fn observacao_list_by_beneficiario(
        &self,
        beneficiario_id: Uuid,
    ) -> PscResult<Vec<Observacao>> {
        let mut lista: Vec<Observacao> = self
            .observacoes
            .read()
            .unwrap()
            .values()
            .filter(|o| o.beneficiario_id == beneficiario_id)
            .cloned()
            .collect();
        lista.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(lista)
    }

    fn observacao_update_texto(&self, id: Uuid, texto: &str) -> PscResult<()> {
        let mut observacoes = self.observacoes.write().unwrap();
        let o = observacoes
            .get_mut(&id)
            .ok_or(PscError::Storage(StorageError::NotFound {
                entity: "observacao",
                id,
            }))?;
        o.texto = texto.trim().to_string();
        Ok(())
    }

    fn observacao_delete(&self, id: Uuid) -> PscResult<()> {
        if self.observacoes.write().unwrap().remove(&id).is_none() {
            return Err(PscError::Storage(StorageError::NotFound {
                entity: "observacao",
                id,
            }));
        }
        Ok(())
    }

    // === Documento Operations ===

    fn documento_insert(&self, d: &DocumentoPdf) -> PscResult<()> {
        let mut documentos = self.documentos.write().unwrap();
        if documentos.contains_key(&d.documento_id) {
            return Err(PscError::Storage(StorageError::InsertFailed {
                entity: "documento_pdf",
                reason: "already exists".to_string(),
            }));
        }
        documentos.insert(d.documento_id, d.clone());
        Ok(())
    }

    fn documento_get(&self, id: Uuid) -> PscResult<Option<DocumentoPdf>> {
        Ok(self.documentos.read().unwrap().get(&id).cloned())
    }

    fn documento_list_by_beneficiario(
        &self,
        beneficiario_id: Uuid,
    ) -> PscResult<Vec<DocumentoPdf>> {
        let mut lista: Vec<DocumentoPdf> = self
            .documentos
            .read()
            .unwrap()
            .values()
            .filter(|d| d.beneficiario_id == beneficiario_id)
            .cloned()
            .collect();
        lista.sort_by(|a, b| b.data_anexacao.cmp(&a.data_anexacao));
        Ok(lista)
    }

    fn documento_delete(&self, id: Uuid) -> PscResult<()> {
        if self.documentos.write().unwrap().remove(&id).is_none() {
            return Err(PscError::Storage(StorageError::NotFound {
                entity: "documento_pdf",
                id,
            }));
        }
        Ok(())
    }

    // === Arquivo Digital Operations ===

    fn arquivo_insert(&self, a: &ArquivoDigital) -> PscResult<()> {
        let mut arquivos = self.arquivos.write().unwrap();
        if arquivos.contains_key(&a.arquivo_id) {
            return Err(PscError::Storage(StorageError::InsertFailed {
                entity: "arquivo_digital",
                reason: "already exists".to_string(),
            }));
        }
        arquivos.insert(a.arquivo_id, a.clone());
        Ok(())
    }

    fn arquivo_get(&self, id: Uuid) -> PscResult<Option<ArquivoDigital>> {
        Ok(self.arquivos.read().unwrap().get(&id).cloned())
    }

    fn arquivo_list(&self, filter: &ArquivoFilter) -> PscResult<Vec<ArquivoDigital>> {
        let mut lista: Vec<ArquivoDigital> = self
            .arquivos
            .read()
            .unwrap()
            .values()
            .filter(|a| filter.ano.is_none_or(|ano| a.ano == ano))
            .filter(|a| {
                filter
                    .categoria
                    .as_ref()
                    .is_none_or(|c| a.categoria.as_ref() == Some(c))
            })
            .filter(|a| filter.termo_matches(a))
            .cloned()
            .collect();
        lista.sort_by(|a, b| b.criado_em.cmp(&a.criado_em));
        Ok(lista)
    }

    fn arquivo_update(&self, id: Uuid, update: ArquivoUpdate) -> PscResult<()> {
        let mut arquivos = self.arquivos.write().unwrap();
        let a = arquivos
            .get_mut(&id)
            .ok_or(PscError::Storage(StorageError::NotFound {
                entity: "arquivo_digital",
                id,
            }))?;

        if let Some(nome) = update.nome {
            a.nome = nome;
        }
        if let Some(descricao) = update.descricao {
            a.descricao = Some(descricao);
        }
        if let Some(categoria) = update.categoria {
            a.categoria = Some(categoria);
        }
        if let Some(tags) = update.tags {
            a.tags = tags;
        }
        a.atualizado_em = chrono::Utc::now();

        Ok(())
    }

    fn arquivo_delete(&self, id: Uuid) -> PscResult<()> {
        if self.arquivos.write().unwrap().remove(&id).is_none() {
            return Err(PscError::Storage(StorageError::NotFound {
                entity: "arquivo_digital",
                id,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use psc_core::TipoDocumento;

    fn make_beneficiario(nome: &str, processo: &str) -> Beneficiario {
        Beneficiario::new(
            nome,
            "https://cdn/foto.jpg",
            processo,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            StatusVida::Vivo,
            "Secretaria de Obras",
            "Sistema",
        )
    }

    // ========================================================================
    // Beneficiário Tests
    // ========================================================================

    #[test]
    fn test_beneficiario_insert_get() {
        let storage = MockStorage::new();
        let b = make_beneficiario("Ana Souza", "2024.001");

        storage.beneficiario_insert(&b).unwrap();
        let retrieved = storage.beneficiario_get(b.beneficiario_id).unwrap();

        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().beneficiario_id, b.beneficiario_id);
    }

    #[test]
    fn test_beneficiario_insert_duplicate_processo() {
        let storage = MockStorage::new();
        storage
            .beneficiario_insert(&make_beneficiario("Ana Souza", "2024.001"))
            .unwrap();

        let result = storage.beneficiario_insert(&make_beneficiario("Bruno Alves", "2024.001"));
        assert!(matches!(
            result,
            Err(PscError::Storage(StorageError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_beneficiario_list_sorted_by_nome() {
        let storage = MockStorage::new();
        storage
            .beneficiario_insert(&make_beneficiario("carla", "3"))
            .unwrap();
        storage
            .beneficiario_insert(&make_beneficiario("Ana", "1"))
            .unwrap();
        storage
            .beneficiario_insert(&make_beneficiario("Bruno", "2"))
            .unwrap();

        let lista = storage.beneficiario_list().unwrap();
        let nomes: Vec<&str> = lista.iter().map(|b| b.nome.as_str()).collect();
        assert_eq!(nomes, ["Ana", "Bruno", "carla"]);
    }

    #[test]
    fn test_beneficiario_update_horas_and_status() {
        let storage = MockStorage::new();
        let b = make_beneficiario("Ana Souza", "2024.001").with_horas(10.0, 30.0);
        storage.beneficiario_insert(&b).unwrap();

        storage
            .beneficiario_update(
                b.beneficiario_id,
                BeneficiarioUpdate {
                    horas_cumpridas: Some(25.0),
                    horas_restantes: Some(15.0),
                    status_vida: Some(StatusVida::Concludente),
                    atualizado_por: Some("gestor@socorro.se.gov.br".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = storage.beneficiario_get(b.beneficiario_id).unwrap().unwrap();
        assert_eq!(updated.horas_cumpridas, 25.0);
        assert_eq!(updated.horas_restantes, 15.0);
        assert_eq!(updated.status_vida, StatusVida::Concludente);
        assert_eq!(updated.atualizado_por, "gestor@socorro.se.gov.br");
    }

    #[test]
    fn test_beneficiario_update_missing() {
        let storage = MockStorage::new();
        let result = storage.beneficiario_update(Uuid::now_v7(), BeneficiarioUpdate::default());
        assert!(matches!(
            result,
            Err(PscError::Storage(StorageError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_beneficiario_delete_cascades() {
        let storage = MockStorage::new();
        let b = make_beneficiario("Ana Souza", "2024.001");
        storage.beneficiario_insert(&b).unwrap();
        storage
            .observacao_insert(&Observacao::new(b.beneficiario_id, "Sistema", "nota"))
            .unwrap();
        storage
            .documento_insert(&DocumentoPdf::new(
                b.beneficiario_id,
                "freq.pdf",
                "https://cdn/freq.pdf",
                TipoDocumento::Frequencia,
                "Sistema",
            ))
            .unwrap();

        storage.beneficiario_delete(b.beneficiario_id).unwrap();

        assert_eq!(storage.beneficiario_count(), 0);
        assert_eq!(storage.observacao_count(), 0);
        assert_eq!(storage.documento_count(), 0);
    }

    #[test]
    fn test_find_duplicate_by_processo_or_nome() {
        let storage = MockStorage::new();
        storage
            .beneficiario_insert(&make_beneficiario("Ana Souza", "2024.001"))
            .unwrap();

        let by_processo = storage
            .beneficiario_find_duplicate("2024.001", "Outro Nome")
            .unwrap();
        assert!(by_processo.is_some());

        let by_nome = storage
            .beneficiario_find_duplicate("9999.999", "ana souza")
            .unwrap();
        assert!(by_nome.is_some());

        let none = storage
            .beneficiario_find_duplicate("9999.999", "Bruno Alves")
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_get_hydrates_subcollections_newest_first() {
        let storage = MockStorage::new();
        let b = make_beneficiario("Ana Souza", "2024.001");
        storage.beneficiario_insert(&b).unwrap();

        let mut antiga = Observacao::new(b.beneficiario_id, "Sistema", "antiga");
        antiga.timestamp = Utc::now() - Duration::hours(2);
        let recente = Observacao::new(b.beneficiario_id, "Sistema", "recente");
        storage.observacao_insert(&antiga).unwrap();
        storage.observacao_insert(&recente).unwrap();

        let hydrated = storage.beneficiario_get(b.beneficiario_id).unwrap().unwrap();
        assert_eq!(hydrated.observacoes.len(), 2);
        assert_eq!(hydrated.observacoes[0].texto, "recente");
        assert_eq!(hydrated.observacoes[1].texto, "antiga");
    }

    // ========================================================================
    // Observação Tests
    // ========================================================================

    #[test]
    fn test_observacao_update_texto() {
        let storage = MockStorage::new();
        let o = Observacao::new(Uuid::now_v7(), "Sistema", "original");
        storage.observacao_insert(&o).unwrap();

        storage
            .observacao_update_texto(o.observacao_id, "  corrigida  ")
            .unwrap();
        let updated = storage.observacao_get(o.observacao_id).unwrap().unwrap();
        assert_eq!(updated.texto, "corrigida");
    }

    #[test]
    fn test_observacao_delete_missing() {
        let storage = MockStorage::new();
        let result = storage.observacao_delete(Uuid::now_v7());
        assert!(matches!(
            result,
            Err(PscError::Storage(StorageError::NotFound { .. }))
        ));
    }

    // ========================================================================
    // Documento Tests
    // ========================================================================

    #[test]
    fn test_documento_list_scoped_to_beneficiario() {
        let storage = MockStorage::new();
        let dono = Uuid::now_v7();
        let outro = Uuid::now_v7();
        storage
            .documento_insert(&DocumentoPdf::new(
                dono,
                "a.pdf",
                "url-a",
                TipoDocumento::Frequencia,
                "Sistema",
            ))
            .unwrap();
        storage
            .documento_insert(&DocumentoPdf::new(
                outro,
                "b.pdf",
                "url-b",
                TipoDocumento::Documentacao,
                "Sistema",
            ))
            .unwrap();

        let lista = storage.documento_list_by_beneficiario(dono).unwrap();
        assert_eq!(lista.len(), 1);
        assert_eq!(lista[0].nome, "a.pdf");
    }

    // ========================================================================
    // Arquivo Digital Tests
    // ========================================================================

    #[test]
    fn test_arquivo_list_filters_ano_categoria() {
        let storage = MockStorage::new();
        storage
            .arquivo_insert(
                &ArquivoDigital::new("a.pdf", "url-a", "application/pdf", 2024, "u")
                    .with_categoria(Some("relatorios".to_string()), None),
            )
            .unwrap();
        storage
            .arquivo_insert(
                &ArquivoDigital::new("b.pdf", "url-b", "application/pdf", 2023, "u")
                    .with_categoria(Some("relatorios".to_string()), None),
            )
            .unwrap();
        storage
            .arquivo_insert(&ArquivoDigital::new(
                "c.pdf",
                "url-c",
                "application/pdf",
                2024,
                "u",
            ))
            .unwrap();

        let todos = storage.arquivo_list(&ArquivoFilter::default()).unwrap();
        assert_eq!(todos.len(), 3);

        let de_2024 = storage
            .arquivo_list(&ArquivoFilter {
                ano: Some(2024),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(de_2024.len(), 2);

        let relatorios_2024 = storage
            .arquivo_list(&ArquivoFilter {
                ano: Some(2024),
                categoria: Some("relatorios".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(relatorios_2024.len(), 1);
        assert_eq!(relatorios_2024[0].nome, "a.pdf");

        let por_termo = storage
            .arquivo_list(&ArquivoFilter {
                termo: Some("B.PDF".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(por_termo.len(), 1);
        assert_eq!(por_termo[0].nome, "b.pdf");

        let por_descricao = storage
            .arquivo_list(&ArquivoFilter {
                termo: Some("frequência".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(por_descricao.is_empty());
    }

    #[test]
    fn test_arquivo_update_metadata() {
        let storage = MockStorage::new();
        let a = ArquivoDigital::new("a.pdf", "url-a", "application/pdf", 2024, "u");
        storage.arquivo_insert(&a).unwrap();

        storage
            .arquivo_update(
                a.arquivo_id,
                ArquivoUpdate {
                    descricao: Some("Relatório mensal".to_string()),
                    tags: Some(vec!["mensal".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = storage.arquivo_get(a.arquivo_id).unwrap().unwrap();
        assert_eq!(updated.descricao.as_deref(), Some("Relatório mensal"));
        assert_eq!(updated.tags, vec!["mensal".to_string()]);
    }
}
