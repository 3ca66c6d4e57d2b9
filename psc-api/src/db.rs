//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling via deadpool-postgres and the query layer
//! for the four tables: beneficiarios, observacoes, documentos_pdf and
//! arquivos_digitais. All statements are parametrized; status enums travel
//! as their database strings via `as_db_str`/`from_db_str`.

use crate::error::{ApiError, ApiResult};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use psc_core::{
    ArquivoDigital, Beneficiario, DocumentoPdf, EntityId, Observacao, StatusVida, TipoDocumento,
};
use psc_storage::{ArquivoFilter, ArquivoUpdate};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "psc".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("PSC_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("PSC_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("PSC_DB_NAME").unwrap_or_else(|_| "psc".to_string()),
            user: std::env::var("PSC_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("PSC_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("PSC_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("PSC_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig {
            max_size: self.max_size,
            timeouts: Timeouts {
                wait: Some(self.timeout),
                ..Timeouts::default()
            },
            ..PoolConfig::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Falha ao criar pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn row_to_beneficiario(row: &Row) -> ApiResult<Beneficiario> {
    let status_raw: String = row.get("status_vida");
    let status_vida = StatusVida::from_db_str(&status_raw)
        .map_err(|e| ApiError::database_error(format!("status_vida inválido no banco: {}", e)))?;

    Ok(Beneficiario {
        beneficiario_id: row.get("id"),
        nome: row.get("nome"),
        foto_url: row.get("foto_url"),
        numero_processo: row.get("numero_processo"),
        data_recebimento: row.get("data_recebimento"),
        status_vida,
        local_lotacao: row.get("local_lotacao"),
        telefone_principal: row.get("telefone_principal"),
        telefone_secundario: row.get("telefone_secundario"),
        horas_cumpridas: row.get("horas_cumpridas"),
        horas_restantes: row.get("horas_restantes"),
        observacoes: Vec::new(),
        documentos_pdf: Vec::new(),
        criado_em: row.get("criado_em"),
        atualizado_em: row.get("atualizado_em"),
        criado_por: row.get("criado_por"),
        atualizado_por: row.get("atualizado_por"),
    })
}

fn row_to_observacao(row: &Row) -> Observacao {
    Observacao {
        observacao_id: row.get("id"),
        beneficiario_id: row.get("beneficiario_id"),
        autor: row.get("autor"),
        texto: row.get("texto"),
        timestamp: row.get("timestamp"),
        anexo_url: row.get("anexo_url"),
    }
}

fn row_to_documento(row: &Row) -> ApiResult<DocumentoPdf> {
    let tipo_raw: String = row.get("tipo");
    let tipo = TipoDocumento::from_db_str(&tipo_raw)
        .map_err(|e| ApiError::database_error(format!("tipo de documento inválido: {}", e)))?;

    Ok(DocumentoPdf {
        documento_id: row.get("id"),
        beneficiario_id: row.get("beneficiario_id"),
        nome: row.get("nome"),
        url: row.get("url"),
        tipo,
        data_anexacao: row.get("data_anexacao"),
        usuario: row.get("usuario"),
    })
}

fn row_to_arquivo(row: &Row) -> ArquivoDigital {
    ArquivoDigital {
        arquivo_id: row.get("id"),
        nome: row.get("nome"),
        descricao: row.get("descricao"),
        arquivo_url: row.get("arquivo_url"),
        tipo_arquivo: row.get("tipo_arquivo"),
        tamanho: row.get("tamanho"),
        ano: row.get("ano"),
        mes: row.get("mes"),
        categoria: row.get("categoria"),
        tags: row.get("tags"),
        usuario_upload: row.get("usuario_upload"),
        criado_em: row.get("criado_em"),
        atualizado_em: row.get("atualizado_em"),
    }
}

// ============================================================================
// DATABASE CLIENT
// ============================================================================

const BENEFICIARIO_COLUMNS: &str = "id, nome, foto_url, numero_processo, data_recebimento, \
     status_vida, local_lotacao, telefone_principal, telefone_secundario, \
     horas_cumpridas, horas_restantes, criado_em, atualizado_em, criado_por, atualizado_por";

const ARQUIVO_COLUMNS: &str = "id, nome, descricao, arquivo_url, tipo_arquivo, tamanho, \
     ano, mes, categoria, tags, usuario_upload, criado_em, atualizado_em";

/// Database client wrapping a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with an existing pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Liveness probe query.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // BENEFICIÁRIO OPERATIONS
    // ========================================================================

    /// List all beneficiaries ordered by name, sub-collections hydrated.
    pub async fn beneficiario_list(&self) -> ApiResult<Vec<Beneficiario>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                &format!("SELECT {} FROM beneficiarios ORDER BY nome ASC", BENEFICIARIO_COLUMNS),
                &[],
            )
            .await?;

        let mut lista = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut b = row_to_beneficiario(row)?;
            b.observacoes = self.observacao_list(b.beneficiario_id).await?;
            b.documentos_pdf = self.documento_list(b.beneficiario_id).await?;
            lista.push(b);
        }
        Ok(lista)
    }

    /// Get a beneficiary by ID, sub-collections hydrated.
    pub async fn beneficiario_get(&self, id: EntityId) -> ApiResult<Option<Beneficiario>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                &format!("SELECT {} FROM beneficiarios WHERE id = $1", BENEFICIARIO_COLUMNS),
                &[&id],
            )
            .await?;

        match row {
            Some(row) => {
                let mut b = row_to_beneficiario(&row)?;
                b.observacoes = self.observacao_list(b.beneficiario_id).await?;
                b.documentos_pdf = self.documento_list(b.beneficiario_id).await?;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    /// Insert a new beneficiary.
    pub async fn beneficiario_insert(&self, b: &Beneficiario) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO beneficiarios \
             (id, nome, foto_url, numero_processo, data_recebimento, status_vida, \
              local_lotacao, telefone_principal, telefone_secundario, \
              horas_cumpridas, horas_restantes, criado_em, atualizado_em, criado_por, atualizado_por) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            &[
                &b.beneficiario_id,
                &b.nome,
                &b.foto_url,
                &b.numero_processo,
                &b.data_recebimento,
                &b.status_vida.as_db_str(),
                &b.local_lotacao,
                &b.telefone_principal,
                &b.telefone_secundario,
                &b.horas_cumpridas,
                &b.horas_restantes,
                &b.criado_em,
                &b.atualizado_em,
                &b.criado_por,
                &b.atualizado_por,
            ],
        )
        .await?;

        Ok(())
    }

    /// Update the hours pair of a beneficiary.
    pub async fn beneficiario_update_horas(
        &self,
        id: EntityId,
        horas_cumpridas: f64,
        horas_restantes: f64,
        atualizado_por: &str,
    ) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let updated = conn
            .execute(
                "UPDATE beneficiarios \
                 SET horas_cumpridas = $2, horas_restantes = $3, \
                     atualizado_em = now(), atualizado_por = $4 \
                 WHERE id = $1",
                &[&id, &horas_cumpridas, &horas_restantes, &atualizado_por],
            )
            .await?;

        if updated == 0 {
            return Err(ApiError::entity_not_found("beneficiario", id));
        }
        Ok(())
    }

    /// Update the life status of a beneficiary.
    pub async fn beneficiario_update_status(
        &self,
        id: EntityId,
        status: StatusVida,
        atualizado_por: &str,
    ) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let updated = conn
            .execute(
                "UPDATE beneficiarios \
                 SET status_vida = $2, atualizado_em = now(), atualizado_por = $3 \
                 WHERE id = $1",
                &[&id, &status.as_db_str(), &atualizado_por],
            )
            .await?;

        if updated == 0 {
            return Err(ApiError::entity_not_found("beneficiario", id));
        }
        Ok(())
    }

    /// Delete a beneficiary and its dependents in one transaction. The
    /// explicit deletes keep the operation correct even without ON DELETE
    /// CASCADE constraints in place.
    pub async fn beneficiario_delete(&self, id: EntityId) -> ApiResult<()> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        tx.execute("DELETE FROM observacoes WHERE beneficiario_id = $1", &[&id])
            .await?;
        tx.execute(
            "DELETE FROM documentos_pdf WHERE beneficiario_id = $1",
            &[&id],
        )
        .await?;
        let deleted = tx
            .execute("DELETE FROM beneficiarios WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            // Rolls back on drop.
            return Err(ApiError::entity_not_found("beneficiario", id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Probe for a record with the same process number or a name containing
    /// the given one (case-insensitive).
    pub async fn beneficiario_find_duplicate(
        &self,
        numero_processo: &str,
        nome: &str,
    ) -> ApiResult<Option<Beneficiario>> {
        let conn = self.get_conn().await?;

        let nome_pattern = format!("%{}%", nome);
        let row = conn
            .query_opt(
                &format!(
                    "SELECT {} FROM beneficiarios \
                     WHERE numero_processo = $1 OR nome ILIKE $2 \
                     LIMIT 1",
                    BENEFICIARIO_COLUMNS
                ),
                &[&numero_processo, &nome_pattern],
            )
            .await?;

        row.as_ref().map(row_to_beneficiario).transpose()
    }

    // ========================================================================
    // OBSERVAÇÃO OPERATIONS
    // ========================================================================

    /// List observations of a beneficiary, newest-first.
    pub async fn observacao_list(&self, beneficiario_id: EntityId) -> ApiResult<Vec<Observacao>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT id, beneficiario_id, autor, texto, \"timestamp\", anexo_url \
                 FROM observacoes WHERE beneficiario_id = $1 \
                 ORDER BY \"timestamp\" DESC",
                &[&beneficiario_id],
            )
            .await?;

        Ok(rows.iter().map(row_to_observacao).collect())
    }

    /// Insert a new observation.
    pub async fn observacao_insert(&self, o: &Observacao) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO observacoes (id, beneficiario_id, autor, texto, \"timestamp\", anexo_url) \
             VALUES ($1, $2, $3, $4, $5, $6)",
            &[
                &o.observacao_id,
                &o.beneficiario_id,
                &o.autor,
                &o.texto,
                &o.timestamp,
                &o.anexo_url,
            ],
        )
        .await?;

        Ok(())
    }

    /// Replace the text of an observation.
    pub async fn observacao_update_texto(&self, id: EntityId, texto: &str) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let updated = conn
            .execute("UPDATE observacoes SET texto = $2 WHERE id = $1", &[&id, &texto])
            .await?;

        if updated == 0 {
            return Err(ApiError::entity_not_found("observacao", id));
        }
        Ok(())
    }

    /// Delete an observation.
    pub async fn observacao_delete(&self, id: EntityId) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let deleted = conn
            .execute("DELETE FROM observacoes WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(ApiError::entity_not_found("observacao", id));
        }
        Ok(())
    }

    // ========================================================================
    // DOCUMENTO OPERATIONS
    // ========================================================================

    /// List PDF documents of a beneficiary, newest-first.
    pub async fn documento_list(&self, beneficiario_id: EntityId) -> ApiResult<Vec<DocumentoPdf>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT id, beneficiario_id, nome, url, tipo, data_anexacao, usuario \
                 FROM documentos_pdf WHERE beneficiario_id = $1 \
                 ORDER BY data_anexacao DESC",
                &[&beneficiario_id],
            )
            .await?;

        rows.iter().map(row_to_documento).collect()
    }

    /// Get a document by ID.
    pub async fn documento_get(&self, id: EntityId) -> ApiResult<Option<DocumentoPdf>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT id, beneficiario_id, nome, url, tipo, data_anexacao, usuario \
                 FROM documentos_pdf WHERE id = $1",
                &[&id],
            )
            .await?;

        row.as_ref().map(row_to_documento).transpose()
    }

    /// Insert a new document reference.
    pub async fn documento_insert(&self, d: &DocumentoPdf) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO documentos_pdf (id, beneficiario_id, nome, url, tipo, data_anexacao, usuario) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                &d.documento_id,
                &d.beneficiario_id,
                &d.nome,
                &d.url,
                &d.tipo.as_db_str(),
                &d.data_anexacao,
                &d.usuario,
            ],
        )
        .await?;

        Ok(())
    }

    /// Delete a document reference.
    pub async fn documento_delete(&self, id: EntityId) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let deleted = conn
            .execute("DELETE FROM documentos_pdf WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(ApiError::entity_not_found("documento_pdf", id));
        }
        Ok(())
    }

    // ========================================================================
    // ARQUIVO DIGITAL OPERATIONS
    // ========================================================================

    /// List digital-archive entries matching the filter, newest-first.
    pub async fn arquivo_list(&self, filter: &ArquivoFilter) -> ApiResult<Vec<ArquivoDigital>> {
        let conn = self.get_conn().await?;

        let termo = filter
            .termo
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", t));

        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM arquivos_digitais \
                     WHERE ($1::int IS NULL OR ano = $1) \
                       AND ($2::text IS NULL OR categoria = $2) \
                       AND ($3::text IS NULL OR nome ILIKE $3 \
                            OR descricao ILIKE $3 \
                            OR EXISTS (SELECT 1 FROM unnest(tags) tag WHERE tag ILIKE $3)) \
                     ORDER BY criado_em DESC",
                    ARQUIVO_COLUMNS
                ),
                &[&filter.ano, &filter.categoria, &termo],
            )
            .await?;

        Ok(rows.iter().map(row_to_arquivo).collect())
    }

    /// Get an archive entry by ID.
    pub async fn arquivo_get(&self, id: EntityId) -> ApiResult<Option<ArquivoDigital>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                &format!("SELECT {} FROM arquivos_digitais WHERE id = $1", ARQUIVO_COLUMNS),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(row_to_arquivo))
    }

    /// Insert a new archive entry.
    pub async fn arquivo_insert(&self, a: &ArquivoDigital) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO arquivos_digitais \
             (id, nome, descricao, arquivo_url, tipo_arquivo, tamanho, ano, mes, \
              categoria, tags, usuario_upload, criado_em, atualizado_em) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            &[
                &a.arquivo_id,
                &a.nome,
                &a.descricao,
                &a.arquivo_url,
                &a.tipo_arquivo,
                &a.tamanho,
                &a.ano,
                &a.mes,
                &a.categoria,
                &a.tags,
                &a.usuario_upload,
                &a.criado_em,
                &a.atualizado_em,
            ],
        )
        .await?;

        Ok(())
    }

    /// Update an archive entry's metadata.
    pub async fn arquivo_update(&self, id: EntityId, update: &ArquivoUpdate) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let updated = conn
            .execute(
                "UPDATE arquivos_digitais \
                 SET nome = COALESCE($2, nome), \
                     descricao = COALESCE($3, descricao), \
                     categoria = COALESCE($4, categoria), \
                     tags = COALESCE($5, tags), \
                     atualizado_em = now() \
                 WHERE id = $1",
                &[&id, &update.nome, &update.descricao, &update.categoria, &update.tags],
            )
            .await?;

        if updated == 0 {
            return Err(ApiError::entity_not_found("arquivo_digital", id));
        }
        Ok(())
    }

    /// Delete an archive entry.
    pub async fn arquivo_delete(&self, id: EntityId) -> ApiResult<()> {
        let conn = self.get_conn().await?;

        let deleted = conn
            .execute("DELETE FROM arquivos_digitais WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(ApiError::entity_not_found("arquivo_digital", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "psc");
        assert_eq!(config.max_size, 16);
    }
}
