//! Search and filtering over the beneficiary list

use crate::{Beneficiario, StatusVida};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filter criteria for the beneficiary list. All set fields are ANDed
/// together and ANDed with the free-text query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FiltroBeneficiario {
    pub status: Option<StatusVida>,
    /// Keep records still owing at least this many hours.
    pub horas_restantes_min: Option<f64>,
    /// Inclusive lower bound on the intake date.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub data_de: Option<NaiveDate>,
    /// Inclusive upper bound on the intake date.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub data_ate: Option<NaiveDate>,
}

impl FiltroBeneficiario {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.horas_restantes_min.is_none()
            && self.data_de.is_none()
            && self.data_ate.is_none()
    }

    fn matches(&self, b: &Beneficiario) -> bool {
        if let Some(status) = self.status {
            if b.status_vida != status {
                return false;
            }
        }
        if let Some(min) = self.horas_restantes_min {
            if b.horas_restantes < min {
                return false;
            }
        }
        if let Some(de) = self.data_de {
            if b.data_recebimento < de {
                return false;
            }
        }
        if let Some(ate) = self.data_ate {
            if b.data_recebimento > ate {
                return false;
            }
        }
        true
    }
}

fn matches_query(b: &Beneficiario, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    b.nome.to_lowercase().contains(query)
        || b.numero_processo.to_lowercase().contains(query)
        || b.local_lotacao.to_lowercase().contains(query)
}

/// Search and filter a beneficiary list.
///
/// A record matches when any of name, process number or assignment location
/// case-insensitively contains `query` (empty query matches everything),
/// and every set field of `filtro` holds. Results are ordered
/// alphabetically by name; with a non-empty query, names that start with
/// the query rank before names that merely contain it, each group kept
/// alphabetical.
pub fn buscar_beneficiarios(
    lista: &[Beneficiario],
    query: &str,
    filtro: &FiltroBeneficiario,
) -> Vec<Beneficiario> {
    let query = query.trim().to_lowercase();

    let mut resultado: Vec<Beneficiario> = lista
        .iter()
        .filter(|b| matches_query(b, &query) && filtro.matches(b))
        .cloned()
        .collect();

    resultado.sort_by(|a, b| {
        if !query.is_empty() {
            let a_prefix = a.nome.to_lowercase().starts_with(&query);
            let b_prefix = b.nome.to_lowercase().starts_with(&query);
            if a_prefix != b_prefix {
                return b_prefix.cmp(&a_prefix);
            }
        }
        a.nome.to_lowercase().cmp(&b.nome.to_lowercase())
    });

    resultado
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn beneficiario(nome: &str, processo: &str, local: &str) -> Beneficiario {
        Beneficiario::new(
            nome,
            "url",
            processo,
            data(2024, 6, 1),
            StatusVida::Vivo,
            local,
            "Sistema",
        )
    }

    fn lista() -> Vec<Beneficiario> {
        vec![
            beneficiario("Mariana Lima", "2024.010", "Hospital"),
            beneficiario("Ana Souza", "2024.001", "Secretaria de Obras"),
            beneficiario("Bruno Anastácio", "2024.002", "Biblioteca"),
            beneficiario("Carla Mendes", "ANA-2024.003", "Escola"),
        ]
    }

    #[test]
    fn test_empty_query_returns_all_sorted() {
        let result = buscar_beneficiarios(&lista(), "", &FiltroBeneficiario::default());
        let nomes: Vec<&str> = result.iter().map(|b| b.nome.as_str()).collect();
        assert_eq!(
            nomes,
            ["Ana Souza", "Bruno Anastácio", "Carla Mendes", "Mariana Lima"]
        );
    }

    #[test]
    fn test_prefix_matches_rank_first() {
        let result = buscar_beneficiarios(&lista(), "ana", &FiltroBeneficiario::default());
        let nomes: Vec<&str> = result.iter().map(|b| b.nome.as_str()).collect();
        // "Ana Souza" starts with the query; the others contain it in the
        // name, the process number or nowhere visible but in another field.
        assert_eq!(nomes[0], "Ana Souza");
        assert!(nomes.contains(&"Bruno Anastácio"));
        assert!(nomes.contains(&"Carla Mendes"));
        assert_eq!(nomes.len(), 4); // "Mariana Lima" contains "ana" too
    }

    #[test]
    fn test_query_matches_processo_and_local() {
        let result = buscar_beneficiarios(&lista(), "biblioteca", &FiltroBeneficiario::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nome, "Bruno Anastácio");

        let result = buscar_beneficiarios(&lista(), "2024.010", &FiltroBeneficiario::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nome, "Mariana Lima");
    }

    #[test]
    fn test_query_no_match() {
        let result = buscar_beneficiarios(&lista(), "zzz", &FiltroBeneficiario::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let mut l = lista();
        l[0].status_vida = StatusVida::Preso;
        let filtro = FiltroBeneficiario {
            status: Some(StatusVida::Preso),
            ..Default::default()
        };
        let result = buscar_beneficiarios(&l, "", &filtro);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nome, "Mariana Lima");
    }

    #[test]
    fn test_horas_restantes_threshold() {
        let mut l = lista();
        l[0].horas_restantes = 50.0;
        l[1].horas_restantes = 10.0;
        let filtro = FiltroBeneficiario {
            horas_restantes_min: Some(20.0),
            ..Default::default()
        };
        let result = buscar_beneficiarios(&l, "", &filtro);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nome, "Mariana Lima");
    }

    #[test]
    fn test_date_range_inclusive() {
        let mut l = lista();
        l[0].data_recebimento = data(2024, 1, 15);
        l[1].data_recebimento = data(2024, 2, 1);
        l[2].data_recebimento = data(2024, 3, 20);
        l[3].data_recebimento = data(2024, 5, 5);
        let filtro = FiltroBeneficiario {
            data_de: Some(data(2024, 2, 1)),
            data_ate: Some(data(2024, 3, 20)),
            ..Default::default()
        };
        let result = buscar_beneficiarios(&l, "", &filtro);
        let nomes: Vec<&str> = result.iter().map(|b| b.nome.as_str()).collect();
        assert_eq!(nomes, ["Ana Souza", "Bruno Anastácio"]);
    }

    #[test]
    fn test_status_and_horas_combined() {
        let mut l = lista();
        l[0].status_vida = StatusVida::Preso; // Mariana Lima
        l[0].horas_restantes = 50.0;
        l[1].status_vida = StatusVida::Preso; // Ana Souza, below the threshold
        l[1].horas_restantes = 5.0;
        l[2].horas_restantes = 80.0; // Bruno Anastácio, wrong status
        let filtro = FiltroBeneficiario {
            status: Some(StatusVida::Preso),
            horas_restantes_min: Some(10.0),
            ..Default::default()
        };
        let result = buscar_beneficiarios(&l, "", &filtro);
        let nomes: Vec<&str> = result.iter().map(|b| b.nome.as_str()).collect();
        assert_eq!(nomes, ["Mariana Lima"]);
    }

    #[test]
    fn test_filtros_and_query_combined() {
        let mut l = lista();
        l[1].horas_restantes = 100.0; // Ana Souza
        l[3].horas_restantes = 100.0; // Carla Mendes
        let filtro = FiltroBeneficiario {
            horas_restantes_min: Some(50.0),
            ..Default::default()
        };
        let result = buscar_beneficiarios(&l, "ana", &filtro);
        let nomes: Vec<&str> = result.iter().map(|b| b.nome.as_str()).collect();
        assert_eq!(nomes, ["Ana Souza", "Carla Mendes"]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let result = buscar_beneficiarios(&lista(), "  ana  ", &FiltroBeneficiario::default());
        assert_eq!(result[0].nome, "Ana Souza");
    }

    #[test]
    fn test_filtro_is_empty() {
        assert!(FiltroBeneficiario::default().is_empty());
        let filtro = FiltroBeneficiario {
            status: Some(StatusVida::Vivo),
            ..Default::default()
        };
        assert!(!filtro.is_empty());
    }
}
