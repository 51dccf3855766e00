// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COMPETITOR FINDER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Deriva uma query do URL alvo, consulta a API de places-search e mapeia
// os resultados em Competitor. Entradas malformadas são descartadas em
// silêncio; o resultado é deduplicado por place id e limitado a max_results.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::ScoutConfig;
use crate::types::{Competitor, CompetitorResult};

/// Erros da busca de concorrentes.
///
/// Diferente do caminho de IA, estes erros propagam até o boundary:
/// o caller pediu explicitamente dados de concorrentes.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No places credential configured")]
    MissingCredential,

    #[error("Search radius must be greater than zero")]
    InvalidRadius,

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("Places API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Search timed out after {0}s")]
    Timeout(u64),
}

/// Um resultado bruto da API de places, antes do mapeamento.
///
/// Campos opcionais de propósito: entradas sem nome ou sem id
/// são descartadas no mapeamento, não viram erro.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceRecord {
    /// Nome do negócio
    pub name: Option<String>,
    /// Identificador do place
    pub place_id: Option<String>,
    /// Avaliação média
    pub rating: Option<f32>,
    /// Endereço formatado
    pub formatted_address: Option<String>,
    /// Categorias do negócio
    #[serde(default)]
    pub types: Vec<String>,
}

/// Cliente de places-search.
#[async_trait]
pub trait PlacesClient: Send + Sync {
    /// Executa uma busca textual com raio em metros.
    async fn text_search(
        &self,
        query: &str,
        radius_meters: u32,
    ) -> Result<Vec<PlaceRecord>, SearchError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes unitários.
#[derive(Debug, Default)]
pub struct MockPlacesClient {
    /// Resultados fixos a devolver
    pub mock_results: Vec<PlaceRecord>,
    /// Se true, toda chamada falha com ApiError
    pub fail: bool,
}

impl MockPlacesClient {
    /// Mock que devolve sempre os mesmos resultados.
    pub fn with_results(results: Vec<PlaceRecord>) -> Self {
        Self {
            mock_results: results,
            fail: false,
        }
    }

    /// Mock que falha toda chamada.
    pub fn failing() -> Self {
        Self {
            mock_results: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl PlacesClient for MockPlacesClient {
    async fn text_search(
        &self,
        _query: &str,
        _radius_meters: u32,
    ) -> Result<Vec<PlaceRecord>, SearchError> {
        if self.fail {
            return Err(SearchError::ApiError("mock failure".into()));
        }
        Ok(self.mock_results.clone())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO GOOGLE PLACES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente para a API Google Places (Text Search).
pub struct GooglePlacesClient {
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GooglePlacesClient {
    /// Cria um cliente com timeout explícito por chamada.
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        Self {
            api_key,
            timeout_secs,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    async fn text_search(
        &self,
        query: &str,
        radius_meters: u32,
    ) -> Result<Vec<PlaceRecord>, SearchError> {
        #[derive(Deserialize)]
        struct PlacesResponse {
            status: String,
            #[serde(default)]
            results: Vec<PlaceRecord>,
            error_message: Option<String>,
        }

        let url = format!(
            "https://maps.googleapis.com/maps/api/place/textsearch/json?query={}&radius={}&key={}",
            urlencoding::encode(query),
            radius_meters,
            self.api_key
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout(self.timeout_secs)
            } else {
                SearchError::NetworkError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: PlacesResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("unparsable response: {}", e)))?;

        // ZERO_RESULTS é sucesso com lista vazia: o serviço respondeu
        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(parsed.results),
            status => Err(SearchError::ApiError(format!(
                "{}: {}",
                status,
                parsed.error_message.unwrap_or_default()
            ))),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FINDER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Finder de concorrentes próximos ao negócio do URL alvo.
pub struct CompetitorFinder {
    client: Option<Box<dyn PlacesClient>>,
    location_hint: Option<String>,
}

impl CompetitorFinder {
    /// Cria o finder a partir da configuração.
    ///
    /// Sem `GOOGLE_PLACES_API_KEY`, toda busca retorna
    /// [`SearchError::MissingCredential`].
    pub fn from_config(config: &ScoutConfig) -> Self {
        let client: Option<Box<dyn PlacesClient>> = if config.has_places() {
            let key = config.places_api_key.clone().unwrap_or_default();
            Some(Box::new(GooglePlacesClient::new(
                key,
                config.search_timeout_secs,
            )))
        } else {
            None
        };

        Self {
            client,
            location_hint: config.location_hint.clone(),
        }
    }

    /// Cria o finder com um cliente injetado (testes).
    pub fn with_client(client: Box<dyn PlacesClient>, location_hint: Option<String>) -> Self {
        Self {
            client: Some(client),
            location_hint,
        }
    }

    /// Busca concorrentes próximos ao negócio do URL alvo.
    ///
    /// Uma chamada de places-search; resultados malformados são
    /// descartados, duplicatas por place id removidas e o total
    /// limitado a `max_results`, na ordem devolvida pelo serviço.
    pub async fn find_competitors(
        &self,
        target_url: &str,
        radius_meters: u32,
        max_results: usize,
    ) -> Result<CompetitorResult, SearchError> {
        if radius_meters == 0 {
            return Err(SearchError::InvalidRadius);
        }

        let client = self.client.as_ref().ok_or(SearchError::MissingCredential)?;

        let query = derive_search_query(target_url, self.location_hint.as_deref())?;
        log::info!(
            "🔍 Busca de concorrentes: query=\"{}\" | raio={}m | max={}",
            query,
            radius_meters,
            max_results
        );

        let raw = client.text_search(&query, radius_meters).await?;
        let competitors = map_competitors(raw, max_results);

        log::info!("✅ {} concorrentes mapeados", competitors.len());

        Ok(CompetitorResult {
            target_url: target_url.to_string(),
            search_radius_meters: radius_meters,
            competitors,
        })
    }
}

/// Deriva a query de busca a partir do URL alvo.
///
/// Heurística local, sem geocoding: o label registrável do host
/// (sem "www.", hifens viram espaços) é o nome do negócio; com
/// `location_hint` a query vira "<nome> near <local>".
pub fn derive_search_query(
    target_url: &str,
    location_hint: Option<&str>,
) -> Result<String, SearchError> {
    let parsed = url::Url::parse(target_url)
        .map_err(|e| SearchError::InvalidUrl(format!("{}: {}", target_url, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| SearchError::InvalidUrl(format!("no host in {}", target_url)))?;

    let label = host
        .trim_start_matches("www.")
        .split('.')
        .next()
        .unwrap_or_default()
        .replace('-', " ")
        .trim()
        .to_string();

    if label.is_empty() {
        return Err(SearchError::InvalidUrl(format!("empty host label in {}", target_url)));
    }

    Ok(match location_hint {
        Some(location) if !location.trim().is_empty() => {
            format!("{} near {}", label, location.trim())
        }
        _ => label,
    })
}

/// Mapeia resultados brutos em [`Competitor`].
///
/// Descarta entradas sem nome ou sem id, deduplica por id e limita
/// a `max_results`, preservando a ordem do serviço.
pub fn map_competitors(raw: Vec<PlaceRecord>, max_results: usize) -> Vec<Competitor> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|place| {
            let name = place.name.filter(|n| !n.trim().is_empty())?;
            let external_id = place.place_id.filter(|id| !id.trim().is_empty())?;
            let mut seen_categories = HashSet::new();
            let categories: Vec<String> = place
                .types
                .into_iter()
                .filter(|t| seen_categories.insert(t.clone()))
                .collect();
            Some(Competitor {
                name,
                rating: place.rating,
                address: place.formatted_address.unwrap_or_default(),
                external_id,
                categories,
            })
        })
        .filter(|c| seen.insert(c.external_id.clone()))
        .take(max_results)
        .collect()
}
