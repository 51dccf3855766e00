// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PIPELINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Orquestração linear dos componentes, um request por invocação:
// - Conteúdo: fetch → analyze (com fallback interno no analyzer)
// - Concorrentes: CompetitorFinder, independente do pipeline de conteúdo
// - Probe: query fixa de diagnóstico contra a API de places
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::Serialize;

use crate::analyzer::AiAnalyzer;
use crate::config::ScoutConfig;
use crate::fetcher::{FetchError, PageFetcher};
use crate::finder::{map_competitors, PlacesClient, SearchError};
use crate::types::{Competitor, ContentAnalysis, PageContent};

/// Query fixa usada pelo probe de diagnóstico da API de places.
const PROBE_QUERY: &str = "coffee shop in New York";

/// Raio fixo do probe, em metros.
const PROBE_RADIUS_METERS: u32 = 5000;

/// Máximo de resultados mapeados pelo probe.
const PROBE_MAX_RESULTS: usize = 5;

/// Saída do pipeline de conteúdo.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    /// Conteúdo extraído da página
    pub page: PageContent,
    /// Análise de keywords (IA ou fallback)
    pub analysis: ContentAnalysis,
}

/// Pipeline de análise de conteúdo: fetch → analyze.
///
/// Sem estado entre requests; cada `run` é uma invocação linear com
/// no máximo um branch de fallback (IA → extractor), dentro do analyzer.
pub struct ContentPipeline {
    fetcher: PageFetcher,
    analyzer: AiAnalyzer,
}

impl ContentPipeline {
    /// Cria o pipeline a partir da configuração.
    pub fn from_config(config: &ScoutConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(config),
            analyzer: AiAnalyzer::from_config(config),
        }
    }

    /// Cria o pipeline com componentes injetados (testes).
    pub fn new(fetcher: PageFetcher, analyzer: AiAnalyzer) -> Self {
        Self { fetcher, analyzer }
    }

    /// Executa o pipeline completo para uma URL.
    ///
    /// Falha de fetch propaga como [`FetchError`]; falhas do caminho
    /// de IA nunca propagam (o analyzer cai no extractor).
    pub async fn run(&self, url: &str) -> Result<AnalysisOutcome, FetchError> {
        let page = self.fetcher.fetch(url).await?;
        Ok(self.analyze_page(page).await)
    }

    /// Analisa uma página já extraída (sem rede além do modelo).
    pub async fn analyze_page(&self, page: PageContent) -> AnalysisOutcome {
        let analysis = self.analyzer.analyze(&page).await;
        log::info!(
            "📊 Pipeline de conteúdo: {} | indústria={} | {} keywords",
            page.url,
            analysis.industry,
            analysis.keywords.len()
        );
        AnalysisOutcome { page, analysis }
    }
}

/// Probe de diagnóstico da API de places.
///
/// Uma query fixa; retorna até 5 resultados mapeados ou o erro
/// estruturado do serviço.
pub async fn probe_places(client: &dyn PlacesClient) -> Result<Vec<Competitor>, SearchError> {
    log::info!("🩺 Probe de places: \"{}\"", PROBE_QUERY);
    let raw = client.text_search(PROBE_QUERY, PROBE_RADIUS_METERS).await?;
    Ok(map_competitors(raw, PROBE_MAX_RESULTS))
}
