// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESPONSE ASSEMBLER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Mapeamento puro das saídas dos pipelines para os envelopes JSON do
// boundary HTTP. Sem modos de falha próprios: erros upstream são
// apenas re-embalados, nunca alterados.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::Serialize;

use crate::types::{CompetitorResult, ContentAnalysis, KeywordRecord, PageContent};

/// Quantos KeywordRecords de amostra o relatório de análise carrega.
const SAMPLE_KEYWORDS: usize = 5;

/// Envelope de sucesso do boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Sempre true neste envelope
    pub success: bool,
    /// Payload do pipeline
    pub data: T,
    /// Mensagem legível para o dashboard
    pub message: String,
}

/// Envelope de falha do boundary.
///
/// Nenhum erro passa do boundary como fault não tratado: toda falha
/// vira este objeto estruturado.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    /// Mensagem legível
    pub error: String,
    /// Texto do erro subjacente
    pub details: String,
}

/// Relatório da análise de conteúdo (shape da rota de teste de IA).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// URL analisada
    pub url: String,
    /// Título scraped
    pub title: String,
    /// Description scraped
    pub description: String,
    /// Indústria detectada
    pub industry: String,
    /// Total de keywords descobertas
    pub keyword_count: usize,
    /// Até 5 keywords de amostra
    pub sample_keywords: Vec<KeywordRecord>,
}

/// Embala um resultado de concorrentes no envelope de sucesso.
pub fn competitor_response(result: CompetitorResult) -> ApiResponse<CompetitorResult> {
    let message = format!(
        "Found {} competitors within {}m",
        result.competitors.len(),
        result.search_radius_meters
    );
    ApiResponse {
        success: true,
        data: result,
        message,
    }
}

/// Monta o relatório de análise a partir da página e da análise.
pub fn analysis_report(page: &PageContent, analysis: &ContentAnalysis) -> AnalysisReport {
    AnalysisReport {
        url: page.url.clone(),
        title: page.title.clone(),
        description: page.description.clone(),
        industry: analysis.industry.clone(),
        keyword_count: analysis.keywords.len(),
        sample_keywords: analysis.keywords.iter().take(SAMPLE_KEYWORDS).cloned().collect(),
    }
}

/// Embala qualquer erro upstream no envelope de falha.
///
/// A mensagem é o texto legível; `details` carrega o erro verbatim.
pub fn failure(message: impl Into<String>, error: &dyn std::error::Error) -> ApiFailure {
    ApiFailure {
        error: message.into(),
        details: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SearchError;
    use crate::types::{Competitor, KeywordCategory};

    fn sample_result() -> CompetitorResult {
        CompetitorResult {
            target_url: "https://clinic.example".into(),
            search_radius_meters: 3000,
            competitors: vec![Competitor {
                name: "Bright Smiles".into(),
                rating: Some(4.7),
                address: "123 Main St".into(),
                external_id: "place-abc".into(),
                categories: vec!["dentist".into()],
            }],
        }
    }

    #[test]
    fn test_competitor_response_preserves_identity() {
        let response = competitor_response(sample_result());

        assert!(response.success);
        assert_eq!(response.data.competitors[0].name, "Bright Smiles");
        assert_eq!(response.data.competitors[0].external_id, "place-abc");
        assert!(response.message.contains("1 competitors"));
    }

    #[test]
    fn test_competitor_response_wire_shape() {
        let json = serde_json::to_value(competitor_response(sample_result())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["targetUrl"], "https://clinic.example");
        assert_eq!(json["data"]["searchRadiusMeters"], 3000);
        assert_eq!(json["data"]["competitors"][0]["externalId"], "place-abc");
    }

    #[test]
    fn test_analysis_report_samples_keywords() {
        let page = PageContent {
            url: "https://clinic.example".into(),
            title: "Clinic".into(),
            description: "desc".into(),
            ..Default::default()
        };
        let keywords: Vec<KeywordRecord> = (0..9)
            .map(|i| KeywordRecord::new(format!("kw{}", i), 0.5, KeywordCategory::Secondary))
            .collect();
        let analysis = ContentAnalysis::from_keywords("dentistry", keywords);

        let report = analysis_report(&page, &analysis);
        assert_eq!(report.keyword_count, 9);
        assert_eq!(report.sample_keywords.len(), 5);
        assert_eq!(report.sample_keywords[0].keyword, "kw0");
        assert_eq!(report.industry, "dentistry");
    }

    #[test]
    fn test_failure_carries_error_text() {
        let err = SearchError::MissingCredential;
        let payload = failure("Competitor search failed", &err);
        assert_eq!(payload.error, "Competitor search failed");
        assert_eq!(payload.details, "No places credential configured");
    }
}
