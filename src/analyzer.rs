// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AI CONTENT ANALYZER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Envia o conteúdo da página a um modelo generativo com prompt estruturado
// e parseia a resposta de texto livre em ContentAnalysis tipado.
// Uma tentativa, sem retry; qualquer falha cai no extractor determinístico.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ScoutConfig;
use crate::extractor::KeywordExtractor;
use crate::types::{ContentAnalysis, KeywordCategory, KeywordRecord, PageContent};
use crate::utils::text::truncate_chars;

/// Máximo de caracteres do texto da página embutidos no prompt.
const MAX_PROMPT_TEXT_CHARS: usize = 6000;

/// Erros do caminho de IA.
///
/// Nunca chegam ao boundary: o analyzer absorve todos via fallback.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("No model credential configured")]
    MissingCredential,

    #[error("Model API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("Model response unparsable: {0}")]
    ParseError(String),
}

/// Cliente de modelo generativo.
///
/// Uma única operação: prompt de texto entra, completion de texto sai.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Envia um prompt e retorna o texto da resposta do modelo.
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes unitários.
#[derive(Debug, Default)]
pub struct MockGenerativeClient {
    /// Resposta fixa a devolver (None → erro de API)
    pub mock_response: Option<String>,
}

impl MockGenerativeClient {
    /// Mock que devolve sempre a mesma resposta.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            mock_response: Some(response.into()),
        }
    }

    /// Mock que falha toda chamada.
    pub fn failing() -> Self {
        Self {
            mock_response: None,
        }
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
        self.mock_response
            .clone()
            .ok_or_else(|| AnalysisError::ApiError("mock failure".into()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO GEMINI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente para a API Google Generative Language (Gemini).
pub struct GeminiClient {
    api_key: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Cria um cliente com timeout explícito por chamada.
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Self {
        Self {
            api_key,
            model,
            timeout_secs,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        #[derive(Deserialize)]
        struct GeminiResponse {
            candidates: Option<Vec<GeminiCandidate>>,
        }

        #[derive(Deserialize)]
        struct GeminiCandidate {
            content: Option<GeminiContent>,
        }

        #[derive(Deserialize)]
        struct GeminiContent {
            parts: Option<Vec<GeminiPart>>,
        }

        #[derive(Deserialize)]
        struct GeminiPart {
            text: Option<String>,
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout(self.timeout_secs)
                } else {
                    AnalysisError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                status,
                truncate_chars(&error_text, 300)
            )));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(e.to_string()))?;

        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| AnalysisError::ParseError("empty model response".into()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ANALYZER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shape esperado da resposta JSON do modelo.
#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    industry: String,
    #[serde(default)]
    keywords: Vec<ModelKeyword>,
}

/// Uma keyword como o modelo a descreve.
#[derive(Debug, Deserialize)]
struct ModelKeyword {
    keyword: String,
    #[serde(default)]
    relevance: f32,
    #[serde(default)]
    category: String,
    #[serde(default, alias = "estimatedSearchVolume", alias = "estimated_search_volume")]
    estimated_search_volume: Option<u64>,
}

/// Analyzer de conteúdo com caminho de IA e fallback determinístico.
///
/// `analyze` nunca falha: erros do modelo ou de parse são absorvidos
/// localmente pelo extractor, com `industry == "unknown"`.
pub struct AiAnalyzer {
    client: Option<Box<dyn GenerativeClient>>,
    extractor: KeywordExtractor,
}

impl AiAnalyzer {
    /// Cria o analyzer a partir da configuração.
    ///
    /// Sem `GEMINI_API_KEY`, o caminho de IA fica desabilitado e toda
    /// análise usa o extractor determinístico.
    pub fn from_config(config: &ScoutConfig) -> Self {
        let client: Option<Box<dyn GenerativeClient>> = if config.has_gemini() {
            let key = config.gemini_api_key.clone().unwrap_or_default();
            Some(Box::new(GeminiClient::new(
                key,
                config.gemini_model.clone(),
                config.model_timeout_secs,
            )))
        } else {
            None
        };

        Self {
            client,
            extractor: KeywordExtractor::new(config),
        }
    }

    /// Cria o analyzer com um cliente injetado (testes).
    pub fn with_client(client: Box<dyn GenerativeClient>, extractor: KeywordExtractor) -> Self {
        Self {
            client: Some(client),
            extractor,
        }
    }

    /// Cria o analyzer sem caminho de IA (só fallback).
    pub fn without_model(extractor: KeywordExtractor) -> Self {
        Self {
            client: None,
            extractor,
        }
    }

    /// Analisa o conteúdo de uma página.
    ///
    /// Uma chamada ao modelo quando há credencial; qualquer falha
    /// (chamada, parse) cai no extractor determinístico.
    pub async fn analyze(&self, page: &PageContent) -> ContentAnalysis {
        let Some(client) = &self.client else {
            log::info!("🔤 Sem credencial de modelo: usando extractor determinístico");
            return self.fallback(page);
        };

        let prompt = build_analysis_prompt(page);

        match client.generate(&prompt).await {
            Ok(response) => match parse_model_analysis(&response) {
                Ok(analysis) => {
                    log::info!(
                        "✅ Análise de IA: indústria={} | {} keywords",
                        analysis.industry,
                        analysis.keywords.len()
                    );
                    analysis
                }
                Err(e) => {
                    log::warn!("⚠️ Resposta do modelo não parseável ({}), usando fallback", e);
                    self.fallback(page)
                }
            },
            Err(e) => {
                log::warn!("⚠️ Chamada ao modelo falhou ({}), usando fallback", e);
                self.fallback(page)
            }
        }
    }

    /// Caminho determinístico: extractor local + indústria "unknown".
    fn fallback(&self, page: &PageContent) -> ContentAnalysis {
        ContentAnalysis::from_keywords("unknown", self.extractor.extract(page))
    }
}

/// Constrói o prompt estruturado com o conteúdo da página.
fn build_analysis_prompt(page: &PageContent) -> String {
    let headings: Vec<&str> = page.headings.all().collect();
    let today = Utc::now().date_naive();

    format!(
        r#"You are an SEO keyword analyst. Today is {today}.

Analyze the following web page and identify its industry and the SEO keywords it targets.

PAGE URL: {url}
TITLE: {title}
DESCRIPTION: {description}
HEADINGS: {headings}
CONTENT:
{content}

Respond with valid JSON only, matching this exact schema:
{{
  "industry": "short industry label",
  "keywords": [
    {{
      "keyword": "the keyword or phrase",
      "relevance": 0.95,
      "category": "primary" | "secondary" | "longTail",
      "estimatedSearchVolume": 1200
    }}
  ]
}}

Rules:
- relevance is a number between 0 and 1
- category must be one of: primary, secondary, longTail
- estimatedSearchVolume is optional; omit it when unsure
- return 10 to 20 keywords, no duplicates
- do not include any text outside the JSON object"#,
        today = today,
        url = page.url,
        title = page.title,
        description = page.description,
        headings = headings.join(" | "),
        content = truncate_chars(&page.raw_text, MAX_PROMPT_TEXT_CHARS),
    )
}

/// Parseia a resposta de texto livre do modelo em [`ContentAnalysis`].
///
/// Política: remover code fences, localizar o primeiro span `{...}`
/// balanceado e fazer parse estrutural. Falha → [`AnalysisError::ParseError`].
fn parse_model_analysis(response: &str) -> Result<ContentAnalysis, AnalysisError> {
    let block = extract_json_block(response).ok_or_else(|| {
        AnalysisError::ParseError("no balanced JSON object in model output".into())
    })?;

    let parsed: ModelAnalysis = serde_json::from_str(block)
        .map_err(|e| AnalysisError::ParseError(e.to_string()))?;

    let keywords: Vec<KeywordRecord> = parsed
        .keywords
        .into_iter()
        .filter(|k| !k.keyword.trim().is_empty())
        .map(|k| {
            let mut record = KeywordRecord::new(
                k.keyword.trim().to_string(),
                k.relevance,
                parse_category(&k.category),
            );
            record.estimated_search_volume = k.estimated_search_volume;
            record
        })
        .collect();

    let industry = if parsed.industry.trim().is_empty() {
        "unknown".to_string()
    } else {
        parsed.industry.trim().to_string()
    };

    Ok(ContentAnalysis::from_keywords(industry, keywords))
}

/// Mapeia a categoria textual do modelo para o enum tipado.
fn parse_category(raw: &str) -> KeywordCategory {
    match raw.trim().to_lowercase().as_str() {
        "primary" => KeywordCategory::Primary,
        "longtail" | "long_tail" | "long-tail" | "long tail" => KeywordCategory::LongTail,
        _ => KeywordCategory::Secondary,
    }
}

/// Localiza o primeiro objeto `{...}` balanceado em um texto livre.
///
/// Ignora chaves dentro de strings JSON (com escapes) e remove code
/// fences markdown antes de procurar.
fn extract_json_block(text: &str) -> Option<&str> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```");

    let start = cleaned.find('{')?;
    let bytes = cleaned.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&cleaned[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Headings;

    fn sample_page() -> PageContent {
        PageContent {
            url: "https://clinic.example".into(),
            title: "Austin Dental Clinic".into(),
            description: "Family dentistry in Austin".into(),
            raw_text: "Dental implants and teeth whitening for the whole family.".into(),
            headings: Headings {
                h1: vec!["Austin Dental Clinic".into()],
                h2: vec![],
                h3: vec![],
            },
            raw_keyword_candidates: vec![],
        }
    }

    const VALID_MODEL_OUTPUT: &str = r#"Here is the analysis you asked for:
```json
{
  "industry": "dentistry",
  "keywords": [
    {"keyword": "dental implants", "relevance": 0.9, "category": "primary", "estimatedSearchVolume": 5400},
    {"keyword": "teeth whitening", "relevance": 1.4, "category": "longTail"},
    {"keyword": "Dental Implants", "relevance": 0.8, "category": "secondary"}
  ]
}
```
Hope this helps!"#;

    #[test]
    fn test_extract_json_block_simple() {
        assert_eq!(extract_json_block(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_json_block_with_prose_and_fences() {
        let block = extract_json_block(VALID_MODEL_OUTPUT).unwrap();
        assert!(block.starts_with('{'));
        assert!(block.ends_with('}'));
        assert!(serde_json::from_str::<serde_json::Value>(block).is_ok());
    }

    #[test]
    fn test_extract_json_block_nested_and_braces_in_strings() {
        let text = r#"note {"a": {"b": "va{l}ue"}, "c": 2} trailing {ignored"#;
        let block = extract_json_block(text).unwrap();
        assert_eq!(block, r#"{"a": {"b": "va{l}ue"}, "c": 2}"#);
    }

    #[test]
    fn test_extract_json_block_unbalanced() {
        assert!(extract_json_block("no braces here").is_none());
        assert!(extract_json_block(r#"{"never": "closed""#).is_none());
    }

    #[test]
    fn test_parse_model_analysis_clamps_and_dedups() {
        let analysis = parse_model_analysis(VALID_MODEL_OUTPUT).unwrap();
        assert_eq!(analysis.industry, "dentistry");
        // "Dental Implants" duplica "dental implants" (case-insensitive)
        assert_eq!(analysis.keywords.len(), 2);
        assert_eq!(analysis.keywords[0].keyword, "dental implants");
        assert_eq!(analysis.keywords[0].estimated_search_volume, Some(5400));
        // relevância 1.4 clamped
        assert_eq!(analysis.keywords[1].relevance, 1.0);
        assert_eq!(analysis.keywords[1].category, KeywordCategory::LongTail);
    }

    #[test]
    fn test_parse_model_analysis_malformed() {
        let err = parse_model_analysis("the model rambled with no json").unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError(_)));
    }

    #[test]
    fn test_parse_category_variants() {
        assert_eq!(parse_category("primary"), KeywordCategory::Primary);
        assert_eq!(parse_category("longTail"), KeywordCategory::LongTail);
        assert_eq!(parse_category("long_tail"), KeywordCategory::LongTail);
        assert_eq!(parse_category("secondary"), KeywordCategory::Secondary);
        assert_eq!(parse_category("anything"), KeywordCategory::Secondary);
    }

    #[tokio::test]
    async fn test_analyze_with_valid_model_output() {
        let analyzer = AiAnalyzer::with_client(
            Box::new(MockGenerativeClient::with_response(VALID_MODEL_OUTPUT)),
            KeywordExtractor::default(),
        );
        let analysis = analyzer.analyze(&sample_page()).await;
        assert_eq!(analysis.industry, "dentistry");
        assert!(!analysis.suggestions.primary.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_without_credential_matches_extractor() {
        let page = sample_page();
        let analyzer = AiAnalyzer::without_model(KeywordExtractor::default());
        let analysis = analyzer.analyze(&page).await;

        let expected = ContentAnalysis::from_keywords(
            "unknown",
            KeywordExtractor::default().extract(&page),
        );

        assert_eq!(analysis.industry, "unknown");
        let got: Vec<&str> = analysis.keywords.iter().map(|k| k.keyword.as_str()).collect();
        let want: Vec<&str> = expected.keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn test_analyze_absorbs_malformed_model_output() {
        let page = sample_page();
        let analyzer = AiAnalyzer::with_client(
            Box::new(MockGenerativeClient::with_response("not json at all")),
            KeywordExtractor::default(),
        );
        let analysis = analyzer.analyze(&page).await;

        // Falha absorvida: resultado igual ao do extractor, indústria unknown
        assert_eq!(analysis.industry, "unknown");
        let expected = KeywordExtractor::default().extract(&page);
        assert_eq!(analysis.keywords.len(), expected.len());
    }

    #[tokio::test]
    async fn test_analyze_absorbs_model_call_failure() {
        let page = sample_page();
        let analyzer = AiAnalyzer::with_client(
            Box::new(MockGenerativeClient::failing()),
            KeywordExtractor::default(),
        );
        let analysis = analyzer.analyze(&page).await;
        assert_eq!(analysis.industry, "unknown");
        assert!(!analysis.keywords.is_empty());
    }

    #[test]
    fn test_prompt_embeds_page_content() {
        let prompt = build_analysis_prompt(&sample_page());
        assert!(prompt.contains("Austin Dental Clinic"));
        assert!(prompt.contains("https://clinic.example"));
        assert!(prompt.contains("\"industry\""));
    }
}
