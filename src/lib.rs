//! # SEO Scout - Implementação Rust
//!
//! Este crate implementa o núcleo de análise SEO do **SEO Scout**: pipelines
//! que agregam dados de keywords e concorrentes a partir de APIs externas,
//! expondo os resultados nos envelopes JSON consumidos pelo dashboard.
//!
//! ## O que o SEO Scout faz?
//!
//! 1. Busca uma página e extrai conteúdo estruturado (título, description,
//!    headings, candidatos de keywords)
//! 2. Classifica keywords com um modelo generativo (Gemini), com fallback
//!    determinístico local quando o modelo falha ou não há credencial
//! 3. Descobre negócios concorrentes próximos via places-search
//! 4. Monta as saídas nos envelopes JSON do boundary HTTP
//!
//! ## Arquitetura
//!
//! Dois pipelines independentes, cada request processada de forma linear
//! e sem estado compartilhado:
//!
//! ```text
//! conteúdo:     fetch → AI analyze ──(falha)──▶ extractor determinístico
//! concorrentes: derive query → places search → map/dedup/cap
//! ```
//!
//! Toda chamada externa tem timeout explícito e uma única tentativa; quem
//! decide o fallback é o componente dono da chamada.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use seo_scout::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = seo_scout::config::load_scout_config();
//!     let pipeline = ContentPipeline::from_config(&config);
//!     let outcome = pipeline.run("https://example.com").await.unwrap();
//!     println!("{} keywords", outcome.analysis.keywords.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// Este módulo define as estruturas de dados básicas como:
/// - [`types::PageContent`]: conteúdo extraído de uma página
/// - [`types::KeywordRecord`]: keyword classificada com relevância
/// - [`types::ContentAnalysis`]: análise completa de uma página
/// - [`types::Competitor`] / [`types::CompetitorResult`]: busca de concorrentes
pub mod types;

/// Configuração explícita do processo.
///
/// Structs de configuração passadas aos construtores dos componentes
/// (sem singletons mutáveis), carregadas do ambiente via
/// [`config::load_scout_config`].
pub mod config;

/// Content fetcher: uma URL entra, [`types::PageContent`] sai.
///
/// Um GET com timeout, sem retries. Extração de texto principal via
/// Mozilla Readability com fallback html2text; título, meta tags e
/// headings via DOM.
pub mod fetcher;

/// Keyword extractor determinístico (caminho de fallback).
///
/// Análise de frequência/posição sem IA: headings pesam mais que o
/// corpo, stop-words são descartadas, saída ordenada por score.
/// Nunca falha.
pub mod extractor;

/// AI content analyzer.
///
/// Define a trait [`analyzer::GenerativeClient`] e implementações:
/// - Gemini (Google Generative Language API)
/// - Mock para testes
///
/// Constrói o prompt, parseia o JSON da resposta de texto livre e cai
/// no extractor determinístico em qualquer falha.
pub mod analyzer;

/// Competitor finder.
///
/// Define a trait [`finder::PlacesClient`] e implementações:
/// - Google Places (Text Search)
/// - Mock para testes
///
/// Deriva a query do URL alvo, mapeia resultados, deduplica por place
/// id e limita a `max_results`.
pub mod finder;

/// Response assembler.
///
/// Mapeamento puro para os envelopes JSON do boundary:
/// [`assembler::ApiResponse`], [`assembler::ApiFailure`] e
/// [`assembler::AnalysisReport`].
pub mod assembler;

/// Pipelines de orquestração.
///
/// [`pipeline::ContentPipeline`] (fetch → analyze) e o probe de
/// diagnóstico da API de places.
pub mod pipeline;

/// Utilitários diversos.
///
/// Funções auxiliares usadas pelos pipelines:
/// - Limpeza de texto scraped
/// - Truncamento seguro para prompts
pub mod utils;

// Re-exports principais
pub use analyzer::AiAnalyzer;
pub use config::{load_scout_config, ScoutConfig};
pub use extractor::KeywordExtractor;
pub use fetcher::PageFetcher;
pub use finder::CompetitorFinder;
pub use pipeline::ContentPipeline;
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use seo_scout::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analyzer::{AiAnalyzer, AnalysisError, GenerativeClient};
    pub use crate::assembler::{ApiFailure, ApiResponse};
    pub use crate::config::{load_scout_config, ScoutConfig};
    pub use crate::extractor::KeywordExtractor;
    pub use crate::fetcher::{FetchError, PageFetcher};
    pub use crate::finder::{CompetitorFinder, PlacesClient, SearchError};
    pub use crate::pipeline::{AnalysisOutcome, ContentPipeline};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
