// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONTENT FETCHER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Busca o HTML de uma URL (uma tentativa, com timeout) e extrai o conteúdo
// estruturado: título, meta description, headings e texto principal.
// Texto principal via Mozilla Readability, com fallback para html2text.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use scraper::{Html, Selector};
use std::time::Duration;

use crate::config::ScoutConfig;
use crate::types::{Headings, PageContent};
use crate::utils::text::clean_text;

/// Erros do content fetcher.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Fetch timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Document could not be parsed: {0}")]
    Unparsable(String),
}

/// Fetcher de páginas com timeout explícito e sem retries.
///
/// Uma chamada de rede por fetch; o caller decide o que fazer em caso de falha.
pub struct PageFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl PageFetcher {
    /// Cria um fetcher a partir da configuração.
    pub fn new(config: &ScoutConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.fetch_timeout_secs))
                .build()
                .unwrap_or_default(),
            timeout_secs: config.fetch_timeout_secs,
        }
    }

    /// Busca uma URL e extrai o conteúdo estruturado.
    ///
    /// Falha com [`FetchError`] quando a URL é inválida, a rede falha,
    /// o status HTTP não é de sucesso ou o documento não rende conteúdo.
    pub async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        let parsed_url =
            url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed_url.scheme()
            )));
        }

        log::info!("🌐 Fetch: {}", url);

        let response = self
            .client
            .get(parsed_url.clone())
            .header("User-Agent", "Mozilla/5.0 (compatible; SeoScout/1.0)")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout_secs)
                } else {
                    FetchError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::NetworkError(e.to_string())
            }
        })?;

        let page = Self::parse_document(&html, parsed_url.as_str())?;

        log::info!(
            "📖 Página extraída: {} | {} chars | {} headings",
            page.title,
            page.raw_text.len(),
            page.headings.all().count()
        );

        Ok(page)
    }

    /// Extrai [`PageContent`] de um documento HTML já baixado.
    ///
    /// Separado de [`fetch`](Self::fetch) para permitir testes sem rede.
    pub fn parse_document(html: &str, url: &str) -> Result<PageContent, FetchError> {
        let doc = Html::parse_document(html);

        let title = select_first_text(&doc, "title")
            .or_else(|| select_first_text(&doc, "h1"))
            .unwrap_or_default();

        let description = select_meta_content(&doc, "meta[name=\"description\"]")
            .or_else(|| select_meta_content(&doc, "meta[property=\"og:description\"]"))
            .unwrap_or_default();

        let raw_keyword_candidates = select_meta_content(&doc, "meta[name=\"keywords\"]")
            .map(|content| {
                content
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let headings = Headings {
            h1: select_all_text(&doc, "h1"),
            h2: select_all_text(&doc, "h2"),
            h3: select_all_text(&doc, "h3"),
        };

        let raw_text = extract_main_text(html, url);

        if title.is_empty() && raw_text.is_empty() && headings.is_empty() {
            return Err(FetchError::Unparsable(
                "no title, text or headings found".to_string(),
            ));
        }

        Ok(PageContent {
            url: url.to_string(),
            title,
            description,
            raw_text,
            headings,
            raw_keyword_candidates,
        })
    }
}

/// Extrai o texto principal usando Mozilla Readability, com fallback html2text.
fn extract_main_text(html: &str, url: &str) -> String {
    let base = url::Url::parse(url)
        .unwrap_or_else(|_| url::Url::parse("https://example.com").expect("static url"));

    match readability::extractor::extract(&mut html.as_bytes(), &base) {
        Ok(product) => {
            // Readability retorna HTML limpo; converter para texto puro
            let text = clean_text(&html2text::from_read(product.content.as_bytes(), 120));
            if text.len() < 50 {
                log::debug!(
                    "Readability rendeu pouco texto ({} chars), usando html2text no documento",
                    text.len()
                );
                html_to_text_fallback(html)
            } else {
                text
            }
        }
        Err(e) => {
            log::warn!("⚠️ Readability falhou: {}, usando fallback html2text", e);
            html_to_text_fallback(html)
        }
    }
}

/// Fallback: converte o documento inteiro para texto.
fn html_to_text_fallback(html: &str) -> String {
    clean_text(&html2text::from_read(html.as_bytes(), 120))
}

/// Texto do primeiro elemento que casa com o seletor.
fn select_first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next().map(|el| {
        clean_text(&el.text().collect::<Vec<_>>().join(" "))
    })
}

/// Textos de todos os elementos que casam com o seletor, em ordem de documento.
fn select_all_text(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .map(|el| clean_text(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Atributo `content` do primeiro elemento meta que casa com o seletor.
fn select_meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| clean_text(c))
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Austin Dental Clinic - Family Dentistry</title>
    <meta name="description" content="Trusted family dentistry in Austin since 1998.">
    <meta name="keywords" content="dentist, dental clinic, austin, teeth whitening">
</head>
<body>
    <h1>Austin Dental Clinic</h1>
    <h2>Our Services</h2>
    <h2>Why Choose Us</h2>
    <h3>Teeth Whitening</h3>
    <p>We provide comprehensive dental care for the whole family. Our experienced
    team offers cleanings, fillings, crowns, implants and cosmetic dentistry in a
    comfortable modern office located in central Austin.</p>
</body>
</html>"#;

    #[test]
    fn test_parse_document_extracts_structure() {
        let page = PageFetcher::parse_document(SAMPLE_HTML, "https://clinic.example").unwrap();

        assert_eq!(page.title, "Austin Dental Clinic - Family Dentistry");
        assert_eq!(page.description, "Trusted family dentistry in Austin since 1998.");
        assert_eq!(page.headings.h1, vec!["Austin Dental Clinic"]);
        assert_eq!(page.headings.h2, vec!["Our Services", "Why Choose Us"]);
        assert_eq!(page.headings.h3, vec!["Teeth Whitening"]);
        assert_eq!(
            page.raw_keyword_candidates,
            vec!["dentist", "dental clinic", "austin", "teeth whitening"]
        );
        assert!(page.raw_text.contains("comprehensive dental care"));
    }

    #[test]
    fn test_parse_document_without_meta() {
        let html = "<html><head><title>Plain</title></head><body><p>Some body text here \
                    long enough to be extracted by the fallback converter.</p></body></html>";
        let page = PageFetcher::parse_document(html, "https://example.com").unwrap();

        assert_eq!(page.title, "Plain");
        assert!(page.description.is_empty());
        assert!(page.raw_keyword_candidates.is_empty());
        assert!(page.headings.is_empty());
    }

    #[test]
    fn test_parse_document_empty_is_unparsable() {
        let err = PageFetcher::parse_document("", "https://example.com").unwrap_err();
        assert!(matches!(err, FetchError::Unparsable(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let fetcher = PageFetcher::new(&ScoutConfig::default());
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));

        let err = fetcher.fetch("ftp://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    #[ignore] // Requer rede
    async fn test_fetch_example_domain() {
        let fetcher = PageFetcher::new(&ScoutConfig::default());
        let page = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(page.title, "Example Domain");
        assert!(page.raw_keyword_candidates.is_empty());
    }
}
