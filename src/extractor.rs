// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// KEYWORD EXTRACTOR (FALLBACK DETERMINÍSTICO)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Análise de frequência/posição usada quando o caminho de IA está
// indisponível ou falha. Determinístico: mesma página, mesma saída.
// Nunca falha: entrada vazia produz saída vazia.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::config::ScoutConfig;
use crate::types::{KeywordCategory, KeywordRecord, PageContent};

/// Peso de termos que aparecem em headings (vs. 1.0 no corpo).
const HEADING_WEIGHT: f32 = 3.0;

/// Peso de termos vindos de meta keywords.
const CANDIDATE_WEIGHT: f32 = 2.0;

/// Quantas keywords do topo são classificadas como Primary.
const PRIMARY_CUTOFF: usize = 3;

/// Tamanho mínimo de um token para ser considerado.
const MIN_TOKEN_LEN: usize = 3;

/// Stop-words em inglês ignoradas na análise.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
        "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
        "see", "two", "way", "who", "did", "yes", "your", "with", "this", "that", "from", "they",
        "will", "have", "more", "when", "what", "were", "been", "each", "which", "their", "about",
        "would", "there", "could", "other", "after", "first", "also", "than", "then", "them",
        "these", "some", "into", "only", "over", "such", "most", "very", "here", "just", "like",
        "make", "where", "much", "through", "before", "between", "should", "because", "does",
        "those", "under", "while", "both", "during", "without", "within", "since", "every",
        "being", "made", "well",
    ]
    .into_iter()
    .collect()
});

/// Tokenizador: palavras alfanuméricas minúsculas.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][a-z0-9]*").expect("static regex"));

/// Extractor determinístico de keywords.
pub struct KeywordExtractor {
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self { max_keywords: 20 }
    }
}

impl KeywordExtractor {
    /// Cria um extractor a partir da configuração.
    pub fn new(config: &ScoutConfig) -> Self {
        Self {
            max_keywords: config.max_keywords,
        }
    }

    /// Extrai keywords de uma página por frequência e posição.
    ///
    /// Headings pesam mais que o corpo; stop-words são descartadas;
    /// o resultado vem ordenado por score decrescente, com empates
    /// resolvidos pela ordem de primeira ocorrência.
    pub fn extract(&self, page: &PageContent) -> Vec<KeywordRecord> {
        let mut scores: HashMap<String, f32> = HashMap::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut position = 0usize;

        let mut score_source = |text: &str, weight: f32| {
            for token in tokenize(text) {
                position += 1;
                first_seen.entry(token.clone()).or_insert(position);
                *scores.entry(token).or_insert(0.0) += weight;
            }
        };

        // Headings primeiro: definem os termos estruturais da página
        for heading in page.headings.all() {
            score_source(heading, HEADING_WEIGHT);
        }
        for candidate in &page.raw_keyword_candidates {
            score_source(candidate, CANDIDATE_WEIGHT);
        }
        score_source(&page.raw_text, 1.0);

        if scores.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(String, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0]))
        });

        let top_score = ranked[0].1.max(1.0);

        let mut records: Vec<KeywordRecord> = ranked
            .iter()
            .take(self.max_keywords)
            .enumerate()
            .map(|(index, (token, score))| {
                let category = if index < PRIMARY_CUTOFF {
                    KeywordCategory::Primary
                } else {
                    KeywordCategory::Secondary
                };
                KeywordRecord::new(token.clone(), score / top_score, category)
            })
            .collect();

        // Frases de cauda longa: headings multi-palavra e meta keywords compostas
        let token_scores: HashMap<&str, f32> =
            ranked.iter().map(|(t, s)| (t.as_str(), *s)).collect();
        let mut seen: HashSet<String> =
            records.iter().map(|r| r.keyword.to_lowercase()).collect();

        for phrase in long_tail_phrases(page) {
            if records.len() >= self.max_keywords {
                break;
            }
            if !seen.insert(phrase.clone()) {
                continue;
            }
            let relevance = phrase_relevance(&phrase, &token_scores, top_score);
            records.push(KeywordRecord::new(phrase, relevance, KeywordCategory::LongTail));
        }

        records
    }
}

/// Tokeniza um texto em palavras minúsculas, filtrando stop-words e
/// tokens curtos.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.len() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(t.as_str()))
        .collect()
}

/// Candidatos de cauda longa: frases de 2 a 6 palavras vindas de headings
/// e de meta keywords compostas, em ordem de documento.
fn long_tail_phrases(page: &PageContent) -> Vec<String> {
    page.headings
        .all()
        .map(str::to_string)
        .chain(page.raw_keyword_candidates.iter().cloned())
        .map(|p| p.to_lowercase().trim().to_string())
        .filter(|p| {
            let words = p.split_whitespace().count();
            (2..=6).contains(&words)
        })
        .collect()
}

/// Relevância de uma frase: média dos scores dos tokens constituintes,
/// normalizada pelo score máximo observado.
fn phrase_relevance(phrase: &str, token_scores: &HashMap<&str, f32>, top_score: f32) -> f32 {
    let tokens = tokenize(phrase);
    if tokens.is_empty() {
        return 0.1;
    }
    let sum: f32 = tokens
        .iter()
        .map(|t| token_scores.get(t.as_str()).copied().unwrap_or(0.0))
        .sum();
    let mean = sum / tokens.len() as f32;
    (mean / top_score).clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Headings;

    fn sample_page() -> PageContent {
        PageContent {
            url: "https://clinic.example".into(),
            title: "Austin Dental Clinic".into(),
            description: "Family dentistry".into(),
            raw_text: "Our dental clinic offers implants, cleanings and implants. \
                       The clinic team loves dental care and dental hygiene."
                .into(),
            headings: Headings {
                h1: vec!["Austin Dental Clinic".into()],
                h2: vec!["Dental Implants Austin".into()],
                h3: vec![],
            },
            raw_keyword_candidates: vec!["teeth whitening".into()],
        }
    }

    #[test]
    fn test_empty_page_yields_empty_output() {
        let extractor = KeywordExtractor::default();
        let records = extractor.extract(&PageContent::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_heading_terms_outrank_body_terms() {
        let extractor = KeywordExtractor::default();
        let records = extractor.extract(&sample_page());

        assert!(!records.is_empty());
        // "dental" aparece em headings e no corpo: deve liderar
        assert_eq!(records[0].keyword, "dental");
        assert_eq!(records[0].relevance, 1.0);
        assert_eq!(records[0].category, KeywordCategory::Primary);

        // "implants" (heading + corpo) deve vir antes de termos só de corpo
        let implants_pos = records.iter().position(|r| r.keyword == "implants").unwrap();
        let team_pos = records.iter().position(|r| r.keyword == "team").unwrap();
        assert!(implants_pos < team_pos);
    }

    #[test]
    fn test_deterministic_output() {
        let extractor = KeywordExtractor::default();
        let page = sample_page();
        let first: Vec<String> = extractor.extract(&page).iter().map(|r| r.keyword.clone()).collect();
        let second: Vec<String> = extractor.extract(&page).iter().map(|r| r.keyword.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stop_words_discarded() {
        let extractor = KeywordExtractor::default();
        let records = extractor.extract(&sample_page());
        assert!(records.iter().all(|r| r.keyword != "and"));
        assert!(records.iter().all(|r| r.keyword != "the"));
        assert!(records.iter().all(|r| r.keyword != "our"));
    }

    #[test]
    fn test_long_tail_phrases_present() {
        let extractor = KeywordExtractor::default();
        let records = extractor.extract(&sample_page());
        let long_tail: Vec<&KeywordRecord> = records
            .iter()
            .filter(|r| r.category == KeywordCategory::LongTail)
            .collect();
        assert!(long_tail.iter().any(|r| r.keyword == "austin dental clinic"));
        assert!(long_tail.iter().any(|r| r.keyword == "teeth whitening"));
    }

    #[test]
    fn test_respects_max_keywords() {
        let mut config = ScoutConfig::default();
        config.max_keywords = 5;
        let extractor = KeywordExtractor::new(&config);
        let records = extractor.extract(&sample_page());
        assert!(records.len() <= 5);
    }

    #[test]
    fn test_relevance_bounds() {
        let extractor = KeywordExtractor::default();
        for record in extractor.extract(&sample_page()) {
            assert!(record.relevance >= 0.0 && record.relevance <= 1.0);
        }
    }

    #[test]
    fn test_tie_break_by_first_occurrence() {
        let page = PageContent {
            raw_text: "zebra apple zebra apple".into(),
            ..Default::default()
        };
        let extractor = KeywordExtractor::default();
        let records = extractor.extract(&page);
        // Mesmo score: "zebra" veio primeiro no texto
        assert_eq!(records[0].keyword, "zebra");
        assert_eq!(records[1].keyword, "apple");
    }
}
