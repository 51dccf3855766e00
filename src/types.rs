// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estruturas de dados usadas por todos os pipelines:
// - PageContent: conteúdo extraído de uma página
// - KeywordRecord / ContentAnalysis: resultado da análise de keywords
// - Competitor / CompetitorResult: resultado da busca de concorrentes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Headings extraídos de uma página (h1, h2, h3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Headings {
    /// Textos de todas as tags `<h1>`, em ordem de documento
    pub h1: Vec<String>,
    /// Textos de todas as tags `<h2>`, em ordem de documento
    pub h2: Vec<String>,
    /// Textos de todas as tags `<h3>`, em ordem de documento
    pub h3: Vec<String>,
}

impl Headings {
    /// Itera sobre todos os headings, h1 primeiro.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.h1
            .iter()
            .chain(self.h2.iter())
            .chain(self.h3.iter())
            .map(String::as_str)
    }

    /// Verifica se não há nenhum heading.
    pub fn is_empty(&self) -> bool {
        self.h1.is_empty() && self.h2.is_empty() && self.h3.is_empty()
    }
}

/// Conteúdo estruturado extraído de uma página.
///
/// Criado uma vez por fetch; imutável depois de criado; escopo de uma request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// URL da página
    pub url: String,
    /// Título da página (`<title>`)
    pub title: String,
    /// Meta description (vazia se ausente)
    pub description: String,
    /// Texto principal extraído (sem navegação, scripts, etc.)
    pub raw_text: String,
    /// Headings por nível
    pub headings: Headings,
    /// Candidatos brutos de keywords (meta keywords, quando presentes)
    pub raw_keyword_candidates: Vec<String>,
}

/// Categoria de uma keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeywordCategory {
    /// Termo principal da página
    Primary,
    /// Termo de suporte
    Secondary,
    /// Frase de cauda longa (múltiplas palavras, intenção específica)
    LongTail,
}

impl KeywordCategory {
    /// Retorna a categoria como string (formato do payload externo).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::LongTail => "longTail",
        }
    }
}

/// Uma keyword classificada.
///
/// Produzida pelo extractor determinístico ou pelo analyzer de IA.
/// Nunca mutada depois de criada.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    /// Texto da keyword (não vazio)
    pub keyword: String,
    /// Relevância no intervalo [0.0, 1.0]
    pub relevance: f32,
    /// Categoria da keyword
    pub category: KeywordCategory,
    /// Volume de busca estimado, quando conhecido
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_search_volume: Option<u64>,
}

impl KeywordRecord {
    /// Cria um registro com relevância clamped para [0, 1].
    pub fn new(keyword: impl Into<String>, relevance: f32, category: KeywordCategory) -> Self {
        Self {
            keyword: keyword.into(),
            relevance: relevance.clamp(0.0, 1.0),
            category,
            estimated_search_volume: None,
        }
    }

    /// Define o volume de busca estimado.
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.estimated_search_volume = Some(volume);
        self
    }
}

/// Sugestões de keywords agrupadas por categoria.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestions {
    /// Keywords primárias
    pub primary: Vec<KeywordRecord>,
    /// Keywords secundárias
    pub secondary: Vec<KeywordRecord>,
    /// Keywords de cauda longa
    pub long_tail: Vec<KeywordRecord>,
}

impl KeywordSuggestions {
    /// Agrupa uma lista de keywords por categoria, preservando a ordem.
    pub fn from_keywords(keywords: &[KeywordRecord]) -> Self {
        let mut suggestions = Self::default();
        for record in keywords {
            match record.category {
                KeywordCategory::Primary => suggestions.primary.push(record.clone()),
                KeywordCategory::Secondary => suggestions.secondary.push(record.clone()),
                KeywordCategory::LongTail => suggestions.long_tail.push(record.clone()),
            }
        }
        suggestions
    }
}

/// Análise completa do conteúdo de uma página.
///
/// Uma por página analisada; efêmera (a persistência pertence à camada externa).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    /// Indústria/segmento detectado ("unknown" no caminho de fallback)
    pub industry: String,
    /// Keywords deduplicadas (case-insensitive), em ordem de relevância
    pub keywords: Vec<KeywordRecord>,
    /// Keywords agrupadas por categoria
    pub suggestions: KeywordSuggestions,
}

impl ContentAnalysis {
    /// Monta uma análise a partir de uma lista de keywords.
    ///
    /// Aplica as invariantes do modelo: remove keywords vazias e
    /// deduplica case-insensitive preservando a primeira ocorrência.
    pub fn from_keywords(industry: impl Into<String>, keywords: Vec<KeywordRecord>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let keywords: Vec<KeywordRecord> = keywords
            .into_iter()
            .filter(|k| !k.keyword.trim().is_empty())
            .filter(|k| seen.insert(k.keyword.to_lowercase()))
            .collect();

        let suggestions = KeywordSuggestions::from_keywords(&keywords);

        Self {
            industry: industry.into(),
            keywords,
            suggestions,
        }
    }
}

/// Um concorrente descoberto pela busca de places.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    /// Nome do negócio
    pub name: String,
    /// Avaliação média (quando disponível)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Endereço formatado
    pub address: String,
    /// Identificador externo (place id)
    pub external_id: String,
    /// Categorias do negócio (sem duplicatas)
    pub categories: Vec<String>,
}

/// Resultado de uma análise de concorrentes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorResult {
    /// URL alvo da análise
    pub target_url: String,
    /// Raio de busca em metros (> 0)
    pub search_radius_meters: u32,
    /// Concorrentes encontrados (len <= max_results)
    pub competitors: Vec<Competitor>,
}
