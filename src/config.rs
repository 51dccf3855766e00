// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO SCOUT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configuração explícita passada aos componentes (sem singletons mutáveis).
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuração de todo o processo.
///
/// Criada uma vez no startup e passada por valor/referência aos construtores
/// dos componentes. A ausência de uma credencial roteia o componente
/// correspondente para fallback/erro, nunca para um crash.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Credencial da API generativa (Gemini). None → fallback determinístico.
    pub gemini_api_key: Option<String>,

    /// Credencial da API de places. None → SearchError::MissingCredential.
    pub places_api_key: Option<String>,

    /// Modelo generativo a usar.
    /// Padrão: "gemini-1.5-flash"
    pub gemini_model: String,

    /// Timeout do fetch de páginas, em segundos.
    /// Padrão: 20
    pub fetch_timeout_secs: u64,

    /// Timeout da chamada ao modelo generativo, em segundos.
    /// Padrão: 30
    pub model_timeout_secs: u64,

    /// Timeout da chamada de places-search, em segundos.
    /// Padrão: 15
    pub search_timeout_secs: u64,

    /// Número máximo de keywords retornadas pelo extractor de fallback.
    /// Padrão: 20
    pub max_keywords: usize,

    /// Raio de busca padrão em metros.
    /// Padrão: 3000
    pub default_radius_meters: u32,

    /// Número máximo padrão de concorrentes retornados.
    /// Padrão: 15
    pub default_max_results: usize,

    /// Localização opcional para compor a query de concorrentes
    /// (ex: "Austin, TX"). None → query apenas com o nome do negócio.
    pub location_hint: Option<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            places_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            fetch_timeout_secs: 20,
            model_timeout_secs: 30,
            search_timeout_secs: 15,
            max_keywords: 20,
            default_radius_meters: 3000,
            default_max_results: 15,
            location_hint: None,
        }
    }
}

impl ScoutConfig {
    /// Cria configuração padrão (sem credenciais).
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifica se o caminho de IA está disponível.
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Verifica se a busca de places está disponível.
    pub fn has_places(&self) -> bool {
        self.places_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Carrega a configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `GEMINI_API_KEY`: credencial do modelo generativo (opcional)
/// - `GOOGLE_PLACES_API_KEY`: credencial da busca de places (opcional)
/// - `SEO_SCOUT_MODEL`: modelo generativo (padrão: "gemini-1.5-flash")
/// - `SEO_SCOUT_FETCH_TIMEOUT`: timeout do fetch em segundos (padrão: 20)
/// - `SEO_SCOUT_MODEL_TIMEOUT`: timeout do modelo em segundos (padrão: 30)
/// - `SEO_SCOUT_SEARCH_TIMEOUT`: timeout da busca em segundos (padrão: 15)
/// - `SEO_SCOUT_MAX_KEYWORDS`: máximo de keywords do fallback (padrão: 20)
/// - `SEO_SCOUT_RADIUS`: raio padrão em metros (padrão: 3000)
/// - `SEO_SCOUT_MAX_RESULTS`: máximo padrão de concorrentes (padrão: 15)
/// - `SEO_SCOUT_LOCATION`: localização para a query de concorrentes (opcional)
pub fn load_scout_config() -> ScoutConfig {
    let mut config = ScoutConfig::default();

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            config.gemini_api_key = Some(key.trim().to_string());
            log::info!("📦 GEMINI_API_KEY presente (caminho de IA habilitado)");
        }
    }
    if config.gemini_api_key.is_none() {
        log::warn!("⚠️ GEMINI_API_KEY ausente: análise usará o extractor determinístico");
    }

    if let Ok(key) = std::env::var("GOOGLE_PLACES_API_KEY") {
        if !key.trim().is_empty() {
            config.places_api_key = Some(key.trim().to_string());
            log::info!("📦 GOOGLE_PLACES_API_KEY presente (busca de concorrentes habilitada)");
        }
    }
    if config.places_api_key.is_none() {
        log::warn!("⚠️ GOOGLE_PLACES_API_KEY ausente: busca de concorrentes retornará erro");
    }

    if let Ok(model) = std::env::var("SEO_SCOUT_MODEL") {
        if !model.trim().is_empty() {
            config.gemini_model = model.trim().to_string();
            log::info!("📦 SEO_SCOUT_MODEL={}", config.gemini_model);
        }
    }

    if let Some(secs) = parse_env_u64("SEO_SCOUT_FETCH_TIMEOUT") {
        config.fetch_timeout_secs = secs;
        log::info!("📦 SEO_SCOUT_FETCH_TIMEOUT={}s", secs);
    }
    if let Some(secs) = parse_env_u64("SEO_SCOUT_MODEL_TIMEOUT") {
        config.model_timeout_secs = secs;
        log::info!("📦 SEO_SCOUT_MODEL_TIMEOUT={}s", secs);
    }
    if let Some(secs) = parse_env_u64("SEO_SCOUT_SEARCH_TIMEOUT") {
        config.search_timeout_secs = secs;
        log::info!("📦 SEO_SCOUT_SEARCH_TIMEOUT={}s", secs);
    }

    if let Some(max) = parse_env_u64("SEO_SCOUT_MAX_KEYWORDS") {
        config.max_keywords = max as usize;
        log::info!("📦 SEO_SCOUT_MAX_KEYWORDS={}", max);
    }
    if let Some(radius) = parse_env_u64("SEO_SCOUT_RADIUS") {
        config.default_radius_meters = radius as u32;
        log::info!("📦 SEO_SCOUT_RADIUS={}m", radius);
    }
    if let Some(max) = parse_env_u64("SEO_SCOUT_MAX_RESULTS") {
        config.default_max_results = max as usize;
        log::info!("📦 SEO_SCOUT_MAX_RESULTS={}", max);
    }

    if let Ok(location) = std::env::var("SEO_SCOUT_LOCATION") {
        if !location.trim().is_empty() {
            config.location_hint = Some(location.trim().to_string());
            log::info!("📦 SEO_SCOUT_LOCATION={}", location.trim());
        }
    }

    config
}

/// Lê uma variável de ambiente numérica (> 0).
fn parse_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ScoutConfig::default();
        assert!(config.gemini_api_key.is_none());
        assert!(config.places_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.fetch_timeout_secs, 20);
        assert_eq!(config.model_timeout_secs, 30);
        assert_eq!(config.search_timeout_secs, 15);
        assert_eq!(config.default_radius_meters, 3000);
        assert_eq!(config.default_max_results, 15);
        assert!(!config.has_gemini());
        assert!(!config.has_places());
    }

    #[test]
    fn test_has_credentials_ignores_empty() {
        let mut config = ScoutConfig::default();
        config.gemini_api_key = Some(String::new());
        assert!(!config.has_gemini());

        config.gemini_api_key = Some("key-123".into());
        assert!(config.has_gemini());

        config.places_api_key = Some("key-456".into());
        assert!(config.has_places());
    }
}
