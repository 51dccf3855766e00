// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SEO SCOUT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI de diagnóstico dos pipelines.
//
// Uso:
//   seo-scout analyze https://clinic.example
//   seo-scout competitors https://clinic.example --radius 3000 --max 15
//   seo-scout probe-places
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use seo_scout::assembler;
use seo_scout::finder::GooglePlacesClient;
use seo_scout::pipeline::{probe_places, ContentPipeline};
use seo_scout::prelude::*;
use std::path::PathBuf;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        PathBuf::from(".env"),
        PathBuf::from("../.env"),
        {
            let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            p.push(".env");
            p
        },
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    if dotenvy::dotenv().is_ok() {
        eprintln!("✓ Carregado .env do diretório atual");
    } else {
        eprintln!(
            "⚠ Nenhum arquivo .env encontrado. GEMINI_API_KEY e GOOGLE_PLACES_API_KEY \
             podem ser definidas no ambiente."
        );
    }
}

fn print_usage(program: &str) {
    eprintln!("SEO Scout CLI v{}", seo_scout::VERSION);
    eprintln!();
    eprintln!("Uso: {} <comando> [argumentos]", program);
    eprintln!();
    eprintln!("Comandos:");
    eprintln!("  analyze <url>                       Analisa keywords de uma página");
    eprintln!("  competitors <url> [--radius <m>] [--max <n>]");
    eprintln!("                                      Busca concorrentes próximos");
    eprintln!("  probe-places                        Query fixa de diagnóstico da API de places");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} analyze https://clinic.example", program);
    eprintln!("  {} competitors https://clinic.example --radius 3000 --max 15", program);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = load_scout_config();

    match args[1].as_str() {
        "analyze" => {
            let Some(url) = args.get(2) else {
                eprintln!("Erro: analyze requer uma URL");
                print_usage(&args[0]);
                std::process::exit(1);
            };
            run_analyze(&config, url).await
        }
        "competitors" => {
            let Some(url) = args.get(2) else {
                eprintln!("Erro: competitors requer uma URL");
                print_usage(&args[0]);
                std::process::exit(1);
            };
            let radius = parse_flag(&args, "--radius").unwrap_or(config.default_radius_meters as u64) as u32;
            let max = parse_flag(&args, "--max").unwrap_or(config.default_max_results as u64) as usize;
            run_competitors(&config, url, radius, max).await
        }
        "probe-places" => run_probe(&config).await,
        other => {
            eprintln!("Comando desconhecido: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

/// Lê o valor numérico de uma flag `--nome <valor>`.
fn parse_flag(args: &[String], name: &str) -> Option<u64> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

/// Comando analyze: fetch → analyze → relatório JSON.
async fn run_analyze(config: &ScoutConfig, url: &str) -> anyhow::Result<()> {
    let pipeline = ContentPipeline::from_config(config);

    match pipeline.run(url).await {
        Ok(outcome) => {
            let report = assembler::analysis_report(&outcome.page, &outcome.analysis);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            let payload = assembler::failure("Content analysis failed", &e);
            eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            std::process::exit(1);
        }
    }
}

/// Comando competitors: busca e envelope de sucesso/falha.
async fn run_competitors(
    config: &ScoutConfig,
    url: &str,
    radius: u32,
    max: usize,
) -> anyhow::Result<()> {
    let finder = CompetitorFinder::from_config(config);

    match finder.find_competitors(url, radius, max).await {
        Ok(result) => {
            let response = assembler::competitor_response(result);
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            let payload = assembler::failure("Competitor search failed", &e);
            eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            std::process::exit(1);
        }
    }
}

/// Comando probe-places: diagnóstico da credencial/API de places.
async fn run_probe(config: &ScoutConfig) -> anyhow::Result<()> {
    if !config.has_places() {
        let payload = assembler::failure("Places probe failed", &SearchError::MissingCredential);
        eprintln!("{}", serde_json::to_string_pretty(&payload)?);
        std::process::exit(1);
    }

    let client = GooglePlacesClient::new(
        config.places_api_key.clone().unwrap_or_default(),
        config.search_timeout_secs,
    );

    match probe_places(&client).await {
        Ok(competitors) => {
            println!("{}", serde_json::to_string_pretty(&competitors)?);
            Ok(())
        }
        Err(e) => {
            let payload = assembler::failure("Places probe failed", &e);
            eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            std::process::exit(1);
        }
    }
}
