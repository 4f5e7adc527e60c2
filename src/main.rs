// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COPILOT RELAY CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para consultar o agente e inspecionar respostas.
//
// Uso:
//   copilot-relay "Quantos clusters estão ativos?"
//   copilot-relay --payload resposta.json   (normaliza payload salvo, offline)
//   copilot-relay --text "I used the sql tool"  (só extração de ferramentas)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use copilot_relay::prelude::*;
use copilot_relay::utils::single_line;
use std::path::{Path, PathBuf};

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [PathBuf::from(".env.local"), PathBuf::from(".env")];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!("✓ Carregado {:?}", path);
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Copilot Relay v{}", copilot_relay::VERSION);
    eprintln!();
    eprintln!("Uso: {} <pergunta>", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --payload <arquivo.json>  Normaliza um payload salvo (offline)");
    eprintln!("  --text <texto>            Apenas extrai ferramentas do texto");
    eprintln!();
    eprintln!("Variáveis: SERVING_ENDPOINT_URL, SERVING_TOKEN, REQUEST_TIMEOUT_SECS");
}

/// Modo de execução escolhido pelos argumentos
#[derive(Debug, PartialEq)]
enum Command {
    Query(String),
    Payload(PathBuf),
    Text(String),
    Help,
    /// Argumentos ausentes ou opção sem valor
    Usage,
}

fn parse_command(args: &[String]) -> Command {
    match args.get(1).map(String::as_str) {
        None => Command::Usage,
        Some("--payload") if args.len() >= 3 => Command::Payload(PathBuf::from(&args[2])),
        Some("--text") if args.len() >= 3 => Command::Text(args[2..].join(" ")),
        // Opção sem valor nunca vira query
        Some("--payload") | Some("--text") => Command::Usage,
        Some("--help") | Some("-h") => Command::Help,
        Some(_) => Command::Query(args[1..].join(" ")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("copilot-relay");

    match parse_command(&args) {
        Command::Usage => {
            print_usage(program);
            std::process::exit(1);
        }
        Command::Help => {
            print_usage(program);
            Ok(())
        }
        Command::Payload(path) => run_payload_mode(&path),
        Command::Text(text) => {
            run_text_mode(&text);
            Ok(())
        }
        Command::Query(query) => run_query_mode(&query).await,
    }
}

/// Query real contra o endpoint configurado
async fn run_query_mode(query: &str) -> anyhow::Result<()> {
    let config = load_relay_config().context("Falha ao carregar configuração")?;
    let endpoint = Arc::new(ServingEndpointClient::from_config(&config)?);
    let orchestrator =
        QueryOrchestrator::new(endpoint).with_log_payload_chars(config.log_payload_chars);

    let response = orchestrator.query(query).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(err) = &response.error {
        log::error!("Query falhou: {}", err);
        std::process::exit(2);
    }
    Ok(())
}

/// Normaliza um payload JSON salvo em disco
fn run_payload_mode(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Não foi possível ler {}", path.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("JSON inválido em {}", path.display()))?;

    let shape = AgentResponsePayload::detect(&payload);
    println!("Formato: {}", shape.shape_name());

    let answer = shape.into_answer();
    println!("Resposta: {}", single_line(&answer));
    print_tools(&extract_tools_used(&answer));
    Ok(())
}

fn run_text_mode(text: &str) {
    print_tools(&extract_tools_used(text));
}

fn print_tools(tools: &ToolNameCollection) {
    let mut names: Vec<&str> = tools.iter().map(ToolName::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        println!("Ferramentas: (nenhuma)");
    } else {
        println!("Ferramentas: {}", names.join(", "));
    }
}
