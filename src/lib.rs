//! # Copilot Relay
//!
//! Relay entre uma pergunta em linguagem natural e um agente remoto servido
//! por um endpoint de model serving.
//!
//! ## O que o relay faz?
//!
//! 1. Recebe uma query
//! 2. Encaminha para o endpoint de serving do agente
//! 3. Normaliza o payload heterogêneo devolvido em **um** texto
//! 4. Infere, heuristicamente, quais ferramentas o agente usou
//! 5. Devolve resposta + ferramentas + metadados (tempo, timestamp, endpoint)
//!
//! ## Arquitetura
//!
//! ### 1. Normalização (`normalizer`)
//! Detecta o formato do payload por prioridade fixa:
//! - **output[]**: última mensagem do assistente, partes `output_text`
//! - **messages[]**: última mensagem do assistente (ou última entrada)
//! - **choices[]**: `choices[0].message.content`
//! - **desconhecido**: representação textual do payload
//!
//! ### 2. Extração de ferramentas (`extractor`)
//! Duas passadas unidas em um conjunto sem ordem:
//! - Frases como "I'll use the X tool", "Tools used: ..."
//! - Vocabulário fixo por palavra inteira (`sql`, `warehouse`, `vector_search`...)
//!
//! É uma heurística: falsos positivos ("get" em prosa) são esperados.
//!
//! ### 3. Orquestração (`orchestrator`)
//! Chama o endpoint, mede o tempo e converte qualquer falha no campo `error`.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use copilot_relay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_relay_config()?;
//!     let endpoint = Arc::new(ServingEndpointClient::from_config(&config)?);
//!     let response = QueryOrchestrator::new(endpoint).query("Quantos clusters ativos?").await;
//!     println!("{}", response.response);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos compartilhados.
///
/// - [`ToolName`]: nome de ferramenta normalizado
/// - [`ToolNameCollection`]: conjunto de ferramentas detectadas
/// - [`QueryResult`]: resposta + ferramentas + erro
/// - [`QueryResponse`]: formato serializado para o chamador
pub mod types;

/// Normalização do payload do endpoint em texto canônico.
pub mod normalizer;

/// Extração heurística de ferramentas usadas a partir do texto.
pub mod extractor;

/// Cliente do endpoint de serving.
///
/// Define a trait `AgentEndpoint` e implementações:
/// - `ServingEndpointClient` (HTTP, Bearer token)
/// - `MockAgentEndpoint` para testes
pub mod endpoint;

/// Orquestração de uma query completa.
pub mod orchestrator;

/// Configuração via variáveis de ambiente.
///
/// - `SERVING_ENDPOINT_URL`: URL de invocação
/// - `SERVING_ENDPOINT_NAME`: nome para logs
/// - `SERVING_TOKEN` / `DATABRICKS_TOKEN`: Bearer token
/// - `REQUEST_TIMEOUT_SECS`: timeout do cliente HTTP (padrão: 30)
/// - `LOG_PAYLOAD_CHARS`: truncamento do payload nos logs (padrão: 2000)
pub mod config;

/// Utilitários de tempo e texto.
pub mod utils;

// Re-exports principais
pub use config::{load_relay_config, ConfigError, RelayConfig};
pub use endpoint::{AgentEndpoint, EndpointError, ServingEndpointClient};
pub use extractor::extract_tools_used;
pub use normalizer::{normalize_response, AgentResponsePayload};
pub use orchestrator::QueryOrchestrator;
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use copilot_relay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{load_relay_config, RelayConfig};
    pub use crate::endpoint::{AgentEndpoint, MockAgentEndpoint, ServingEndpointClient};
    pub use crate::extractor::extract_tools_used;
    pub use crate::normalizer::{normalize_response, AgentResponsePayload};
    pub use crate::orchestrator::QueryOrchestrator;
    pub use crate::types::*;
    pub use std::sync::Arc;
}
