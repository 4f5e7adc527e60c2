// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO RELAY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Endpoint de serving, credencial e limites de logging/timeout.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::Duration;

use url::Url;

/// Timeout padrão de request (segundos)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quantos caracteres do payload bruto entram no log de debug
pub const DEFAULT_LOG_PAYLOAD_CHARS: usize = 2000;

/// Erros ao carregar configuração
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Variável obrigatória não definida
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    /// URL que não parseia ou com esquema diferente de http/https
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl {
        /// Valor recebido
        url: String,
        /// Motivo da rejeição
        reason: String,
    },
}

/// Configuração do relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// URL completa de invocação do endpoint
    pub endpoint_url: Url,

    /// Nome curto do endpoint (apenas para logs).
    /// Se None, usa o segmento após `/serving-endpoints/`.
    pub endpoint_name: Option<String>,

    /// Bearer token já obtido externamente
    pub token: Option<String>,

    /// Timeout repassado ao cliente HTTP.
    /// Padrão: 30s
    pub request_timeout: Duration,

    /// Limite de caracteres do payload nos logs de debug.
    /// Padrão: 2000
    pub log_payload_chars: usize,
}

impl RelayConfig {
    /// Configuração com defaults para a URL dada
    pub fn for_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint_url: parse_endpoint_url(url)?,
            endpoint_name: None,
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_payload_chars: DEFAULT_LOG_PAYLOAD_CHARS,
        })
    }

    /// Define o token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Nome do endpoint para exibição.
    ///
    /// Usa `endpoint_name` se definido; senão extrai de
    /// `.../serving-endpoints/{name}/invocations`; senão o host.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.endpoint_name {
            return name.clone();
        }

        let segments: Vec<&str> = self
            .endpoint_url
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();

        segments
            .iter()
            .position(|s| *s == "serving-endpoints")
            .and_then(|i| segments.get(i + 1))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.endpoint_url.host_str().unwrap_or("unknown").to_string())
    }
}

fn parse_endpoint_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Carrega configuração do relay a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `SERVING_ENDPOINT_URL`: URL de invocação (obrigatória)
/// - `SERVING_ENDPOINT_NAME`: nome para logs (opcional)
/// - `SERVING_TOKEN` ou `DATABRICKS_TOKEN`: Bearer token (opcional)
/// - `REQUEST_TIMEOUT_SECS`: timeout do cliente HTTP (padrão: 30)
/// - `LOG_PAYLOAD_CHARS`: truncamento do payload no log (padrão: 2000)
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// SERVING_ENDPOINT_URL=https://host/serving-endpoints/agent/invocations
/// REQUEST_TIMEOUT_SECS=60
///
/// // código
/// let config = load_relay_config()?;
/// assert_eq!(config.request_timeout.as_secs(), 60);
/// ```
pub fn load_relay_config() -> Result<RelayConfig, ConfigError> {
    let url = std::env::var("SERVING_ENDPOINT_URL")
        .map_err(|_| ConfigError::Missing("SERVING_ENDPOINT_URL"))?;
    let mut config = RelayConfig::for_url(&url)?;

    if let Ok(name) = std::env::var("SERVING_ENDPOINT_NAME") {
        if !name.trim().is_empty() {
            config.endpoint_name = Some(name.trim().to_string());
        }
    }

    config.token = std::env::var("SERVING_TOKEN")
        .or_else(|_| std::env::var("DATABRICKS_TOKEN"))
        .ok()
        .filter(|t| !t.trim().is_empty());
    if config.token.is_none() {
        log::warn!("⚠ Nenhum token definido (SERVING_TOKEN / DATABRICKS_TOKEN)");
    }

    // REQUEST_TIMEOUT_SECS: timeout do cliente HTTP
    if let Ok(timeout_str) = std::env::var("REQUEST_TIMEOUT_SECS") {
        match timeout_str.parse::<u64>() {
            Ok(secs) if secs > 0 => {
                config.request_timeout = Duration::from_secs(secs);
                log::info!("📦 REQUEST_TIMEOUT_SECS={}", secs);
            }
            _ => log::warn!("⚠ REQUEST_TIMEOUT_SECS inválido: {}", timeout_str),
        }
    }

    // LOG_PAYLOAD_CHARS: truncamento nos logs
    if let Ok(chars_str) = std::env::var("LOG_PAYLOAD_CHARS") {
        if let Ok(chars) = chars_str.parse::<usize>() {
            config.log_payload_chars = chars;
            log::info!("📦 LOG_PAYLOAD_CHARS={}", chars);
        }
    }

    log::info!("🔧 Endpoint: {} ({})", config.display_name(), config.endpoint_url);
    Ok(config)
}
