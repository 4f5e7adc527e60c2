// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DO ENDPOINT DE SERVING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para invocar o agente remoto.
// A URL e o token chegam prontos via configuração.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RelayConfig;

/// Erros de transporte ao invocar o endpoint
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// Endpoint respondeu com status HTTP de erro
    #[error("Model endpoint error: {status} - {body}")]
    Status {
        /// Código HTTP
        status: u16,
        /// Corpo da resposta, como texto
        body: String,
    },

    /// Request excedeu o timeout do cliente
    #[error("Request timed out after {secs} seconds")]
    Timeout {
        /// Timeout configurado, em segundos
        secs: u64,
    },

    /// Token ausente ou rejeitado
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Falha de conexão, DNS, TLS...
    #[error("Network error: {0}")]
    Network(String),

    /// Corpo não é JSON válido
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Monta o payload de entrada enviado ao agente
pub fn build_request_payload(query: &str) -> Value {
    serde_json::json!({
        "input": [{ "role": "user", "content": query }]
    })
}

/// Trait para endpoints que servem agentes.
///
/// Permite trocar o transporte HTTP real por um mock nos testes.
#[async_trait]
pub trait AgentEndpoint: Send + Sync {
    /// Envia o payload e devolve o corpo JSON já parseado
    async fn invoke(&self, payload: &Value) -> Result<Value, EndpointError>;

    /// Identificação do endpoint para os metadados da resposta
    fn endpoint_url(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO HTTP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente HTTP para `/serving-endpoints/{name}/invocations`
pub struct ServingEndpointClient {
    url: String,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl ServingEndpointClient {
    /// Cria o cliente a partir da configuração carregada
    pub fn from_config(config: &RelayConfig) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EndpointError::Network(e.to_string()))?;

        Ok(Self {
            url: config.endpoint_url.to_string(),
            token: config.token.clone(),
            timeout: config.request_timeout,
            client,
        })
    }

    fn classify(&self, err: reqwest::Error) -> EndpointError {
        if err.is_timeout() {
            EndpointError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            EndpointError::InvalidBody(err.to_string())
        } else {
            EndpointError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl AgentEndpoint for ServingEndpointClient {
    async fn invoke(&self, payload: &Value) -> Result<Value, EndpointError> {
        let token = self.token.as_deref().ok_or_else(|| {
            EndpointError::Auth("Unable to obtain OAuth token for model serving".into())
        })?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| self.classify(e))
    }

    fn endpoint_url(&self) -> &str {
        &self.url
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resposta programada do mock
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Devolve este corpo JSON
    Payload(Value),
    /// Responde com status HTTP de erro
    Status(u16, String),
    /// Simula timeout
    Timeout(u64),
    /// Simula falha de autenticação
    Auth(String),
    /// Simula falha de conexão
    Network(String),
    /// Simula corpo de resposta inválido
    InvalidBody(String),
}

/// Endpoint mock: devolve sempre a mesma resposta e guarda os payloads recebidos
#[derive(Debug)]
pub struct MockAgentEndpoint {
    reply: MockReply,
    url: String,
    received: Mutex<Vec<Value>>,
}

impl MockAgentEndpoint {
    /// Mock que responde com o payload dado
    pub fn with_payload(payload: Value) -> Self {
        Self::new(MockReply::Payload(payload))
    }

    /// Mock com resposta arbitrária
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            url: "mock://serving-endpoints/agent/invocations".into(),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Payloads recebidos até agora
    pub fn received(&self) -> Vec<Value> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AgentEndpoint for MockAgentEndpoint {
    async fn invoke(&self, payload: &Value) -> Result<Value, EndpointError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(payload.clone());
        }

        match &self.reply {
            MockReply::Payload(body) => Ok(body.clone()),
            MockReply::Status(status, body) => Err(EndpointError::Status {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Timeout(secs) => Err(EndpointError::Timeout { secs: *secs }),
            MockReply::Auth(msg) => Err(EndpointError::Auth(msg.clone())),
            MockReply::Network(msg) => Err(EndpointError::Network(msg.clone())),
            MockReply::InvalidBody(msg) => Err(EndpointError::InvalidBody(msg.clone())),
        }
    }

    fn endpoint_url(&self) -> &str {
        &self.url
    }
}
