// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ORQUESTRADOR DE QUERIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// query → endpoint → normalizer → extractor → QueryResponse
//
// Nunca devolve erro ao chamador: falhas viram o campo `error` da resposta,
// com `response` vazio e `toolsUsed` vazio.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::config::DEFAULT_LOG_PAYLOAD_CHARS;
use crate::endpoint::{build_request_payload, AgentEndpoint, EndpointError};
use crate::extractor::extract_tools_used;
use crate::normalizer::AgentResponsePayload;
use crate::types::{QueryMetadata, QueryResponse, QueryResult};
use crate::utils::{truncate_chars, QueryTimer};

/// Orquestra uma query completa contra o endpoint de serving.
pub struct QueryOrchestrator {
    endpoint: Arc<dyn AgentEndpoint>,
    log_payload_chars: usize,
}

impl QueryOrchestrator {
    /// Cria o orquestrador para um endpoint
    pub fn new(endpoint: Arc<dyn AgentEndpoint>) -> Self {
        Self {
            endpoint,
            log_payload_chars: DEFAULT_LOG_PAYLOAD_CHARS,
        }
    }

    /// Limite de caracteres do payload bruto no log de debug
    pub fn with_log_payload_chars(mut self, chars: usize) -> Self {
        self.log_payload_chars = chars;
        self
    }

    /// Executa a query. Sempre devolve uma resposta estruturalmente válida.
    pub async fn query(&self, query: &str) -> QueryResponse {
        let request_id = Uuid::new_v4();
        let timer = QueryTimer::start(&format!("query {}", request_id));
        log::info!("[{}] Query: {}", request_id, query);

        let result = match self.endpoint.invoke(&build_request_payload(query)).await {
            Ok(body) => self.process_body(request_id, &body),
            Err(err) => {
                log::error!("[{}] Endpoint failure: {}", request_id, err);
                QueryResult::failure(error_message(&err))
            }
        };

        let metadata = QueryMetadata {
            timestamp: timer.started_at().to_string(),
            response_time: timer.stop_and_log(),
            endpoint: self.endpoint.endpoint_url().to_string(),
        };
        QueryResponse::from_result(result, metadata)
    }

    fn process_body(&self, request_id: Uuid, body: &Value) -> QueryResult {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "[{}] Raw response: {}",
                request_id,
                truncate_chars(&body.to_string(), self.log_payload_chars)
            );
        }

        let payload = AgentResponsePayload::detect(body);
        log::debug!("[{}] Response shape: {}", request_id, payload.shape_name());

        let answer = payload.into_answer();
        let tools = extract_tools_used(&answer);
        log::info!(
            "[{}] Answer: {} chars, {} tools detected",
            request_id,
            answer.chars().count(),
            tools.len()
        );

        QueryResult::success(answer, tools)
    }
}

/// Mensagem legível para o campo `error`
pub fn error_message(err: &EndpointError) -> String {
    match err {
        EndpointError::Status { .. } | EndpointError::Timeout { .. } => err.to_string(),
        EndpointError::Auth(detail)
        | EndpointError::Network(detail)
        | EndpointError::InvalidBody(detail) => {
            format!("Authentication or connection error: {}", detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{MockAgentEndpoint, MockReply};
    use serde_json::json;

    #[tokio::test]
    async fn test_query_success() {
        let endpoint = Arc::new(MockAgentEndpoint::with_payload(json!({
            "output": [{"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": "I used the sql tool on the warehouse."}
            ]}]
        })));
        let orchestrator = QueryOrchestrator::new(endpoint.clone());

        let response = orchestrator.query("Quantas tabelas?").await;

        assert_eq!(response.response, "I used the sql tool on the warehouse.");
        assert!(response.tools_used.contains("sql"));
        assert!(response.tools_used.contains("warehouse"));
        assert!(response.error.is_none());
        assert_eq!(response.metadata.endpoint, endpoint.endpoint_url());
        assert!(response.metadata.response_time >= 0.0);

        let sent = endpoint.received();
        assert_eq!(sent[0]["input"][0]["content"], "Quantas tabelas?");
    }

    #[tokio::test]
    async fn test_query_status_error() {
        let endpoint = Arc::new(MockAgentEndpoint::new(MockReply::Status(
            404,
            "ENDPOINT_NOT_FOUND".into(),
        )));
        let response = QueryOrchestrator::new(endpoint).query("oi").await;

        assert_eq!(response.response, "");
        assert!(response.tools_used.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("Model endpoint error: 404 - ENDPOINT_NOT_FOUND")
        );
    }

    #[tokio::test]
    async fn test_query_timeout_error() {
        let endpoint = Arc::new(MockAgentEndpoint::new(MockReply::Timeout(30)));
        let response = QueryOrchestrator::new(endpoint).query("oi").await;

        assert_eq!(
            response.error.as_deref(),
            Some("Request timed out after 30 seconds")
        );
    }

    #[tokio::test]
    async fn test_query_network_error() {
        let endpoint = Arc::new(MockAgentEndpoint::new(MockReply::Network(
            "dns lookup failed".into(),
        )));
        let response = QueryOrchestrator::new(endpoint).query("oi").await;

        assert_eq!(response.response, "");
        assert!(response.tools_used.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("Authentication or connection error: dns lookup failed")
        );
    }

    #[tokio::test]
    async fn test_query_invalid_body_error() {
        let endpoint = Arc::new(MockAgentEndpoint::new(MockReply::InvalidBody(
            "EOF while parsing a value".into(),
        )));
        let response = QueryOrchestrator::new(endpoint).query("oi").await;

        assert_eq!(response.response, "");
        assert!(response.tools_used.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("Authentication or connection error: EOF while parsing a value")
        );
    }

    #[test]
    fn test_error_message_auth() {
        let err = EndpointError::Auth("no token".into());
        assert_eq!(
            error_message(&err),
            "Authentication or connection error: no token"
        );
    }
}
