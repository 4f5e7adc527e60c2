// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Resposta canônica (texto único extraído do payload do endpoint)
pub type CanonicalAnswer = String;

/// Nome de ferramenta normalizado.
///
/// Sempre em minúsculas, sem espaços nas pontas e nunca vazio.
/// A única forma de construir é via [`ToolName::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Normaliza (lowercase + trim) e rejeita strings em branco.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Nome como `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Conjunto de ferramentas detectadas em uma resposta.
///
/// Semântica de conjunto: sem ordem de enumeração garantida e sem duplicatas
/// (comparação case-insensitive, já que [`ToolName`] é sempre minúsculo).
/// Serializa como array JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolNameCollection(HashSet<ToolName>);

impl ToolNameCollection {
    /// Cria um conjunto vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normaliza e insere um nome. Retorna `false` para entradas em branco
    /// ou já presentes.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        match ToolName::parse(raw) {
            Some(name) => self.0.insert(name),
            None => false,
        }
    }

    /// Verifica presença (o argumento passa pela mesma normalização)
    pub fn contains(&self, name: &str) -> bool {
        ToolName::parse(name).map_or(false, |n| self.0.contains(&n))
    }

    /// Número de ferramentas distintas
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` se nenhuma ferramenta foi detectada
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Itera sem ordem definida
    pub fn iter(&self) -> hash_set::Iter<'_, ToolName> {
        self.0.iter()
    }

    /// Une outro conjunto a este
    pub fn extend(&mut self, other: ToolNameCollection) {
        self.0.extend(other.0);
    }

    /// Converte para `Vec<String>` (ordem arbitrária)
    pub fn into_names(self) -> Vec<String> {
        self.0.into_iter().map(|n| n.0).collect()
    }
}

impl IntoIterator for ToolNameCollection {
    type Item = ToolName;
    type IntoIter = hash_set::IntoIter<ToolName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ToolNameCollection {
    type Item = &'a ToolName;
    type IntoIter = hash_set::Iter<'a, ToolName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resultado de uma query: resposta + ferramentas + erro opcional.
///
/// Criado uma vez por query e imutável depois disso.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    answer: CanonicalAnswer,
    tools: ToolNameCollection,
    error: Option<String>,
}

impl QueryResult {
    /// Resultado de sucesso
    pub fn success(answer: CanonicalAnswer, tools: ToolNameCollection) -> Self {
        Self {
            answer,
            tools,
            error: None,
        }
    }

    /// Resultado de falha: resposta vazia, nenhuma ferramenta
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            answer: String::new(),
            tools: ToolNameCollection::new(),
            error: Some(error.into()),
        }
    }

    /// Resposta canônica
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Ferramentas detectadas
    pub fn tools(&self) -> &ToolNameCollection {
        &self.tools
    }

    /// Mensagem de erro, se houver
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` se não houve erro
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// ─────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────

/// Request de query vindo do cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Pergunta em linguagem natural
    pub query: String,
}

/// Metadados anexados pelo orquestrador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    /// Tempo total em segundos
    pub response_time: f64,
    /// Timestamp ISO-8601 do início da query
    pub timestamp: String,
    /// Identificação do endpoint consultado
    pub endpoint: String,
}

/// Resposta serializada para o chamador
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Resposta canônica (vazia em caso de erro)
    pub response: String,
    /// Metadados de tempo e endpoint
    pub metadata: QueryMetadata,
    /// Ferramentas inferidas
    pub tools_used: ToolNameCollection,
    /// Mensagem de erro legível
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// Monta a resposta de wire a partir do resultado e dos metadados
    pub fn from_result(result: QueryResult, metadata: QueryMetadata) -> Self {
        Self {
            response: result.answer,
            metadata,
            tools_used: result.tools,
            error: result.error,
        }
    }
}
