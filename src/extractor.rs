// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRAÇÃO DE FERRAMENTAS USADAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Heurística sobre o texto da resposta para inferir quais ferramentas o agente
// usou. Duas passadas independentes, unidas no final:
// - A: frases do tipo "I used the X tool", "Tools used: ..."
// - B: vocabulário fixo de palavras-chave (match por palavra inteira)
//
// NÃO é um trace confiável. Falsos positivos são esperados: palavras comuns
// do vocabulário ("get", "post", "table") casam em prosa normal. Qualquer
// mudança nos padrões ou no vocabulário é mudança de política e precisa de
// teste próprio.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use crate::types::ToolNameCollection;

/// Padrões de frase que indicam uso de ferramenta.
///
/// O grupo 1 de cada padrão é o nome da ferramenta. Ordem preservada.
pub const TOOL_PHRASE_PATTERNS: &[&str] = &[
    r"I(?:'ll|'m going to| will| used) (?:use|call|run|execute) (?:the )?(\w+)(?: tool)?",
    r"Using (?:the )?(\w+)(?: tool)?",
    r"I'll (?:use|call) (\w+)",
    r"Let me (?:use|call) (?:the )?(\w+)",
    r"I (?:used|called|ran) (?:the )?(\w+)(?: tool)?",
    r"Called (\w+)(?: tool)?",
    r"Executed (\w+)(?: tool)?",
    r"Running (\w+)(?: tool)?",
    r"Tool used: (\w+)",
    r"Tools? used: ([^.]+)",
    r"I (?:searched|queried|fetched) (?:using|with) (?:the )?(\w+)",
];

/// Vocabulário fechado de ferramentas/domínio
pub const TOOL_VOCABULARY: &[&str] = &[
    "sql",
    "query",
    "search",
    "fetch",
    "get",
    "post",
    "put",
    "delete",
    "databricks",
    "workspace",
    "cluster",
    "warehouse",
    "table",
    "catalog",
    "mlflow",
    "model",
    "serving",
    "endpoint",
    "vector_search",
    "embedding",
    "similarity_search",
    "retrieval",
    "rag",
    "knowledge_base",
];

static PHRASE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    TOOL_PHRASE_PATTERNS
        .iter()
        .map(|pattern| {
            Regex::new(&format!("(?i){}", pattern)).expect("tool phrase pattern must compile")
        })
        .collect()
});

// Índice i do set corresponde a TOOL_VOCABULARY[i]
static VOCABULARY_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(
        TOOL_VOCABULARY
            .iter()
            .map(|word| format!(r"(?i)\b{}\b", regex::escape(word))),
    )
    .expect("tool vocabulary must compile")
});

/// Infere o conjunto de ferramentas usadas a partir do texto da resposta.
///
/// Função pura e total: texto vazio ou sem matches devolve conjunto vazio.
///
/// # Exemplo
///
/// ```rust
/// use copilot_relay::extractor::extract_tools_used;
///
/// let tools = extract_tools_used("I'll use the sql tool to answer this");
/// assert!(tools.contains("sql"));
/// ```
pub fn extract_tools_used(text: &str) -> ToolNameCollection {
    let mut tools = phrase_matches(text);
    tools.extend(vocabulary_matches(text));
    tools
}

/// Passada A: capturas dos padrões de frase
pub fn phrase_matches(text: &str) -> ToolNameCollection {
    let mut tools = ToolNameCollection::new();
    if text.is_empty() {
        return tools;
    }

    for regex in PHRASE_REGEXES.iter() {
        for caps in regex.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                tools.insert_raw(name.as_str());
            }
        }
    }
    tools
}

/// Passada B: palavras do vocabulário presentes como palavra inteira
pub fn vocabulary_matches(text: &str) -> ToolNameCollection {
    let mut tools = ToolNameCollection::new();
    if text.is_empty() {
        return tools;
    }

    for index in VOCABULARY_SET.matches(text).iter() {
        tools.insert_raw(TOOL_VOCABULARY[index]);
    }
    tools
}
