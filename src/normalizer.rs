// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NORMALIZAÇÃO DE RESPOSTAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Reduz o payload JSON heterogêneo do endpoint de serving a um único texto.
// Formatos reconhecidos, nesta ordem de prioridade:
// 1. `output[]`   (Responses API / agentes)
// 2. `messages[]` (formato legado de chat)
// 3. `choices[]`  (estilo OpenAI Chat Completions)
// 4. qualquer outro → representação textual do payload inteiro
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde_json::Value;

use crate::types::CanonicalAnswer;

/// Formato detectado do payload do endpoint.
///
/// Os formatos não têm discriminante explícito no JSON; são detectados pela
/// presença de campos, sempre na mesma ordem de prioridade (ver [`detect`]).
///
/// [`detect`]: AgentResponsePayload::detect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentResponsePayload<'a> {
    /// `output` é um array não-vazio
    OutputItems(&'a [Value]),
    /// `messages` é um array não-vazio
    Messages(&'a [Value]),
    /// `choices` é um array não-vazio
    Choices(&'a [Value]),
    /// Nenhum formato conhecido (inclui payloads que não são objetos)
    Unknown(&'a Value),
}

impl<'a> AgentResponsePayload<'a> {
    /// Classifica o payload. O primeiro formato que casar vence.
    pub fn detect(payload: &'a Value) -> Self {
        if let Some(items) = non_empty_array(payload, "output") {
            Self::OutputItems(items)
        } else if let Some(entries) = non_empty_array(payload, "messages") {
            Self::Messages(entries)
        } else if let Some(choices) = non_empty_array(payload, "choices") {
            Self::Choices(choices)
        } else {
            Self::Unknown(payload)
        }
    }

    /// Nome curto do formato, para logs
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::OutputItems(_) => "output",
            Self::Messages(_) => "messages",
            Self::Choices(_) => "choices",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Extrai a resposta canônica do formato detectado
    pub fn into_answer(self) -> CanonicalAnswer {
        match self {
            Self::OutputItems(items) => answer_from_output(items),
            Self::Messages(entries) => answer_from_messages(entries),
            Self::Choices(choices) => answer_from_choices(choices),
            Self::Unknown(payload) => render(payload),
        }
    }
}

/// Normaliza um payload arbitrário em uma resposta de texto.
///
/// Função total: campos ausentes degradam para a representação textual do
/// item correspondente, nunca para erro.
///
/// # Exemplo
///
/// ```rust
/// use copilot_relay::normalizer::normalize_response;
/// use serde_json::json;
///
/// let payload = json!({"choices": [{"message": {"content": "42"}}]});
/// assert_eq!(normalize_response(&payload), "42");
/// ```
pub fn normalize_response(payload: &Value) -> CanonicalAnswer {
    AgentResponsePayload::detect(payload).into_answer()
}

/// Representação textual de um valor JSON.
///
/// Strings são devolvidas sem aspas; qualquer outro valor vira JSON compacto
/// (chaves ordenadas, logo determinístico).
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────────
// Formatos
// ─────────────────────────────────────────────────

fn answer_from_output(items: &[Value]) -> CanonicalAnswer {
    let last_assistant = items
        .iter()
        .rev()
        .find(|item| field_is(item, "type", "message") && field_is(item, "role", "assistant"));

    let Some(message) = last_assistant else {
        // Sem mensagem do assistente: último item do array
        return items.last().map(render).unwrap_or_default();
    };

    let parts: Vec<String> = message
        .get("content")
        .and_then(Value::as_array)
        .map(|content| {
            content
                .iter()
                .filter(|part| field_is(part, "type", "output_text"))
                .filter_map(|part| present(part, "text"))
                .map(render)
                .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        render(message)
    } else {
        parts.join("\n")
    }
}

fn answer_from_messages(entries: &[Value]) -> CanonicalAnswer {
    entries
        .iter()
        .rev()
        .find(|entry| field_is(entry, "role", "assistant"))
        .or_else(|| entries.last())
        .map(content_or_render)
        .unwrap_or_default()
}

fn answer_from_choices(choices: &[Value]) -> CanonicalAnswer {
    choices
        .first()
        .map(|choice| {
            choice
                .get("message")
                .and_then(|message| present(message, "content"))
                .map(render)
                .unwrap_or_else(|| render(choice))
        })
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────

fn non_empty_array<'a>(payload: &'a Value, field: &str) -> Option<&'a [Value]> {
    payload
        .get(field)?
        .as_array()
        .filter(|items| !items.is_empty())
        .map(Vec::as_slice)
}

/// Campo presente e não-nulo
fn present<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get(field).filter(|v| !v.is_null())
}

fn field_is(value: &Value, field: &str, expected: &str) -> bool {
    value.get(field).and_then(Value::as_str) == Some(expected)
}

fn content_or_render(entry: &Value) -> String {
    present(entry, "content")
        .map(render)
        .unwrap_or_else(|| render(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Formato output[]
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_output_uses_last_assistant_message() {
        let payload = json!({
            "output": [
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "primeira"}
                ]},
                {"type": "function_call", "name": "sql"},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "linha 1"},
                    {"type": "reasoning", "text": "ignorado"},
                    {"type": "output_text", "text": "linha 2"}
                ]},
                {"type": "function_call_output", "output": "rows"}
            ]
        });

        assert_eq!(normalize_response(&payload), "linha 1\nlinha 2");
    }

    #[test]
    fn test_output_without_output_text_renders_message() {
        let message = json!({"type": "message", "role": "assistant", "content": [
            {"type": "refusal", "refusal": "no"}
        ]});
        let payload = json!({"output": [message.clone()]});

        assert_eq!(normalize_response(&payload), message.to_string());
    }

    #[test]
    fn test_output_with_empty_content_renders_message() {
        let message = json!({"type": "message", "role": "assistant", "content": []});
        let payload = json!({"output": [message.clone()]});

        assert_eq!(normalize_response(&payload), message.to_string());
    }

    #[test]
    fn test_output_without_assistant_uses_last_item() {
        let payload = json!({
            "output": [
                {"type": "message", "role": "user", "content": []},
                "texto solto"
            ]
        });

        assert_eq!(normalize_response(&payload), "texto solto");
    }

    #[test]
    fn test_empty_output_falls_through_to_messages() {
        let payload = json!({
            "output": [],
            "messages": [{"role": "assistant", "content": "do messages"}]
        });

        assert_eq!(normalize_response(&payload), "do messages");
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Formato messages[]
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_messages_last_assistant() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "pergunta"},
                {"role": "assistant", "content": "primeira"},
                {"role": "assistant", "content": "segunda"},
                {"role": "tool", "content": "resultado"}
            ]
        });

        assert_eq!(normalize_response(&payload), "segunda");
    }

    #[test]
    fn test_messages_without_assistant_uses_last_entry() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "pergunta"},
                {"role": "tool", "content": "resultado"}
            ]
        });

        assert_eq!(normalize_response(&payload), "resultado");
    }

    #[test]
    fn test_messages_without_content_renders_entry() {
        let entry = json!({"role": "assistant", "tool_calls": []});
        let payload = json!({"messages": [entry.clone()]});

        assert_eq!(normalize_response(&payload), entry.to_string());
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Formato choices[]
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_choices_first_message_content() {
        let payload = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "primeira"}},
                {"message": {"role": "assistant", "content": "segunda"}}
            ]
        });

        assert_eq!(normalize_response(&payload), "primeira");
    }

    #[test]
    fn test_choices_without_message_renders_choice() {
        let choice = json!({"index": 0, "text": "legacy completion"});
        let payload = json!({"choices": [choice.clone()]});

        assert_eq!(normalize_response(&payload), choice.to_string());
    }

    #[test]
    fn test_choices_message_without_content_renders_choice() {
        let choice = json!({"message": {"role": "assistant"}});
        let payload = json!({"choices": [choice.clone()]});

        assert_eq!(normalize_response(&payload), choice.to_string());
        assert!(normalize_response(&payload).contains(r#""role":"assistant""#));
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Campos ausentes e nulos
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_output_message_without_content_key_renders_message() {
        let message = json!({"type": "message", "role": "assistant"});
        let payload = json!({"output": [message.clone()]});

        assert_eq!(normalize_response(&payload), message.to_string());
    }

    #[test]
    fn test_messages_last_entry_without_content_renders_entry() {
        let payload = json!({"messages": [{"role": "user"}]});

        assert_eq!(normalize_response(&payload), r#"{"role":"user"}"#);
    }

    #[test]
    fn test_null_content_counts_as_absent() {
        let entry = json!({"role": "assistant", "content": null});
        let payload = json!({"messages": [entry.clone()]});

        // Renderiza a entrada inteira, nunca a string "null"
        assert_eq!(normalize_response(&payload), entry.to_string());
        assert_ne!(normalize_response(&payload), "null");
    }

    #[test]
    fn test_null_output_text_renders_message() {
        let message = json!({"type": "message", "role": "assistant", "content": [
            {"type": "output_text", "text": null}
        ]});
        let payload = json!({"output": [message.clone()]});

        assert_eq!(normalize_response(&payload), message.to_string());
    }

    #[test]
    fn test_null_choice_content_renders_choice() {
        let choice = json!({"message": {"content": null}});
        let payload = json!({"choices": [choice.clone()]});

        assert_eq!(normalize_response(&payload), r#"{"message":{"content":null}}"#);
        assert_eq!(normalize_response(&payload), choice.to_string());
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Prioridade e fallback
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_output_takes_priority_over_choices() {
        let payload = json!({
            "choices": [{"message": {"content": "choices"}}],
            "output": [{"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": "output"}
            ]}]
        });

        assert_eq!(AgentResponsePayload::detect(&payload).shape_name(), "output");
        assert_eq!(normalize_response(&payload), "output");
    }

    #[test]
    fn test_unknown_shape_renders_payload() {
        let payload = json!({"predictions": ["a", "b"]});
        assert_eq!(normalize_response(&payload), payload.to_string());

        let scalar = json!(42);
        assert_eq!(normalize_response(&scalar), "42");

        let array = json!([1, 2]);
        assert_eq!(normalize_response(&array), "[1,2]");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let payload = json!({"foo": {"b": 1, "a": 2}, "bar": null});
        assert_eq!(normalize_response(&payload), normalize_response(&payload));
    }
}
