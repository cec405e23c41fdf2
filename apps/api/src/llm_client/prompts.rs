// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Substitutes `{name}` placeholders in a single pass. Inserted values are not
/// scanned again, so user text containing `{answer}` and the like stays literal.
/// Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let matched = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });
        match matched {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Closing instruction appended to candidate-facing prompts.
pub const PROFESSIONAL_TONE: &str = "Keep the tone professional and constructive.";

/// Wraps a free-form message with `key: value` context lines.
/// Replace: {context}, {message}
pub const CONTEXTUAL_PROMPT_TEMPLATE: &str = r#"Previous Context:
{context}

Current Message:
{message}

Please provide a relevant response while maintaining the conversation context."#;
