//! Prompt construction and completion-response code extraction.
//!
//! Both halves of the LLM round trip live here: the outbound prompt is plain
//! string assembly, and the inbound response is mined for code with the same
//! fence scanner the template parser uses.

use crate::domain::{DomainError, template::Template};

/// System prompt sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are an assistant specialized in generating Python code. \
    Output only the raw Python code based on the user's request, wrapped in \
    ```python markdown blocks.";

/// Sampling temperature: biased toward determinism over creativity.
pub const TEMPERATURE: f32 = 0.3;

/// Build the user prompt from a task description and a template skeleton.
///
/// The skeleton is the assembled template (or a verbatim source template) and
/// anchors the structure of the generated service.
pub fn build_prompt(description: &str, skeleton: &str) -> String {
    format!(
        "Generate Python code for the following task:\n\n{description}\n\n\
         Ensure the code is complete, correct, and follows best practices. \
         Output only the code itself. Please strictly implement the MCP service \
         according to the following template example:\n\n{skeleton}\n\n\
         Do not output any explanatory content, only the code"
    )
}

/// Extract source code from a completion response.
///
/// All fenced blocks are collected (language-tagged or not) and joined in
/// response order. When the model ignored the fencing instruction entirely,
/// the raw text is accepted only if it plausibly is Python; otherwise
/// extraction fails rather than writing prose to a `.py` file.
pub fn extract_code(response: &str) -> Result<String, DomainError> {
    let parsed = Template::parse(response);

    if !parsed.fragments.is_empty() {
        return Ok(parsed
            .fragments
            .iter()
            .map(|f| f.body.trim())
            .collect::<Vec<_>>()
            .join("\n"));
    }

    let trimmed = response.trim();
    if looks_like_python(trimmed) && !trimmed.is_empty() {
        return Ok(trimmed.to_string());
    }

    Err(DomainError::NoCodeInResponse)
}

/// Cheap shape check for un-fenced responses.
fn looks_like_python(text: &str) -> bool {
    text.contains("def ") || text.contains("import ") || text.contains("class ")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_description_and_skeleton() {
        let p = build_prompt("an echo service", "import mcp");
        assert!(p.contains("an echo service"));
        assert!(p.contains("import mcp"));
        assert!(p.contains("only the code"));
    }

    #[test]
    fn extracts_single_fenced_block() {
        let response = "Here you go:\n```python\nprint('hi')\n```\nEnjoy!";
        assert_eq!(extract_code(response).unwrap(), "print('hi')");
    }

    #[test]
    fn merges_multiple_fenced_blocks_in_order() {
        let response = "```python\nimport os\n```\ntext\n```python\nprint(os.name)\n```";
        assert_eq!(
            extract_code(response).unwrap(),
            "import os\nprint(os.name)"
        );
    }

    #[test]
    fn unfenced_python_is_accepted() {
        let response = "import sys\n\ndef main():\n    pass\n";
        assert_eq!(extract_code(response).unwrap(), response.trim());
    }

    #[test]
    fn unfenced_prose_is_rejected() {
        let response = "I'm sorry, I can't help with that request.";
        assert!(matches!(
            extract_code(response),
            Err(DomainError::NoCodeInResponse)
        ));
    }

    #[test]
    fn empty_response_is_rejected() {
        assert!(extract_code("").is_err());
        assert!(extract_code("   \n  ").is_err());
    }
}
