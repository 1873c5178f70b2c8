//! Prompt construction for rewrite requests.
//!
//! Rendered with Handlebars: a fixed system directive plus a user prompt
//! carrying the content and the instructions. Multi-segment requests get
//! additional directives so the engine leaves non-applicable segments
//! alone and keeps edits consistent across the sequence of calls.

use handlebars::Handlebars;
use redraft_core::{AppError, AppResult};

/// Directives for a whole-file rewrite: transformed code only, whitespace
/// preserved, no unrequested edits, input returned unchanged when nothing
/// applies.
const SYSTEM_DIRECTIVE: &str = "You are an expert programmer. Modify the provided \
code according to the instructions. Return only the transformed code, with no \
explanations, commentary, or code fences. Preserve whitespace and indentation \
exactly. Make no edits beyond what the instructions require. If the instructions \
do not apply, return the input unchanged.";

/// Additional directives for segmented rewrites.
const SEGMENT_DIRECTIVE: &str = "The file has been split into consecutive segments \
and each request carries exactly one segment. Edit a segment only if the \
instructions apply to it; return non-applicable segments verbatim. Keep your edits \
consistent across all segments of the file. Preserve the block structure at the \
segment's boundaries.";

pub(crate) const SINGLE_USER_TEMPLATE: &str = "Here is the file content:\n\n\
{{{content}}}\n\nApply the following change:\n{{instructions}}";

pub(crate) const SEGMENT_USER_TEMPLATE: &str = "Here is segment {{index}} of \
{{total}} of the file:\n\n{{{content}}}\n\nApply the following change where it \
applies to this segment:\n{{instructions}}";

/// A prompt ready for engine execution.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    /// System message carrying the rewrite directives
    pub system: String,

    /// User message carrying content and instructions
    pub user: String,
}

/// Build the prompt for the single-segment path.
pub fn render_single(content: &str, instructions: &str) -> AppResult<BuiltPrompt> {
    let user = render_template(
        SINGLE_USER_TEMPLATE,
        &serde_json::json!({
            "content": content,
            "instructions": instructions,
        }),
    )?;

    Ok(BuiltPrompt {
        system: SYSTEM_DIRECTIVE.to_string(),
        user,
    })
}

/// Build the prompt for one segment of a multi-segment rewrite.
///
/// `index` is 1-based; `total` is the segment count.
pub fn render_segment(
    content: &str,
    instructions: &str,
    index: usize,
    total: usize,
) -> AppResult<BuiltPrompt> {
    let user = render_template(
        SEGMENT_USER_TEMPLATE,
        &serde_json::json!({
            "content": content,
            "instructions": instructions,
            "index": index,
            "total": total,
        }),
    )?;

    Ok(BuiltPrompt {
        system: format!("{} {}", SYSTEM_DIRECTIVE, SEGMENT_DIRECTIVE),
        user,
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &serde_json::Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Engine(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Engine(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single() {
        let built = render_single("x = 1\ny = 2", "rename x to total").unwrap();

        assert!(built.system.contains("Return only the transformed code"));
        assert!(built.user.contains("x = 1\ny = 2"));
        assert!(built.user.contains("rename x to total"));
        assert!(!built.user.contains("segment"));
    }

    #[test]
    fn test_render_segment_carries_position() {
        let built = render_segment("def f():\n    pass", "add a docstring", 2, 5).unwrap();

        assert!(built.user.contains("segment 2 of 5"));
        assert!(built.user.contains("def f():\n    pass"));
        assert!(built.system.contains("verbatim"));
        assert!(built.system.contains("consistent across all segments"));
    }

    #[test]
    fn test_no_html_escaping() {
        let built = render_single("if a < b && c > d:", "keep it").unwrap();
        assert!(built.user.contains("if a < b && c > d:"));
    }
}
