use tracing::debug;

use crate::element::BuilderState;
use crate::encoder;
use crate::error::Result;

/// Prompt produced for a state without elements.
pub const FALLBACK_PROMPT: &str = "\\$ ";

/// Concatenates the encoded elements of `state` into one prompt string.
pub fn generate(state: &BuilderState) -> Result<String> {
    if state.elements.is_empty() {
        return Ok(FALLBACK_PROMPT.to_string());
    }

    let global = state.global_style.as_ref();
    let mut ps1 = String::new();
    for element in &state.elements {
        let style = element.effective_style(global);
        ps1.push_str(&encoder::encode_with_style(element, style.as_ref())?);
    }

    debug!(elements = state.elements.len(), bytes = ps1.len(), "generated prompt");
    Ok(ps1)
}

/// Wraps a prompt into a script that exports it.
///
/// The value is single-quoted so command substitutions run at prompt time
/// rather than when the script is sourced.
pub fn export_script(ps1: &str) -> String {
    format!(
        "#!/bin/bash\n# Generated PS1 script\nexport PS1='{}'\n",
        ps1.replace('\'', "'\\''")
    )
}
