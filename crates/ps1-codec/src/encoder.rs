use crate::classifier;
use crate::element::{
    Element,
    ElementKind,
};
use crate::error::Result;
use crate::style::Style;

/// Expansion of an element without any styling.
pub fn expand(element: &Element) -> String {
    let text = element.effective_text();
    match element.kind {
        ElementKind::Text | ElementKind::Symbol | ElementKind::NerdFontGlyph => text.to_string(),
        ElementKind::DateFormatted => format!("\\D{{{text}}}"),
        ElementKind::EnvironmentVariable => format!("${text}"),
        ElementKind::Command => format!("$({text})"),
        ElementKind::SetWindowTitle => format!("\\[\\033]0;{text}\\007\\]"),
        ElementKind::GitBranch => classifier::GIT_BRANCH_PIPELINE.to_string(),
        ElementKind::GitAdvanced => classifier::GIT_ADVANCED_PIPELINE.to_string(),
        ElementKind::IpAddress => classifier::IP_ADDRESS_PIPELINE.to_string(),
        ElementKind::PromptSign => "\\$".to_string(),
        ElementKind::Date
        | ElementKind::Time24
        | ElementKind::Time12
        | ElementKind::TimeAmpm
        | ElementKind::TimeNoSeconds
        | ElementKind::Username
        | ElementKind::HostnameShort
        | ElementKind::HostnameFull
        | ElementKind::WorkingDirectory
        | ElementKind::WorkingDirectoryBasename
        | ElementKind::Newline
        | ElementKind::CarriageReturn
        | ElementKind::Bell
        | ElementKind::Terminal
        | ElementKind::Shell
        | ElementKind::BashVersion
        | ElementKind::BashRelease
        | ElementKind::HistoryNumber
        | ElementKind::CommandNumber
        | ElementKind::Jobs
        | ElementKind::ExitStatus => text.to_string(),
    }
}

/// Encodes an element with its own style.
pub fn encode(element: &Element) -> Result<String> {
    encode_with_style(element, element.style.as_ref())
}

/// Encodes an element wrapped in the fragments of `style`.
///
/// The fragments are emitted even around zero-width expansions so that every
/// start fragment has its matching reset.
pub fn encode_with_style(element: &Element, style: Option<&Style>) -> Result<String> {
    let expansion = expand(element);
    let Some(style) = style else {
        return Ok(expansion);
    };

    let fragments = style.encode()?;
    if fragments.is_empty() {
        return Ok(expansion);
    }
    Ok(format!("{}{}{}", fragments.start, expansion, fragments.end))
}
