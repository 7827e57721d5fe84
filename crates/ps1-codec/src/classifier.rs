//! Bidirectional table between literal prompt tokens and element kinds.

use crate::element::ElementKind;

pub const EXIT_STATUS_TOKEN: &str = "$?";

pub const GIT_BRANCH_PIPELINE: &str = "$(git branch --show-current 2>/dev/null)";

pub const GIT_ADVANCED_PIPELINE: &str = concat!(
    "$(git branch --show-current 2>/dev/null)",
    "$(git status --porcelain 2>/dev/null | wc -l | sed \"s/^0$//\" | sed \"s/^/ +/\")"
);

pub const IP_ADDRESS_PIPELINE: &str = "$(hostname -I | awk '{print $1}')";

/// Fixed expansions, longest first so that a pipeline sharing a prefix with
/// a shorter one is never cut short.
const FIXED_EXPANSIONS: [(&str, ElementKind); 4] = [
    (GIT_ADVANCED_PIPELINE, ElementKind::GitAdvanced),
    (GIT_BRANCH_PIPELINE, ElementKind::GitBranch),
    (IP_ADDRESS_PIPELINE, ElementKind::IpAddress),
    (EXIT_STATUS_TOKEN, ElementKind::ExitStatus),
];

/// Kind named by the character following a backslash.
pub fn kind_for_escape(escape: char) -> Option<ElementKind> {
    let kind = match escape {
        'a' => ElementKind::Bell,
        'd' => ElementKind::Date,
        'h' => ElementKind::HostnameShort,
        'H' => ElementKind::HostnameFull,
        'j' => ElementKind::Jobs,
        'l' => ElementKind::Terminal,
        'n' => ElementKind::Newline,
        'r' => ElementKind::CarriageReturn,
        's' => ElementKind::Shell,
        't' => ElementKind::Time24,
        'T' => ElementKind::Time12,
        '@' => ElementKind::TimeAmpm,
        'A' => ElementKind::TimeNoSeconds,
        'u' => ElementKind::Username,
        'v' => ElementKind::BashVersion,
        'V' => ElementKind::BashRelease,
        'w' => ElementKind::WorkingDirectory,
        'W' => ElementKind::WorkingDirectoryBasename,
        '!' => ElementKind::HistoryNumber,
        '#' => ElementKind::CommandNumber,
        '$' => ElementKind::PromptSign,
        _ => return None,
    };
    Some(kind)
}

/// Fixed literal for kinds whose expansion never varies.
///
/// Free-form kinds and the formatted date depend on element data and have no
/// fixed literal.
pub fn token_for(kind: ElementKind) -> Option<&'static str> {
    let token = match kind {
        ElementKind::Bell => "\\a",
        ElementKind::Date => "\\d",
        ElementKind::HostnameShort => "\\h",
        ElementKind::HostnameFull => "\\H",
        ElementKind::Jobs => "\\j",
        ElementKind::Terminal => "\\l",
        ElementKind::Newline => "\\n",
        ElementKind::CarriageReturn => "\\r",
        ElementKind::Shell => "\\s",
        ElementKind::Time24 => "\\t",
        ElementKind::Time12 => "\\T",
        ElementKind::TimeAmpm => "\\@",
        ElementKind::TimeNoSeconds => "\\A",
        ElementKind::Username => "\\u",
        ElementKind::BashVersion => "\\v",
        ElementKind::BashRelease => "\\V",
        ElementKind::WorkingDirectory => "\\w",
        ElementKind::WorkingDirectoryBasename => "\\W",
        ElementKind::HistoryNumber => "\\!",
        ElementKind::CommandNumber => "\\#",
        ElementKind::PromptSign => "\\$",
        ElementKind::ExitStatus => EXIT_STATUS_TOKEN,
        ElementKind::GitBranch => GIT_BRANCH_PIPELINE,
        ElementKind::GitAdvanced => GIT_ADVANCED_PIPELINE,
        ElementKind::IpAddress => IP_ADDRESS_PIPELINE,
        ElementKind::DateFormatted
        | ElementKind::Command
        | ElementKind::EnvironmentVariable
        | ElementKind::SetWindowTitle
        | ElementKind::Text
        | ElementKind::NerdFontGlyph
        | ElementKind::Symbol => return None,
    };
    Some(token)
}

/// Matches one of the fixed `$`-introduced expansions at the start of `input`.
pub fn match_fixed_expansion(input: &str) -> Option<(ElementKind, &'static str)> {
    FIXED_EXPANSIONS
        .iter()
        .find(|(literal, _)| input.starts_with(literal))
        .map(|(literal, kind)| (*kind, *literal))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_escape_table_is_bidirectional() {
        let escapes = "adhHjlnrstT@AuvVwW!#$";
        for escape in escapes.chars() {
            let kind = kind_for_escape(escape).unwrap();
            assert_eq!(token_for(kind), Some(format!("\\{escape}").as_str()), "{kind:?}");
        }

        let single_escapes = ElementKind::iter()
            .filter_map(token_for)
            .filter(|token| token.starts_with('\\'))
            .count();
        assert_eq!(single_escapes, escapes.chars().count());
    }

    #[test]
    fn test_every_fixed_token_classifies_back() {
        for kind in ElementKind::iter() {
            let Some(token) = token_for(kind) else {
                assert!(kind.is_free_form() || kind == ElementKind::DateFormatted, "{kind:?}");
                continue;
            };

            let classified = match token.strip_prefix('\\') {
                Some(rest) => rest.chars().next().and_then(kind_for_escape),
                None => match_fixed_expansion(token).map(|(kind, _)| kind),
            };
            assert_eq!(classified, Some(kind), "{token}");
        }
    }

    #[test]
    fn test_longest_pipeline_wins() {
        assert_eq!(
            match_fixed_expansion(GIT_ADVANCED_PIPELINE),
            Some((ElementKind::GitAdvanced, GIT_ADVANCED_PIPELINE))
        );
        let branch_then_text = format!("{GIT_BRANCH_PIPELINE} ");
        assert_eq!(
            match_fixed_expansion(&branch_then_text),
            Some((ElementKind::GitBranch, GIT_BRANCH_PIPELINE))
        );
        assert_eq!(match_fixed_expansion("$?x").map(|(kind, _)| kind), Some(ElementKind::ExitStatus));
        assert_eq!(match_fixed_expansion("$(whoami)"), None);
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(kind_for_escape('x'), None);
        assert_eq!(kind_for_escape('e'), None);
        assert_eq!(kind_for_escape('['), None);
    }
}
