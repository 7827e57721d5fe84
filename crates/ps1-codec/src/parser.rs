//! Single-pass tokenizer turning a raw prompt string back into elements.
//!
//! At every position the rules are tried in a fixed order:
//!
//! 1. a style fragment (zero-width marker, known `tput` substitution or raw SGR escape) updates the
//!    running style and emits nothing;
//! 2. an element token (`\u`, `\D{..}`, `$?`, `$(..)`, `$NAME`, ...) emits one element;
//! 3. a maximal run of literal characters emits one text element;
//! 4. otherwise a single character is emitted as text.
//!
//! Every element carries a copy of the style active when it was read. Delimiter searches are
//! precomputed or memoized so the whole pass stays linear in the input length.

use std::collections::HashMap;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{
    debug,
    trace,
};

use crate::classifier;
use crate::element::{
    BuilderState,
    Element,
    ElementKind,
};
use crate::style::{
    STYLE_FRAGMENT,
    Style,
};

lazy_static! {
    static ref VARIABLE: Regex =
        Regex::new(r"^\$(?:\{[A-Za-z_][A-Za-z0-9_]*\}|[A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

const TITLE_OPENERS: [&str; 3] = ["\\[\\033]0;", "\\[\\e]0;", "\\[\\x1b]0;"];
const TITLE_TERMINATORS: [&str; 2] = ["\\007\\]", "\\a\\]"];

/// Parses a raw prompt string into a builder state.
///
/// This never fails: anything that is not recognized ends up as text.
pub fn parse(raw: &str) -> BuilderState {
    let elements = Tokenizer::new(raw).run();
    debug!(bytes = raw.len(), elements = elements.len(), "parsed prompt");
    BuilderState::new(elements)
}

/// An element token located in the input.
struct Token {
    kind: ElementKind,
    end: usize,
    /// Override text, or format string for the formatted date.
    payload: Option<Range<usize>>,
}

/// Forward search for a fixed needle that remembers its last answer.
///
/// Queries must arrive with non-decreasing start positions, which the
/// tokenizer guarantees since it never moves backwards.
struct Finder {
    needle: &'static str,
    cached: Option<Option<usize>>,
}

impl Finder {
    fn new(needle: &'static str) -> Self {
        Self { needle, cached: None }
    }

    fn find_from(&mut self, haystack: &str, from: usize) -> Option<usize> {
        match self.cached {
            Some(Some(at)) if at >= from => return Some(at),
            Some(None) => return None,
            _ => {},
        }

        let found = haystack[from..].find(self.needle).map(|offset| from + offset);
        self.cached = Some(found);
        found
    }
}

struct Tokenizer<'a> {
    input: &'a str,
    style: Style,
    next_id: usize,
    /// Byte offset of every `(` mapped to its matching `)`.
    closing_parens: HashMap<usize, usize>,
    closing_brace: Finder,
    title_terminators: [Finder; 2],
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            style: Style::default(),
            next_id: 0,
            closing_parens: match_parens(input),
            closing_brace: Finder::new("}"),
            title_terminators: TITLE_TERMINATORS.map(Finder::new),
        }
    }

    fn run(mut self) -> Vec<Element> {
        let input = self.input;
        let mut elements = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            if let Some(end) = self.match_style(pos) {
                let fragment = &input[pos..end];
                self.style = Style::decode_token(fragment, &self.style);
                trace!(fragment, "style fragment");
                pos = end;
                continue;
            }

            if let Some(token) = self.match_element(pos) {
                let mut element = self.element(token.kind, &input[pos..token.end]);
                let payload = token.payload.map(|span| input[span].to_string());
                match token.kind {
                    ElementKind::DateFormatted => element.format = payload,
                    _ => element.custom_text = payload,
                }
                trace!(kind = token.kind.name(), value = element.value.as_str(), "element token");
                elements.push(element);
                pos = token.end;
                continue;
            }

            let mut end = self.literal_end(pos);
            if end == pos {
                end = pos + input[pos..].chars().next().map_or(1, char::len_utf8);
            }
            let element = self
                .element(ElementKind::Text, ElementKind::Text.canonical_value())
                .with_custom_text(&input[pos..end]);
            elements.push(element);
            pos = end;
        }

        elements
    }

    fn element(&mut self, kind: ElementKind, value: &str) -> Element {
        let id = format!("parsed-{}", self.next_id);
        self.next_id += 1;

        Element {
            id,
            kind,
            label: kind.label().to_string(),
            value: value.to_string(),
            style: (!self.style.is_empty()).then(|| self.style.clone()),
            custom_text: None,
            format: None,
        }
    }

    fn match_style(&self, pos: usize) -> Option<usize> {
        let rest = &self.input[pos..];
        if !rest.starts_with(['\\', '$', '\x1b']) {
            return None;
        }
        STYLE_FRAGMENT.find(rest).map(|found| pos + found.end())
    }

    fn match_element(&mut self, pos: usize) -> Option<Token> {
        let input = self.input;
        let mut chars = input[pos..].chars();
        match chars.next()? {
            '\\' => match chars.next()? {
                'D' => self.match_formatted_date(pos),
                '[' => self.match_window_title(pos),
                escape => classifier::kind_for_escape(escape).map(|kind| Token {
                    kind,
                    end: pos + 1 + escape.len_utf8(),
                    payload: None,
                }),
            },
            '$' => self.match_expansion(pos),
            _ => None,
        }
    }

    fn match_formatted_date(&mut self, pos: usize) -> Option<Token> {
        if !self.input[pos..].starts_with("\\D{") {
            return None;
        }

        let open = pos + 3;
        let close = self.closing_brace.find_from(self.input, open)?;
        Some(Token {
            kind: ElementKind::DateFormatted,
            end: close + 1,
            payload: Some(open..close),
        })
    }

    fn match_window_title(&mut self, pos: usize) -> Option<Token> {
        let input = self.input;
        let opener = TITLE_OPENERS.iter().find(|opener| input[pos..].starts_with(*opener))?;

        let start = pos + opener.len();
        let (close, terminator_len) = self
            .title_terminators
            .iter_mut()
            .filter_map(|finder| finder.find_from(input, start).map(|at| (at, finder.needle.len())))
            .min()?;

        if close == start {
            return None;
        }
        Some(Token {
            kind: ElementKind::SetWindowTitle,
            end: close + terminator_len,
            payload: Some(start..close),
        })
    }

    fn match_expansion(&self, pos: usize) -> Option<Token> {
        let rest = &self.input[pos..];

        if let Some((kind, literal)) = classifier::match_fixed_expansion(rest) {
            return Some(Token {
                kind,
                end: pos + literal.len(),
                payload: None,
            });
        }

        if rest.starts_with("$(") {
            let close = *self.closing_parens.get(&(pos + 1))?;
            if close == pos + 2 {
                return None;
            }
            return Some(Token {
                kind: ElementKind::Command,
                end: close + 1,
                payload: Some(pos + 2..close),
            });
        }

        // The braced form keeps its braces so the element expands back to the same bytes.
        let caps = VARIABLE.captures(rest)?;
        let end = pos + caps.get(0)?.end();
        Some(Token {
            kind: ElementKind::EnvironmentVariable,
            end,
            payload: Some(pos + 1..end),
        })
    }

    /// End of the literal run starting at `start`.
    ///
    /// Only `\`, `$` and ESC can open a fragment; the run stops at the first of
    /// them that actually does. Rules 1 and 2 already failed at `start`, so the
    /// first character always belongs to the run.
    fn literal_end(&mut self, start: usize) -> usize {
        let input = self.input;
        for (offset, ch) in input[start..].char_indices().skip(1) {
            if !matches!(ch, '\\' | '$' | '\x1b') {
                continue;
            }
            let at = start + offset;
            if self.match_style(at).is_some() || self.match_element(at).is_some() {
                return at;
            }
        }
        input.len()
    }
}

fn match_parens(input: &str) -> HashMap<usize, usize> {
    let mut open = Vec::new();
    let mut pairs = HashMap::new();
    for (at, byte) in input.bytes().enumerate() {
        match byte {
            b'(' => open.push(at),
            b')' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, at);
                }
            },
            _ => {},
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::color::Color;

    fn kinds(state: &BuilderState) -> Vec<ElementKind> {
        state.elements.iter().map(|element| element.kind).collect()
    }

    fn texts(state: &BuilderState) -> Vec<&str> {
        state.elements.iter().map(Element::effective_text).collect()
    }

    #[test]
    fn test_parse_classic_prompt() {
        let state = parse("\\u@\\h:\\w\\$ ");
        assert_eq!(
            kinds(&state),
            vec![
                ElementKind::Username,
                ElementKind::Text,
                ElementKind::HostnameShort,
                ElementKind::Text,
                ElementKind::WorkingDirectory,
                ElementKind::PromptSign,
                ElementKind::Text,
            ]
        );
        assert_eq!(texts(&state), vec!["\\u", "@", "\\h", ":", "\\w", "\\$", " "]);
        assert!(state.elements.iter().all(|element| element.style.is_none()));
        assert_eq!(state.elements[0].label, "Username");
        assert_eq!(state.elements[0].value, "\\u");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_whitespace_is_kept() {
        let state = parse("  ");
        assert_eq!(texts(&state), vec!["  "]);
    }

    #[test]
    fn test_extended_color_does_not_eat_text() {
        let state = parse("\\[\\e[38;5;213m\\]5;1 text");
        assert_eq!(state.elements.len(), 1);
        assert_eq!(state.elements[0].custom_text.as_deref(), Some("5;1 text"));
        let style = state.elements[0].style.as_ref().unwrap();
        assert_eq!(style.foreground, Some(Color::ansi(213)));
        assert!(!style.bold && !style.blink);
    }

    #[test]
    fn test_style_snapshots_are_independent() {
        let state = parse("\\[\\e[1m\\]a\\[\\e[31m\\]b\\[\\e[0m\\]c");
        assert_eq!(texts(&state), vec!["a", "b", "c"]);

        let first = state.elements[0].style.as_ref().unwrap();
        assert!(first.bold);
        assert_eq!(first.foreground, None);

        let second = state.elements[1].style.as_ref().unwrap();
        assert!(second.bold);
        assert_eq!(second.foreground, Some(Color::ansi(1)));

        assert!(state.elements[2].style.is_none());
    }

    #[test]
    fn test_literal_runs_are_greedy() {
        let state = parse("hello, world! cost: $5 (maybe) \\x");
        assert_eq!(texts(&state), vec!["hello, world! cost: $5 (maybe) \\x"]);
    }

    #[test]
    fn test_literal_run_stops_at_boundaries() {
        let state = parse("[\\t] ok\\e[1mbold");
        assert_eq!(texts(&state), vec!["[", "\\t", "] ok", "bold"]);
        assert!(state.elements[3].style.as_ref().unwrap().bold);
    }

    #[test]
    fn test_raw_and_octal_escapes() {
        let state = parse("\x1b[1;32m>\x1b[0m \\033[4mu\\033[0m");
        assert_eq!(texts(&state), vec![">", " ", "u"]);

        let first = state.elements[0].style.as_ref().unwrap();
        assert!(first.bold);
        assert_eq!(first.foreground, Some(Color::ansi(2)));
        assert!(state.elements[1].style.is_none());
        assert!(state.elements[2].style.as_ref().unwrap().underline);
    }

    #[test]
    fn test_tput_fragments() {
        let state = parse("\\[$(tput bold)$(tput setaf 4)\\]\\w\\[$(tput sgr0)\\] $(tput cols)");
        assert_eq!(
            kinds(&state),
            vec![ElementKind::WorkingDirectory, ElementKind::Text, ElementKind::Command]
        );
        let style = state.elements[0].style.as_ref().unwrap();
        assert!(style.bold);
        assert_eq!(style.foreground, Some(Color::ansi(4)));
        assert_eq!(state.elements[2].custom_text.as_deref(), Some("tput cols"));
    }

    #[test]
    fn test_structured_tokens() {
        let state = parse(
            "\\D{%H:%M}$?$(whoami)$HOME${USER}\\[\\033]0;dev\\007\\]$(git branch --show-current 2>/dev/null)$(hostname -I | awk '{print $1}')",
        );
        assert_eq!(
            kinds(&state),
            vec![
                ElementKind::DateFormatted,
                ElementKind::ExitStatus,
                ElementKind::Command,
                ElementKind::EnvironmentVariable,
                ElementKind::EnvironmentVariable,
                ElementKind::SetWindowTitle,
                ElementKind::GitBranch,
                ElementKind::IpAddress,
            ]
        );
        assert_eq!(state.elements[0].format.as_deref(), Some("%H:%M"));
        assert_eq!(state.elements[2].custom_text.as_deref(), Some("whoami"));
        assert_eq!(state.elements[3].custom_text.as_deref(), Some("HOME"));
        assert_eq!(state.elements[4].custom_text.as_deref(), Some("{USER}"));
        assert_eq!(state.elements[4].value, "${USER}");
        assert_eq!(state.elements[5].custom_text.as_deref(), Some("dev"));
    }

    #[test]
    fn test_git_advanced_is_not_split() {
        let state = parse(classifier::GIT_ADVANCED_PIPELINE);
        assert_eq!(kinds(&state), vec![ElementKind::GitAdvanced]);
    }

    #[test]
    fn test_nested_command_substitution() {
        let state = parse("$(echo $(date +%s))!");
        assert_eq!(kinds(&state), vec![ElementKind::Command, ElementKind::Text]);
        assert_eq!(state.elements[0].custom_text.as_deref(), Some("echo $(date +%s)"));
    }

    #[test]
    fn test_unterminated_sequences_become_text() {
        for raw in ["$(oops", "\\D{%H", "\\[\\033]0;title", "\\e[1;2", "$()", "\\"] {
            let state = parse(raw);
            assert_eq!(kinds(&state), vec![ElementKind::Text], "{raw}");
            assert_eq!(state.elements[0].custom_text.as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_unknown_escape_then_known() {
        let state = parse("\\q\\u");
        assert_eq!(texts(&state), vec!["\\q", "\\u"]);
        assert_eq!(state.elements[1].kind, ElementKind::Username);
    }

    #[test]
    fn test_ids_are_local_to_each_parse() {
        let state = parse("\\u \\h");
        let ids: Vec<&str> = state.elements.iter().map(|element| element.id.as_str()).collect();
        assert_eq!(ids, vec!["parsed-0", "parsed-1", "parsed-2"]);

        let again = parse("\\u");
        assert_eq!(again.elements[0].id, "parsed-0");
    }

    #[test]
    fn test_multibyte_text() {
        let state = parse("→ λ \\W ✨");
        assert_eq!(texts(&state), vec!["→ λ ", "\\W", " ✨"]);
    }

    #[test]
    fn test_pathological_inputs_finish() {
        for unit in ["$(", "\\D{", "\\[\\033]0;", "\\[\\e[1m", "\\e[", "$"] {
            let raw = unit.repeat(20_000);
            let state = parse(&raw);
            let rebuilt: String = texts(&state).concat();
            assert!(!state.is_empty(), "{unit}");
            assert!(rebuilt.len() <= raw.len(), "{unit}");
        }
    }

    #[test]
    fn test_finder_reuses_answers() {
        let haystack = "ab}cd}";
        let mut finder = Finder::new("}");
        assert_eq!(finder.find_from(haystack, 0), Some(2));
        assert_eq!(finder.find_from(haystack, 1), Some(2));
        assert_eq!(finder.find_from(haystack, 3), Some(5));
        assert_eq!(finder.find_from(haystack, 6), None);
        assert_eq!(finder.find_from(haystack, 6), None);
    }

    #[test]
    #[traced_test]
    fn test_parse_logs_summary() {
        parse("\\u");
        assert!(logs_contain("parsed prompt"));
    }
}
