use lazy_static::lazy_static;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::trace;

use crate::color::{
    Color,
    Layer,
};
use crate::error::Result;

/// Zero-width full reset closing every styled span.
pub const RESET_FRAGMENT: &str = "\\[\\e[0m\\]";

// Escape introducers accepted in front of `[`: the bash `\e`, octal `\033`,
// hex `\x1b` spellings and the raw ESC byte.
const SGR_PATTERN: &str = r"(?:\\e|\\033|\\x1[bB]|\x1b)\[(?P<sgr>[0-9;]*)m";
const TPUT_PATTERN: &str =
    r"\$\(tput\s+(?P<cap>bold|dim|smul|rmul|blink|rev|sgr0|sitm|ritm|setaf|setab)(?:\s+(?P<arg>[0-9]+))?\s*\)";

lazy_static! {
    /// Any single style sequence, used to walk the body of a matched fragment.
    static ref STYLE_SEQUENCE: Regex = Regex::new(&format!("{SGR_PATTERN}|{TPUT_PATTERN}")).unwrap();

    /// A complete style fragment anchored at the start of the haystack: a
    /// zero-width marker holding only style sequences, or one bare sequence.
    pub(crate) static ref STYLE_FRAGMENT: Regex = {
        let sequence = format!("(?:{}|{})", strip_names(SGR_PATTERN), strip_names(TPUT_PATTERN));
        Regex::new(&format!(r"^(?:\\\[{sequence}*\\\]|{sequence})")).unwrap()
    };
}

fn strip_names(pattern: &str) -> String {
    pattern
        .replace("?P<sgr>", "")
        .replace("?P<cap>", "")
        .replace("?P<arg>", "")
}

/// Visual attributes attached to an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dim: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub blink: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

/// Opening and closing escape fragments for one styled span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFragments {
    pub start: String,
    pub end: String,
}

impl StyleFragments {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// True when no attribute is set and no color is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// SGR codes in their fixed emission order.
    pub fn codes(&self) -> Result<Vec<String>> {
        let attributes = [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.blink, "5"),
            (self.reverse, "7"),
            (self.strikethrough, "9"),
            (self.overline, "53"),
        ];

        let mut codes: Vec<String> = attributes
            .iter()
            .filter(|(active, _)| *active)
            .map(|(_, code)| (*code).to_string())
            .collect();

        if let Some(foreground) = &self.foreground {
            codes.push(foreground.extended_params(Layer::Foreground)?);
        }
        if let Some(background) = &self.background {
            codes.push(background.extended_params(Layer::Background)?);
        }

        Ok(codes)
    }

    /// Encodes the style as one combined SGR sequence wrapped in a zero-width
    /// marker, closed by a zero-width full reset.
    pub fn encode(&self) -> Result<StyleFragments> {
        let codes = self.codes()?;
        if codes.is_empty() {
            return Ok(StyleFragments::default());
        }

        Ok(StyleFragments {
            start: format!("\\[\\e[{}m\\]", codes.join(";")),
            end: RESET_FRAGMENT.to_string(),
        })
    }

    /// Decodes every style sequence inside `token` on top of `current`.
    pub fn decode_token(token: &str, current: &Style) -> Style {
        let mut style = current.clone();
        for caps in STYLE_SEQUENCE.captures_iter(token) {
            if let Some(params) = caps.name("sgr") {
                style.apply_sgr(params.as_str());
            } else if let Some(capability) = caps.name("cap") {
                style.apply_tput(capability.as_str(), caps.name("arg").map(|arg| arg.as_str()));
            }
        }
        style
    }

    /// Applies a `;`-separated SGR parameter list. An empty list is a reset.
    pub fn apply_sgr(&mut self, params: &str) {
        let mut codes = params
            .split(';')
            .map(|param| if param.is_empty() { 0 } else { param.parse::<u16>().unwrap_or(u16::MAX) });

        while let Some(code) = codes.next() {
            match code {
                0 => *self = Self::default(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => self.underline = true,
                5 => self.blink = true,
                7 => self.reverse = true,
                9 => self.strikethrough = true,
                53 => self.overline = true,
                22 => {
                    self.bold = false;
                    self.dim = false;
                },
                23 => self.italic = false,
                24 => self.underline = false,
                25 => self.blink = false,
                27 => self.reverse = false,
                29 => self.strikethrough = false,
                55 => self.overline = false,
                38 => {
                    if let Some(color) = Color::from_extended(&mut codes) {
                        self.foreground = Some(color);
                    }
                },
                48 => {
                    if let Some(color) = Color::from_extended(&mut codes) {
                        self.background = Some(color);
                    }
                },
                39 => self.foreground = None,
                49 => self.background = None,
                _ => match Color::from_basic_code(code) {
                    Some((layer, color)) => self.set_color(layer, color),
                    None => trace!(code, "ignoring unknown SGR code"),
                },
            }
        }
    }

    /// Applies a named terminal capability as `tput` would emit it.
    pub fn apply_tput(&mut self, capability: &str, argument: Option<&str>) {
        let index = argument.and_then(|arg| arg.parse::<u8>().ok());
        match (capability, index) {
            ("bold", _) => self.bold = true,
            ("dim", _) => self.dim = true,
            ("smul", _) => self.underline = true,
            ("rmul", _) => self.underline = false,
            ("sitm", _) => self.italic = true,
            ("ritm", _) => self.italic = false,
            ("blink", _) => self.blink = true,
            ("rev", _) => self.reverse = true,
            ("sgr0", _) => *self = Self::default(),
            ("setaf", Some(index)) => self.foreground = Some(Color::ansi(index)),
            ("setab", Some(index)) => self.background = Some(Color::ansi(index)),
            _ => trace!(capability, ?argument, "ignoring unknown tput capability"),
        }
    }

    /// Overlays this style on `base`: attributes combine, own colors win.
    pub fn layered_over(&self, base: &Style) -> Style {
        Style {
            bold: self.bold || base.bold,
            dim: self.dim || base.dim,
            italic: self.italic || base.italic,
            underline: self.underline || base.underline,
            blink: self.blink || base.blink,
            reverse: self.reverse || base.reverse,
            strikethrough: self.strikethrough || base.strikethrough,
            overline: self.overline || base.overline,
            foreground: self.foreground.clone().or_else(|| base.foreground.clone()),
            background: self.background.clone().or_else(|| base.background.clone()),
        }
    }

    /// Same style with both colors in canonical form.
    pub fn normalized(&self) -> Style {
        Style {
            foreground: self.foreground.as_ref().map(Color::normalized),
            background: self.background.as_ref().map(Color::normalized),
            ..self.clone()
        }
    }

    fn set_color(&mut self, layer: Layer, color: Color) {
        match layer {
            Layer::Foreground => self.foreground = Some(color),
            Layer::Background => self.background = Some(color),
        }
    }
}
