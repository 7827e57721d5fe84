use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    CodecError,
    Result,
};

/// Which half of a cell a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

impl Layer {
    fn basic_base(self) -> u16 {
        match self {
            Self::Foreground => 30,
            Self::Background => 40,
        }
    }

    fn bright_base(self) -> u16 {
        match self {
            Self::Foreground => 90,
            Self::Background => 100,
        }
    }

    fn extended(self) -> u16 {
        match self {
            Self::Foreground => 38,
            Self::Background => 48,
        }
    }
}

/// A color descriptor as exchanged with the builder UI.
///
/// Serialized as `{"type": "ansi", "value": 1, "bright": true}`,
/// `{"type": "rgb", "value": "255,0,0"}` or `{"type": "hex", "value": "#ff0000"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Color {
    /// Palette index: 0-7 normal, 8-15 bright, up to 255 for the 256-color form.
    Ansi {
        value: u8,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        bright: bool,
    },
    /// Pre-joined `"R,G,B"` channels.
    Rgb { value: String },
    /// Six hex digits with an optional leading `#`.
    Hex { value: String },
}

impl Color {
    pub fn ansi(value: u8) -> Self {
        Self::Ansi { value, bright: false }
    }

    pub fn bright(value: u8) -> Self {
        Self::Ansi { value, bright: true }
    }

    pub fn hex(value: impl Into<String>) -> Self {
        Self::Hex { value: value.into() }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb {
            value: format!("{r},{g},{b}"),
        }
    }

    /// Builds the hex color used when a 24-bit SGR sequence is decoded.
    pub fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self::Hex {
            value: to_hex(r, g, b),
        }
    }

    /// Effective palette index, folding the brightness flag into 8-15.
    pub fn palette_index(&self) -> Option<u8> {
        match self {
            Self::Ansi { value, bright } => Some(effective_index(*value, *bright)),
            Self::Rgb { .. } | Self::Hex { .. } => None,
        }
    }

    /// Red, green and blue channels for the truecolor variants.
    pub fn channels(&self) -> Result<Option<(u8, u8, u8)>> {
        match self {
            Self::Ansi { .. } => Ok(None),
            Self::Rgb { value } => parse_rgb(value).map(Some),
            Self::Hex { value } => parse_hex(value).map(Some),
        }
    }

    /// Canonical form used to compare colors that render identically.
    ///
    /// Palette colors fold their brightness flag into the index and truecolor
    /// colors become lowercase hex. Malformed literals are returned unchanged.
    pub fn normalized(&self) -> Self {
        match self.palette_index() {
            Some(index) => Self::ansi(index),
            None => match self.channels() {
                Ok(Some((r, g, b))) => Self::from_channels(r, g, b),
                _ => self.clone(),
            },
        }
    }

    /// Short SGR parameters: `31`, `91`, `38;5;N` or `38;2;R;G;B`.
    pub(crate) fn basic_params(&self, layer: Layer) -> Result<String> {
        match self.palette_index() {
            Some(index) if index < 8 => Ok((layer.basic_base() + u16::from(index)).to_string()),
            Some(index) if index < 16 => Ok((layer.bright_base() + u16::from(index - 8)).to_string()),
            _ => self.extended_params(layer),
        }
    }

    /// Extended SGR parameters: `38;5;N` for palette colors, `38;2;R;G;B` otherwise.
    pub(crate) fn extended_params(&self, layer: Layer) -> Result<String> {
        let introducer = layer.extended();
        match self {
            Self::Ansi { value, bright } => Ok(format!("{introducer};5;{}", effective_index(*value, *bright))),
            Self::Rgb { value } => {
                let (r, g, b) = parse_rgb(value)?;
                Ok(format!("{introducer};2;{r};{g};{b}"))
            },
            Self::Hex { value } => {
                let (r, g, b) = parse_hex(value)?;
                Ok(format!("{introducer};2;{r};{g};{b}"))
            },
        }
    }

    /// Decodes one of the single-parameter color codes (30-37, 40-47, 90-97, 100-107).
    pub(crate) fn from_basic_code(code: u16) -> Option<(Layer, Self)> {
        let (layer, color) = match code {
            30..=37 => (Layer::Foreground, Self::ansi((code - 30) as u8)),
            40..=47 => (Layer::Background, Self::ansi((code - 40) as u8)),
            90..=97 => (Layer::Foreground, Self::bright((code - 90) as u8)),
            100..=107 => (Layer::Background, Self::bright((code - 100) as u8)),
            _ => return None,
        };
        Some((layer, color))
    }

    /// Decodes the parameters following a `38` or `48` introducer.
    ///
    /// `5;N` consumes two parameters and `2;R;G;B` consumes four. Any other mode
    /// consumes only the mode itself. Out-of-range values are consumed but
    /// produce no color.
    pub(crate) fn from_extended<I>(params: &mut I) -> Option<Self>
    where
        I: Iterator<Item = u16>,
    {
        match params.next()? {
            5 => {
                let index = params.next()?;
                u8::try_from(index).ok().map(Self::ansi)
            },
            2 => {
                let r = params.next();
                let g = params.next();
                let b = params.next();
                let channel = |c: Option<u16>| c.and_then(|c| u8::try_from(c).ok());
                Some(Self::from_channels(channel(r)?, channel(g)?, channel(b)?))
            },
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi { value, bright: true } => write!(f, "ansi:{value} (bright)"),
            Self::Ansi { value, .. } => write!(f, "ansi:{value}"),
            Self::Rgb { value } => write!(f, "rgb:{value}"),
            Self::Hex { value } => write!(f, "hex:{value}"),
        }
    }
}

fn effective_index(value: u8, bright: bool) -> u8 {
    if bright && value < 8 { value + 8 } else { value }
}

/// Foreground escape parameters for a single color.
pub fn encode_foreground(color: &Color) -> Result<String> {
    color.basic_params(Layer::Foreground)
}

/// Background escape parameters for a single color.
pub fn encode_background(color: &Color) -> Result<String> {
    color.basic_params(Layer::Background)
}

/// Splits a hex literal into its channels. A leading `#` is optional.
pub fn parse_hex(literal: &str) -> Result<(u8, u8, u8)> {
    let digits = literal.strip_prefix('#').unwrap_or(literal);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidHex(literal.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| CodecError::InvalidHex(literal.to_string()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Splits an `"R,G,B"` literal into its channels.
pub fn parse_rgb(literal: &str) -> Result<(u8, u8, u8)> {
    let invalid = || CodecError::InvalidRgb(literal.to_string());
    let mut parts = literal.split(',').map(|part| part.trim().parse::<u8>().map_err(|_| invalid()));

    let r = parts.next().ok_or_else(invalid)??;
    let g = parts.next().ok_or_else(invalid)??;
    let b = parts.next().ok_or_else(invalid)??;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((r, g, b))
}

pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// One of the sixteen named terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub index: u8,
    pub hex: &'static str,
}

impl NamedColor {
    pub fn color(&self) -> Color {
        Color::ansi(self.index)
    }
}

/// Reference RGB values follow the Tango palette most terminals ship with.
pub const PALETTE: [NamedColor; 16] = [
    NamedColor { name: "Black", index: 0, hex: "#000000" },
    NamedColor { name: "Red", index: 1, hex: "#cc0000" },
    NamedColor { name: "Green", index: 2, hex: "#4e9a06" },
    NamedColor { name: "Yellow", index: 3, hex: "#c4a000" },
    NamedColor { name: "Blue", index: 4, hex: "#3465a4" },
    NamedColor { name: "Magenta", index: 5, hex: "#75507b" },
    NamedColor { name: "Cyan", index: 6, hex: "#06989a" },
    NamedColor { name: "White", index: 7, hex: "#d3d7cf" },
    NamedColor { name: "Bright Black", index: 8, hex: "#555753" },
    NamedColor { name: "Bright Red", index: 9, hex: "#ef2929" },
    NamedColor { name: "Bright Green", index: 10, hex: "#8ae234" },
    NamedColor { name: "Bright Yellow", index: 11, hex: "#fce94f" },
    NamedColor { name: "Bright Blue", index: 12, hex: "#729fcf" },
    NamedColor { name: "Bright Magenta", index: 13, hex: "#ad7fa8" },
    NamedColor { name: "Bright Cyan", index: 14, hex: "#34e2e2" },
    NamedColor { name: "Bright White", index: 15, hex: "#eeeeec" },
];

/// Looks up a palette color by name, ignoring case, spaces, dashes and underscores.
pub fn named(name: &str) -> Option<NamedColor> {
    let wanted: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    PALETTE
        .iter()
        .find(|entry| entry.name.replace(' ', "").to_ascii_lowercase() == wanted)
        .copied()
}
