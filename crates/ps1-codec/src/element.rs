use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    EnumIter,
    IntoStaticStr,
};

use crate::classifier;
use crate::style::Style;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_VARIABLE: &str = "VAR";
pub const DEFAULT_COMMAND: &str = "command";
pub const DEFAULT_WINDOW_TITLE: &str = "Terminal";

/// Every building block a prompt can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    // Time and date
    Date,
    DateFormatted,
    #[serde(rename = "time_24")]
    #[strum(serialize = "time_24")]
    Time24,
    #[serde(rename = "time_12")]
    #[strum(serialize = "time_12")]
    Time12,
    TimeAmpm,
    TimeNoSeconds,

    // User and system
    Username,
    HostnameShort,
    HostnameFull,
    WorkingDirectory,
    WorkingDirectoryBasename,

    // Control characters
    Newline,
    CarriageReturn,
    Bell,

    // Terminal info
    Terminal,
    Shell,
    BashVersion,
    BashRelease,

    // Command info
    HistoryNumber,
    CommandNumber,
    Jobs,
    PromptSign,
    ExitStatus,

    // Git
    GitBranch,
    GitAdvanced,

    // Network
    IpAddress,

    // Free-form
    Command,
    EnvironmentVariable,
    SetWindowTitle,
    Text,
    NerdFontGlyph,
    Symbol,
}

impl ElementKind {
    /// Wire name, e.g. `hostname_short`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::DateFormatted => "Date (formatted)",
            Self::Time24 => "Time (24-hour)",
            Self::Time12 => "Time (12-hour)",
            Self::TimeAmpm => "Time (am/pm)",
            Self::TimeNoSeconds => "Time (without seconds)",
            Self::Username => "Username",
            Self::HostnameShort => "Hostname (short)",
            Self::HostnameFull => "Hostname",
            Self::WorkingDirectory => "Working Directory",
            Self::WorkingDirectoryBasename => "Working Directory (Basename)",
            Self::Newline => "Newline",
            Self::CarriageReturn => "Carriage Return",
            Self::Bell => "Bell",
            Self::Terminal => "Terminal",
            Self::Shell => "Shell",
            Self::BashVersion => "Bash Version",
            Self::BashRelease => "Bash Release",
            Self::HistoryNumber => "History Number",
            Self::CommandNumber => "Command Number",
            Self::Jobs => "Jobs",
            Self::PromptSign => "Prompt Sign",
            Self::ExitStatus => "Exit Status",
            Self::GitBranch => "Git Branch",
            Self::GitAdvanced => "Git Branch + Status",
            Self::IpAddress => "IP Address",
            Self::Command => "Command",
            Self::EnvironmentVariable => "Environment Variable",
            Self::SetWindowTitle => "Window Title",
            Self::Text => "Text",
            Self::NerdFontGlyph => "Nerd Font Glyph",
            Self::Symbol => "Symbol",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Date => "Current date",
            Self::DateFormatted => "Date with custom format",
            Self::Time24 => "Time in 24-hour format",
            Self::Time12 => "Time in 12-hour format",
            Self::TimeAmpm => "Time with AM/PM",
            Self::TimeNoSeconds => "Time without seconds",
            Self::Username => "Current username",
            Self::HostnameShort => "Hostname up to first dot",
            Self::HostnameFull => "Full hostname",
            Self::WorkingDirectory => "Current working directory",
            Self::WorkingDirectoryBasename => "Basename of current directory",
            Self::Newline => "Line break",
            Self::CarriageReturn => "Carriage return",
            Self::Bell => "Bell character",
            Self::Terminal => "Terminal device name",
            Self::Shell => "Shell name",
            Self::BashVersion => "Bash version",
            Self::BashRelease => "Bash version with patch level",
            Self::HistoryNumber => "History number of this command",
            Self::CommandNumber => "Command number of this command",
            Self::Jobs => "Number of jobs currently managed",
            Self::PromptSign => "$ for regular user, # for root",
            Self::ExitStatus => "Exit status of last command",
            Self::GitBranch => "Current git branch",
            Self::GitAdvanced => "Current git branch and count of modified files",
            Self::IpAddress => "First local IP address",
            Self::Command => "Output of a shell command",
            Self::EnvironmentVariable => "Environment variable value",
            Self::SetWindowTitle => "Sets the terminal window title",
            Self::Text => "Custom text",
            Self::NerdFontGlyph => "Nerd Font icon",
            Self::Symbol => "Special character or symbol",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Date
            | Self::DateFormatted
            | Self::Time24
            | Self::Time12
            | Self::TimeAmpm
            | Self::TimeNoSeconds => "Time & Date",
            Self::Username
            | Self::HostnameShort
            | Self::HostnameFull
            | Self::WorkingDirectory
            | Self::WorkingDirectoryBasename => "User & System",
            Self::Newline | Self::CarriageReturn | Self::Bell => "Control",
            Self::Terminal | Self::Shell | Self::BashVersion | Self::BashRelease => "Terminal Info",
            Self::HistoryNumber | Self::CommandNumber | Self::Jobs | Self::PromptSign | Self::ExitStatus => {
                "Command Info"
            },
            Self::GitBranch | Self::GitAdvanced => "Git",
            Self::IpAddress => "Network",
            Self::Command
            | Self::EnvironmentVariable
            | Self::SetWindowTitle
            | Self::Text
            | Self::NerdFontGlyph
            | Self::Symbol => "Custom",
        }
    }

    /// Literal stored in an element's `value` when it is first created.
    pub fn canonical_value(self) -> &'static str {
        match self {
            Self::DateFormatted => "\\D{%Y-%m-%d}",
            Self::Command => "$(command)",
            Self::EnvironmentVariable => "$VAR",
            Self::SetWindowTitle => "\\[\\033]0;Terminal\\007\\]",
            Self::Text => "TEXT",
            Self::NerdFontGlyph => "GLYPH",
            Self::Symbol => "SYMBOL",
            kind => classifier::token_for(kind).unwrap_or_default(),
        }
    }

    /// Kinds whose expansion is driven by the element's override text.
    pub fn is_free_form(self) -> bool {
        matches!(
            self,
            Self::Command
                | Self::EnvironmentVariable
                | Self::SetWindowTitle
                | Self::Text
                | Self::NerdFontGlyph
                | Self::Symbol
        )
    }
}

/// One building block of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Only meaningful to the builder UI.
    #[serde(default = "new_element_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn new_element_id() -> String {
    format!("element-{}", uuid::Uuid::new_v4().simple())
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: new_element_id(),
            kind,
            label: kind.label().to_string(),
            value: kind.canonical_value().to_string(),
            style: None,
            custom_text: None,
            format: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).with_custom_text(text)
    }

    pub fn with_custom_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = Some(text.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Override text, treating an empty string as absent.
    pub fn override_text(&self) -> Option<&str> {
        self.custom_text.as_deref().filter(|text| !text.is_empty())
    }

    /// The data that determines this element's expansion.
    ///
    /// Free-form kinds yield their override text (or its default), the
    /// formatted date its format string, and every other kind its fixed token.
    /// Text-like kinds never yield an empty string: without override text or a
    /// stored value they fall back to the kind's canonical value.
    pub fn effective_text(&self) -> &str {
        match self.kind {
            ElementKind::Text | ElementKind::Symbol | ElementKind::NerdFontGlyph => self
                .override_text()
                .or_else(|| Some(self.value.as_str()).filter(|value| !value.is_empty()))
                .unwrap_or(self.kind.canonical_value()),
            ElementKind::DateFormatted => self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT),
            ElementKind::EnvironmentVariable => self.override_text().unwrap_or(DEFAULT_VARIABLE),
            ElementKind::Command => self.override_text().unwrap_or(DEFAULT_COMMAND),
            ElementKind::SetWindowTitle => self.override_text().unwrap_or(DEFAULT_WINDOW_TITLE),
            kind => classifier::token_for(kind).unwrap_or_default(),
        }
    }

    /// The element's style layered over an optional global style.
    ///
    /// Returns `None` when nothing would be emitted for the combination.
    pub fn effective_style(&self, global: Option<&Style>) -> Option<Style> {
        let style = match (&self.style, global) {
            (Some(own), Some(global)) => own.layered_over(global),
            (Some(own), None) => own.clone(),
            (None, Some(global)) => global.clone(),
            (None, None) => return None,
        };
        (!style.is_empty()).then_some(style)
    }
}

/// Ordered elements plus an optional global style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderState {
    pub elements: Vec<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_style: Option<Style>,
}

impl BuilderState {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            global_style: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
