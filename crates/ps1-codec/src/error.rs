/// Errors produced by the prompt codec.
///
/// Parsing never fails; only malformed color literals (while generating) and
/// unknown preset names surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid hex color '{0}': expected exactly 6 hexadecimal digits")]
    InvalidHex(String),

    #[error("Invalid rgb color '{0}': expected three comma-separated values between 0 and 255")]
    InvalidRgb(String),

    #[error("Preset '{0}' not found")]
    PresetNotFound(String),
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
