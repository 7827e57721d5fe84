//! Bidirectional codec between a visual prompt description and a bash `PS1` string.
//!
//! [`generate`] turns a [`BuilderState`] into a prompt string, [`parse`] reads a
//! prompt string back into elements with the styling active at each of them.

pub mod classifier;
pub mod color;
pub mod element;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod parser;
pub mod presets;
pub mod style;


pub use color::{
    Color,
    Layer,
    NamedColor,
    PALETTE,
};
pub use element::{
    BuilderState,
    Element,
    ElementKind,
};
pub use error::{
    CodecError,
    Result,
};
pub use generator::{
    export_script,
    generate,
};
pub use parser::parse;
pub use presets::PresetManager;
pub use style::{
    Style,
    StyleFragments,
};
