//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid configuration, unsupported deficiency kinds and glyphs, and glyph
//! placement exhaustion.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported deficiency kind '{kind}'")]
    UnsupportedDeficiencyKind { kind: String },

    #[error("glyph source cannot render '{ch}'")]
    UnsupportedGlyph { ch: char },

    #[error("no free spot for glyph point ({x}, {y}) after {attempts} attempts")]
    GlyphPlacementExhausted { x: i32, y: i32, attempts: usize },
}
