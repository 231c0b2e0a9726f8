use thiserror::Error;

/// Errors raised while building, decoding or emitting a font. None of these can happen while
/// rendering: a [`crate::Font`] value is always valid once it exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FontError {
    #[error("malformed glyph 0x{code:02X}: {reason}")]
    MalformedGlyph { code: u16, reason: String },

    #[error("empty code range: last code 0x{last:02X} is below first code 0x{first:02X}")]
    EmptyRange { first: u16, last: u16 },

    #[error("expected {expected} glyph descriptions, found {found}")]
    GlyphCount { expected: usize, found: usize },

    #[error("glyph descriptions out of order: expected code 0x{expected:02X}, found 0x{found:02X}")]
    CodeMismatch { expected: u16, found: u16 },

    #[error("bitmap blob of {size} bytes does not fit the glyph offset field")]
    BitmapTooLarge { size: usize },

    #[error("cannot decode font: {0}")]
    Decode(String),

    #[error("cannot emit font source: {0}")]
    Emit(String),
}
