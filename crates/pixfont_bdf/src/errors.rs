use pixfont_codec::FontError;
use pixfont_shared::errors::ParseError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BdfError {
    #[error("bdf parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("no glyphs in code range 0x{first:02X}..=0x{last:02X}")]
    NoGlyphs { first: u16, last: u16 },

    #[error("glyph 0x{code:02X} is missing and filling gaps is disabled")]
    MissingGlyph { code: u16 },

    #[error("glyph 0x{code:02X}: {field} value {value} is out of range")]
    Metric {
        code: u16,
        field: &'static str,
        value: i64,
    },

    #[error(transparent)]
    Codec(#[from] FontError),
}
