//! BDF import
//!
//! Reads Glyph Bitmap Distribution Format fonts and turns a range of their glyphs into
//! [`GlyphDescription`]s for the codec.

mod convert;
mod errors;
mod parser;

pub use convert::{convert, GlyphSet};
pub use errors::BdfError;
pub use parser::{parse_bdf, BdfFont, BdfGlyph};
