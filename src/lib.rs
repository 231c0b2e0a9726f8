//! Packed 1bpp proportional bitmap fonts.
//!
//! This crate bundles the pixfont workspace: the font codec, the glyph renderer, the BDF
//! importer and the configuration store. The tools in `src/bin` are built on top of it.

pub use pixfont_bdf as bdf;
pub use pixfont_codec as codec;
pub use pixfont_config as config;
pub use pixfont_render as render;
pub use pixfont_shared as shared;

pub mod fonts;

pub mod prelude {
    pub use crate::codec::{build_font, Font, FontError, Glyph, GlyphDescription};
    pub use crate::render::{draw_glyph, draw_text, measure_text, Cursor, MonoFramebuffer, PixelSink, TextRenderer};
    pub use crate::shared::types::{Point, Size};
}
