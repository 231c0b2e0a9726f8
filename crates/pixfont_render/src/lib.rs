//! Glyph renderer
//!
//! Draws glyphs from a [`pixfont_codec::Font`] through a [`PixelSink`]. Only set pixels are
//! written; the renderer never clears, never clips and keeps no state between calls besides the
//! cursor handed back to the caller.

mod cycle;
mod framebuffer;
mod sink;
mod text;

pub use cycle::{next_index, FontCycle};
pub use framebuffer::MonoFramebuffer;
pub use sink::PixelSink;
pub use text::{draw_glyph, draw_text, measure_text, Cursor, TextRenderer, FALLBACK_ADVANCE};
