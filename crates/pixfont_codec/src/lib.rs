//! Font codec
//!
//! Turns glyph descriptions (a pixel grid plus metrics per character) into a compact [`Font`]:
//! one flat glyph table and one shared blob of packed bitmap rows. Rows are packed most
//! significant bit first and every row starts on a byte boundary, so a glyph of `w x h` pixels
//! takes exactly `ceil(w / 8) * h` bytes.
//!
//! Besides the in-memory model this crate holds the binary container format (`.pxf`) and the
//! emitters that write a font out as C or Rust source.

mod builder;
mod container;
mod emit;
mod errors;
mod font;
pub mod packing;

pub use builder::{build_font, GlyphDescription};
pub use container::{FORMAT_MAGIC, GLYPH_RECORD_LEN, HEADER_LEN};
pub use emit::{emit_gfx_header, emit_rust_module, sanitize_identifier};
pub use errors::FontError;
pub use font::{Font, Glyph};
