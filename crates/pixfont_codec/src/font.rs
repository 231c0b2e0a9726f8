use crate::errors::FontError;
use crate::packing::{row_bytes, GlyphPixels};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Rendering data for a single character code.
///
/// The field types follow the Adafruit GFX glyph record, with the bitmap offset widened to 32
/// bits so fonts with large glyph sets are not limited to a 64KiB blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph {
    /// Byte offset into the font's bitmap blob where this glyph's packed rows start
    pub bitmap_offset: u32,
    /// Bounding box width in pixels
    pub width: u8,
    /// Bounding box height in pixels
    pub height: u8,
    /// Distance to move the cursor after drawing this glyph
    pub x_advance: u8,
    /// Offset from the pen position to the left edge of the bitmap
    pub x_offset: i8,
    /// Offset from the pen position (baseline) to the top edge of the bitmap
    pub y_offset: i8,
}

impl Glyph {
    #[must_use]
    pub const fn new(
        bitmap_offset: u32,
        width: u8,
        height: u8,
        x_advance: u8,
        x_offset: i8,
        y_offset: i8,
    ) -> Self {
        Self {
            bitmap_offset,
            width,
            height,
            x_advance,
            x_offset,
            y_offset,
        }
    }

    /// Number of bytes a single packed row of this glyph takes
    #[must_use]
    pub fn row_bytes(&self) -> usize {
        row_bytes(self.width)
    }

    /// Number of bytes this glyph occupies in the bitmap blob
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.row_bytes() * usize::from(self.height)
    }

    fn byte_range(&self) -> std::ops::Range<usize> {
        let start = self.bitmap_offset as usize;
        start..start + self.byte_len()
    }
}

/// An immutable set of glyphs covering the contiguous code range `first_code..=last_code`.
///
/// The glyph table and the bitmap blob are either owned (fonts built or decoded at runtime) or
/// borrowed from static data (fonts compiled into the binary as generated source).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Font<'a> {
    first_code: u16,
    last_code: u16,
    line_height: u8,
    glyphs: Cow<'a, [Glyph]>,
    bitmap: Cow<'a, [u8]>,
}

impl Font<'static> {
    /// Wraps static tables that were generated by [`crate::emit_rust_module`]. The tables are not
    /// validated here; the generator only writes tables produced by [`crate::build_font`].
    #[must_use]
    pub const fn from_static(
        first_code: u16,
        last_code: u16,
        line_height: u8,
        glyphs: &'static [Glyph],
        bitmap: &'static [u8],
    ) -> Self {
        Self {
            first_code,
            last_code,
            line_height,
            glyphs: Cow::Borrowed(glyphs),
            bitmap: Cow::Borrowed(bitmap),
        }
    }
}

impl<'a> Font<'a> {
    /// Assembles a font from its parts, checking that the glyph table matches the code range
    /// and that every glyph's packed bytes lie inside the bitmap blob.
    pub fn from_parts(
        first_code: u16,
        last_code: u16,
        line_height: u8,
        glyphs: impl Into<Cow<'a, [Glyph]>>,
        bitmap: impl Into<Cow<'a, [u8]>>,
    ) -> Result<Self, FontError> {
        if last_code < first_code {
            return Err(FontError::EmptyRange {
                first: first_code,
                last: last_code,
            });
        }

        let glyphs = glyphs.into();
        let bitmap = bitmap.into();

        let expected = usize::from(last_code - first_code) + 1;
        if glyphs.len() != expected {
            return Err(FontError::GlyphCount {
                expected,
                found: glyphs.len(),
            });
        }

        for (code, glyph) in (first_code..=last_code).zip(glyphs.iter()) {
            if glyph.byte_range().end > bitmap.len() {
                return Err(FontError::MalformedGlyph {
                    code,
                    reason: format!(
                        "{} bytes at offset {} run past the {} byte bitmap",
                        glyph.byte_len(),
                        glyph.bitmap_offset,
                        bitmap.len()
                    ),
                });
            }
        }

        Ok(Self {
            first_code,
            last_code,
            line_height,
            glyphs,
            bitmap,
        })
    }

    #[must_use]
    pub fn first_code(&self) -> u16 {
        self.first_code
    }

    #[must_use]
    pub fn last_code(&self) -> u16 {
        self.last_code
    }

    /// Vertical distance between two baselines
    #[must_use]
    pub fn line_height(&self) -> u8 {
        self.line_height
    }

    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    #[must_use]
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Number of glyphs (and codes) in this font
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, code: u32) -> bool {
        code >= u32::from(self.first_code) && code <= u32::from(self.last_code)
    }

    /// Returns the glyph for the given character code, or `None` when the code is outside the
    /// font's range.
    #[must_use]
    pub fn glyph(&self, code: u32) -> Option<&Glyph> {
        if !self.contains(code) {
            return None;
        }
        self.glyphs
            .get((code - u32::from(self.first_code)) as usize)
    }

    /// The packed rows of a glyph. Empty when the glyph does not belong to this font's blob.
    #[must_use]
    pub fn glyph_bytes(&self, glyph: &Glyph) -> &[u8] {
        self.bitmap.get(glyph.byte_range()).unwrap_or(&[])
    }

    /// Iterates over the set pixels of a glyph as `(column, row)` pairs
    #[must_use]
    pub fn glyph_pixels(&self, glyph: &Glyph) -> GlyphPixels<'_> {
        GlyphPixels::new(self.glyph_bytes(glyph), glyph.width, glyph.height)
    }

    /// Mean advance over all glyphs, rounded down
    #[must_use]
    pub fn average_advance(&self) -> u8 {
        if self.glyphs.is_empty() {
            return 0;
        }
        let total: usize = self.glyphs.iter().map(|g| usize::from(g.x_advance)).sum();
        u8::try_from(total / self.glyphs.len()).unwrap_or(u8::MAX)
    }

    /// Height of the tallest glyph bitmap
    #[must_use]
    pub fn max_height(&self) -> u8 {
        self.glyphs.iter().map(|g| g.height).max().unwrap_or(0)
    }

    /// Detaches the font from any borrowed storage
    #[must_use]
    pub fn into_owned(self) -> Font<'static> {
        Font {
            first_code: self.first_code,
            last_code: self.last_code,
            line_height: self.line_height,
            glyphs: Cow::Owned(self.glyphs.into_owned()),
            bitmap: Cow::Owned(self.bitmap.into_owned()),
        }
    }
}
