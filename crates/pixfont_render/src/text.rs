use crate::sink::PixelSink;
use log::trace;
use pixfont_codec::Font;
use pixfont_shared::types::{Point, Size};

/// Pen position in pixels. `y` is the baseline the glyph offsets are relative to.
pub type Cursor = Point<i32>;

/// Advance returned for character codes the font does not cover
pub const FALLBACK_ADVANCE: u8 = 0;

const LINE_BREAK: char = '\n';

/// `base + delta`, or `None` when the result is not a valid coordinate
fn displace(base: i32, delta: i64) -> Option<i32> {
    i32::try_from(i64::from(base) + delta).ok()
}

/// Text drawing with a configurable advance for codes outside the font's range.
///
/// Drawing never fails: unknown codes produce no pixels and move the cursor by
/// `fallback_advance`, so arbitrary input text can always be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRenderer {
    fallback_advance: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            fallback_advance: FALLBACK_ADVANCE,
        }
    }
}

impl TextRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fallback_advance(fallback_advance: u8) -> Self {
        Self { fallback_advance }
    }

    #[must_use]
    pub fn fallback_advance(&self) -> u8 {
        self.fallback_advance
    }

    /// Draws a single glyph with its pen position at `cursor` and returns the glyph's advance.
    pub fn draw_glyph<S>(
        &self,
        font: &Font<'_>,
        code: u32,
        cursor: Cursor,
        color: bool,
        sink: &mut S,
    ) -> u8
    where
        S: PixelSink + ?Sized,
    {
        let Some(glyph) = font.glyph(code) else {
            trace!("code U+{code:04X} not in font, skipping");
            return self.fallback_advance;
        };

        // Pixels that fall outside the i32 plane cannot be on any sink and are skipped
        for (col, row) in font.glyph_pixels(glyph) {
            let x = displace(cursor.x, i64::from(glyph.x_offset) + i64::from(col));
            let y = displace(cursor.y, i64::from(glyph.y_offset) + i64::from(row));
            if let (Some(x), Some(y)) = (x, y) {
                sink.write_pixel(x, y, color);
            }
        }

        glyph.x_advance
    }

    /// Draws `text` starting at `cursor` and returns the cursor after the last character.
    /// The cursor saturates at the edges of the i32 range.
    ///
    /// A line break moves back to the starting x and down by the font's line height. There is
    /// no wrapping; long lines run off the sink.
    pub fn draw_text<S>(
        &self,
        font: &Font<'_>,
        text: &str,
        cursor: Cursor,
        color: bool,
        sink: &mut S,
    ) -> Cursor
    where
        S: PixelSink + ?Sized,
    {
        let mut pen = cursor;
        for ch in text.chars() {
            if ch == LINE_BREAK {
                pen.x = cursor.x;
                pen.y = pen.y.saturating_add(i32::from(font.line_height()));
                continue;
            }
            let advance = self.draw_glyph(font, u32::from(ch), pen, color, sink);
            pen.x = pen.x.saturating_add(i32::from(advance));
        }
        pen
    }

    /// Size of the box `draw_text` moves the cursor through: the widest line's advance by the
    /// number of lines times the line height.
    #[must_use]
    pub fn measure_text(&self, font: &Font<'_>, text: &str) -> Size<i32> {
        if text.is_empty() {
            return Size::<i32>::ZERO;
        }

        let line_height = i32::from(font.line_height());
        let mut size = Size::new(0, line_height);
        let mut line_width: i32 = 0;
        for ch in text.chars() {
            if ch == LINE_BREAK {
                line_width = 0;
                size.height = size.height.saturating_add(line_height);
                continue;
            }
            let advance = font
                .glyph(u32::from(ch))
                .map_or(self.fallback_advance, |g| g.x_advance);
            line_width = line_width.saturating_add(i32::from(advance));
            size.width = size.width.max(line_width);
        }
        size
    }
}

/// [`TextRenderer::draw_glyph`] with the default fallback advance
pub fn draw_glyph<S>(font: &Font<'_>, code: u32, cursor: Cursor, color: bool, sink: &mut S) -> u8
where
    S: PixelSink + ?Sized,
{
    TextRenderer::default().draw_glyph(font, code, cursor, color, sink)
}

/// [`TextRenderer::draw_text`] with the default fallback advance
pub fn draw_text<S>(font: &Font<'_>, text: &str, cursor: Cursor, color: bool, sink: &mut S) -> Cursor
where
    S: PixelSink + ?Sized,
{
    TextRenderer::default().draw_text(font, text, cursor, color, sink)
}

/// [`TextRenderer::measure_text`] with the default fallback advance
#[must_use]
pub fn measure_text(font: &Font<'_>, text: &str) -> Size<i32> {
    TextRenderer::default().measure_text(font, text)
}
