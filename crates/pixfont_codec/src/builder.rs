use crate::errors::FontError;
use crate::font::{Font, Glyph};
use crate::packing::{pack_rows, row_bytes};
use log::{debug, trace};

/// A parsed glyph as delivered by a font source: the pixel grid plus the metrics to place it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphDescription {
    pub code: u16,
    /// `height` rows of at least `width` pixels, `true` being foreground
    pub rows: Vec<Vec<bool>>,
    pub width: u8,
    pub height: u8,
    pub x_advance: u8,
    pub x_offset: i8,
    pub y_offset: i8,
}

impl GlyphDescription {
    /// A glyph without any pixels, only an advance (spaces and filler entries)
    #[must_use]
    pub fn blank(code: u16, x_advance: u8) -> Self {
        Self {
            code,
            rows: Vec::new(),
            width: 0,
            height: 0,
            x_advance,
            x_offset: 0,
            y_offset: 0,
        }
    }

    /// Builds a description from rows of text where `#` marks a set pixel and any other
    /// character an unset one. Width is the length of the longest row. Patterns larger than
    /// 255 pixels in either direction do not fit a glyph and are `MalformedGlyph`.
    pub fn from_pattern(
        code: u16,
        pattern: &[&str],
        x_advance: u8,
        x_offset: i8,
        y_offset: i8,
    ) -> Result<Self, FontError> {
        let rows: Vec<Vec<bool>> = pattern
            .iter()
            .map(|row| row.chars().map(|c| c == '#').collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let too_large = |what: &str, size: usize| FontError::MalformedGlyph {
            code,
            reason: format!("pattern is {size} pixels {what}, at most 255 fit"),
        };

        Ok(Self {
            code,
            width: u8::try_from(width).map_err(|_| too_large("wide", width))?,
            height: u8::try_from(rows.len()).map_err(|_| too_large("high", rows.len()))?,
            rows,
            x_advance,
            x_offset,
            y_offset,
        })
    }

    fn check_geometry(&self) -> Result<(), FontError> {
        if self.rows.len() != usize::from(self.height) {
            return Err(FontError::MalformedGlyph {
                code: self.code,
                reason: format!(
                    "bitmap has {} rows, declared height is {}",
                    self.rows.len(),
                    self.height
                ),
            });
        }

        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() < usize::from(self.width))
        {
            return Err(FontError::MalformedGlyph {
                code: self.code,
                reason: format!(
                    "row {idx} has {} pixels, declared width is {}",
                    row.len(),
                    self.width
                ),
            });
        }

        Ok(())
    }
}

/// Packs one description per code of `first_code..=last_code` (in ascending order) into a font.
///
/// Every glyph's rows are appended to a single shared bitmap blob; the glyph record keeps the
/// offset where its rows start. No partial font is returned on error.
pub fn build_font(
    descriptions: &[GlyphDescription],
    first_code: u16,
    last_code: u16,
    line_height: u8,
) -> Result<Font<'static>, FontError> {
    if last_code < first_code {
        return Err(FontError::EmptyRange {
            first: first_code,
            last: last_code,
        });
    }

    let expected = usize::from(last_code - first_code) + 1;
    if descriptions.len() != expected {
        return Err(FontError::GlyphCount {
            expected,
            found: descriptions.len(),
        });
    }

    let bitmap_len: usize = descriptions
        .iter()
        .map(|d| row_bytes(d.width) * usize::from(d.height))
        .sum();
    if u32::try_from(bitmap_len).is_err() {
        return Err(FontError::BitmapTooLarge { size: bitmap_len });
    }

    let mut bitmap = Vec::with_capacity(bitmap_len);
    let mut glyphs = Vec::with_capacity(expected);

    for (code, desc) in (first_code..=last_code).zip(descriptions) {
        if desc.code != code {
            return Err(FontError::CodeMismatch {
                expected: code,
                found: desc.code,
            });
        }
        desc.check_geometry()?;

        let offset = u32::try_from(bitmap.len())
            .map_err(|_| FontError::BitmapTooLarge { size: bitmap.len() })?;
        let packed = pack_rows(&desc.rows, desc.width);
        trace!(
            "packed glyph 0x{code:02X}: {}x{} into {} bytes at offset {offset}",
            desc.width,
            desc.height,
            packed.len()
        );
        bitmap.extend_from_slice(&packed);

        glyphs.push(Glyph::new(
            offset,
            desc.width,
            desc.height,
            desc.x_advance,
            desc.x_offset,
            desc.y_offset,
        ));
    }

    debug!(
        "built font 0x{first_code:02X}..=0x{last_code:02X}: {} glyphs, {} bitmap bytes",
        glyphs.len(),
        bitmap.len()
    );

    Font::from_parts(first_code, last_code, line_height, glyphs, bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::unpack_rows;

    fn letter_a() -> GlyphDescription {
        GlyphDescription::from_pattern(
            0x41,
            &[
                "..#..", //
                ".#.#.",
                "#...#",
                "#####",
                "#...#",
                "#...#",
                "#...#",
            ],
            6,
            0,
            -7,
        )
        .unwrap()
    }

    fn letter_b() -> GlyphDescription {
        GlyphDescription::from_pattern(
            0x42,
            &[
                "####.", //
                "#...#",
                "#...#",
                "####.",
                "#...#",
                "#...#",
                "####.",
            ],
            6,
            0,
            -7,
        )
        .unwrap()
    }

    #[test]
    fn builds_shared_blob() {
        let font = build_font(&[letter_a(), letter_b()], 0x41, 0x42, 8).unwrap();

        assert_eq!(font.first_code(), 0x41);
        assert_eq!(font.last_code(), 0x42);
        assert_eq!(font.line_height(), 8);
        assert_eq!(font.bitmap().len(), 14);
        assert_eq!(
            font.glyphs(),
            &[Glyph::new(0, 5, 7, 6, 0, -7), Glyph::new(7, 5, 7, 6, 0, -7)]
        );
        assert_eq!(&font.bitmap()[..3], &[0b0010_0000, 0b0101_0000, 0b1000_1000]);
    }

    #[test]
    fn oversized_pattern_is_malformed() {
        let wide = "#".repeat(300);
        let err = GlyphDescription::from_pattern(0x57, &[wide.as_str()], 8, 0, 0).unwrap_err();
        assert!(matches!(err, FontError::MalformedGlyph { code: 0x57, ref reason } if reason.contains("300 pixels wide")));

        let tall = vec!["#"; 256];
        let err = GlyphDescription::from_pattern(0x54, &tall, 2, 0, 0).unwrap_err();
        assert!(matches!(err, FontError::MalformedGlyph { code: 0x54, ref reason } if reason.contains("256 pixels high")));

        let widest = "#".repeat(255);
        let desc = GlyphDescription::from_pattern(0x57, &[widest.as_str()], 8, 0, 0).unwrap();
        assert_eq!((desc.width, desc.height), (255, 1));
    }

    #[test]
    fn round_trip_every_glyph() {
        let descriptions = vec![
            letter_a(),
            letter_b(),
            GlyphDescription::blank(0x43, 4),
            GlyphDescription::from_pattern(0x44, &["#.........#", "...........", ".#########."], 12, -1, -3).unwrap(),
        ];
        let font = build_font(&descriptions, 0x41, 0x44, 9).unwrap();

        for desc in &descriptions {
            let glyph = font.glyph(u32::from(desc.code)).unwrap();
            let bytes = font.glyph_bytes(glyph);
            assert_eq!(bytes.len(), glyph.row_bytes() * usize::from(glyph.height));
            assert_eq!(unpack_rows(bytes, glyph.width, glyph.height), desc.rows);
        }
    }

    #[test]
    fn padding_is_zero() {
        let wide = GlyphDescription {
            code: 0x20,
            rows: vec![vec![true; 20]; 3],
            width: 11,
            height: 3,
            x_advance: 12,
            x_offset: 0,
            y_offset: -3,
        };
        let font = build_font(&[wide], 0x20, 0x20, 4).unwrap();
        assert_eq!(font.bitmap(), &[0xFF, 0xE0, 0xFF, 0xE0, 0xFF, 0xE0]);
    }

    #[test]
    fn empty_range() {
        let err = build_font(&[letter_a()], 0x42, 0x41, 8).unwrap_err();
        assert_eq!(
            err,
            FontError::EmptyRange {
                first: 0x42,
                last: 0x41
            }
        );
    }

    #[test]
    fn wrong_row_count() {
        let mut a = letter_a();
        a.rows.pop();
        let err = build_font(&[a], 0x41, 0x41, 8).unwrap_err();
        assert!(matches!(err, FontError::MalformedGlyph { code: 0x41, .. }));
    }

    #[test]
    fn short_row() {
        let mut b = letter_b();
        b.rows[3].truncate(4);
        let err = build_font(&[letter_a(), b], 0x41, 0x42, 8).unwrap_err();
        assert_eq!(
            err,
            FontError::MalformedGlyph {
                code: 0x42,
                reason: "row 3 has 4 pixels, declared width is 5".into()
            }
        );
    }

    #[test]
    fn descriptions_must_match_range() {
        let err = build_font(&[letter_a()], 0x41, 0x42, 8).unwrap_err();
        assert_eq!(
            err,
            FontError::GlyphCount {
                expected: 2,
                found: 1
            }
        );

        let err = build_font(&[letter_b(), letter_a()], 0x41, 0x42, 8).unwrap_err();
        assert_eq!(
            err,
            FontError::CodeMismatch {
                expected: 0x41,
                found: 0x42
            }
        );
    }

    #[test]
    fn logs_summary() {
        testing_logger::setup();
        build_font(&[letter_a()], 0x41, 0x41, 8).unwrap();
        testing_logger::validate(|captured_logs| {
            let debug: Vec<_> = captured_logs
                .iter()
                .filter(|l| l.level == log::Level::Debug)
                .collect();
            assert_eq!(debug.len(), 1);
            assert!(debug[0].body.contains("1 glyphs, 7 bitmap bytes"));
        });
    }
}
