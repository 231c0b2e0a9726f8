use crate::errors::BdfError;
use crate::parser::{parse_bdf, BdfFont, BdfGlyph};
use log::{debug, warn};
use pixfont_codec::{build_font, Font, GlyphDescription};

/// Glyph descriptions for a contiguous code range, ready for [`build_font`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    pub first_code: u16,
    pub last_code: u16,
    pub line_height: u8,
    pub descriptions: Vec<GlyphDescription>,
}

impl GlyphSet {
    pub fn build(&self) -> Result<Font<'static>, BdfError> {
        Ok(build_font(
            &self.descriptions,
            self.first_code,
            self.last_code,
            self.line_height,
        )?)
    }
}

fn metric<T: TryFrom<i64>>(code: u16, field: &'static str, value: i64) -> Result<T, BdfError> {
    T::try_from(value).map_err(|_| BdfError::Metric { code, field, value })
}

fn describe(code: u16, glyph: &BdfGlyph) -> Result<GlyphDescription, BdfError> {
    let width: u8 = metric(code, "BBX width", glyph.bbx_width)?;
    let height: u8 = metric(code, "BBX height", glyph.bbx_height)?;

    // BDF measures the box bottom up from the baseline, the font format measures the box top
    // down from the baseline.
    let y_offset = glyph
        .bbx_yoff
        .checked_add(glyph.bbx_height)
        .and_then(i64::checked_neg)
        .ok_or(BdfError::Metric {
            code,
            field: "BBX y offset",
            value: glyph.bbx_yoff,
        })?;

    Ok(GlyphDescription {
        code,
        rows: if width == 0 || height == 0 {
            vec![Vec::new(); usize::from(height)]
        } else {
            glyph.pixel_rows()
        },
        width,
        height,
        x_advance: metric(code, "DWIDTH", glyph.dwidth)?,
        x_offset: metric(code, "BBX x offset", glyph.bbx_xoff)?,
        y_offset: metric(code, "BBX y offset", y_offset)?,
    })
}

impl BdfFont {
    /// Selects the glyphs with codes in `first..=last`. The resulting range runs from the lowest
    /// to the highest code actually present. Codes missing in between become empty glyphs with
    /// no advance when `fill_missing` is set, and are an error otherwise.
    pub fn to_glyph_set(&self, first: u16, last: u16, fill_missing: bool) -> Result<GlyphSet, BdfError> {
        let mut present = self
            .glyphs
            .range(i64::from(first)..=i64::from(last))
            .map(|(code, glyph)| (*code, glyph))
            .peekable();

        let Some(&(low, _)) = present.peek() else {
            return Err(BdfError::NoGlyphs { first, last });
        };
        // The range query keeps codes inside u16
        let first_code = u16::try_from(low).unwrap_or(first);
        let last_code = self
            .glyphs
            .range(i64::from(first)..=i64::from(last))
            .next_back()
            .and_then(|(code, _)| u16::try_from(*code).ok())
            .unwrap_or(first_code);

        let line_height = self.line_height();
        let line_height: u8 = u8::try_from(line_height).map_err(|_| BdfError::Metric {
            code: first_code,
            field: "FONT_ASCENT + FONT_DESCENT",
            value: line_height,
        })?;

        let mut descriptions = Vec::with_capacity(usize::from(last_code - first_code) + 1);
        for code in first_code..=last_code {
            match self.glyphs.get(&i64::from(code)) {
                Some(glyph) => descriptions.push(describe(code, glyph)?),
                None if fill_missing => {
                    warn!("bdf: no glyph for 0x{code:02X}, inserting an empty one");
                    descriptions.push(GlyphDescription::blank(code, 0));
                }
                None => return Err(BdfError::MissingGlyph { code }),
            }
        }

        debug!(
            "bdf: selected {} glyphs 0x{first_code:02X}..=0x{last_code:02X} from '{}'",
            descriptions.len(),
            self.name
        );

        Ok(GlyphSet {
            first_code,
            last_code,
            line_height,
            descriptions,
        })
    }

    /// Builds a font from the glyphs with codes in `first..=last`, see [`BdfFont::to_glyph_set`]
    pub fn to_font(&self, first: u16, last: u16, fill_missing: bool) -> Result<Font<'static>, BdfError> {
        self.to_glyph_set(first, last, fill_missing)?.build()
    }
}

/// Parses BDF text and builds a font from the glyphs with codes in `first..=last`
pub fn convert(source: &str, first: u16, last: u16, fill_missing: bool) -> Result<Font<'static>, BdfError> {
    parse_bdf(source)?.to_font(first, last, fill_missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::SMALL_BDF;
    use pixfont_codec::packing::unpack_rows;
    use pixfont_codec::{FontError, Glyph};

    #[test]
    fn selects_present_range() {
        let set = parse_bdf(SMALL_BDF).unwrap().to_glyph_set(32, 126, true).unwrap();
        assert_eq!(set.first_code, 32);
        assert_eq!(set.last_code, 65);
        assert_eq!(set.line_height, 6);
        assert_eq!(set.descriptions.len(), 34);
        assert_eq!(set.descriptions[2], GlyphDescription::blank(34, 0));
    }

    #[test]
    fn converts_metrics() {
        let font = convert(SMALL_BDF, 32, 126, true).unwrap();

        // BBX 3 5 0 -1: top of the box is 4 pixels above the baseline
        let a = font.glyph(65).unwrap();
        assert_eq!((a.width, a.height, a.x_advance, a.x_offset, a.y_offset), (3, 5, 4, 0, -4));

        let exclam = font.glyph(33).unwrap();
        assert_eq!(*exclam, Glyph::new(1, 1, 4, 4, 1, -4));

        let rows = unpack_rows(font.glyph_bytes(a), a.width, a.height);
        let art: Vec<String> = rows
            .iter()
            .map(|r| r.iter().map(|on| if *on { '#' } else { '.' }).collect())
            .collect();
        assert_eq!(art, vec![".#.", "#.#", "###", "#.#", "#.#"]);
    }

    #[test]
    fn narrower_range() {
        let font = convert(SMALL_BDF, 33, 64, true).unwrap();
        assert_eq!((font.first_code(), font.last_code()), (33, 33));
    }

    #[test]
    fn gaps_without_filling() {
        let err = convert(SMALL_BDF, 32, 126, false).unwrap_err();
        assert_eq!(err, BdfError::MissingGlyph { code: 34 });

        let font = convert(SMALL_BDF, 32, 33, false).unwrap();
        assert_eq!(font.len(), 2);
    }

    #[test]
    fn empty_selection() {
        let err = convert(SMALL_BDF, 66, 126, true).unwrap_err();
        assert_eq!(err, BdfError::NoGlyphs { first: 66, last: 126 });
    }

    #[test]
    fn metric_out_of_range() {
        let src = "FONT_ASCENT 5\nENCODING 65\nDWIDTH 300 0\nBBX 1 1 0 0\nBITMAP\n80\nENDCHAR\n";
        let err = convert(src, 0, 255, true).unwrap_err();
        assert_eq!(
            err,
            BdfError::Metric {
                code: 65,
                field: "DWIDTH",
                value: 300
            }
        );
    }

    #[test]
    fn extreme_y_offset() {
        let src = "ENCODING 65\nDWIDTH 2 0\nBBX 1 1 0 9223372036854775807\nBITMAP\n80\nENDCHAR\n";
        let err = convert(src, 65, 65, true).unwrap_err();
        assert_eq!(
            err,
            BdfError::Metric {
                code: 65,
                field: "BBX y offset",
                value: i64::MAX
            }
        );

        let src = "ENCODING 65\nDWIDTH 2 0\nBBX 1 1 0 -200\nBITMAP\n80\nENDCHAR\n";
        let err = convert(src, 65, 65, true).unwrap_err();
        assert_eq!(
            err,
            BdfError::Metric {
                code: 65,
                field: "BBX y offset",
                value: 199
            }
        );
    }

    #[test]
    fn extreme_ascent() {
        let src = "FONT_ASCENT 9223372036854775807\nFONT_DESCENT 2\nENCODING 65\nDWIDTH 2 0\nBBX 1 1 0 0\nBITMAP\n80\nENDCHAR\n";
        let err = convert(src, 65, 65, true).unwrap_err();
        assert!(matches!(
            err,
            BdfError::Metric {
                field: "FONT_ASCENT + FONT_DESCENT",
                value: i64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn bitmap_height_mismatch_is_malformed() {
        let src = "ENCODING 65\nDWIDTH 2 0\nBBX 1 3 0 0\nBITMAP\n80\n80\nENDCHAR\n";
        let err = convert(src, 65, 65, true).unwrap_err();
        assert!(matches!(
            err,
            BdfError::Codec(FontError::MalformedGlyph { code: 65, .. })
        ));
    }

    #[test]
    fn zero_sized_box() {
        let src = "ENCODING 32\nDWIDTH 3 0\nBBX 0 0 0 0\nBITMAP\nENDCHAR\n";
        let font = convert(src, 32, 32, true).unwrap();
        assert_eq!(*font.glyph(32).unwrap(), Glyph::new(0, 0, 0, 3, 0, 0));
        assert!(font.bitmap().is_empty());
    }
}
