use crate::errors::BdfError;
use log::{debug, warn};
use pixfont_shared::errors::ParseError;
use pixfont_shared::location::Location;
use std::collections::BTreeMap;

/// A single character as described in a BDF file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BdfGlyph {
    pub encoding: i64,
    /// Horizontal device width (`DWIDTH`)
    pub dwidth: i64,
    pub bbx_width: i64,
    pub bbx_height: i64,
    pub bbx_xoff: i64,
    /// Offset of the bounding box bottom from the baseline, positive is up
    pub bbx_yoff: i64,
    /// Raw bitmap rows, each padded to a whole number of bytes
    pub bitmap: Vec<Vec<u8>>,
}

impl BdfGlyph {
    #[must_use]
    pub fn new(encoding: i64) -> Self {
        Self {
            encoding,
            ..Default::default()
        }
    }

    /// Pixels of every bitmap row, leftmost pixel first. Rows hold all bits present in the file,
    /// which is the bounding box width rounded up to whole bytes.
    #[must_use]
    pub fn pixel_rows(&self) -> Vec<Vec<bool>> {
        self.bitmap
            .iter()
            .map(|row| {
                row.iter()
                    .flat_map(|byte| (0..8).map(move |bit| byte & (0x80 >> bit) != 0))
                    .collect()
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BdfFont {
    pub name: String,
    pub font_ascent: i64,
    pub font_descent: i64,
    /// Glyphs keyed by encoding
    pub glyphs: BTreeMap<i64, BdfGlyph>,
}

impl BdfFont {
    /// Distance between baselines: ascent plus descent, saturating at the i64 limits
    #[must_use]
    pub fn line_height(&self) -> i64 {
        self.font_ascent.saturating_add(self.font_descent)
    }
}

struct Line<'a> {
    text: &'a str,
    location: Location,
}

impl Line<'_> {
    fn error(&self, message: &str) -> BdfError {
        BdfError::Parse(ParseError::new(message, self.location))
    }

    fn error_at(&self, message: &str, column_offset: usize) -> BdfError {
        let location = Location::new(
            self.location.line,
            self.location.column + column_offset,
            self.location.offset + column_offset,
        );
        BdfError::Parse(ParseError::new(message, location))
    }

    /// Numeric argument `idx` (0 is the first token after the keyword)
    fn number(&self, idx: usize) -> Result<i64, BdfError> {
        let Some(token) = self.text.split_whitespace().nth(idx + 1) else {
            return Err(self.error(&format!("missing argument {} for {}", idx + 1, self.keyword())));
        };
        token
            .parse::<i64>()
            .map_err(|_| self.error(&format!("invalid number '{token}' for {}", self.keyword())))
    }

    fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    fn hex_row(&self) -> Result<Vec<u8>, BdfError> {
        let digits = self.text.as_bytes();
        if digits.len() % 2 != 0 {
            return Err(self.error("bitmap row has an odd number of hex digits"));
        }

        digits
            .chunks(2)
            .enumerate()
            .map(|(idx, pair)| {
                let hi = hex_value(pair[0]);
                let lo = hex_value(pair[1]);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                    _ => Err(self.error_at("invalid hex digit in bitmap row", idx * 2)),
                }
            })
            .collect()
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).map(|v| v as u8)
}

/// Parses the text of a BDF font. Only the keywords needed for rendering are interpreted;
/// everything else is skipped.
pub fn parse_bdf(source: &str) -> Result<BdfFont, BdfError> {
    let mut font = BdfFont::default();
    let mut current: Option<BdfGlyph> = None;
    let mut in_bitmap = false;

    let mut offset = 0;
    for (idx, raw) in source.split_inclusive('\n').enumerate() {
        let indent = raw.len() - raw.trim_start().len();
        let line = Line {
            text: raw.trim(),
            location: Location::new(idx + 1, indent + 1, offset + indent),
        };
        offset += raw.len();

        if in_bitmap {
            if line.text == "ENDCHAR" {
                in_bitmap = false;
                if let Some(glyph) = current.take() {
                    store_glyph(&mut font, glyph);
                }
            } else if !line.text.is_empty() {
                let row = line.hex_row()?;
                if let Some(glyph) = current.as_mut() {
                    glyph.bitmap.push(row);
                }
            }
            continue;
        }

        match line.keyword() {
            "FONT" => {
                font.name = line.text["FONT".len()..].trim().to_string();
            }
            "FONT_ASCENT" => font.font_ascent = line.number(0)?,
            "FONT_DESCENT" => font.font_descent = line.number(0)?,
            "STARTCHAR" => current = None,
            "ENCODING" => current = Some(BdfGlyph::new(line.number(0)?)),
            "DWIDTH" => {
                if let Some(glyph) = current.as_mut() {
                    glyph.dwidth = line.number(0)?;
                }
            }
            "BBX" => {
                if let Some(glyph) = current.as_mut() {
                    glyph.bbx_width = line.number(0)?;
                    glyph.bbx_height = line.number(1)?;
                    glyph.bbx_xoff = line.number(2)?;
                    glyph.bbx_yoff = line.number(3)?;
                }
            }
            "BITMAP" => in_bitmap = true,
            // A glyph without a BITMAP block, e.g. a space with a zero sized box
            "ENDCHAR" => {
                if let Some(glyph) = current.take() {
                    store_glyph(&mut font, glyph);
                }
            }
            _ => {}
        }
    }

    if in_bitmap {
        warn!("bdf: input ends inside a BITMAP block");
        if let Some(glyph) = current.take() {
            store_glyph(&mut font, glyph);
        }
    }

    debug!(
        "bdf: parsed font '{}' with {} glyphs",
        font.name,
        font.glyphs.len()
    );

    Ok(font)
}

fn store_glyph(font: &mut BdfFont, glyph: BdfGlyph) {
    if font.glyphs.contains_key(&glyph.encoding) {
        warn!("bdf: duplicate glyph for encoding {}, keeping the last one", glyph.encoding);
    }
    font.glyphs.insert(glyph.encoding, glyph);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::SMALL_BDF;
    use test_case::test_case;

    #[test]
    fn parses_header_and_glyphs() {
        let font = parse_bdf(SMALL_BDF).unwrap();

        assert_eq!(font.name, "-Misc-Tiny-Medium-R-Normal--6-60-75-75-C-40-ISO10646-1");
        assert_eq!(font.font_ascent, 5);
        assert_eq!(font.font_descent, 1);
        assert_eq!(font.line_height(), 6);
        assert_eq!(font.glyphs.keys().copied().collect::<Vec<_>>(), vec![32, 33, 65]);

        let a = &font.glyphs[&65];
        assert_eq!(a.dwidth, 4);
        assert_eq!((a.bbx_width, a.bbx_height, a.bbx_xoff, a.bbx_yoff), (3, 5, 0, -1));
        assert_eq!(a.bitmap, vec![vec![0x40], vec![0xA0], vec![0xE0], vec![0xA0], vec![0xA0]]);
    }

    #[test]
    fn pixel_rows_are_msb_first() {
        let glyph = BdfGlyph {
            bitmap: vec![vec![0xA0, 0x01]],
            ..BdfGlyph::new(1)
        };
        let rows = glyph.pixel_rows();
        assert_eq!(rows[0].len(), 16);
        let set: Vec<usize> = rows[0]
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
            .collect();
        assert_eq!(set, vec![0, 2, 15]);
    }

    #[test]
    fn lowercase_hex_and_wide_rows() {
        let src = "ENCODING 66\nBBX 12 1 0 0\nBITMAP\nfff0\nENDCHAR\n";
        let font = parse_bdf(src).unwrap();
        assert_eq!(font.glyphs[&66].bitmap, vec![vec![0xFF, 0xF0]]);
    }

    #[test]
    fn crlf_line_endings() {
        let src = SMALL_BDF.replace('\n', "\r\n");
        assert_eq!(parse_bdf(&src).unwrap(), parse_bdf(SMALL_BDF).unwrap());
    }

    #[test]
    fn glyph_without_encoding_is_dropped() {
        let src = "STARTCHAR nothing\nBBX 1 1 0 0\nBITMAP\n80\nENDCHAR\n";
        let font = parse_bdf(src).unwrap();
        assert!(font.glyphs.is_empty());
    }

    #[test]
    fn glyph_without_bitmap_block_is_kept() {
        let src = "STARTCHAR space\nENCODING 32\nDWIDTH 3 0\nBBX 0 0 0 0\nENDCHAR\nSTARTCHAR A\nENCODING 65\nBITMAP\n80\nENDCHAR\n";
        let font = parse_bdf(src).unwrap();
        assert_eq!(font.glyphs.keys().copied().collect::<Vec<_>>(), vec![32, 65]);

        let space = &font.glyphs[&32];
        assert_eq!(space.dwidth, 3);
        assert!(space.bitmap.is_empty());
    }

    #[test]
    fn duplicate_encoding_keeps_last() {
        testing_logger::setup();
        let src = "ENCODING 65\nDWIDTH 3 0\nBITMAP\nENDCHAR\nENCODING 65\nDWIDTH 5 0\nBITMAP\nENDCHAR\n";
        let font = parse_bdf(src).unwrap();
        assert_eq!(font.glyphs[&65].dwidth, 5);
        testing_logger::validate(|captured_logs| {
            assert!(captured_logs
                .iter()
                .any(|l| l.level == log::Level::Warn && l.body.contains("duplicate")));
        });
    }

    #[test_case("FONT_ASCENT x\n", 1, 1 ; "bad ascent")]
    #[test_case("\nENCODING\n", 2, 1 ; "missing encoding")]
    #[test_case("ENCODING 65\n  BBX 1 1 zero 0\n", 2, 3 ; "bad bbx")]
    #[test_case("ENCODING 65\nBITMAP\n8\nENDCHAR\n", 3, 1 ; "odd hex row")]
    #[test_case("ENCODING 65\nBITMAP\n80\n0g\nENDCHAR\n", 4, 1 ; "bad hex digit")]
    #[test_case("ENCODING 65\nBITMAP\n80\n00g0\nENDCHAR\n", 4, 3 ; "bad hex digit in second byte")]
    fn reports_error_location(src: &str, line: usize, column: usize) {
        match parse_bdf(src) {
            Err(BdfError::Parse(err)) => {
                assert_eq!((err.location.line, err.location.column), (line, column));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
