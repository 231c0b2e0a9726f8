//! Binary font container (`.pxf`).
//!
//! All integers are little endian.
//!
//! ```text
//! magic     4 bytes  "PXF1"
//! first     u16
//! last      u16
//! line      u8
//! reserved  u8       always 0
//! blob_len  u32
//! glyphs    (last - first + 1) records of 9 bytes:
//!           offset u32, width u8, height u8, x_advance u8, x_offset i8, y_offset i8
//! bitmap    blob_len bytes
//! ```

use crate::errors::FontError;
use crate::font::{Font, Glyph};
use log::debug;

pub const FORMAT_MAGIC: &[u8; 4] = b"PXF1";
pub const HEADER_LEN: usize = 14;
pub const GLYPH_RECORD_LEN: usize = 9;

impl Font<'_> {
    /// Serializes the font into the `.pxf` container
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(HEADER_LEN + self.len() * GLYPH_RECORD_LEN + self.bitmap().len());

        out.extend_from_slice(FORMAT_MAGIC);
        out.extend_from_slice(&self.first_code().to_le_bytes());
        out.extend_from_slice(&self.last_code().to_le_bytes());
        out.push(self.line_height());
        out.push(0);
        // Blob length always fits, glyph offsets are u32 as well
        out.extend_from_slice(&(self.bitmap().len() as u32).to_le_bytes());

        for glyph in self.glyphs() {
            out.extend_from_slice(&glyph.bitmap_offset.to_le_bytes());
            out.push(glyph.width);
            out.push(glyph.height);
            out.push(glyph.x_advance);
            out.extend_from_slice(&glyph.x_offset.to_le_bytes());
            out.extend_from_slice(&glyph.y_offset.to_le_bytes());
        }

        out.extend_from_slice(self.bitmap());
        out
    }

    /// Reads a font from a `.pxf` container. The returned font borrows its bitmap blob from
    /// `data`; use [`Font::into_owned`] to detach it.
    pub fn decode(data: &[u8]) -> Result<Font<'_>, FontError> {
        let mut reader = Reader::new(data);

        if reader.take(4)? != FORMAT_MAGIC {
            return Err(FontError::Decode("not a pxf font (bad magic)".into()));
        }

        let first_code = reader.u16()?;
        let last_code = reader.u16()?;
        let line_height = reader.u8()?;
        let _reserved = reader.u8()?;
        let blob_len = reader.u32()? as usize;

        if last_code < first_code {
            return Err(FontError::EmptyRange {
                first: first_code,
                last: last_code,
            });
        }

        let count = usize::from(last_code - first_code) + 1;
        let mut glyphs = Vec::with_capacity(count);
        for _ in 0..count {
            glyphs.push(Glyph::new(
                reader.u32()?,
                reader.u8()?,
                reader.u8()?,
                reader.u8()?,
                reader.i8()?,
                reader.i8()?,
            ));
        }

        let bitmap = reader.take(blob_len)?;
        if !reader.is_empty() {
            return Err(FontError::Decode(format!(
                "{} trailing bytes after bitmap",
                reader.remaining()
            )));
        }

        debug!(
            "decoded font 0x{first_code:02X}..=0x{last_code:02X}: {count} glyphs, {blob_len} bitmap bytes"
        );

        Font::from_parts(first_code, last_code, line_height, glyphs, bitmap)
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FontError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len());
        let Some(end) = end else {
            return Err(FontError::Decode(format!(
                "unexpected end of data: need {len} bytes at offset {}, have {}",
                self.pos,
                self.remaining()
            )));
        };

        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FontError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, FontError> {
        Ok(self.array::<1>()?[0])
    }

    fn i8(&mut self) -> Result<i8, FontError> {
        Ok(i8::from_le_bytes(self.array()?))
    }

    fn u16(&mut self) -> Result<u16, FontError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, FontError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_font, GlyphDescription};

    fn sample_font() -> Font<'static> {
        build_font(
            &[
                GlyphDescription::blank(0x20, 3),
                GlyphDescription::from_pattern(0x21, &["#", "#", ".", "#"], 2, 0, -4).unwrap(),
            ],
            0x20,
            0x21,
            6,
        )
        .unwrap()
    }

    #[test]
    fn container_layout() {
        let data = sample_font().encode();
        assert_eq!(data.len(), HEADER_LEN + 2 * GLYPH_RECORD_LEN + 4);
        assert_eq!(
            &data[..HEADER_LEN],
            &[b'P', b'X', b'F', b'1', 0x20, 0x00, 0x21, 0x00, 6, 0, 4, 0, 0, 0]
        );
        // Second glyph record: offset 0, 1x4, advance 2, x offset 0, y offset -4
        assert_eq!(
            &data[HEADER_LEN + GLYPH_RECORD_LEN..HEADER_LEN + 2 * GLYPH_RECORD_LEN],
            &[0, 0, 0, 0, 1, 4, 2, 0, 0xFC]
        );
        assert_eq!(&data[HEADER_LEN + 2 * GLYPH_RECORD_LEN..], &[0x80, 0x80, 0x00, 0x80]);
    }

    #[test]
    fn decode_restores_font() {
        let font = sample_font();
        let data = font.encode();
        let decoded = Font::decode(&data).unwrap();
        assert_eq!(decoded, font);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = sample_font().encode();
        data[3] = b'2';
        assert!(matches!(Font::decode(&data), Err(FontError::Decode(_))));
    }

    #[test]
    fn rejects_truncated_data() {
        let data = sample_font().encode();
        for len in [0, 3, HEADER_LEN - 1, HEADER_LEN + 5, data.len() - 1] {
            assert!(
                matches!(Font::decode(&data[..len]), Err(FontError::Decode(_))),
                "length {len} should not decode"
            );
        }
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut data = sample_font().encode();
        data.push(0);
        assert!(matches!(Font::decode(&data), Err(FontError::Decode(_))));
    }

    #[test]
    fn rejects_glyph_outside_blob() {
        let mut data = sample_font().encode();
        // Point the second glyph past the end of the 4 byte blob
        data[HEADER_LEN + GLYPH_RECORD_LEN] = 2;
        assert!(matches!(
            Font::decode(&data),
            Err(FontError::MalformedGlyph { code: 0x21, .. })
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut data = sample_font().encode();
        data[4] = 0x30;
        assert!(matches!(
            Font::decode(&data),
            Err(FontError::EmptyRange { first: 0x30, last: 0x21 })
        ));
    }
}
