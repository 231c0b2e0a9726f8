//! Bit packing of glyph rows.
//!
//! A row of `width` pixels is stored in `ceil(width / 8)` bytes. The leftmost pixel goes into
//! the most significant bit of the first byte. Unused low bits of a row's last byte are zero.

/// Number of bytes needed for one packed row of the given width
#[must_use]
pub fn row_bytes(width: u8) -> usize {
    usize::from(width).div_ceil(8)
}

#[inline]
fn bit_mask(col: usize) -> u8 {
    0x80 >> (col & 7)
}

/// Packs the first `width` pixels of every row. Rows must hold at least `width` pixels;
/// anything past `width` is ignored.
#[must_use]
pub fn pack_rows<R: AsRef<[bool]>>(rows: &[R], width: u8) -> Vec<u8> {
    let stride = row_bytes(width);
    let mut packed = vec![0u8; stride * rows.len()];

    for (row_idx, row) in rows.iter().enumerate() {
        let base = row_idx * stride;
        for (col, _) in row
            .as_ref()
            .iter()
            .take(usize::from(width))
            .enumerate()
            .filter(|(_, set)| **set)
        {
            packed[base + (col >> 3)] |= bit_mask(col);
        }
    }

    packed
}

/// Unpacks a glyph bitmap into a grid of `height` rows of `width` pixels each
#[must_use]
pub fn unpack_rows(bytes: &[u8], width: u8, height: u8) -> Vec<Vec<bool>> {
    let mut rows = vec![vec![false; usize::from(width)]; usize::from(height)];
    for (col, row) in GlyphPixels::new(bytes, width, height) {
        rows[usize::from(row)][usize::from(col)] = true;
    }
    rows
}

/// Iterator over the set pixels of a packed glyph bitmap, yielding `(column, row)` in row-major
/// order. Does not allocate. Bytes missing from the input read as unset.
#[derive(Clone, Debug)]
pub struct GlyphPixels<'a> {
    bytes: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    row: usize,
    col: usize,
}

impl<'a> GlyphPixels<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8], width: u8, height: u8) -> Self {
        Self {
            bytes,
            width: usize::from(width),
            height: usize::from(height),
            stride: row_bytes(width),
            row: 0,
            col: 0,
        }
    }
}

impl Iterator for GlyphPixels<'_> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.height {
            while self.col < self.width {
                let col = self.col;
                let byte = self
                    .bytes
                    .get(self.row * self.stride + (col >> 3))
                    .copied()
                    .unwrap_or(0);

                // Whole empty byte, jump to the next one
                if byte == 0 && col & 7 == 0 {
                    self.col += 8;
                    continue;
                }

                self.col += 1;
                if byte & bit_mask(col) != 0 {
                    // width and height are u8 so these always fit
                    return Some((col as u8, self.row as u8));
                }
            }
            self.col = 0;
            self.row += 1;
        }
        None
    }
}
