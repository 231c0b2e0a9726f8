//! Monochrome framebuffer.
//!
//! One bit per pixel, rows padded to whole bytes, most significant bit is the leftmost pixel.
//! That is the layout most small monochrome display controllers take in a single transfer.

use crate::sink::PixelSink;
use pixfont_shared::types::Size;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonoFramebuffer {
    width: u32,
    height: u32,
    stride: usize,
    buffer: Vec<u8>,
}

impl MonoFramebuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            buffer: vec![0; stride * height as usize],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> Size<u32> {
        Size::new(self.width, self.height)
    }

    /// Raw packed rows, ready to be sent to a display
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.width)? as usize;
        let y = u32::try_from(y).ok().filter(|y| *y < self.height)? as usize;
        Some((y * self.stride + x / 8, 0x80 >> (x % 8)))
    }

    /// Sets or clears a pixel. Coordinates outside the buffer are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((idx, mask)) = self.locate(x, y) else {
            return;
        };
        if on {
            self.buffer[idx] |= mask;
        } else {
            self.buffer[idx] &= !mask;
        }
    }

    /// Returns the pixel at the given position; pixels outside the buffer read as off
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(idx, mask)| self.buffer[idx] & mask != 0)
    }

    pub fn clear(&mut self, on: bool) {
        self.buffer.fill(if on { 0xFF } else { 0x00 });
        if on {
            self.clear_padding();
        }
    }

    /// Sets or clears a `w` x `h` rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, on: bool) {
        let clip = |start: i32, len: u32, limit: u32| {
            let from = i64::from(start).max(0);
            let to = (i64::from(start) + i64::from(len)).min(i64::from(limit));
            from..to.max(from)
        };

        for py in clip(y, h, self.height) {
            for px in clip(x, w, self.width) {
                if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                    self.set_pixel(px, py, on);
                }
            }
        }
    }

    /// Number of pixels that are on
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.buffer.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Renders the buffer as text, one line per row. Used as a stand-in display on terminals.
    #[must_use]
    pub fn to_ascii(&self, on: char, off: char) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(if self.get_pixel(x, y) { on } else { off });
            }
            out.push('\n');
        }
        out
    }

    fn clear_padding(&mut self) {
        let used = (self.width % 8) as usize;
        if used == 0 || self.stride == 0 {
            return;
        }
        let mask = !(0xFFu8 >> used);
        for row in self.buffer.chunks_mut(self.stride) {
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
    }
}

impl PixelSink for MonoFramebuffer {
    fn write_pixel(&mut self, x: i32, y: i32, color: bool) {
        self.set_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::draw_text;
    use pixfont_codec::{build_font, GlyphDescription};
    use pixfont_shared::types::Point;

    #[test]
    fn packed_layout() {
        let mut fb = MonoFramebuffer::new(10, 2);
        assert_eq!(fb.as_bytes().len(), 4);

        fb.set_pixel(0, 0, true);
        fb.set_pixel(9, 0, true);
        fb.set_pixel(3, 1, true);
        assert_eq!(fb.as_bytes(), &[0x80, 0x40, 0x10, 0x00]);

        fb.set_pixel(0, 0, false);
        assert_eq!(fb.as_bytes(), &[0x00, 0x40, 0x10, 0x00]);
    }

    #[test]
    fn clips_out_of_bounds() {
        let mut fb = MonoFramebuffer::new(4, 4);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            fb.set_pixel(x, y, true);
            assert!(!fb.get_pixel(x, y));
        }
        assert_eq!(fb.count_set(), 0);
    }

    #[test]
    fn clear_and_fill() {
        let mut fb = MonoFramebuffer::new(5, 3);
        fb.clear(true);
        assert_eq!(fb.count_set(), 15);
        assert_eq!(fb.as_bytes(), &[0xF8, 0xF8, 0xF8]);

        fb.fill_rect(1, 1, 10, 10, false);
        assert_eq!(fb.count_set(), 15 - 8);
        assert_eq!(fb.to_ascii('#', '.'), "#####\n#....\n#....\n");
    }

    #[test]
    fn fill_rect_at_the_edges_of_the_plane() {
        let mut fb = MonoFramebuffer::new(4, 3);
        fb.fill_rect(i32::MAX - 1, 0, u32::MAX, 3, true);
        fb.fill_rect(0, i32::MAX, 4, u32::MAX, true);
        assert_eq!(fb.count_set(), 0);

        // Spans all the way from i32::MIN to i32::MAX, so it covers the buffer
        fb.fill_rect(i32::MIN, i32::MIN, u32::MAX, u32::MAX, true);
        assert_eq!(fb.count_set(), 12);
        fb.clear(false);

        fb.fill_rect(-2, 1, u32::MAX, 1, true);
        assert_eq!(fb.to_ascii('#', '.'), "....\n####\n....\n");
    }

    #[test]
    fn text_into_framebuffer_clips_at_edges() {
        let font = build_font(
            &[GlyphDescription::from_pattern(0x58, &["#.#", ".#.", "#.#"], 4, 0, -3).unwrap()],
            0x58,
            0x58,
            4,
        )
        .unwrap();

        let mut fb = MonoFramebuffer::new(6, 6);
        let end = draw_text(&font, "XX\nX", Point::new(0, 3), true, &mut fb);
        assert_eq!(end, Point::new(4, 7));
        assert_eq!(
            fb.to_ascii('#', '.'),
            "#.#.#.\n.#...#\n#.#.#.\n......\n#.#...\n.#....\n"
        );
    }
}
