/// Destination of rendered pixels. Implementations must silently ignore coordinates outside
/// their valid range; the renderer does no bounds checking of its own.
pub trait PixelSink {
    fn write_pixel(&mut self, x: i32, y: i32, color: bool);
}

impl<F> PixelSink for F
where
    F: FnMut(i32, i32, bool),
{
    fn write_pixel(&mut self, x: i32, y: i32, color: bool) {
        self(x, y, color);
    }
}
