//! Geometry types and the application level result type

use std::ops::Add;

/// Result that can be returned which holds either T or an Error
pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T: Copy> {
    pub width: T,
    pub height: T,
}

impl<T: Copy> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> &T {
        &self.width
    }

    pub fn height(&self) -> &T {
        &self.height
    }
}

/// Pixel position. Signed, since glyphs may be drawn left of or above the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &T {
        &self.x
    }

    pub fn y(&self) -> &T {
        &self.y
    }
}

impl<T> Add for Point<T>
where
    T: Add<Output = T> + Copy,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Point<i32> {
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

impl Size<u32> {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Number of pixels covered by this size
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Size<i32> {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_add() {
        let p = Point::new(3, -2) + Point::new(-5, 7);
        assert_eq!(p, Point::new(-2, 5));
    }

    #[test]
    fn size_area() {
        assert_eq!(Size::<u32>::new(128, 64).area(), 8192);
        assert_eq!(Size::<u32>::ZERO.area(), 0);
    }
}
