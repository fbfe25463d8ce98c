/// Integer pixel rectangle used by blits and pixel reads
///
/// Corners are `(x1, y1)` inclusive and `(x2, y2)` exclusive. A blit with
/// `x2 < x1` or `y2 < y1` mirrors the image on that axis.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Area covering `[0, width) x [0, height)`
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).unsigned_abs()
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).unsigned_abs()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersection with `bounds`, with corners normalized
    ///
    /// Returns an empty area at the origin when they do not overlap.
    pub fn clipped_by(&self, bounds: &Area) -> Area {
        let (ax1, ax2) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (ay1, ay2) = (self.y1.min(self.y2), self.y1.max(self.y2));
        let (bx1, bx2) = (bounds.x1.min(bounds.x2), bounds.x1.max(bounds.x2));
        let (by1, by2) = (bounds.y1.min(bounds.y2), bounds.y1.max(bounds.y2));

        let x1 = ax1.max(bx1);
        let y1 = ay1.max(by1);
        let x2 = ax2.min(bx2);
        let y2 = ay2.min(by2);

        if x1 >= x2 || y1 >= y2 {
            Area::default()
        } else {
            Area::new(x1, y1, x2, y2)
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(test)]
#[path = "area_tests.rs"]
mod tests;
