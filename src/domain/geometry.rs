/// Tile-space rectangles and collision shapes.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Rect { x, y, w, h }
    }

    /// Is tile (px, py) inside this rectangle? Zero-sized rects contain nothing.
    pub fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// How an object takes part in overlap queries.
/// `None` objects are inert: they never trigger and never grant or deny walking.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CollisionType {
    #[default]
    None,
    Rect,
}

impl CollisionType {
    pub fn collides(self) -> bool {
        matches!(self, CollisionType::Rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 2, 1);
        assert!(r.contains(2, 3));
        assert!(r.contains(3, 3));
        assert!(!r.contains(4, 3)); // right edge excluded
        assert!(!r.contains(2, 4)); // bottom edge excluded
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(5, 5, 0, 0);
        assert!(!r.contains(5, 5));
    }
}
