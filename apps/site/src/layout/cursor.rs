//! Vertical flow cursor for the document layout.
//!
//! Coordinates are millimetres from the top-left corner of the page. Every drawn block
//! returns the cursor positioned just below itself; side-by-side columns are joined
//! with [`column_max`] so the following block clears the taller one.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Moves down by `dy`.
    pub fn advance(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Same line, different column.
    pub fn at_x(self, x: f32) -> Self {
        Self { x, ..self }
    }
}

/// Joins two sibling columns: the lowest `y` wins and `x` returns to the leftmost column.
pub fn column_max(a: Cursor, b: Cursor) -> Cursor {
    Cursor {
        x: a.x.min(b.x),
        y: a.y.max(b.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_down_only() {
        let c = Cursor::new(20.0, 30.0).advance(5.5);
        assert_eq!(c, Cursor::new(20.0, 35.5));
    }

    #[test]
    fn test_column_max_takes_taller_column() {
        let left = Cursor::new(20.0, 80.0);
        let right = Cursor::new(110.0, 95.0);
        assert_eq!(column_max(left, right), Cursor::new(20.0, 95.0));
        assert_eq!(column_max(right, left), Cursor::new(20.0, 95.0));
    }

    #[test]
    fn test_at_x_keeps_line() {
        let c = Cursor::new(20.0, 42.0).at_x(110.0);
        assert_eq!(c, Cursor::new(110.0, 42.0));
    }
}
