use std::fmt;

/// One of the 64 board cells, `0 = a1` through `63 = h8`.
///
/// `file = index % 8`, `rank = index / 8`. Rank 0 is drawn at the bottom of
/// the screen, so the screen row of a square is `7 - rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Create a square from its index.
    ///
    /// # Returns
    ///
    /// `None` if `index >= 64`.
    pub fn new(index: u8) -> Option<Self> {
        (index < 64).then_some(Self(index))
    }

    /// Create a square from file and rank, both in `[0, 8)`.
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    /// Iterate over all 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Column on screen, left to right.
    pub fn col(self) -> u8 {
        self.file()
    }

    /// Row on screen, top to bottom.
    pub fn row(self) -> u8 {
        7 - self.rank()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decomposition() {
        let e4 = Square::new(28).unwrap();
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.row(), 4);
        assert_eq!(e4.to_string(), "e4");
    }

    #[test]
    fn test_out_of_range() {
        assert!(Square::new(64).is_none());
        assert!(Square::from_coords(8, 0).is_none());
        assert!(Square::from_coords(0, 8).is_none());
    }

    #[test]
    fn test_from_coords_matches_index() {
        for sq in Square::all() {
            assert_eq!(Square::from_coords(sq.file(), sq.rank()), Some(sq));
        }
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_corners() {
        assert_eq!(Square::new(0).unwrap().to_string(), "a1");
        assert_eq!(Square::new(63).unwrap().to_string(), "h8");
        assert_eq!(Square::new(63).unwrap().row(), 0);
        assert_eq!(Square::new(0).unwrap().row(), 7);
    }
}
