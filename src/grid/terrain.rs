//! Terrain tags for maze cells.

use std::fmt;

/// Classification of a single maze cell.
///
/// Terrain is fixed at parse/build time; search state never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Terrain {
    /// Passable cell.
    #[default]
    Open,
    /// Impassable cell; contributes no edges to the graph.
    Wall,
    /// The unique search origin.
    Start,
    /// The unique search target.
    Goal,
}

impl Terrain {
    /// Map a maze-file character to a terrain tag.
    ///
    /// `X` is a wall, `p` the start, `G` the goal; every other character is
    /// an open cell.
    pub fn from_char(c: char) -> Terrain {
        match c {
            'X' => Terrain::Wall,
            'p' => Terrain::Start,
            'G' => Terrain::Goal,
            _ => Terrain::Open,
        }
    }

    /// Character used when rendering a maze back to text.
    pub fn to_char(self) -> char {
        match self {
            Terrain::Open => '-',
            Terrain::Wall => 'X',
            Terrain::Start => 'p',
            Terrain::Goal => 'G',
        }
    }

    /// Whether a search may occupy this cell.
    pub fn is_passable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_known_tags() {
        assert_eq!(Terrain::from_char('X'), Terrain::Wall);
        assert_eq!(Terrain::from_char('p'), Terrain::Start);
        assert_eq!(Terrain::from_char('G'), Terrain::Goal);
    }

    #[test]
    fn test_from_char_everything_else_is_open() {
        for c in ['-', ' ', '.', '0', 'z'] {
            assert_eq!(Terrain::from_char(c), Terrain::Open);
        }
    }

    #[test]
    fn test_passability() {
        assert!(Terrain::Open.is_passable());
        assert!(Terrain::Start.is_passable());
        assert!(Terrain::Goal.is_passable());
        assert!(!Terrain::Wall.is_passable());
    }

    #[test]
    fn test_char_round_trip() {
        for t in [Terrain::Open, Terrain::Wall, Terrain::Start, Terrain::Goal] {
            assert_eq!(Terrain::from_char(t.to_char()), t);
        }
    }
}
