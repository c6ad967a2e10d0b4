//! Maze parsing, random generation, and text rendering.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;

use crate::grid::terrain::Terrain;

/// Errors produced while reading a maze from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMazeError {
    /// The input contained no rows.
    Empty,
    /// A row's length differed from the first row's (1-based line number).
    RaggedRow(usize),
    /// More than one `p` cell was present.
    DuplicateStart,
    /// More than one `G` cell was present.
    DuplicateGoal,
}

impl fmt::Display for ParseMazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMazeError::Empty => write!(f, "maze has no rows"),
            ParseMazeError::RaggedRow(line) => {
                write!(f, "row {} has a different length than row 1", line)
            }
            ParseMazeError::DuplicateStart => write!(f, "maze has more than one start cell"),
            ParseMazeError::DuplicateGoal => write!(f, "maze has more than one goal cell"),
        }
    }
}

impl std::error::Error for ParseMazeError {}

/// A rectangular grid of terrain tags.
///
/// Rows are indexed top to bottom, columns left to right. The maze is the
/// static input to graph construction; it carries no search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Vec<Terrain>>,
    width: usize,
    height: usize,
    start: Option<(usize, usize)>,
    goal: Option<(usize, usize)>,
}

impl Maze {
    /// Build a maze from explicit rows. Used by the generator and tests.
    pub fn from_rows(cells: Vec<Vec<Terrain>>) -> Result<Maze, ParseMazeError> {
        if cells.is_empty() || cells[0].is_empty() {
            return Err(ParseMazeError::Empty);
        }
        let width = cells[0].len();
        let mut start = None;
        let mut goal = None;
        for (row, cols) in cells.iter().enumerate() {
            if cols.len() != width {
                return Err(ParseMazeError::RaggedRow(row + 1));
            }
            for (col, &t) in cols.iter().enumerate() {
                match t {
                    Terrain::Start => {
                        if start.replace((row, col)).is_some() {
                            return Err(ParseMazeError::DuplicateStart);
                        }
                    }
                    Terrain::Goal => {
                        if goal.replace((row, col)).is_some() {
                            return Err(ParseMazeError::DuplicateGoal);
                        }
                    }
                    _ => {}
                }
            }
        }
        let height = cells.len();
        Ok(Maze {
            cells,
            width,
            height,
            start,
            goal,
        })
    }

    /// Read a maze from a text file.
    pub fn from_file(path: &Path) -> Result<Maze, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(content.parse::<Maze>()?)
    }

    /// Generate a random maze with the given wall density.
    ///
    /// The start is pinned to the top-left corner and the goal to the
    /// bottom-right; both stay open regardless of density. Deterministic for
    /// a fixed RNG state. The result is not guaranteed to be solvable.
    pub fn generate<R: Rng>(width: usize, height: usize, wall_density: f64, rng: &mut R) -> Maze {
        let density = wall_density.clamp(0.0, 1.0);
        let mut cells = Vec::with_capacity(height);
        for row in 0..height {
            let mut cols = Vec::with_capacity(width);
            for col in 0..width {
                let t = if (row, col) == (0, 0) {
                    Terrain::Start
                } else if (row, col) == (height - 1, width - 1) {
                    Terrain::Goal
                } else if rng.gen_bool(density) {
                    Terrain::Wall
                } else {
                    Terrain::Open
                };
                cols.push(t);
            }
            cells.push(cols);
        }
        Maze {
            cells,
            width,
            height,
            start: Some((0, 0)),
            goal: Some((height - 1, width - 1)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Terrain at (row, col). Callers must stay in bounds.
    pub fn terrain(&self, row: usize, col: usize) -> Terrain {
        self.cells[row][col]
    }

    /// (row, col) of the start cell, if the maze has one.
    pub fn start(&self) -> Option<(usize, usize)> {
        self.start
    }

    /// (row, col) of the goal cell, if the maze has one.
    pub fn goal(&self) -> Option<(usize, usize)> {
        self.goal
    }

    /// Render the maze with a path overlaid as `F` marks.
    ///
    /// Start and goal cells keep their own tags, matching the original
    /// console rendering of solved mazes.
    pub fn render_with_path(&self, path: &[(usize, usize)]) -> String {
        let mut rows: Vec<Vec<char>> = self
            .cells
            .iter()
            .map(|r| r.iter().map(|t| t.to_char()).collect())
            .collect();
        for &(row, col) in path {
            if row < self.height && col < self.width {
                let t = self.cells[row][col];
                if t != Terrain::Start && t != Terrain::Goal {
                    rows[row][col] = 'F';
                }
            }
        }
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl FromStr for Maze {
    type Err = ParseMazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<Vec<Terrain>> = s
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end().chars().map(Terrain::from_char).collect())
            .collect();
        Maze::from_rows(cells)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for t in row {
                write!(f, "{}", t.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SMALL: &str = "p-X\n---\nX-G\n";

    #[test]
    fn test_parse_small_maze() {
        let maze: Maze = SMALL.parse().unwrap();
        assert_eq!(maze.width(), 3);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.start(), Some((0, 0)));
        assert_eq!(maze.goal(), Some((2, 2)));
        assert_eq!(maze.terrain(0, 2), Terrain::Wall);
        assert_eq!(maze.terrain(1, 1), Terrain::Open);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!("".parse::<Maze>(), Err(ParseMazeError::Empty));
        assert_eq!("\n\n".parse::<Maze>(), Err(ParseMazeError::Empty));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert_eq!("p--\n--\n".parse::<Maze>(), Err(ParseMazeError::RaggedRow(2)));
    }

    #[test]
    fn test_parse_rejects_duplicate_start() {
        assert_eq!("pp\n-G\n".parse::<Maze>(), Err(ParseMazeError::DuplicateStart));
    }

    #[test]
    fn test_parse_rejects_duplicate_goal() {
        assert_eq!("pG\n-G\n".parse::<Maze>(), Err(ParseMazeError::DuplicateGoal));
    }

    #[test]
    fn test_display_round_trips() {
        let maze: Maze = SMALL.parse().unwrap();
        assert_eq!(maze.to_string(), SMALL);
    }

    #[test]
    fn test_generate_is_deterministic_for_seed() {
        let a = Maze::generate(12, 9, 0.3, &mut StdRng::seed_from_u64(7));
        let b = Maze::generate(12, 9, 0.3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_pins_start_and_goal() {
        let maze = Maze::generate(8, 6, 0.95, &mut StdRng::seed_from_u64(1));
        assert_eq!(maze.start(), Some((0, 0)));
        assert_eq!(maze.goal(), Some((5, 7)));
        assert_eq!(maze.terrain(0, 0), Terrain::Start);
        assert_eq!(maze.terrain(5, 7), Terrain::Goal);
    }

    #[test]
    fn test_render_with_path_marks_interior_cells_only() {
        let maze: Maze = "p--\n---\n--G\n".parse().unwrap();
        let rendered = maze.render_with_path(&[(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)]);
        assert_eq!(rendered, "pF-\n-F-\n-FG\n");
    }
}
