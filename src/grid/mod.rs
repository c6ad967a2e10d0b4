//! Maze grid model: terrain tags, parsing, random generation, rendering.

pub mod maze;
pub mod terrain;

pub use maze::{Maze, ParseMazeError};
pub use terrain::Terrain;
