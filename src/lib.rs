use std::{error, fmt::Display, path::PathBuf};

use clap::Parser;

pub mod map;
pub mod path;
pub mod render;

pub use map::{climbable, read_map, HeightMap};
pub use path::{
    distances_from_each, min_distance_from_each, par_distances_from_each,
    par_min_distance_from_each, shortest_distance, Direction, Grid, PathFinder, Position,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    EmptyGrid,
    InconsistentRow(usize, usize),
    MismatchedCellCount(usize, usize, usize),
    InvalidCharForMap(char),
    MultipleStartPosition(Position, Position),
    MultipleEndPosition(Position, Position),
    NoStartPosition,
    NoEndPosition,
    InvalidCoordinate(Position),
    EmptySourceSet,
    NotEnoughTerminalSpace(usize, usize, usize, usize), // (terminal rows, terminal columns, map rows, map columns)
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyGrid => write!(f, "Expect at least one row and one column in grid."),
            Error::InconsistentRow(expect_col_n, this_col_n) => write!(
                f,
                "Expect {} column(s) in each row, given {}.",
                expect_col_n, this_col_n
            ),
            Error::MismatchedCellCount(row_n, col_n, cell_n) => write!(
                f,
                "Expect {} x {} cell(s) in grid, given {}.",
                row_n, col_n, cell_n
            ),
            Error::InvalidCharForMap(c) => write!(f, "Invalid character({}) for map.", c),
            Error::MultipleStartPosition(last_pos, pos) => write!(
                f,
                "Expect only one start position, given two({}, {}).",
                last_pos, pos
            ),
            Error::MultipleEndPosition(last_pos, pos) => write!(
                f,
                "Expect only one end position, given two({}, {}).",
                last_pos, pos
            ),
            Error::NoStartPosition => write!(f, "No start position in map."),
            Error::NoEndPosition => write!(f, "No end position in map."),
            Error::InvalidCoordinate(pos) => {
                write!(f, "Position {} is outside of the grid.", pos)
            }
            Error::EmptySourceSet => {
                write!(f, "Expect at least one source position to search from.")
            }
            Error::NotEnoughTerminalSpace(term_row_n, term_col_n, row_n, col_n) => write!(
                f,
                "Terminal({} x {}) hasn't enough space to render, expect {} rows x {} columns.",
                term_row_n, term_col_n, row_n, col_n
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Print the map with visited cells highlighted after searching.
    #[arg(long)]
    pub render: bool,
    /// Animate the search in the terminal.
    #[arg(long)]
    pub animate: bool,
    /// Delay in milliseconds after drawing each visited cell when animating.
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
    /// Search from the lowest positions with multiple threads.
    #[arg(long)]
    pub parallel: bool,
}
