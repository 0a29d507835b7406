use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use log::info;

use crate::{
    path::{self, Grid, PathFinder, Position},
    Error,
};

const LOWEST_HEIGHT: u8 = 0;
const HIGHEST_HEIGHT: u8 = b'z' - b'a';

/// The reference step rule: never climb more than one unit up, stepping down is always fine.
pub fn climbable(from: &u8, to: &u8) -> bool {
    *to <= from.saturating_add(1)
}

#[derive(Debug)]
pub struct HeightMap {
    grid: Grid<u8>,
    start_pos: Position,
    end_pos: Position,
}

impl TryFrom<&str> for HeightMap {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let mut builder = MapBuilder::new();
        for line in value.lines() {
            builder.add_row(line)?;
        }

        builder.build()
    }
}

impl HeightMap {
    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    pub fn start_pos(&self) -> &Position {
        &self.start_pos
    }

    pub fn end_pos(&self) -> &Position {
        &self.end_pos
    }

    pub fn height(&self, pos: &Position) -> Option<u8> {
        self.grid.cost(pos).copied()
    }

    /// Character of given position as it appears in input.
    pub fn height_char(&self, pos: &Position) -> Option<char> {
        if *pos == self.start_pos {
            Some('S')
        } else if *pos == self.end_pos {
            Some('E')
        } else {
            self.height(pos).map(|h| char::from(b'a' + h))
        }
    }

    /// All positions at the lowest height in map, the start position included.
    pub fn lowest_positions(&self) -> Vec<Position> {
        let Some(lowest) = self.grid.positions().flat_map(|pos| self.height(&pos)).min() else {
            return Vec::new();
        };

        self.grid
            .positions()
            .filter(|pos| self.height(pos) == Some(lowest))
            .collect()
    }

    pub fn fewest_steps_from_start(&self) -> Result<Option<usize>, Error> {
        self.climb_from_start(&mut self.path_finder())
    }

    /// Search from the start position with given finder, which keeps the
    /// visited cells of this search for rendering.
    pub fn climb_from_start(&self, finder: &mut PathFinder<u8>) -> Result<Option<usize>, Error> {
        finder.shortest_distance(&[self.start_pos], &self.end_pos, climbable)
    }

    /// Fewest steps to the end position from any of the lowest positions.
    pub fn fewest_steps_from_lowest(&self, parallel: bool) -> Result<Option<usize>, Error> {
        Ok(self.best_lowest_start(parallel)?.map(|(_, dist)| dist))
    }

    /// Lowest position with the fewest steps to the end position, and its steps.
    /// Each lowest position is searched on its own.
    pub fn best_lowest_start(&self, parallel: bool) -> Result<Option<(Position, usize)>, Error> {
        let sources = self.lowest_positions();
        info!(
            "Search from {} lowest position(s){}.",
            sources.len(),
            if parallel { " in parallel" } else { "" }
        );
        let dists = if parallel {
            path::par_distances_from_each(&self.grid, &sources, &self.end_pos, climbable)?
        } else {
            path::distances_from_each(&self.grid, &sources, &self.end_pos, climbable)?
        };

        Ok(dists
            .into_iter()
            .flat_map(|(pos, dist)| dist.map(|dist| (pos, dist)))
            .min_by_key(|(_, dist)| *dist))
    }

    pub fn path_finder(&self) -> PathFinder<'_, u8> {
        PathFinder::new(&self.grid)
    }
}

#[derive(Debug)]
struct MapBuilder {
    heights: Vec<u8>,
    row_n: usize,
    col_n: Option<usize>,
    start_pos: Option<Position>,
    end_pos: Option<Position>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            row_n: 0,
            col_n: None,
            start_pos: None,
            end_pos: None,
        }
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let this_col_n = text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for (ind, c) in text.chars().enumerate() {
            let pos = Position::new(self.row_n, ind);
            self.heights.push(match c {
                'S' => {
                    if let Some(last_pos) = self.start_pos {
                        return Err(Error::MultipleStartPosition(last_pos, pos));
                    }

                    self.start_pos = Some(pos);
                    LOWEST_HEIGHT
                }
                'E' => {
                    if let Some(last_pos) = self.end_pos {
                        return Err(Error::MultipleEndPosition(last_pos, pos));
                    }

                    self.end_pos = Some(pos);
                    HIGHEST_HEIGHT
                }
                'a'..='z' => c as u8 - b'a',
                other => return Err(Error::InvalidCharForMap(other)),
            });
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<HeightMap, Error> {
        let grid = Grid::new(self.row_n, self.col_n.unwrap_or(0), self.heights)?;
        let Some(start_pos) = self.start_pos else {
            return Err(Error::NoStartPosition);
        };
        let Some(end_pos) = self.end_pos else {
            return Err(Error::NoEndPosition);
        };

        Ok(HeightMap {
            grid,
            start_pos,
            end_pos,
        })
    }
}

pub fn read_map<P: AsRef<Path>>(path: P) -> Result<HeightMap> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = MapBuilder::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} in given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        builder
            .add_row(line.as_str())
            .with_context(|| format!("Failed to parse line {} as a row of map.", ind + 1))?;
    }

    Ok(builder.build()?)
}
