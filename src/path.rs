use std::{cmp::Reverse, collections::BinaryHeap, fmt::Display, slice};

use log::{debug, trace};
use rayon::prelude::*;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        &ALL_DIRECTIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::Up if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::Down => Some(Self::new(self.r + 1, self.c)),
            Direction::Left if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            Direction::Right => Some(Self::new(self.r, self.c + 1)),
            _ => None,
        }
    }
}

/// Fixed size grid of cost values, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    costs: Vec<T>,
    row_n: usize,
    col_n: usize,
}

impl<T> Grid<T> {
    pub fn new(row_n: usize, col_n: usize, costs: Vec<T>) -> Result<Self, Error> {
        if row_n == 0 || col_n == 0 {
            return Err(Error::EmptyGrid);
        }

        if row_n.checked_mul(col_n) != Some(costs.len()) {
            return Err(Error::MismatchedCellCount(row_n, col_n, costs.len()));
        }

        Ok(Self {
            costs,
            row_n,
            col_n,
        })
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, Error> {
        let row_n = rows.len();
        let col_n = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut costs = Vec::with_capacity(row_n.checked_mul(col_n).unwrap_or(0));
        for row in rows {
            if row.len() != col_n {
                return Err(Error::InconsistentRow(col_n, row.len()));
            }

            costs.extend(row);
        }

        Self::new(row_n, col_n, costs)
    }

    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn cost(&self, pos: &Position) -> Option<&T> {
        self.pos_to_ind(pos).and_then(|ind| self.costs.get(ind))
    }

    pub fn is_inside(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let col_n = self.col_n;
        (0..self.row_n).flat_map(move |r| (0..col_n).map(move |c| Position::new(r, c)))
    }

    fn pos_to_ind(&self, pos: &Position) -> Option<usize> {
        if self.is_inside(pos) {
            Some(pos.r * self.col_n + pos.c)
        } else {
            None
        }
    }

    fn ind_to_pos(&self, ind: usize) -> Position {
        debug_assert!(ind < self.costs.len());
        Position::new(ind / self.col_n, ind % self.col_n)
    }

    fn check_query(&self, sources: &[Position], target: &Position) -> Result<usize, Error> {
        if sources.is_empty() {
            return Err(Error::EmptySourceSet);
        }

        if let Some(outside_pos) = sources.iter().find(|pos| !self.is_inside(pos)) {
            return Err(Error::InvalidCoordinate(*outside_pos));
        }

        self.pos_to_ind(target)
            .ok_or(Error::InvalidCoordinate(*target))
    }
}

/// Dijkstra's search over a grid, with the cost of each step decided by caller.
///
/// The grid is only borrowed, the tentative distances and visited flags live here
/// and get reset at the beginning of every search, so one finder can run any
/// number of independent searches over the same grid.
#[derive(Debug)]
pub struct PathFinder<'a, T> {
    grid: &'a Grid<T>,
    dists: Vec<Option<usize>>,
    visited: Vec<bool>,
    frontier: BinaryHeap<Reverse<(usize, usize)>>, // (tentative distance, index of cell)
}

impl<'a, T> PathFinder<'a, T> {
    pub fn new(grid: &'a Grid<T>) -> Self {
        let cell_n = grid.costs.len();
        Self {
            grid,
            dists: vec![None; cell_n],
            visited: vec![false; cell_n],
            frontier: BinaryHeap::new(),
        }
    }

    pub fn grid(&self) -> &'a Grid<T> {
        self.grid
    }

    /// Fewest steps from any of `sources` to `target`, where a step between two
    /// adjacent cells is legal only if `admissible(from_cost, to_cost)` holds.
    /// Returns `Ok(None)` if there's no such path.
    pub fn shortest_distance<F>(
        &mut self,
        sources: &[Position],
        target: &Position,
        admissible: F,
    ) -> Result<Option<usize>, Error>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.shortest_cost(sources, target, |from, to| admissible(from, to).then_some(1))
    }

    /// Like `shortest_distance`, but `step_cost` gives the weight of each legal
    /// step, `None` for an illegal one.
    pub fn shortest_cost<F>(
        &mut self,
        sources: &[Position],
        target: &Position,
        step_cost: F,
    ) -> Result<Option<usize>, Error>
    where
        F: Fn(&T, &T) -> Option<usize>,
    {
        self.shortest_cost_with(sources, target, step_cost, |_, _| {})
    }

    /// Like `shortest_cost`, calling `on_finalize` with each cell (and its final
    /// distance) in the order they're taken off the frontier.
    pub fn shortest_cost_with<F, V>(
        &mut self,
        sources: &[Position],
        target: &Position,
        step_cost: F,
        mut on_finalize: V,
    ) -> Result<Option<usize>, Error>
    where
        F: Fn(&T, &T) -> Option<usize>,
        V: FnMut(&Position, usize),
    {
        let grid = self.grid;
        let target_ind = grid.check_query(sources, target)?;
        self.reset();
        for source in sources {
            if let Some(ind) = grid.pos_to_ind(source) {
                self.dists[ind] = Some(0);
                self.frontier.push(Reverse((0, ind)));
            }
        }

        // Only cells with finite distance get into frontier, so running out of
        // frontier means the rest of grid is unreachable.
        while let Some(Reverse((cur_dist, cur_ind))) = self.frontier.pop() {
            if self.visited[cur_ind] {
                // Outdated entry, this cell has been finalized with a shorter distance.
                continue;
            }

            let cur_pos = grid.ind_to_pos(cur_ind);
            if cur_ind == target_ind {
                debug!(
                    "Reached {} with distance {} after visiting {} cell(s).",
                    cur_pos,
                    cur_dist,
                    self.visited_n()
                );
                return Ok(Some(cur_dist));
            }

            self.visited[cur_ind] = true;
            trace!("Visit {} with distance {}.", cur_pos, cur_dist);
            on_finalize(&cur_pos, cur_dist);

            let cur_cost = &grid.costs[cur_ind];
            for next_ind in Direction::all_dirs()
                .iter()
                .flat_map(|dir| cur_pos.neighbor(*dir))
                .flat_map(|pos| grid.pos_to_ind(&pos))
            {
                if self.visited[next_ind] {
                    continue;
                }

                let Some(step) = step_cost(cur_cost, &grid.costs[next_ind]) else {
                    continue;
                };
                let Some(next_dist) = cur_dist.checked_add(step) else {
                    // Too long to be any shortest path.
                    continue;
                };
                if self.dists[next_ind].map_or(true, |dist| next_dist < dist) {
                    self.dists[next_ind] = Some(next_dist);
                    self.frontier.push(Reverse((next_dist, next_ind)));
                }
            }
        }

        debug!(
            "No path to {} after visiting {} cell(s).",
            target,
            self.visited_n()
        );
        Ok(None)
    }

    /// Tentative distance of given position left by the last search.
    pub fn distance(&self, pos: &Position) -> Option<usize> {
        self.grid.pos_to_ind(pos).and_then(|ind| self.dists[ind])
    }

    pub fn is_visited(&self, pos: &Position) -> bool {
        self.grid
            .pos_to_ind(pos)
            .map(|ind| self.visited[ind])
            .unwrap_or(false)
    }

    pub fn visited_n(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }

    fn reset(&mut self) {
        self.dists.fill(None);
        self.visited.fill(false);
        self.frontier.clear();
    }
}

pub fn shortest_distance<T, F>(
    grid: &Grid<T>,
    sources: &[Position],
    target: &Position,
    admissible: F,
) -> Result<Option<usize>, Error>
where
    F: Fn(&T, &T) -> bool,
{
    PathFinder::new(grid).shortest_distance(sources, target, admissible)
}

/// Search from each source on its own, returns the distance of every source in
/// given order.
pub fn distances_from_each<T, F>(
    grid: &Grid<T>,
    sources: &[Position],
    target: &Position,
    admissible: F,
) -> Result<Vec<(Position, Option<usize>)>, Error>
where
    F: Fn(&T, &T) -> bool,
{
    grid.check_query(sources, target)?;
    let mut finder = PathFinder::new(grid);
    sources
        .iter()
        .map(|source| {
            let dist = finder.shortest_distance(slice::from_ref(source), target, &admissible)?;
            match dist {
                Some(dist) => debug!("Reached {} from {}, distance = {}.", target, source, dist),
                None => debug!("Not found path from {} to {}.", source, target),
            }

            Ok((*source, dist))
        })
        .collect()
}

pub fn min_distance_from_each<T, F>(
    grid: &Grid<T>,
    sources: &[Position],
    target: &Position,
    admissible: F,
) -> Result<Option<usize>, Error>
where
    F: Fn(&T, &T) -> bool,
{
    Ok(distances_from_each(grid, sources, target, admissible)?
        .into_iter()
        .flat_map(|(_, dist)| dist)
        .min())
}

/// Same as `distances_from_each`, but sources are searched in parallel, each
/// worker thread with its own `PathFinder`.
pub fn par_distances_from_each<T, F>(
    grid: &Grid<T>,
    sources: &[Position],
    target: &Position,
    admissible: F,
) -> Result<Vec<(Position, Option<usize>)>, Error>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Sync,
{
    grid.check_query(sources, target)?;
    sources
        .par_iter()
        .map_init(
            || PathFinder::new(grid),
            |finder, source| {
                finder
                    .shortest_distance(slice::from_ref(source), target, &admissible)
                    .map(|dist| (*source, dist))
            },
        )
        .collect()
}

pub fn par_min_distance_from_each<T, F>(
    grid: &Grid<T>,
    sources: &[Position],
    target: &Position,
    admissible: F,
) -> Result<Option<usize>, Error>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Sync,
{
    Ok(par_distances_from_each(grid, sources, target, admissible)?
        .into_iter()
        .flat_map(|(_, dist)| dist)
        .min())
}
