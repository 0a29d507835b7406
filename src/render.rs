use std::{
    io::{self, Write},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute, queue,
    style::{self, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    map::{climbable, HeightMap},
    path::{PathFinder, Position},
    Error,
};

/// Write the map, one row per line, with cells visited by last search of `finder` highlighted.
pub fn write_visited<W: Write>(
    out: &mut W,
    map: &HeightMap,
    finder: &PathFinder<u8>,
) -> io::Result<()> {
    let grid = finder.grid();
    for r in 0..grid.row_n() {
        for c in 0..grid.col_n() {
            let pos = Position::new(r, c);
            let height_char = map.height_char(&pos).unwrap_or(' ');
            if finder.is_visited(&pos) {
                queue!(
                    out,
                    style::PrintStyledContent(style::style(height_char).yellow().bold())
                )?;
            } else {
                queue!(out, style::Print(height_char))?;
            }
        }
        queue!(out, style::Print('\n'))?;
    }

    out.flush()
}

/// Full screen view to watch the search spreading over map.
pub struct TerminalView<W: Write> {
    term: W,
    delay: Duration,
}

impl<W: Write> Drop for TerminalView<W> {
    fn drop(&mut self) {
        let _ = execute!(
            self.term,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(mut term: W, delay: Duration) -> io::Result<Self> {
        execute!(term, terminal::EnterAlternateScreen)?;
        // From here on, dropping the view leaves the alternate screen.
        let mut view = Self { term, delay };
        queue!(
            view.term,
            style::ResetColor,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        view.term.flush()?;

        Ok(view)
    }

    pub fn draw_map(&mut self, map: &HeightMap) -> io::Result<()> {
        let grid = map.grid();
        let (term_col_n, term_row_n) = terminal::size()?;
        if usize::from(term_col_n) < grid.col_n() || usize::from(term_row_n) < grid.row_n() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                Error::NotEnoughTerminalSpace(
                    usize::from(term_row_n),
                    usize::from(term_col_n),
                    grid.row_n(),
                    grid.col_n(),
                ),
            ));
        }

        for r in 0..grid.row_n() {
            let line = (0..grid.col_n())
                .map(|c| map.height_char(&Position::new(r, c)).unwrap_or(' '))
                .collect::<String>();
            queue!(self.term, cursor::MoveTo(0, term_coord(r)?), style::Print(line))?;
        }

        self.term.flush()
    }

    pub fn mark_visited(&mut self, map: &HeightMap, pos: &Position) -> io::Result<()> {
        let height_char = map.height_char(pos).unwrap_or(' ');
        queue!(
            self.term,
            cursor::MoveTo(term_coord(pos.c())?, term_coord(pos.r())?),
            style::PrintStyledContent(style::style(height_char).yellow().bold())
        )?;
        self.term.flush()?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        Ok(())
    }

    /// Climb from the start position of map, highlighting every cell the moment it's visited.
    pub fn animate_climb(
        &mut self,
        map: &HeightMap,
        finder: &mut PathFinder<u8>,
    ) -> Result<Option<usize>> {
        self.draw_map(map).context("Failed to draw map in terminal.")?;
        let mut draw_result = Ok(());
        let steps = finder.shortest_cost_with(
            &[*map.start_pos()],
            map.end_pos(),
            |from, to| climbable(from, to).then_some(1),
            |pos, _| {
                if draw_result.is_ok() {
                    draw_result = self.mark_visited(map, pos);
                }
            },
        )?;
        draw_result.context("Failed to highlight visited position in terminal.")?;

        Ok(steps)
    }
}

fn term_coord(v: usize) -> io::Result<u16> {
    u16::try_from(v).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}
