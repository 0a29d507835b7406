use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use day12::{render::TerminalView, CLIArgs};

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArgs::parse();
    let map = day12::read_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read height map from given file({}).",
            args.input_path.display()
        )
    })?;

    let mut finder = map.path_finder();
    let min_steps_n = if args.animate {
        let mut view = TerminalView::new(io::stdout(), Duration::from_millis(args.delay_ms))
            .context("Failed to prepare terminal for animation.")?;
        view.animate_climb(&map, &mut finder)?
    } else {
        map.climb_from_start(&mut finder)?
    };

    if args.render {
        day12::render::write_visited(&mut io::stdout(), &map, &finder)
            .context("Failed to render visited positions.")?;
    }

    if let Some(min_steps_n) = min_steps_n {
        println!(
            "It takes at least {} steps moving from {} to {}.",
            min_steps_n,
            map.start_pos(),
            map.end_pos()
        );
    } else {
        eprintln!(
            "There's no path from {} to {} in given map.",
            map.start_pos(),
            map.end_pos()
        );
    }

    Ok(())
}
