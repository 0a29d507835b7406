use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use day12::CLIArgs;

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArgs::parse();
    let map = day12::read_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read height map from given file({}).",
            args.input_path.display()
        )
    })?;

    if let Some((start_pos, min_steps_n)) = map.best_lowest_start(args.parallel)? {
        if args.render {
            let mut finder = map.path_finder();
            finder.shortest_distance(&[start_pos], map.end_pos(), day12::climbable)?;
            day12::render::write_visited(&mut io::stdout(), &map, &finder)
                .context("Failed to render visited positions.")?;
        }

        println!(
            "It takes at least {} steps moving from any lowest position to {}, starting at {}.",
            min_steps_n,
            map.end_pos(),
            start_pos
        );
    } else {
        eprintln!(
            "There's no path from any lowest position to {} in given map.",
            map.end_pos()
        );
    }

    Ok(())
}
