//! Command-line front end for the OBJ cleaner
//!
//! Usage: obj_cleaner input.obj output.obj --keyword Window
//!
//! Removes every object or group whose name contains the keyword and writes
//! a compacted copy of the remaining geometry.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use obj_cleaner::logging::{self, debug};
use obj_cleaner::{CleanerConfig, Config, ObjCleaner};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("obj_cleaner")
        .about("Removes named objects from a Wavefront OBJ file and compacts what remains")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Source OBJ file"),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("Destination OBJ file"),
        )
        .arg(
            Arg::new("keyword")
                .short('k')
                .long("keyword")
                .value_name("TEXT")
                .help("Objects whose name contains this text (any case) are removed"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML or RON file providing input, output and keyword"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report what would be removed without writing anything")
                .action(ArgAction::SetTrue),
        )
}

/// Command-line values layered over the optional config file
fn resolve_config(matches: &ArgMatches) -> Result<CleanerConfig> {
    let base = match matches.get_one::<String>("config") {
        Some(path) => CleanerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => CleanerConfig::default(),
    };

    let from_args = CleanerConfig {
        input: matches.get_one::<String>("input").map(PathBuf::from),
        output: matches.get_one::<String>("output").map(PathBuf::from),
        keyword: matches.get_one::<String>("keyword").cloned(),
    };

    Ok(base.merged_with(from_args))
}

fn main() -> Result<()> {
    logging::init();

    let matches = cli().get_matches();
    let config = resolve_config(&matches)?;

    let input = config.input.context("No input file given")?;
    let keyword = config.keyword.context("No keyword given (use --keyword)")?;
    let cleaner = ObjCleaner::new(keyword);

    if matches.get_flag("dry-run") {
        let stats = cleaner
            .dry_run(&input)
            .with_context(|| format!("Failed to clean {}", input.display()))?;
        println!("Dry run on {}: {}", input.display(), stats);
        return Ok(());
    }

    let output = config.output.context("No output file given")?;
    debug!("Cleaning {} -> {}", input.display(), output.display());

    let stats = cleaner
        .clean_file(&input, &output)
        .with_context(|| format!("Failed to clean {}", input.display()))?;

    println!(
        "New file saved to {} (removed objects containing: '{}')",
        output.display(),
        cleaner.keyword()
    );
    println!("{stats}");
    Ok(())
}
