//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use citygrid_test_support::fixtures::{names_for_grid, ruas_document};
use tempfile::TempDir;

use super::{Cli, CliError, Command, CostsArg, GenerateCommand, NamingArg, RepairArg, WeightingArg, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Writes a `ruas.json` holding enough names for a `rows x columns` grid.
pub(super) fn create_names_file(dir: &TempDir, rows: usize, columns: usize) -> io::Result<PathBuf> {
    create_text_file(dir, "ruas.json", &ruas_document(&names_for_grid(rows, columns)))
}

/// A `generate` command with CLI defaults apart from the grid and seed.
pub(super) fn generate_command(
    names: &Path,
    output: &Path,
    rows: usize,
    columns: usize,
    seed: u64,
) -> GenerateCommand {
    GenerateCommand {
        names: names.to_path_buf(),
        rows,
        columns,
        street_length: 200.0,
        max_speed: 15.0,
        taxi_rate: 4.0,
        non_motorized_speed: 1.5,
        prune_probability: 0.3,
        seed,
        properties_per_side: 5,
        naming: NamingArg::Unique,
        properties: WeightingArg::RegionWeighted,
        repair: RepairArg::ForwardScan,
        costs: CostsArg::WithExcavation,
        no_region_labels: false,
        output: output.to_path_buf(),
    }
}

pub(super) fn run_cli_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_cli(Cli { command }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
