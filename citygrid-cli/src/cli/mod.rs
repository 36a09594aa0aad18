//! Command-line interface orchestration for the citygrid generator.
//!
//! `generate` writes a JSON snapshot of a freshly generated city, `inspect`
//! validates a snapshot and reports it per region, and `highlight` lists the
//! edges joining requested vertex pairs.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutput, CostsArg, GenerateCommand, GenerateSummary,
    HighlightCommand, HighlightReport, InspectCommand, InspectReport, NamingArg, RepairArg,
    VertexPair, WeightingArg, render_output, run_cli,
};

#[cfg(test)]
mod test_helpers;
