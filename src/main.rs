use clap::Parser;
use stockmetrics::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
