use clap::Parser;
use stockboard::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
