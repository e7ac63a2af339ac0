use clap::Parser;
use tickerscope::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
