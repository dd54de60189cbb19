use clap::Parser;
use scalptrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
