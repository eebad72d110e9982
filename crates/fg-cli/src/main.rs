use clap::Parser;
use colored::Colorize;
use fg_cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too and go to stdout
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = fg_core::init_from_args(
        cli.log_level.clone(),
        cli.log_file.clone(),
        cli.verbose,
        cli.log_format,
    ) {
        eprintln!("{} failed to initialize logging: {}", "warning:".yellow(), e);
    }

    match fg_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
