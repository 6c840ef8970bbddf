use std::process::ExitCode;

use calculate_sales::cli::{init_tracing, run, Cli};
use calculate_sales::SalesError;
use clap::error::ErrorKind;
use clap::Parser;

fn main() -> ExitCode {
    // A wrong argument count ends the run before anything touches the disk.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return report(&SalesError::unknown(err)),
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &SalesError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::from(err.exit_code())
}
