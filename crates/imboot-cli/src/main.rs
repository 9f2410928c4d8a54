mod cli;

use crate::cli::Cli;

fn main() {
    let outcome = Cli::run_from_args();
    if let Err(err) = &outcome {
        cli::report_error(err);
    }
    std::process::exit(cli::exit_code(&outcome));
}
