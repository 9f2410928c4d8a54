use super::*;

mod report;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}
