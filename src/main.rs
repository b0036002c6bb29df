use std::process::ExitCode;

use clap::Parser;

use usage_grammar::cli::{Cli, render};
use usage_grammar::grammar::{Error, docopt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match cli.resolve_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("usage-grammar: config error: {e}");
            return ExitCode::from(2);
        }
    };
    let doc = match cli.read_doc() {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("usage-grammar: {e:#}");
            return ExitCode::from(2);
        }
    };

    match docopt(&doc, &cli.args, &settings) {
        Ok(arguments) => match render(&arguments, cli.pretty) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("usage-grammar: {e}");
                ExitCode::from(2)
            }
        },
        Err(e @ (Error::Help(_) | Error::Version(_))) => {
            println!("{e}");
            ExitCode::SUCCESS
        }
        Err(e @ Error::Language(_)) => {
            eprintln!("usage-grammar: {e}");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
