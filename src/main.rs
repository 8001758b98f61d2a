use brackets::{ExecuteError, StepControl, balance, execute, execute_with_control};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::fs;
use std::io::{self, Write};

mod cli_util;

#[derive(Parser, Debug)]
#[command(name = "brackets", version, about = "Run programs written entirely in brackets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program against an initial stack and print the final stack
    Run(RunArgs),
    /// Check bracket balance without running anything
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Initial active stack values, bottom to top (comma separated)
    #[arg(
        short = 'i',
        long = "input",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    input: Vec<i64>,

    /// Abort execution after this many machine steps
    #[arg(long = "max-steps", value_name = "N")]
    max_steps: Option<usize>,

    /// Read program text from PATH instead of positional CODE
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Concatenated program text parts
    #[arg(value_name = "CODE", trailing_var_arg = true)]
    code: Vec<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Read program text from PATH instead of positional CODE
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Concatenated program text parts
    #[arg(value_name = "CODE", trailing_var_arg = true)]
    code: Vec<String>,
}

/// Resolve the program text from either the positional parts or --file.
/// Exactly one of the two must be given.
fn load_source(program: &str, file: Option<String>, code: Vec<String>) -> Result<String, i32> {
    if file.is_none() && code.is_empty() {
        eprintln!("{program}: no program text given (pass CODE or --file)");
        let _ = io::stderr().flush();
        return Err(2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional CODE together with --file");
        let _ = io::stderr().flush();
        return Err(2);
    }

    match file {
        Some(path) => match fs::read_to_string(&path) {
            Ok(s) => Ok(s),
            Err(e) => {
                eprintln!("{program}: failed to read program file: {e}");
                let _ = io::stderr().flush();
                Err(1)
            }
        },
        None => Ok(code.join("")),
    }
}

fn run_with_args(program: &str, args: RunArgs) -> i32 {
    let RunArgs { input, max_steps, file, code } = args;

    let source = match load_source(program, file, code) {
        Ok(s) => s,
        Err(code) => return code,
    };

    // Validate before the text ever reaches the lexer; non-bracket
    // characters are only a warning.
    match balance::check(&source) {
        Ok(report) => {
            if report.ignored > 0 {
                eprintln!(
                    "{program}: note: {} non-bracket character(s) will be ignored",
                    report.ignored
                );
            }
        }
        Err(err) => {
            cli_util::print_balance_error(Some(program), &source, &err);
            return 1;
        }
    }

    let result = match max_steps {
        Some(limit) => execute_with_control(&input, &source, StepControl::with_max_steps(limit)),
        None => execute(&input, &source).map_err(ExecuteError::from),
    };

    match result {
        Ok(values) => {
            println!("{}", format_stack(&values));
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn check_with_args(program: &str, args: CheckArgs) -> i32 {
    let CheckArgs { file, code } = args;

    let source = match load_source(program, file, code) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match balance::check(&source) {
        Ok(report) => {
            if report.ignored > 0 {
                eprintln!(
                    "{program}: note: {} non-bracket character(s) will be ignored",
                    report.ignored
                );
            }
            println!("OK");
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            cli_util::print_balance_error(Some(program), &source, &err);
            1
        }
    }
}

/// Final stack rendered bottom-to-top on one line.
fn format_stack(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    // Pull the program name for error message consistency
    let program = env::args().next().unwrap_or_else(|| String::from("brackets"));

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Run(args) => run_with_args(&program, args),
        Command::Check(args) => check_with_args(&program, args),
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_stack_joins_bottom_to_top() {
        assert_eq!(format_stack(&[3, -1, 4]), "3 -1 4");
        assert_eq!(format_stack(&[]), "");
    }
}
