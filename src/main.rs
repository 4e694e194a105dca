use mforth::runtime::{
    error::{self, ErrorKind, ScriptError},
    machine::Machine,
};
use std::{
    env,
    fs::read_to_string,
    io::{self, Read},
    process::ExitCode,
};

/// The program that runs when the interpreter is started with no arguments.  A small tour of the
/// language: a word definition, a string printed off the data stack, and a counted loop built
/// from a label and a conditional branch.
const DEMO_PROGRAM: &str = r#"
  ( Built-in demo program. )
  : square dup * ;
  "hello world\n" .s
  5 [countdown] dup . 1 - dup 0 > ?branch countdown drop
  7 square .
"#;

/// Gather the program text to run.  File paths are read and concatenated in argument order, a `-`
/// reads standard input, and no arguments at all selects the built-in demo program.
fn gather_source(args: &[String]) -> error::Result<String> {
    if args.is_empty() {
        return Ok(DEMO_PROGRAM.to_string());
    }

    let mut text = String::new();

    for arg in args {
        if arg == "-" {
            io::stdin().read_to_string(&mut text)?;
        } else {
            match read_to_string(arg) {
                Ok(contents) => text.push_str(&contents),

                Err(error) => {
                    return ScriptError::new_as_result(
                        ErrorKind::Io,
                        format!("could not read file {}: {}", arg, error),
                        None,
                    )
                }
            }
        }
    }

    Ok(text)
}

/// Lex and run the program, producing the value to report as the process exit status.
fn run() -> error::Result<i32> {
    let args: Vec<String> = env::args().skip(1).collect();
    let source = gather_source(&args)?;

    let mut machine = Machine::new(source)?;

    machine.run()
}

fn main() -> ExitCode {
    match run() {
        // The exit status is the final top of the data stack, which the operating system masks to
        // its low 8 bits.
        Ok(result) => ExitCode::from(result as u8),

        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
