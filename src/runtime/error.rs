use crate::runtime::machine::Machine;
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Classification of everything that can go fatally wrong while lexing or running a program.
/// Every one of these ends the run; there is no user-level exception mechanism in the language.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// The lexer found text that no token rule could claim.
    UnrecognizedToken,

    /// An identifier that is not an operator, not an intrinsic, and not in the dictionary.
    UnknownWord,

    /// A word tried to pop or peek an empty data stack.
    StackUnderflow,

    /// A word tried to pop or peek an empty return stack, or a popped return address was not a
    /// usable token stream address.
    ReturnStackUnderflow,

    /// An identifier built only from operator characters that is not one of the operators.
    MalformedOperator,

    /// A `:` definition with a missing name or no closing `;`.
    UnterminatedDefinition,

    /// A `;` or `exit` executed with nothing on the return stack to return to.
    DanglingEndDef,

    /// An `if` with no matching `else` or `then`, or an `else` with no matching `then`.
    UnmatchedConditional,

    /// A `branch` or `?branch` with a missing operand, an operand of the wrong kind, or an
    /// operand naming a label that was never declared.
    BranchTargetInvalid,

    /// String printing reached the bottom of the data stack without finding the 0 sentinel.
    BadStringOutput,

    /// Division or remainder by zero.
    ArithmeticError,

    /// The host failed an I/O operation, reading a source file or writing program output.
    Io,
}

/// The kind names used in diagnostics.
impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ErrorKind::UnrecognizedToken => write!(f, "unrecognized token"),
            ErrorKind::UnknownWord => write!(f, "unknown word"),
            ErrorKind::StackUnderflow => write!(f, "stack underflow"),
            ErrorKind::ReturnStackUnderflow => write!(f, "return stack underflow"),
            ErrorKind::MalformedOperator => write!(f, "malformed operator"),
            ErrorKind::UnterminatedDefinition => write!(f, "unterminated definition"),
            ErrorKind::DanglingEndDef => write!(f, "dangling end of definition"),
            ErrorKind::UnmatchedConditional => write!(f, "unmatched conditional"),
            ErrorKind::BranchTargetInvalid => write!(f, "invalid branch target"),
            ErrorKind::BadStringOutput => write!(f, "bad string output"),
            ErrorKind::ArithmeticError => write!(f, "arithmetic error"),
            ErrorKind::Io => write!(f, "i/o error"),
        }
    }
}

/// Any error that occurs while lexing or executing a program.  Holds the classification, a
/// description that names the offending token and the instruction pointer, and, when the error
/// came out of a running machine, a dump of the machine state at the time.
#[derive(Clone)]
pub struct ScriptError {
    /// The classification of the error.
    kind: ErrorKind,

    /// The description of the error.
    message: String,

    /// A dump of the machine state at the time of the error, if one was available.
    dump: Option<String>,
}

impl Error for ScriptError {}

/// Pretty print the error the way it reaches the user on standard error: the diagnostic line
/// followed by the machine state dump when one was captured.
impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(dump) = &self.dump {
            write!(f, "\n{}", dump)?;
        }

        Ok(())
    }
}

impl Debug for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ScriptError {
    /// Create a new ScriptError.
    pub fn new(kind: ErrorKind, message: String, dump: Option<String>) -> ScriptError {
        ScriptError {
            kind,
            message,
            dump,
        }
    }

    /// Create a new ScriptError and wrap it in a Result::Err.
    pub fn new_as_result<T>(
        kind: ErrorKind,
        message: String,
        dump: Option<String>,
    ) -> Result<T> {
        Err(ScriptError::new(kind, message, dump))
    }

    /// The classification of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The description of the error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The machine state dump captured with the error, if one was available.
    pub fn dump(&self) -> Option<&str> {
        self.dump.as_deref()
    }
}

/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> ScriptError {
        ScriptError::new(ErrorKind::Io, format!("{}", error), None)
    }
}

/// A convenience function for creating a ScriptError wrapped in a Result::Err using the machine's
/// current position and state.  The diagnostic names the token being interpreted and the
/// instruction pointer, and the state dump travels with the error.
pub fn machine_error<T>(machine: &Machine, kind: ErrorKind, message: String) -> Result<T> {
    let context = match machine.current_spelling() {
        Some(spelling) => format!(
            "error interpreting token '{}' at ip {}: {}",
            spelling,
            machine.ip(),
            message
        ),

        None => format!(
            "error at ip {} (end of stream): {}",
            machine.ip(),
            message
        ),
    };

    ScriptError::new_as_result(kind, context, Some(machine.state_dump()))
}

pub fn machine_error_str<T>(machine: &Machine, kind: ErrorKind, message: &str) -> Result<T> {
    machine_error(machine, kind, message.to_string())
}
