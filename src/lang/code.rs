use std::fmt::{self, Display, Formatter};

/// The operations that can be attached to tokens and performed by the machine.  The lexer decides
/// which operation each token gets, and the evaluator loop simply dispatches on the tag.  Keeping
/// this a closed enum instead of storing function references in the tokens means there is nothing
/// to allocate per token and the whole stream is trivially printable for debugging.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Op {
    /// Begin a word definition.  Reads the following identifier as the new word's name, records
    /// the address after the name as the body start, and skips over the body.
    StartDef,

    /// End a word definition.  At run time this is the word return: the saved caller address is
    /// popped from the return stack into the instruction pointer.
    EndDef,

    /// Pop the top of the data stack and print it as a signed decimal integer with a newline.
    PrintTop,

    /// Push the held string onto the data stack and then print it with the string printing
    /// semantics.  The bytes have already had their escape sequences decoded by the lexer.
    PrintString(Vec<u8>),

    /// Pop cells from the data stack as character codes and write each one out until a 0 sentinel
    /// is found.
    PrintStack,

    /// Pop one cell from the data stack and write it out as a single byte, flushed immediately.
    PrintChar,

    /// Write a human readable dump of the machine state to standard output.  Consumes nothing.
    DebugDump,

    /// Push a number literal onto the data stack.
    PushNumber(i32),

    /// Push a string onto the data stack, 0 sentinel deepest and the first character on top.  The
    /// bytes have already had their escape sequences decoded by the lexer.
    PushString(Vec<u8>),

    /// Register a named label as pointing at the following token's address.
    Label(String),

    /// Execute a word.  The spelling is kept as written in the source; it is resolved against the
    /// operators, the dictionary, and the intrinsics when the token runs.
    Word(String),

    /// A comment.  Does nothing but advance the instruction pointer.
    Comment,
}

/// Make sure that the operations are nicely printable for state dumps and debugging.
impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        // Render string payload bytes readably, escaping the characters the lexer translates.
        fn escaped(bytes: &[u8]) -> String {
            let mut text = String::new();

            for byte in bytes {
                match byte {
                    b'\n' => text.push_str("\\n"),
                    b'\r' => text.push_str("\\r"),
                    b'\t' => text.push_str("\\t"),
                    b'"' => text.push_str("\\\""),
                    b'\\' => text.push_str("\\\\"),
                    _ => text.push(*byte as char),
                }
            }

            text
        }

        match self {
            Op::StartDef => write!(f, "StartDef"),
            Op::EndDef => write!(f, "EndDef"),
            Op::PrintTop => write!(f, "PrintTop"),
            Op::PrintString(bytes) => write!(f, "PrintString \"{}\"", escaped(bytes)),
            Op::PrintStack => write!(f, "PrintStack"),
            Op::PrintChar => write!(f, "PrintChar"),
            Op::DebugDump => write!(f, "DebugDump"),
            Op::PushNumber(number) => write!(f, "PushNumber {}", number),
            Op::PushString(bytes) => write!(f, "PushString \"{}\"", escaped(bytes)),
            Op::Label(name) => write!(f, "Label {}", name),
            Op::Word(spelling) => write!(f, "Word {}", spelling),
            Op::Comment => write!(f, "Comment"),
        }
    }
}
