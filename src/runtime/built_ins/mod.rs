/// Words that manipulate the data stack.
pub mod stack_words;

/// Words that move values between the data stack and the return stack.
pub mod return_stack_words;

/// Words for definitions, conditionals, and branches.
pub mod control_words;

/// The arithmetic, logical, and comparison operators.
pub mod operator_words;

/// Words that perform output.
pub mod io_words;

use crate::runtime::{error, machine::Machine};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// The handler function for an intrinsic word.  A handler is responsible for moving the
/// instruction pointer itself, usually a plain advance once its stack work is done.
pub type WordHandler = fn(&mut Machine) -> error::Result<()>;

lazy_static! {
    /// Every intrinsic word known to the interpreter, keyed by lowercased name.
    static ref INTRINSICS: HashMap<&'static str, WordHandler> = {
        let mut words = HashMap::new();

        stack_words::register_stack_words(&mut words);
        return_stack_words::register_return_stack_words(&mut words);
        control_words::register_control_words(&mut words);
        io_words::register_io_words(&mut words);

        words
    };
}

/// Look up an intrinsic word.  The name is expected to already be lowercased.
pub fn find_intrinsic(name: &str) -> Option<WordHandler> {
    INTRINSICS.get(name).copied()
}
