use crate::runtime::{built_ins::WordHandler, error, machine::Machine};
use std::collections::HashMap;

/// Move the top of the data stack over to the return stack.
///
/// Signature: `a -- ` with `a` now on the return stack.
fn word_to_return(machine: &mut Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.rpush(value);
    machine.next();

    Ok(())
}

/// Move the top of the return stack back to the data stack.
///
/// Signature: ` -- a` with `a` taken off the return stack.
fn word_from_return(machine: &mut Machine) -> error::Result<()> {
    let value = machine.rpop()?;

    machine.push(value);
    machine.next();

    Ok(())
}

/// Copy the top of the return stack onto the data stack without disturbing it.
///
/// Signature: ` -- a`
fn word_fetch_return(machine: &mut Machine) -> error::Result<()> {
    let value = machine.rtop()?;

    machine.push(value);
    machine.next();

    Ok(())
}

/// Discard the top of the return stack.
fn word_drop_return(machine: &mut Machine) -> error::Result<()> {
    let _ = machine.rpop()?;

    machine.next();

    Ok(())
}

/// Discard the whole return stack.  A program that does this inside a word has thrown away its
/// way back and the surrounding `;` will fail.
fn word_clear_return(machine: &mut Machine) -> error::Result<()> {
    machine.clear_return_stack();
    machine.next();

    Ok(())
}

/// Register the return stack words.
pub fn register_return_stack_words(words: &mut HashMap<&'static str, WordHandler>) {
    words.insert(">r", word_to_return as WordHandler);
    words.insert("r>", word_from_return as WordHandler);
    words.insert("r@", word_fetch_return as WordHandler);
    words.insert("rdrop", word_drop_return as WordHandler);
    words.insert("rclear", word_clear_return as WordHandler);
}
