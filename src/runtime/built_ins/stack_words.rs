use crate::runtime::{built_ins::WordHandler, error, machine::Machine};
use std::collections::HashMap;

/// Duplicate the top value on the data stack.
///
/// Signature: `a -- a a`
fn word_dup(machine: &mut Machine) -> error::Result<()> {
    let value = machine.top()?;

    machine.push(value);
    machine.next();

    Ok(())
}

/// Swap the top 2 values on the data stack.
///
/// Signature: `a b -- b a`
fn word_swap(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(b);
    machine.push(a);
    machine.next();

    Ok(())
}

/// Make a copy of the second value and place it over the top value.
///
/// Signature: `a b -- a b a`
fn word_over(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(a);
    machine.push(b);
    machine.push(a);
    machine.next();

    Ok(())
}

/// Rotate the top 3 values on the stack, pulling the deepest to the top.
///
/// Signature: `a b c -- b c a`
fn word_rot(machine: &mut Machine) -> error::Result<()> {
    let c = machine.pop()?;
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(b);
    machine.push(c);
    machine.push(a);
    machine.next();

    Ok(())
}

/// Discard the top value on the data stack.
///
/// Signature: `a -- `
fn word_drop(machine: &mut Machine) -> error::Result<()> {
    let _ = machine.pop()?;

    machine.next();

    Ok(())
}

/// Discard the whole data stack.
///
/// Signature: `... -- `
fn word_clear(machine: &mut Machine) -> error::Result<()> {
    machine.clear_stack();
    machine.next();

    Ok(())
}

/// Register the stack manipulation words.
pub fn register_stack_words(words: &mut HashMap<&'static str, WordHandler>) {
    words.insert("dup", word_dup as WordHandler);
    words.insert("swap", word_swap as WordHandler);
    words.insert("over", word_over as WordHandler);
    words.insert("rot", word_rot as WordHandler);
    words.insert("drop", word_drop as WordHandler);
    words.insert("clear", word_clear as WordHandler);
}
