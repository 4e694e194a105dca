use crate::runtime::{
    built_ins::WordHandler,
    error::{self, machine_error_str, ErrorKind},
    machine::Machine,
};
use std::{
    collections::HashMap,
    io::{self, Write},
};

/// Pop cells off the data stack as character codes and write each one out as a byte, stopping at
/// the 0 sentinel.  Running out of stack before finding the sentinel is fatal.
fn drain_string(machine: &mut Machine) -> error::Result<()> {
    let mut out = io::stdout();

    loop {
        match machine.try_pop() {
            Some(0) => break,
            Some(cell) => out.write_all(&[cell as u8])?,

            None => {
                return machine_error_str(
                    machine,
                    ErrorKind::BadStringOutput,
                    "no 0 terminator found before the bottom of the stack was reached",
                )
            }
        }
    }

    Ok(())
}

/// The behavior of the bare `.` token: pop the top of the data stack and print it as a signed
/// decimal integer on its own line.
pub fn word_print(machine: &mut Machine) -> error::Result<()> {
    let value = machine.pop()?;

    println!("{}", value);
    machine.next();

    Ok(())
}

/// The behavior of the `.s` token: print the string sitting on the data stack.
pub fn word_print_stack(machine: &mut Machine) -> error::Result<()> {
    drain_string(machine)?;
    machine.next();

    Ok(())
}

/// The behavior of the `.c` token: pop one cell and write it out as a single byte, flushed right
/// away so character-at-a-time output is visible as it happens.
pub fn word_print_char(machine: &mut Machine) -> error::Result<()> {
    let cell = machine.pop()?;
    let mut out = io::stdout();

    out.write_all(&[cell as u8])?;
    out.flush()?;
    machine.next();

    Ok(())
}

/// The behavior of the `."text"` token: push the string and immediately print it back off the
/// stack.
pub fn word_print_string(machine: &mut Machine, bytes: &[u8]) -> error::Result<()> {
    machine.push_string(bytes);
    drain_string(machine)?;
    machine.next();

    Ok(())
}

/// The behavior of the `.d` token: write the machine state snapshot to standard output.  The
/// stacks are left exactly as they were.
pub fn word_debug_dump(machine: &mut Machine) -> error::Result<()> {
    print!("{}", machine.state_dump());
    machine.next();

    Ok(())
}

/// Write a newline.
fn word_cr(machine: &mut Machine) -> error::Result<()> {
    println!();
    machine.next();

    Ok(())
}

/// Register the output words.
pub fn register_io_words(words: &mut HashMap<&'static str, WordHandler>) {
    words.insert("cr", word_cr as WordHandler);
}
