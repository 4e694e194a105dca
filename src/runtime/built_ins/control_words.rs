use crate::{
    lang::{code::Op, tokenizing::TokenKind},
    runtime::{
        built_ins::WordHandler,
        error::{self, machine_error, machine_error_str, ErrorKind},
        machine::Machine,
    },
};
use std::collections::HashMap;

/// The behavior of the `:` token.  The next token must be an identifier naming the new word.  The
/// address after the name becomes the body start, the body is skipped over without executing, and
/// once the closing `;` is found the name is installed in the dictionary.  Definitions can not
/// nest.
pub fn word_start_definition(machine: &mut Machine) -> error::Result<()> {
    machine.next();

    let name = match machine.current_token() {
        Some(token) if token.is_identifier() => token.spelling(machine.source()).to_string(),
        _ => {
            return machine_error_str(
                machine,
                ErrorKind::UnterminatedDefinition,
                "expecting a name after ':'",
            )
        }
    };

    machine.next();

    let body = machine.ip();

    loop {
        if machine.at_end() {
            return machine_error(
                machine,
                ErrorKind::UnterminatedDefinition,
                format!("definition of {} has no closing ';'", name),
            );
        }

        let kind = machine.tokens()[machine.ip()].kind;

        match kind {
            TokenKind::EndDef => break,

            TokenKind::StartDef => {
                return machine_error(
                    machine,
                    ErrorKind::UnterminatedDefinition,
                    format!("definition of {} contains another ':', definitions can not nest", name),
                )
            }

            _ => machine.next(),
        }
    }

    machine.next();
    machine.add_definition(&name, body);

    Ok(())
}

/// The behavior of the `;` token: return to the caller saved on the return stack.
pub fn word_end_definition(machine: &mut Machine) -> error::Result<()> {
    machine.exit_definition()
}

/// Return from the current word early.  Does exactly what the closing `;` does.
fn word_exit(machine: &mut Machine) -> error::Result<()> {
    machine.exit_definition()
}

/// Pop a flag off the data stack.  Nonzero falls through into the true branch; zero scans ahead,
/// nesting aware, for the matching `else` or `then` and resumes one token past it.
fn word_if(machine: &mut Machine) -> error::Result<()> {
    let flag = machine.pop()?;

    machine.next();

    if flag != 0 {
        return Ok(());
    }

    let mut depth = 0;

    let found = machine.branch_to(|token, spelling| {
        if !token.is_identifier() {
            return false;
        }

        match spelling.to_lowercase().as_str() {
            "if" => {
                depth += 1;
                false
            }

            "else" => depth == 0,

            "then" => {
                if depth == 0 {
                    true
                } else {
                    depth -= 1;
                    false
                }
            }

            _ => false,
        }
    });

    if !found {
        return machine_error_str(
            machine,
            ErrorKind::UnmatchedConditional,
            "'if' with no corresponding 'else' or 'then'",
        );
    }

    machine.next();

    Ok(())
}

/// Reached only when the true branch falls into it: skip over the false branch, nesting aware, to
/// one past the matching `then`.
fn word_else(machine: &mut Machine) -> error::Result<()> {
    machine.next();

    let mut depth = 0;

    let found = machine.branch_to(|token, spelling| {
        if !token.is_identifier() {
            return false;
        }

        match spelling.to_lowercase().as_str() {
            "if" => {
                depth += 1;
                false
            }

            "then" => {
                if depth == 0 {
                    true
                } else {
                    depth -= 1;
                    false
                }
            }

            _ => false,
        }
    });

    if !found {
        return machine_error_str(
            machine,
            ErrorKind::UnmatchedConditional,
            "'else' with no corresponding 'then'",
        );
    }

    machine.next();

    Ok(())
}

/// The closing marker of a conditional.  Nothing to do but move along.
fn word_then(machine: &mut Machine) -> error::Result<()> {
    machine.next();

    Ok(())
}

/// Work out where a branch at the given address lands.  The operand is the following token: a
/// number is a relative offset applied to the branch token's own address, an identifier must name
/// a declared label and the jump is absolute to the token after that label.
fn branch_target(machine: &Machine, branch_ip: usize) -> error::Result<i64> {
    let token = match machine.tokens().get(branch_ip + 1) {
        Some(token) => token,
        None => {
            return machine_error_str(
                machine,
                ErrorKind::BranchTargetInvalid,
                "branch with no operand",
            )
        }
    };

    match &token.op {
        Op::PushNumber(offset) => Ok(branch_ip as i64 + *offset as i64),

        Op::Word(spelling) => match machine.find_label(spelling) {
            Some(address) => Ok(address as i64),
            None => machine_error(
                machine,
                ErrorKind::BranchTargetInvalid,
                format!("no label named {} to branch to", spelling),
            ),
        },

        _ => machine_error(
            machine,
            ErrorKind::BranchTargetInvalid,
            format!(
                "branch operand must be a number or a label name, not a {}",
                token.kind
            ),
        ),
    }
}

/// Transfer control unconditionally to the operand's target.
fn word_branch(machine: &mut Machine) -> error::Result<()> {
    let target = branch_target(machine, machine.ip())?;

    machine.abranch(target);

    Ok(())
}

/// Pop a flag and transfer control to the operand's target only if it is nonzero.  The operand is
/// checked either way; an untaken branch resumes after it.
fn word_cond_branch(machine: &mut Machine) -> error::Result<()> {
    let flag = machine.pop()?;
    let target = branch_target(machine, machine.ip())?;

    if flag != 0 {
        machine.abranch(target);
    } else {
        machine.rbranch(2);
    }

    Ok(())
}

/// Register the control flow words.
pub fn register_control_words(words: &mut HashMap<&'static str, WordHandler>) {
    words.insert("if", word_if as WordHandler);
    words.insert("else", word_else as WordHandler);
    words.insert("then", word_then as WordHandler);
    words.insert("branch", word_branch as WordHandler);
    words.insert("?branch", word_cond_branch as WordHandler);
    words.insert("exit", word_exit as WordHandler);
}
