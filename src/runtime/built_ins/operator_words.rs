use crate::runtime::{
    error::{self, machine_error, machine_error_str, ErrorKind},
    machine::Machine,
};

/// The characters that operators are spelled from.
const OPERATOR_CHARS: &str = "+-*/%&|!=<>";

/// Does the spelling look like an operator?  An identifier made only of operator characters is
/// claimed by the operator dispatch, whether or not it turns out to be a real operator.  Words
/// like `>r` and `r>` contain a letter and so fall through to the intrinsics untouched.
pub fn is_operator_shaped(spelling: &str) -> bool {
    !spelling.is_empty() && spelling.chars().all(|next| OPERATOR_CHARS.contains(next))
}

/// Pop the two operands of a binary operator, the right hand side first since it is on top.
fn pop_pair(machine: &mut Machine) -> error::Result<(i32, i32)> {
    let r = machine.pop()?;
    let l = machine.pop()?;

    Ok((l, r))
}

/// Execute an operator-shaped identifier.  Arithmetic wraps in two's-complement, division
/// truncates toward zero, and the logical and comparison operators push 0 or 1.  A spelling made
/// of operator characters that is not one of the operators is malformed and fatal.
pub fn word_operator(machine: &mut Machine, spelling: &str) -> error::Result<()> {
    let result = match spelling {
        "!" => {
            let value = machine.pop()?;

            (value == 0) as i32
        }

        "+" => {
            let (l, r) = pop_pair(machine)?;

            l.wrapping_add(r)
        }

        "-" => {
            let (l, r) = pop_pair(machine)?;

            l.wrapping_sub(r)
        }

        "*" => {
            let (l, r) = pop_pair(machine)?;

            l.wrapping_mul(r)
        }

        "/" | "%" => {
            let (l, r) = pop_pair(machine)?;

            if r == 0 {
                return machine_error_str(
                    machine,
                    ErrorKind::ArithmeticError,
                    "division by zero",
                );
            }

            if spelling == "/" {
                l.wrapping_div(r)
            } else {
                l.wrapping_rem(r)
            }
        }

        "&" => {
            let (l, r) = pop_pair(machine)?;

            (l != 0 && r != 0) as i32
        }

        "|" => {
            let (l, r) = pop_pair(machine)?;

            (l != 0 || r != 0) as i32
        }

        "=" => {
            let (l, r) = pop_pair(machine)?;

            (l == r) as i32
        }

        "<" => {
            let (l, r) = pop_pair(machine)?;

            (l < r) as i32
        }

        ">" => {
            let (l, r) = pop_pair(machine)?;

            (l > r) as i32
        }

        "<=" => {
            let (l, r) = pop_pair(machine)?;

            (l <= r) as i32
        }

        ">=" => {
            let (l, r) = pop_pair(machine)?;

            (l >= r) as i32
        }

        "<>" => {
            let (l, r) = pop_pair(machine)?;

            (l != r) as i32
        }

        _ => {
            return machine_error(
                machine,
                ErrorKind::MalformedOperator,
                format!("'{}' is spelled like an operator but is not one", spelling),
            )
        }
    };

    machine.push(result);
    machine.next();

    Ok(())
}
