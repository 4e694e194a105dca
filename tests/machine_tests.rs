use mforth::runtime::{
    error::{ErrorKind, ScriptError},
    machine::Machine,
};

// Run a program in-process and return the final data stack, bottom first.
fn eval_and_stack(source: &str) -> Result<Vec<i32>, ScriptError> {
    let mut machine = Machine::new(source.to_string())?;

    machine.run()?;

    Ok(machine.stack().to_vec())
}

fn stack_after(source: &str) -> Vec<i32> {
    eval_and_stack(source).unwrap_or_else(|error| panic!("program failed: {}", error))
}

fn error_kind(source: &str) -> ErrorKind {
    eval_and_stack(source)
        .expect_err("program was expected to fail")
        .kind()
}

#[test]
fn numbers_push_in_order() {
    assert_eq!(stack_after("1 2 3"), vec![1, 2, 3]);
}

#[test]
fn run_reports_the_top_of_stack() {
    let mut machine = Machine::new("1 2".to_string()).unwrap();
    assert_eq!(machine.run().unwrap(), 2);

    let mut machine = Machine::new("".to_string()).unwrap();
    assert_eq!(machine.run().unwrap(), 0);
}

#[test]
fn basic_arithmetic() {
    assert_eq!(stack_after("2 3 +"), vec![5]);
    assert_eq!(stack_after("10 3 -"), vec![7]);
    assert_eq!(stack_after("4 5 *"), vec![20]);
    assert_eq!(stack_after("20 4 /"), vec![5]);
    assert_eq!(stack_after("17 5 %"), vec![2]);
}

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(stack_after("-7 2 /"), vec![-3]);
    assert_eq!(stack_after("-7 2 %"), vec![-1]);
    assert_eq!(stack_after("7 -2 /"), vec![-3]);
}

#[test]
fn arithmetic_wraps() {
    assert_eq!(stack_after("2147483647 1 +"), vec![-2147483648]);
    assert_eq!(stack_after("-2147483648 1 -"), vec![2147483647]);
}

#[test]
fn logical_operators_produce_flags() {
    assert_eq!(stack_after("3 4 &"), vec![1]);
    assert_eq!(stack_after("0 4 &"), vec![0]);
    assert_eq!(stack_after("5 0 |"), vec![1]);
    assert_eq!(stack_after("0 0 |"), vec![0]);
}

#[test]
fn comparison_operators() {
    assert_eq!(stack_after("1 2 <"), vec![1]);
    assert_eq!(stack_after("2 1 <"), vec![0]);
    assert_eq!(stack_after("2 1 >"), vec![1]);
    assert_eq!(stack_after("1 1 ="), vec![1]);
    assert_eq!(stack_after("1 2 ="), vec![0]);
    assert_eq!(stack_after("1 2 <>"), vec![1]);
    assert_eq!(stack_after("1 1 <>"), vec![0]);
    assert_eq!(stack_after("1 1 <="), vec![1]);
    assert_eq!(stack_after("2 1 <="), vec![0]);
    assert_eq!(stack_after("1 1 >="), vec![1]);
    assert_eq!(stack_after("1 2 >="), vec![0]);
}

#[test]
fn logical_not_is_unary() {
    assert_eq!(stack_after("0 !"), vec![1]);
    assert_eq!(stack_after("7 !"), vec![0]);
    assert_eq!(stack_after("1 2 !"), vec![1, 0]);
}

#[test]
fn stack_manipulation_words() {
    assert_eq!(stack_after("5 dup"), vec![5, 5]);
    assert_eq!(stack_after("1 2 swap"), vec![2, 1]);
    assert_eq!(stack_after("1 2 swap swap"), vec![1, 2]);
    assert_eq!(stack_after("1 2 over"), vec![1, 2, 1]);
    assert_eq!(stack_after("1 2 3 rot"), vec![2, 3, 1]);
    assert_eq!(stack_after("1 2 drop"), vec![1]);
    assert_eq!(stack_after("1 2 3 clear"), Vec::<i32>::new());
}

#[test]
fn return_stack_words() {
    assert_eq!(stack_after("42 >r r>"), vec![42]);
    assert_eq!(stack_after("1 2 >r >r r> r>"), vec![1, 2]);
    assert_eq!(stack_after("5 >r r@ r>"), vec![5, 5]);
    assert_eq!(stack_after("1 2 >r >r rdrop r>"), vec![2]);
}

#[test]
fn rclear_empties_the_return_stack() {
    let mut machine = Machine::new("1 >r 2 >r rclear".to_string()).unwrap();

    machine.run().unwrap();
    assert!(machine.return_stack().is_empty());
}

#[test]
fn definitions_install_and_call() {
    assert_eq!(stack_after(": sq dup * ; 5 sq"), vec![25]);
    assert_eq!(stack_after(": a 1 ; : b a 2 ; b"), vec![1, 2]);
}

#[test]
fn word_lookup_is_case_insensitive() {
    assert_eq!(stack_after(": SQ DUP * ; 5 sq"), vec![25]);
    assert_eq!(stack_after(": sq dup * ; 5 SQ"), vec![25]);
    assert_eq!(stack_after("5 DUP"), vec![5, 5]);
}

#[test]
fn calls_leave_the_return_stack_balanced() {
    let mut machine = Machine::new(": sq dup * ; 5 sq 6 sq".to_string()).unwrap();

    machine.run().unwrap();
    assert!(machine.return_stack().is_empty());
    assert_eq!(machine.stack(), &[25, 36]);
}

#[test]
fn exit_returns_from_a_word_early() {
    assert_eq!(stack_after(": w 1 exit 2 ; w"), vec![1]);
}

#[test]
fn a_user_word_can_shadow_an_intrinsic() {
    assert_eq!(stack_after(": dup 42 ; 1 dup"), vec![1, 42]);
}

#[test]
fn operators_can_not_be_shadowed() {
    assert_eq!(stack_after(": + 9 ; 1 2 +"), vec![3]);
}

#[test]
fn conditionals_pick_a_branch() {
    assert_eq!(stack_after("3 0 = if 1 else 2 then"), vec![2]);
    assert_eq!(stack_after("0 0 = if 1 else 2 then"), vec![1]);
    assert_eq!(stack_after("1 if 5 then"), vec![5]);
    assert_eq!(stack_after("0 if 5 then"), Vec::<i32>::new());
}

#[test]
fn conditionals_nest() {
    assert_eq!(
        stack_after("1 if 0 if 10 else 20 then else 30 then"),
        vec![20]
    );
    assert_eq!(stack_after("0 if 1 if 2 then else 3 then"), vec![3]);
}

#[test]
fn branch_takes_a_relative_offset() {
    // The offset is applied from the branch token itself, hopping over the operand and the 99.
    assert_eq!(stack_after("1 branch 3 99 42"), vec![1, 42]);
}

#[test]
fn branch_targets_a_label() {
    assert_eq!(stack_after("branch skip 99 [skip] 7"), vec![7]);
}

#[test]
fn label_lookup_is_case_insensitive() {
    assert_eq!(stack_after("branch SKIP 99 [Skip] 7"), vec![7]);
}

#[test]
fn conditional_branch_pops_its_flag() {
    assert_eq!(stack_after("1 ?branch go 5 [go] 7"), vec![7]);
    assert_eq!(stack_after("0 ?branch go 5 [go] 7"), vec![5, 7]);
}

#[test]
fn a_label_loop_counts_down() {
    assert_eq!(
        stack_after("3 [loop] 1 - dup 0 > ?branch loop drop"),
        Vec::<i32>::new()
    );
}

#[test]
fn strings_push_a_sentinel_and_reversed_characters() {
    // The 0 sentinel goes deepest and the first character lands on top.
    assert_eq!(stack_after("\"AB\""), vec![0, 66, 65]);
}

#[test]
fn string_escapes_reach_the_stack_decoded() {
    assert_eq!(stack_after("\"A\\n\""), vec![0, 10, 65]);
}

#[test]
fn comments_do_nothing_at_run_time() {
    assert_eq!(stack_after("1 ( two three ) 2"), vec![1, 2]);
}

#[test]
fn unknown_words_are_fatal() {
    assert_eq!(error_kind("xyzzy"), ErrorKind::UnknownWord);
    assert_eq!(error_kind("1abc"), ErrorKind::UnknownWord);
}

#[test]
fn stack_underflow_is_fatal() {
    assert_eq!(error_kind("+"), ErrorKind::StackUnderflow);
    assert_eq!(error_kind("dup"), ErrorKind::StackUnderflow);
    assert_eq!(error_kind("1 swap"), ErrorKind::StackUnderflow);
}

#[test]
fn return_stack_underflow_is_fatal() {
    assert_eq!(error_kind("r>"), ErrorKind::ReturnStackUnderflow);
    assert_eq!(error_kind("r@"), ErrorKind::ReturnStackUnderflow);
    assert_eq!(error_kind("rdrop"), ErrorKind::ReturnStackUnderflow);
}

#[test]
fn dangling_end_of_definition_is_fatal() {
    assert_eq!(error_kind("1 ;"), ErrorKind::DanglingEndDef);
    assert_eq!(error_kind("exit"), ErrorKind::DanglingEndDef);
}

#[test]
fn division_by_zero_is_fatal() {
    assert_eq!(error_kind("1 0 /"), ErrorKind::ArithmeticError);
    assert_eq!(error_kind("1 0 %"), ErrorKind::ArithmeticError);
}

#[test]
fn malformed_operators_are_fatal() {
    assert_eq!(error_kind("1 2 =<"), ErrorKind::MalformedOperator);
    assert_eq!(error_kind("1 2 <%"), ErrorKind::MalformedOperator);
}

#[test]
fn unterminated_definitions_are_fatal() {
    assert_eq!(error_kind(": foo 1"), ErrorKind::UnterminatedDefinition);
    assert_eq!(error_kind(":"), ErrorKind::UnterminatedDefinition);
    assert_eq!(error_kind(": foo : bar ; ;"), ErrorKind::UnterminatedDefinition);
}

#[test]
fn unmatched_conditionals_are_fatal() {
    assert_eq!(error_kind("0 if 1"), ErrorKind::UnmatchedConditional);
    assert_eq!(error_kind("else"), ErrorKind::UnmatchedConditional);
}

#[test]
fn bad_branch_operands_are_fatal() {
    assert_eq!(error_kind("branch"), ErrorKind::BranchTargetInvalid);
    assert_eq!(error_kind("branch nowhere"), ErrorKind::BranchTargetInvalid);
    assert_eq!(error_kind("branch \"x\""), ErrorKind::BranchTargetInvalid);
    assert_eq!(error_kind("1 ?branch \"x\""), ErrorKind::BranchTargetInvalid);
}

#[test]
fn printing_a_string_without_a_sentinel_is_fatal() {
    assert_eq!(error_kind("65 .s"), ErrorKind::BadStringOutput);
}

#[test]
fn diagnostics_name_the_token_and_carry_a_dump() {
    let error = eval_and_stack("1 2 bogus").unwrap_err();

    assert!(error.message().contains("bogus"));
    assert!(error.message().contains("ip 2"));

    let dump = error.dump().expect("a runtime error should carry a dump");
    assert!(dump.contains("machine state"));
    assert!(dump.contains("data stack"));
}

#[test]
fn debug_dump_consumes_nothing() {
    let mut machine = Machine::new("1 2 .d".to_string()).unwrap();

    machine.run().unwrap();
    assert_eq!(machine.stack(), &[1, 2]);
}

#[test]
fn two_machines_are_independent() {
    let mut first = Machine::new(": w 1 ; w".to_string()).unwrap();
    let mut second = Machine::new("w".to_string()).unwrap();

    first.run().unwrap();

    let error = second.run().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownWord);
}
