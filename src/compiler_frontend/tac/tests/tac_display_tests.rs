use super::tac_test_support::*;
use crate::compiler_frontend::ast::ast_nodes::Operator;
use crate::compiler_frontend::tac::tac_builder::lower_program;
use crate::compiler_frontend::tac::tac_display::TacStage;
use crate::compiler_frontend::tac::tac_nodes::{Operand, TacInstruction, TacProgram};

#[test]
fn dump_numbers_every_instruction_once_in_order() {
    let tree = program(vec![
        decl("a"),
        assign("a", num(2)),
        decl("b"),
        assign("b", binop(Operator::Multiply, var("a"), num(3))),
        print(var("b")),
    ]);

    let tac = lower_program(&tree);
    let dump = tac.display(TacStage::Unoptimized);
    let mut lines = dump.lines();

    assert_eq!(lines.next(), Some("Unoptimized TAC Instructions:"));
    assert!(lines.next().is_some_and(|rule| rule.chars().all(|c| c == '─')));

    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), tac.len());
    for (i, (line, instruction)) in body.iter().zip(tac.iter()).enumerate() {
        assert_eq!(*line, format!("{:2}: {instruction}", i + 1));
    }
}

#[test]
fn optimized_header_and_wide_numbering() {
    let instructions = (0..10)
        .map(|value| TacInstruction::Print {
            value: Operand::Literal(value),
        })
        .collect();
    let dump = TacProgram::new(instructions).display(TacStage::Optimized);

    assert!(dump.starts_with("Optimized TAC Instructions:\n"));
    assert!(dump.contains("\n 1: PRINT 0\n"));
    assert!(dump.ends_with("10: PRINT 9\n"));
}

#[test]
fn instruction_forms() {
    let cases = [
        (
            TacInstruction::Return {
                value: Some(Operand::from("x")),
            },
            "RETURN x",
        ),
        (
            TacInstruction::Label {
                name: "f".to_string(),
            },
            "f:",
        ),
        (
            TacInstruction::FunctionEnd {
                name: "f".to_string(),
            },
            "END_FUNC f",
        ),
        (
            TacInstruction::Param {
                value: Operand::Literal(-3),
            },
            "PARAM -3",
        ),
        (
            TacInstruction::Store {
                array: "a".to_string(),
                index: Operand::from("i"),
                value: Operand::Literal(4),
            },
            "a[i] = 4",
        ),
        (TacInstruction::BlockBegin, "BEGIN_BLOCK"),
        (TacInstruction::BlockEnd, "END_BLOCK"),
    ];

    for (instruction, expected) in cases {
        assert_eq!(instruction.to_string(), expected);
    }
}
