use super::mips_simulator::run_mips;
use crate::backends::mips::{MipsCodegenConfig, MipsModule, generate_mips};
use crate::compiler_frontend::ast::ast_nodes::{AstNode, Operator, ValueType};
use crate::compiler_frontend::optimizers::constant_folding::optimize;
use crate::compiler_frontend::tac::tac_builder::lower_program;
use crate::compiler_frontend::tac::tac_nodes::{Operand, TacInstruction};
use crate::compiler_frontend::tac::tests::tac_test_support::*;

fn compile(tree: &AstNode) -> MipsModule {
    generate_mips(tree, &MipsCodegenConfig::default()).expect("program should compile")
}

fn compile_and_run(tree: &AstNode) -> String {
    let module = compile(tree);
    run_mips(&module.source).unwrap_or_else(|error| panic!("{error}\n{}", module.source))
}

fn array_2d(name: &str, rows: u32, cols: u32) -> AstNode {
    AstNode::Array2dDeclaration {
        name: name.to_string(),
        rows,
        cols,
    }
}

fn element_2d(name: &str, row: i32, col: i32) -> Box<AstNode> {
    Box::new(AstNode::Array2dAccess {
        name: name.to_string(),
        row: num(row),
        col: num(col),
    })
}

fn add_function() -> AstNode {
    function(
        ValueType::Int,
        "add",
        &["a", "b"],
        vec![AstNode::Return {
            expr: Some(binop(Operator::Add, var("a"), var("b"))),
        }],
    )
}

fn main_function(body: Vec<AstNode>) -> AstNode {
    function(ValueType::Int, "main", &[], body)
}

#[test]
fn program_without_functions_becomes_main() {
    let tree = program(vec![decl("x"), assign("x", num(5)), print(var("x"))]);
    let module = compile(&tree);

    let expected = "\
.data

.text
.globl main

main:
    addi $sp, $sp, -8
    sw $ra, 4($sp)
    sw $fp, 0($sp)
    move $fp, $sp
    addi $sp, $sp, -4
    # Declared x at offset -4
    li $t0, 5
    sw $t0, -4($fp)
    lw $t0, -4($fp)
    move $a0, $t0
    li $v0, 1
    syscall
    li $v0, 11
    li $a0, 10
    syscall
    move $sp, $fp
    lw $fp, 0($sp)
    lw $ra, 4($sp)
    addi $sp, $sp, 8
    li $v0, 10
    syscall
";
    assert_eq!(module.source, expected);
    assert!(module.warnings.is_empty());
    assert_eq!(run_mips(&module.source).as_deref(), Ok("5\n"));
}

#[test]
fn functions_get_frames_and_calls_pass_arguments_in_registers() {
    let tree = functions(vec![
        add_function(),
        main_function(vec![print(call("add", vec![num(1), num(2)]))]),
    ]);
    let module = compile(&tree);

    let expected = "\
.data

.text
.globl main

func_add:
    addi $sp, $sp, -8
    sw $ra, 4($sp)
    sw $fp, 0($sp)
    move $fp, $sp
    sw $a0, 8($fp)
    sw $a1, 12($fp)
    lw $t0, 8($fp)
    lw $t1, 12($fp)
    add $t0, $t0, $t1
    move $v0, $t0
    move $sp, $fp
    lw $fp, 0($sp)
    lw $ra, 4($sp)
    addi $sp, $sp, 8
    jr $ra
    move $sp, $fp
    lw $fp, 0($sp)
    lw $ra, 4($sp)
    addi $sp, $sp, 8
    jr $ra

main:
    addi $sp, $sp, -8
    sw $ra, 4($sp)
    sw $fp, 0($sp)
    move $fp, $sp
    li $t0, 1
    li $t1, 2
    move $a0, $t0
    move $a1, $t1
    addi $sp, $sp, -4
    sw $ra, 0($sp)
    addi $sp, $sp, -16
    jal func_add
    addi $sp, $sp, 16
    lw $ra, 0($sp)
    addi $sp, $sp, 4
    move $t2, $v0
    move $a0, $t2
    li $v0, 1
    syscall
    li $v0, 11
    li $a0, 10
    syscall
    move $sp, $fp
    lw $fp, 0($sp)
    lw $ra, 4($sp)
    addi $sp, $sp, 8
    li $v0, 10
    syscall
";
    assert_eq!(module.source, expected);
    assert_eq!(run_mips(&module.source).as_deref(), Ok("3\n"));
}

#[test]
fn parameter_shadows_global_of_the_same_name() {
    let tree = program(vec![
        decl("x"),
        function(
            ValueType::Int,
            "f",
            &["x"],
            vec![AstNode::Return {
                expr: Some(var("x")),
            }],
        ),
        main_function(vec![
            assign("x", num(7)),
            print(call("f", vec![num(3)])),
            print(var("x")),
        ]),
    ]);
    let module = compile(&tree);

    let f_body = module
        .source
        .split("func_f:")
        .nth(1)
        .and_then(|rest| rest.split("main:").next())
        .expect("f is emitted before main");
    assert!(f_body.contains("    lw $t0, 8($fp)\n"));
    assert!(!f_body.contains("_globals"));

    assert!(module.source.starts_with(".data\n_globals: .space 4\n"));
    assert!(module
        .source
        .contains("    la $t0, _globals\n    li $t1, 7\n    sw $t1, 0($t0)\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("3\n7\n"));
}

#[test]
fn two_dimensional_arrays_are_row_major() {
    let tree = program(vec![
        array_2d("m", 3, 4),
        AstNode::Array2dAssign {
            name: "m".to_string(),
            row: num(2),
            col: num(1),
            value: num(9),
        },
        print(element_2d("m", 2, 1)),
        // Row 1, column 5 is element 9 as well
        print(element_2d("m", 1, 5)),
        print(element_2d("m", 1, 2)),
    ]);
    let module = compile(&tree);

    let store = "\
    # Declared 2D array m[3][4] at offset -48
    li $t0, 2
    li $t1, 1
    li $t2, 4
    mul $t0, $t0, $t2
    add $t0, $t0, $t1
    sll $t0, $t0, 2
    addi $t3, $fp, -48
    add $t0, $t0, $t3
    li $t1, 9
    sw $t1, 0($t0)
";
    assert!(module.source.contains(store), "{}", module.source);
    assert!(module.source.contains("    addi $sp, $sp, -48\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("9\n9\n0\n"));
}

#[test]
fn one_dimensional_array_round_trip() {
    let tree = program(vec![
        AstNode::ArrayDeclaration {
            name: "a".to_string(),
            size: 10,
        },
        decl("i"),
        assign("i", num(3)),
        AstNode::ArrayAssign {
            name: "a".to_string(),
            index: binop(Operator::Add, var("i"), num(1)),
            value: num(42),
        },
        print(Box::new(AstNode::ArrayAccess {
            name: "a".to_string(),
            index: num(4),
        })),
    ]);
    let module = compile(&tree);

    assert!(module
        .source
        .contains("    # Declared array a[10] at offset -40\n    # Declared i at offset -44\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("42\n"));
}

#[test]
fn arguments_arrive_in_source_order() {
    let tree = functions(vec![
        function(
            ValueType::Int,
            "sub",
            &["a", "b"],
            vec![AstNode::Return {
                expr: Some(binop(Operator::Subtract, var("a"), var("b"))),
            }],
        ),
        main_function(vec![print(call("sub", vec![num(10), num(3)]))]),
    ]);

    assert_eq!(compile_and_run(&tree), "7\n");
}

#[test]
fn nested_calls_and_calls_from_inside_functions() {
    let tree = functions(vec![
        add_function(),
        function(
            ValueType::Int,
            "twice",
            &["x"],
            vec![AstNode::Return {
                expr: Some(call("add", vec![var("x"), var("x")])),
            }],
        ),
        main_function(vec![
            print(call("add", vec![call("add", vec![num(1), num(2)]), num(3)])),
            print(call("twice", vec![num(4)])),
        ]),
    ]);

    assert_eq!(compile_and_run(&tree), "6\n8\n");
}

#[test]
fn call_results_routed_through_a_local_keep_live_values() {
    // Temporaries are not saved across `jal`, a local survives the call
    let tree = functions(vec![
        add_function(),
        main_function(vec![
            decl("a"),
            decl("sum"),
            assign("a", num(10)),
            assign("sum", call("add", vec![num(1), num(2)])),
            print(binop(Operator::Add, var("a"), var("sum"))),
        ]),
    ]);

    assert_eq!(compile_and_run(&tree), "13\n");
}

#[test]
fn functions_can_be_called_before_they_are_declared() {
    let tree = functions(vec![
        main_function(vec![print(call("add", vec![num(20), num(22)]))]),
        add_function(),
    ]);

    let module = compile(&tree);
    assert!(module.source.find("main:") < module.source.find("func_add:"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("42\n"));
}

#[test]
fn globals_live_in_the_data_block() {
    let tree = program(vec![
        decl("g"),
        AstNode::ArrayDeclaration {
            name: "a".to_string(),
            size: 3,
        },
        main_function(vec![
            assign("g", num(4)),
            AstNode::ArrayAssign {
                name: "a".to_string(),
                index: num(1),
                value: binop(Operator::Add, var("g"), num(1)),
            },
            print(Box::new(AstNode::ArrayAccess {
                name: "a".to_string(),
                index: num(1),
            })),
        ]),
    ]);
    let module = compile(&tree);

    assert!(module.source.starts_with(
        "\
.data
_globals: .space 16
    # Declared g at offset 0
    # Declared array a[3] at offset 4

.text
.globl main

main:
"
    ));
    assert!(module.source.contains("    la $t1, _globals\n    addi $t1, $t1, 4\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("5\n"));
}

#[test]
fn void_functions_update_globals() {
    let tree = program(vec![
        decl("g"),
        function(
            ValueType::Void,
            "bump",
            &[],
            vec![assign("g", binop(Operator::Add, var("g"), num(1)))],
        ),
        main_function(vec![
            assign("g", num(0)),
            *call("bump", vec![]),
            *call("bump", vec![]),
            print(var("g")),
        ]),
    ]);

    assert_eq!(compile_and_run(&tree), "2\n");
}

#[test]
fn blocks_shadow_and_restore() {
    let tree = program(vec![
        decl("x"),
        assign("x", num(1)),
        AstNode::Block {
            body: Some(Box::new(program(vec![
                decl("x"),
                assign("x", num(2)),
                print(var("x")),
            ]))),
        },
        print(var("x")),
    ]);
    let module = compile(&tree);

    assert!(module.source.contains("    addi $sp, $sp, -8\n"));
    assert!(module.source.contains("    # Declared x at offset -8\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("2\n1\n"));
}

#[test]
fn folded_prints_agree_with_the_running_program() {
    // int x; x = 5; { int x; x = 3; print(x); } print(x);
    let tree = program(vec![
        decl("x"),
        assign("x", num(5)),
        AstNode::Block {
            body: Some(Box::new(program(vec![
                decl("x"),
                assign("x", num(3)),
                print(var("x")),
            ]))),
        },
        print(var("x")),
    ]);

    let folded: String = optimize(&lower_program(&tree))
        .iter()
        .filter_map(|instruction| match instruction {
            TacInstruction::Print {
                value: Operand::Literal(value),
            } => Some(format!("{value}\n")),
            _ => None,
        })
        .collect();

    assert_eq!(folded, "3\n5\n");
    assert_eq!(compile_and_run(&tree), folded);
}

#[test]
fn arithmetic_uses_32_bit_instructions() {
    let tree = program(vec![print(binop(
        Operator::Multiply,
        binop(Operator::Subtract, num(2), num(5)),
        num(3),
    ))]);

    let module = compile(&tree);
    assert!(module.source.contains("    sub $t0, $t0, $t1\n"));
    assert!(module.source.contains("    mul $t0, $t0, $t1\n"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("-9\n"));
}

#[test]
fn left_nested_sums_only_need_two_registers() {
    let mut sum = num(1);
    for value in 2..=20 {
        sum = binop(Operator::Add, sum, num(value));
    }
    let tree = program(vec![print(sum)]);
    let module = compile(&tree);

    assert!(!module.source.contains("$t2"));
    assert_eq!(run_mips(&module.source).as_deref(), Ok("210\n"));
}

#[test]
fn deep_right_nesting_wraps_the_register_cursor() {
    // 1 + (2 + (3 + ... + 9)) needs nine live values
    let mut sum = num(9);
    for value in (1..=8).rev() {
        sum = binop(Operator::Add, num(value), sum);
    }
    let module = compile(&program(vec![print(sum)]));

    assert!(module.source.contains("    li $t7, 8\n    li $t0, 9\n"));
}

#[test]
fn labels_follow_the_configuration() {
    let config = MipsCodegenConfig {
        entry_point: "start".to_string(),
        function_label_prefix: "fn_".to_string(),
        globals_label: "_g".to_string(),
    };
    let tree = program(vec![
        decl("total"),
        function(
            ValueType::Int,
            "helper",
            &[],
            vec![AstNode::Return {
                expr: Some(num(11)),
            }],
        ),
        function(
            ValueType::Int,
            "start",
            &[],
            vec![
                // A call result goes through a local, temporaries don't survive calls
                decl("r"),
                assign("r", call("helper", vec![])),
                assign("total", var("r")),
                print(var("total")),
            ],
        ),
    ]);

    let module = generate_mips(&tree, &config).expect("program should compile");
    assert!(module.source.contains("\nfn_helper:\n"));
    assert!(module.source.contains("\nmain:\n"));
    assert!(module.source.contains("    jal fn_helper\n"));
    assert!(module.source.contains("_g: .space 4\n"));
    assert!(module.warnings.is_empty());
    assert_eq!(run_mips(&module.source).as_deref(), Ok("11\n"));
}

#[test]
fn return_in_entry_function_exits() {
    let tree = functions(vec![main_function(vec![
        print(num(1)),
        AstNode::Return {
            expr: Some(num(0)),
        },
        print(num(2)),
    ])]);

    assert_eq!(compile_and_run(&tree), "1\n");
}
