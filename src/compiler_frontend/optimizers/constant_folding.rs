//! # Constant Folding and Propagation
//!
//! A single forward pass over a [`TacProgram`] that produces a new program.
//!
//! The pass threads a table of names currently known to hold a constant value.
//! Operands that name a tracked constant are replaced by the literal, and an arithmetic
//! instruction whose operands are both literal is evaluated at compile time and turned into a
//! plain assignment of the result.
//!
//! Bindings only survive within straight-line code of one function body:
//! function boundaries and calls forget everything, since a callee may write any global.
//! Block markers bracket nested scopes. When a block closes, its own variables are dropped and
//! the outer variables they shadowed get their bindings back.
//!
//! The output never has more instructions than the input, and running the pass over its own
//! output changes nothing.

use crate::compiler_frontend::tac::tac_nodes::{Operand, TacInstruction, TacProgram};
use crate::tac_log;
use rustc_hash::FxHashSet;

/// Names known to hold a constant, searched newest first
#[derive(Debug, Default)]
struct ConstantBindings {
    bindings: Vec<(String, i32)>,
    open_blocks: Vec<BlockFrame>,
}

/// What a block did to the names around it
#[derive(Debug)]
struct BlockFrame {
    // Bindings as they were when the block opened
    snapshot: Vec<(String, i32)>,

    declared: FxHashSet<String>,

    // Names written while they still meant the enclosing variable
    outer_writes: FxHashSet<String>,

    // A call inside the block, the snapshot can't be trusted anymore
    cleared: bool,
}

impl ConstantBindings {
    fn lookup(&self, name: &str) -> Option<i32> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| *value)
    }

    fn record(&mut self, name: &str, value: i32) {
        self.forget(name);
        self.bindings.push((name.to_owned(), value));
    }

    /// The name was written with a value that isn't known
    fn forget(&mut self, name: &str) {
        self.note_write(name);
        self.bindings.retain(|(bound, _)| bound != name);
    }

    fn declare(&mut self, name: &str) {
        self.bindings.retain(|(bound, _)| bound != name);
        if let Some(block) = self.open_blocks.last_mut() {
            block.declared.insert(name.to_owned());
        }
    }

    fn note_write(&mut self, name: &str) {
        if let Some(block) = self.open_blocks.last_mut() {
            if !block.declared.contains(name) {
                block.outer_writes.insert(name.to_owned());
            }
        }
    }

    fn clear(&mut self) {
        self.bindings.clear();
        if let Some(block) = self.open_blocks.last_mut() {
            block.cleared = true;
        }
    }

    fn enter_block(&mut self) {
        self.open_blocks.push(BlockFrame {
            snapshot: self.bindings.clone(),
            declared: FxHashSet::default(),
            outer_writes: FxHashSet::default(),
            cleared: false,
        });
    }

    /// Drops the block's own variables and brings back the outer ones they shadowed
    fn exit_block(&mut self) {
        let Some(block) = self.open_blocks.pop() else {
            return;
        };

        let mut restored: Vec<(String, i32)> = if block.cleared {
            Vec::new()
        } else {
            block
                .snapshot
                .into_iter()
                .filter(|(name, _)| !block.outer_writes.contains(name))
                .collect()
        };

        for name in &block.outer_writes {
            // Written as the outer variable, then shadowed: its outer value is unknown
            if block.declared.contains(name) {
                continue;
            }
            if let Some(value) = self.lookup(name) {
                restored.push((name.to_owned(), value));
            }
        }

        self.bindings = restored;

        for name in &block.outer_writes {
            self.note_write(name);
        }
        if block.cleared {
            if let Some(parent) = self.open_blocks.last_mut() {
                parent.cleared = true;
            }
        }
    }

    /// The operand's constant value, if it has one
    fn resolve(&self, operand: &Operand) -> Option<i32> {
        match operand {
            Operand::Literal(value) => Some(*value),
            Operand::Name(name) => self.lookup(name),
        }
    }

    /// Replaces a tracked name with its literal
    fn substitute(&self, operand: &Operand) -> Operand {
        match self.resolve(operand) {
            Some(value) => Operand::Literal(value),
            None => operand.to_owned(),
        }
    }
}

/// Folds and propagates constants through the program
pub fn optimize(program: &TacProgram) -> TacProgram {
    let mut bindings = ConstantBindings::default();
    let mut optimized = Vec::with_capacity(program.len());

    for instruction in program {
        match instruction {
            TacInstruction::Binary {
                op,
                left,
                right,
                result,
            } => {
                let left = bindings.substitute(left);
                let right = bindings.substitute(right);

                // Whatever the result held before is stale now
                bindings.forget(result);

                match (left.as_literal(), right.as_literal()) {
                    (Some(lhs), Some(rhs)) => {
                        let folded = op.apply(lhs, rhs);
                        tac_log!(Green "Folded ", #result, " to ", #folded);

                        bindings.record(result, folded);
                        optimized.push(TacInstruction::Assign {
                            target: result.to_owned(),
                            value: Operand::Literal(folded),
                        });
                    }
                    _ => {
                        optimized.push(TacInstruction::Binary {
                            op: *op,
                            left,
                            right,
                            result: result.to_owned(),
                        });
                    }
                }
            }

            TacInstruction::Assign { target, value } => {
                let constant = bindings.resolve(value);
                bindings.forget(target);
                if let Some(constant) = constant {
                    bindings.record(target, constant);
                }

                optimized.push(instruction.to_owned());
            }

            TacInstruction::Print { value } => {
                optimized.push(TacInstruction::Print {
                    value: bindings.substitute(value),
                });
            }

            TacInstruction::Declare { name }
            | TacInstruction::DeclareArray { name, .. }
            | TacInstruction::DeclareArray2d { name, .. } => {
                // A new declaration shadows whatever was tracked under this name
                bindings.declare(name);
                optimized.push(instruction.to_owned());
            }

            TacInstruction::FunctionBegin { .. }
            | TacInstruction::FunctionEnd { .. }
            | TacInstruction::Call { .. } => {
                bindings.clear();
                optimized.push(instruction.to_owned());
            }

            TacInstruction::BlockBegin => {
                bindings.enter_block();
                optimized.push(TacInstruction::BlockBegin);
            }

            TacInstruction::BlockEnd => {
                bindings.exit_block();
                optimized.push(TacInstruction::BlockEnd);
            }

            TacInstruction::Load { result, .. } | TacInstruction::Load2d { result, .. } => {
                // Array elements are never tracked
                bindings.forget(result);
                optimized.push(instruction.to_owned());
            }

            TacInstruction::Store { .. }
            | TacInstruction::Store2d { .. }
            | TacInstruction::Label { .. }
            | TacInstruction::Param { .. }
            | TacInstruction::Return { .. } => {
                optimized.push(instruction.to_owned());
            }
        }
    }

    TacProgram::new(optimized)
}
