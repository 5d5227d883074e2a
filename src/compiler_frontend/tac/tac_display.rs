use crate::compiler_frontend::tac::tac_nodes::{Operand, TacInstruction, TacProgram};
use std::fmt::{Display, Formatter, Result as FmtResult, Write as _};

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Operand::Literal(value) => write!(f, "{value}"),
            Operand::Name(name) => f.write_str(name),
        }
    }
}

impl Display for TacInstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TacInstruction::Binary {
                op,
                left,
                right,
                result,
            } => write!(f, "{result} = {left} {op} {right}"),
            TacInstruction::Assign { target, value } => write!(f, "{target} = {value}"),
            TacInstruction::Declare { name } => write!(f, "DECL {name}"),
            TacInstruction::DeclareArray { name, size } => write!(f, "DECL_ARRAY {name}[{size}]"),
            TacInstruction::DeclareArray2d { name, rows, cols } => {
                write!(f, "DECL_ARRAY_2D {name}[{rows}][{cols}]")
            }
            TacInstruction::Load {
                array,
                index,
                result,
            } => write!(f, "{result} = {array}[{index}]"),
            TacInstruction::Load2d {
                array,
                row,
                col,
                result,
            } => write!(f, "{result} = {array}[{row}][{col}]"),
            TacInstruction::Store {
                array,
                index,
                value,
            } => write!(f, "{array}[{index}] = {value}"),
            TacInstruction::Store2d {
                array,
                row,
                col,
                value,
            } => write!(f, "{array}[{row}][{col}] = {value}"),
            TacInstruction::Print { value } => write!(f, "PRINT {value}"),
            TacInstruction::Label { name } => write!(f, "{name}:"),
            TacInstruction::FunctionBegin { name } => write!(f, "BEGIN_FUNC {name}"),
            TacInstruction::FunctionEnd { name } => write!(f, "END_FUNC {name}"),
            TacInstruction::BlockBegin => f.write_str("BEGIN_BLOCK"),
            TacInstruction::BlockEnd => f.write_str("END_BLOCK"),
            TacInstruction::Param { value } => write!(f, "PARAM {value}"),
            TacInstruction::Call {
                function,
                arg_count,
                result,
            } => write!(f, "{result} = CALL {function}, {arg_count}"),
            TacInstruction::Return { value: Some(value) } => write!(f, "RETURN {value}"),
            TacInstruction::Return { value: None } => f.write_str("RETURN"),
        }
    }
}

/// Which side of the optimizer a dump shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacStage {
    Unoptimized,
    Optimized,
}

impl TacProgram {
    /// Numbered, one instruction per line listing
    pub fn display(&self, stage: TacStage) -> String {
        let header = match stage {
            TacStage::Unoptimized => "Unoptimized TAC Instructions:",
            TacStage::Optimized => "Optimized TAC Instructions:",
        };

        let mut out = String::with_capacity(self.len() * 16 + 64);
        let _ = writeln!(out, "{header}");
        let _ = writeln!(out, "{}", "─".repeat(header.chars().count()));

        for (line, instruction) in self.iter().enumerate() {
            let _ = writeln!(out, "{:2}: {instruction}", line + 1);
        }

        out
    }
}
