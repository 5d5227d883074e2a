//! A tiny interpreter for the instruction subset the backend emits,
//! so tests can check what a generated program prints rather than only how it reads.

use rustc_hash::FxHashMap;

const DATA_BASE: i32 = 0x1001_0000;
const STACK_TOP: i32 = 0x7fff_effc;
const STEP_LIMIT: usize = 100_000;

struct Machine {
    registers: FxHashMap<String, i32>,
    memory: FxHashMap<i32, i32>,
    output: String,
}

impl Machine {
    fn get(&self, register: &str) -> i32 {
        if register == "$zero" {
            return 0;
        }
        self.registers.get(register).copied().unwrap_or(0)
    }

    fn set(&mut self, register: &str, value: i32) {
        self.registers.insert(register.to_string(), value);
    }

    fn load(&self, address: i32) -> Result<i32, String> {
        if address % 4 != 0 {
            return Err(format!("unaligned load from {address:#x}"));
        }
        Ok(self.memory.get(&address).copied().unwrap_or(0))
    }

    fn store(&mut self, address: i32, value: i32) -> Result<(), String> {
        if address % 4 != 0 {
            return Err(format!("unaligned store to {address:#x}"));
        }
        self.memory.insert(address, value);
        Ok(())
    }
}

/// `off($reg)` into its parts
fn memory_operand(operand: &str) -> Result<(i32, &str), String> {
    let open = operand
        .find('(')
        .ok_or_else(|| format!("bad memory operand '{operand}'"))?;
    let offset = operand[..open]
        .parse::<i32>()
        .map_err(|_| format!("bad offset in '{operand}'"))?;
    let register = operand[open + 1..].trim_end_matches(')');
    Ok((offset, register))
}

fn immediate(operand: &str) -> Result<i32, String> {
    operand
        .parse::<i32>()
        .map_err(|_| format!("bad immediate '{operand}'"))
}

/// Runs the program from `main` until the exit syscall and returns everything it printed
pub(crate) fn run_mips(source: &str) -> Result<String, String> {
    let mut data_labels: FxHashMap<String, i32> = FxHashMap::default();
    let mut code_labels: FxHashMap<String, usize> = FxHashMap::default();
    let mut instructions: Vec<(String, Vec<String>)> = Vec::new();
    let mut in_text = false;
    let mut data_cursor = DATA_BASE;

    for raw in source.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ".data" => {
                in_text = false;
                continue;
            }
            ".text" => {
                in_text = true;
                continue;
            }
            _ if line.starts_with(".globl") => continue,
            _ => {}
        }

        if !in_text {
            // label: .space N
            let (label, rest) = line
                .split_once(':')
                .ok_or_else(|| format!("bad data line '{line}'"))?;
            let size = rest
                .trim()
                .strip_prefix(".space")
                .ok_or_else(|| format!("unsupported directive '{line}'"))?
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("bad size in '{line}'"))?;
            data_labels.insert(label.trim().to_string(), data_cursor);
            data_cursor += size;
            continue;
        }

        if let Some(label) = line.strip_suffix(':') {
            code_labels.insert(label.to_string(), instructions.len());
            continue;
        }

        let (op, operands) = match line.split_once(' ') {
            Some((op, operands)) => (
                op.to_string(),
                operands.split(", ").map(|operand| operand.trim().to_string()).collect(),
            ),
            None => (line.to_string(), Vec::new()),
        };
        instructions.push((op, operands));
    }

    let mut machine = Machine {
        registers: FxHashMap::default(),
        memory: FxHashMap::default(),
        output: String::new(),
    };
    machine.set("$sp", STACK_TOP);
    machine.set("$fp", STACK_TOP);
    machine.set("$ra", -1);

    let mut pc = *code_labels.get("main").ok_or("no main label")?;

    for _ in 0..STEP_LIMIT {
        let (op, args) = instructions
            .get(pc)
            .ok_or_else(|| format!("ran off the end of the program at {pc}"))?;
        let arg = |i: usize| -> Result<&str, String> {
            args.get(i)
                .map(String::as_str)
                .ok_or_else(|| format!("'{op}' is missing operand {i}"))
        };
        pc += 1;

        match op.as_str() {
            "li" => machine.set(arg(0)?, immediate(arg(1)?)?),
            "la" => {
                let address = *data_labels
                    .get(arg(1)?)
                    .ok_or_else(|| format!("unknown data label '{}'", args[1]))?;
                machine.set(arg(0)?, address);
            }
            "move" => {
                let value = machine.get(arg(1)?);
                machine.set(arg(0)?, value);
            }
            "add" | "sub" | "mul" => {
                let lhs = machine.get(arg(1)?);
                let rhs = machine.get(arg(2)?);
                let value = match op.as_str() {
                    "add" => lhs.wrapping_add(rhs),
                    "sub" => lhs.wrapping_sub(rhs),
                    _ => lhs.wrapping_mul(rhs),
                };
                machine.set(arg(0)?, value);
            }
            "addi" => {
                let value = machine.get(arg(1)?).wrapping_add(immediate(arg(2)?)?);
                machine.set(arg(0)?, value);
            }
            "sll" => {
                let value = machine.get(arg(1)?) << immediate(arg(2)?)?;
                machine.set(arg(0)?, value);
            }
            "lw" => {
                let (offset, base) = memory_operand(arg(1)?)?;
                let value = machine.load(machine.get(base) + offset)?;
                machine.set(arg(0)?, value);
            }
            "sw" => {
                let (offset, base) = memory_operand(arg(1)?)?;
                let value = machine.get(arg(0)?);
                let address = machine.get(base) + offset;
                machine.store(address, value)?;
            }
            "jal" => {
                let target = *code_labels
                    .get(arg(0)?)
                    .ok_or_else(|| format!("unknown code label '{}'", args[0]))?;
                machine.set("$ra", pc as i32);
                pc = target;
            }
            "jr" => {
                let target = machine.get(arg(0)?);
                if target < 0 {
                    return Err(String::from("returned past main"));
                }
                pc = target as usize;
            }
            "syscall" => match machine.get("$v0") {
                1 => {
                    let value = machine.get("$a0");
                    machine.output.push_str(&value.to_string());
                }
                11 => {
                    let value = machine.get("$a0");
                    machine.output.push(char::from(value as u8));
                }
                10 => return Ok(machine.output),
                other => return Err(format!("unsupported syscall {other}")),
            },
            other => return Err(format!("unsupported instruction '{other}'")),
        }
    }

    Err(String::from("step limit reached"))
}
