//! Temporary register allocation.
//!
//! Expression values live in `$t0` - `$t7`, handed out round-robin. There is no liveness
//! tracking: once the cursor wraps, the next request reuses `$t0` even if it still holds a value
//! that is needed later. Expressions deep enough to hit this produce wrong code, which is
//! accepted for the small programs this backend targets.
//!
//! Calls are the other way to lose a value. Registers are not spilled around `jal`, so a
//! temporary live across a call holds whatever the callee left in it afterwards.

use crate::codegen_log;
use std::fmt;

pub const TEMP_REGISTER_COUNT: usize = 8;

/// One of the `$tN` temporaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(usize);

impl Register {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$t{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RoundRobinRegisters {
    cursor: usize,
}

impl RoundRobinRegisters {
    pub fn new() -> Self {
        RoundRobinRegisters { cursor: 0 }
    }

    /// Hands out the register under the cursor and moves past it, wrapping after `$t7`
    pub fn next(&mut self) -> Register {
        let register = Register(self.cursor);
        self.cursor = (self.cursor + 1) % TEMP_REGISTER_COUNT;

        if self.cursor == 0 {
            codegen_log!(Yellow "Temporary registers wrapped around after ", #register);
        }

        register
    }

    /// Frees every register handed out after `register`.
    /// Used once a binary operation has folded its right operand into the left one.
    pub fn rewind_to(&mut self, register: Register) {
        self.cursor = (register.0 + 1) % TEMP_REGISTER_COUNT;
    }

    /// Back to `$t0`, called between statements
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
