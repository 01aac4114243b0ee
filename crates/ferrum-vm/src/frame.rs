//! Execution context / frame (§3, §4.5): the per-call record the
//! interpreter loop drives. Nested `CALL`/`CREATE` execution is modeled as
//! an explicit frame stack (`Interpreter` owns `Vec<Frame>`) rather than
//! recursion, per the design notes — mirroring the teacher's
//! `HybridHandler::run_exec_loop`, which threads a `Vec<Self::Frame>`
//! instead of letting `Frame::run` recurse.

use crate::error::ExecutionException;
use crate::memory::Memory;
use crate::stack::Stack;
use alloy_primitives::Bytes;
use ferrum_primitives::{Address, LogEntry, SnapshotId, Word};
use std::collections::HashSet;

/// Which of the three message-call opcodes initiated a child frame; they
/// differ only in which address supplies code vs. storage/identity and
/// whether value moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
}

/// Arguments needed to spawn a child frame for `CALL`/`CALLCODE`/`DELEGATECALL`.
#[derive(Debug, Clone)]
pub struct CallInit {
    pub kind: CallKind,
    pub gas: u64,
    /// Address whose code is executed.
    pub code_address: Address,
    /// Address whose storage/balance the child frame acts against.
    pub storage_address: Address,
    pub caller: Address,
    pub value: Word,
    pub input: Bytes,
    pub out_offset: usize,
    pub out_size: usize,
    pub is_static: bool,
}

/// Arguments needed to spawn a child frame for `CREATE`.
#[derive(Debug, Clone)]
pub struct CreateInit {
    pub gas: u64,
    pub value: Word,
    pub init_code: Bytes,
}

#[derive(Debug, Clone)]
pub enum PendingCall {
    Message(CallInit),
    Create(CreateInit),
}

/// A contract self-destructing, transferring its remaining balance to
/// `beneficiary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfDestruct {
    pub address: Address,
    pub beneficiary: Address,
}

/// Per-call execution record. `address` is the account whose storage this
/// frame reads/writes (the "callee"/"I_a" of the yellow paper); `code` is
/// the bytecode actually being run, which for `CALLCODE`/`DELEGATECALL`
/// differs from `address`'s own code.
#[derive(Debug, Clone)]
pub struct Frame {
    pub caller: Address,
    pub address: Address,
    pub origin: Address,
    pub gas_price: Word,
    pub input: Bytes,
    pub code: Bytes,
    pub value: Word,
    pub is_static: bool,
    pub depth: usize,

    pub pc: usize,
    pub gas_remaining: u64,
    pub stack: Stack,
    pub memory: Memory,

    pub return_data: Bytes,
    pub output: Bytes,
    pub exception: Option<ExecutionException>,
    pub halted: bool,
    pub pending_jump: Option<usize>,
    pub pending_call: Option<PendingCall>,

    pub logs: Vec<LogEntry>,
    pub refund: u64,
    pub self_destructs: Vec<SelfDestruct>,

    /// The state checkpoint taken when this frame started, so the
    /// interpreter can roll back on exception/`REVERT`.
    pub checkpoint: SnapshotId,

    /// Set by the interpreter when this frame was spawned by `CALL`-family
    /// opcodes: the `(offset, size)` window in the *caller's* memory that
    /// its output gets copied into. `None` for a `CREATE` child, whose
    /// output becomes its own code instead.
    pub pending_out: Option<(usize, usize)>,

    jumpdests: HashSet<usize>,
}

impl Frame {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        caller: Address,
        address: Address,
        origin: Address,
        gas_price: Word,
        input: Bytes,
        code: Bytes,
        value: Word,
        is_static: bool,
        depth: usize,
        gas_remaining: u64,
        checkpoint: SnapshotId,
    ) -> Self {
        let jumpdests = valid_jump_destinations(&code);
        Self {
            caller,
            address,
            origin,
            gas_price,
            input,
            code,
            value,
            is_static,
            depth,
            pc: 0,
            gas_remaining,
            stack: Stack::new(),
            memory: Memory::new(),
            return_data: Bytes::new(),
            output: Bytes::new(),
            exception: None,
            halted: false,
            pending_jump: None,
            pending_call: None,
            logs: Vec::new(),
            refund: 0,
            self_destructs: Vec::new(),
            checkpoint,
            pending_out: None,
            jumpdests,
        }
    }

    pub fn current_opcode(&self) -> Option<u8> {
        self.code.get(self.pc).copied()
    }

    pub fn is_valid_jumpdest(&self, dest: usize) -> bool {
        self.jumpdests.contains(&dest)
    }

    pub fn charge_gas(&mut self, cost: u64) -> Result<(), ExecutionException> {
        if self.gas_remaining < cost {
            self.gas_remaining = 0;
            return Err(ExecutionException::OutOfGas);
        }
        self.gas_remaining -= cost;
        Ok(())
    }

    pub fn fail(&mut self, e: ExecutionException) {
        self.exception = Some(e);
        self.halted = true;
        if !matches!(e, ExecutionException::Reverted) {
            self.gas_remaining = 0;
        }
    }

    pub fn succeed(&mut self) {
        self.halted = true;
    }
}

/// Scans code for `JUMPDEST` (`0x5b`) bytes that are not inside a `PUSHk`'s
/// immediate data (§4.4, §8: "no byte inside a PUSHk's immediate data is a
/// valid jump target even if its value equals 0x5b").
pub fn valid_jump_destinations(code: &[u8]) -> HashSet<usize> {
    const JUMPDEST: u8 = 0x5b;
    const PUSH1: u8 = 0x60;
    const PUSH32: u8 = 0x7f;

    let mut dests = HashSet::new();
    let mut pc = 0usize;
    while pc < code.len() {
        let op = code[pc];
        if op == JUMPDEST {
            dests.insert(pc);
            pc += 1;
        } else if (PUSH1..=PUSH32).contains(&op) {
            let k = (op - PUSH1 + 1) as usize;
            pc += 1 + k;
        } else {
            pc += 1;
        }
    }
    dests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jumpdest_inside_push_data_is_not_valid() {
        // PUSH1 0x5b; JUMPDEST
        let code = [0x60u8, 0x5b, 0x5b];
        let dests = valid_jump_destinations(&code);
        assert!(!dests.contains(&1), "byte inside PUSH1's data must not count");
        assert!(dests.contains(&2), "the real JUMPDEST at offset 2 must count");
    }

    #[test]
    fn push32_skips_all_32_immediate_bytes() {
        let mut code = vec![0x7fu8];
        code.extend(std::iter::repeat(0x5b).take(32));
        code.push(0x5b); // real JUMPDEST right after the PUSH32 data
        let dests = valid_jump_destinations(&code);
        assert_eq!(dests.len(), 1);
        assert!(dests.contains(&33));
    }
}
