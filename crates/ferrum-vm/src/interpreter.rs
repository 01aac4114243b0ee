//! The fetch/charge/dispatch/advance loop (§4.5, §4.6). Nested `CALL`-family
//! execution is modeled as an explicit stack of frames the loop itself
//! drives, mirroring the teacher's `HybridHandler::run_exec_loop`, rather
//! than `Frame::run` recursing into itself.

use crate::error::ExecutionException;
use crate::frame::{CallKind, Frame, PendingCall};
use crate::gas::{self, memory_expansion_cost};
use crate::host::Host;
use crate::memory::word_to_usize;
use crate::opcodes::environment::word_to_address;
use crate::opcodes::{self, op_info};
use crate::stack::STACK_LIMIT;
use ferrum_primitives::{Address, Word};

/// Call frames nested more than this deep fail with [`ExecutionException::CallTooDeep`].
pub const MAX_CALL_DEPTH: usize = 1024;

/// What became of a top-level call once the frame stack unwinds completely.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: alloy_primitives::Bytes,
    pub gas_used: u64,
    pub exception: Option<ExecutionException>,
    pub logs: Vec<ferrum_primitives::LogEntry>,
    pub refund: u64,
}

pub struct Interpreter<'a> {
    host: Host<'a>,
    frames: Vec<Frame>,
}

impl<'a> Interpreter<'a> {
    pub fn new(host: Host<'a>, entry: Frame) -> Self {
        Self {
            host,
            frames: vec![entry],
        }
    }

    /// Drives frames to completion, folding `CALL`/`CREATE` children in and
    /// out of the stack, and returns the outcome of the original entry frame.
    pub fn run(mut self) -> ExecutionResult {
        let initial_gas = self.frames[0].gas_remaining;

        loop {
            self.step_current_frame();

            let top_halted = self.frames.last().expect("frame stack never empties mid-loop").halted;
            if !top_halted {
                continue;
            }

            if self.frames.len() == 1 {
                let frame = self.frames.pop().expect("checked len == 1");
                let success = frame.exception.is_none();
                return ExecutionResult {
                    success,
                    output: frame.output,
                    gas_used: initial_gas.saturating_sub(frame.gas_remaining),
                    exception: frame.exception,
                    logs: frame.logs,
                    refund: frame.refund,
                };
            }

            self.resolve_child_frame();
        }
    }

    /// Executes exactly one instruction of the top frame, or stages a
    /// `PendingCall` and pushes the resulting child frame.
    fn step_current_frame(&mut self) {
        let opcode = match self.frames.last().unwrap().current_opcode() {
            Some(op) => op,
            None => {
                self.frames.last_mut().unwrap().succeed();
                return;
            }
        };

        if let Err(e) = self.charge_and_check_arity(opcode) {
            self.frames.last_mut().unwrap().fail(e);
            return;
        }

        if opcodes::is_call_family(opcode) {
            self.dispatch_call_family(opcode);
            return;
        }

        let frame = self.frames.last_mut().unwrap();
        let pc_before = frame.pc;
        match opcodes::dispatch(opcode, frame, &mut self.host) {
            Ok(()) => {
                let frame = self.frames.last_mut().unwrap();
                if frame.halted {
                    return;
                }
                if let Some(dest) = frame.pending_jump.take() {
                    frame.pc = dest;
                } else if frame.pc == pc_before {
                    // PUSHk already advanced `pc` past its immediate data.
                    frame.pc += 1;
                }
            }
            Err(e) => self.frames.last_mut().unwrap().fail(e),
        }
    }

    /// Arity check (§4.5: stack underflow/overflow precede any handler
    /// running) plus whatever gas a handler's dynamic cost needs charged
    /// up front, since a handler must never partially apply an effect it
    /// can't afford.
    fn charge_and_check_arity(&mut self, opcode: u8) -> Result<(), ExecutionException> {
        let Some(info) = op_info(opcode) else {
            return Err(ExecutionException::InvalidInstruction);
        };
        let frame = self.frames.last_mut().unwrap();
        if frame.stack.len() < info.inputs {
            return Err(ExecutionException::StackUnderflow);
        }
        if frame.stack.len() - info.inputs + info.outputs > STACK_LIMIT {
            return Err(ExecutionException::StackOverflow);
        }
        frame.charge_gas(info.base_gas)?;
        self.charge_dynamic_gas(opcode)
    }

    fn charge_dynamic_gas(&mut self, opcode: u8) -> Result<(), ExecutionException> {
        use opcodes::*;
        let frame = self.frames.last_mut().unwrap();

        let touch = |frame: &mut Frame, offset: Word, size: Word| -> Result<(), ExecutionException> {
            let offset = word_to_usize(offset)?;
            let size = word_to_usize(size)?;
            if size == 0 {
                return Ok(());
            }
            let new_words = ((offset + size + 31) / 32) as u64;
            let old_words = frame.memory.active_word_count() as u64;
            frame.charge_gas(memory_expansion_cost(old_words, new_words))
        };

        match opcode {
            MLOAD | MSTORE => {
                let offset = frame.stack.peek(0)?;
                touch(frame, offset, Word::from(32u64))
            }
            MSTORE8 => {
                let offset = frame.stack.peek(0)?;
                touch(frame, offset, Word::from(1u64))
            }
            SHA3 | RETURN | REVERT => {
                let (offset, size) = (frame.stack.peek(0)?, frame.stack.peek(1)?);
                let base = if opcode == SHA3 {
                    let words = word_to_usize(size)?.div_ceil(32) as u64;
                    gas::G_SHA3_WORD * words
                } else {
                    0
                };
                frame.charge_gas(base)?;
                touch(frame, offset, size)
            }
            CALLDATACOPY | CODECOPY => {
                let (mem_off, size) = (frame.stack.peek(0)?, frame.stack.peek(2)?);
                let words = word_to_usize(size)?.div_ceil(32) as u64;
                frame.charge_gas(gas::G_COPY_WORD * words)?;
                touch(frame, mem_off, size)
            }
            EXTCODECOPY => {
                let (mem_off, size) = (frame.stack.peek(1)?, frame.stack.peek(3)?);
                let words = word_to_usize(size)?.div_ceil(32) as u64;
                frame.charge_gas(gas::G_COPY_WORD * words)?;
                touch(frame, mem_off, size)
            }
            op if (LOG0..=LOG4).contains(&op) => {
                let (offset, size) = (frame.stack.peek(0)?, frame.stack.peek(1)?);
                let data_cost = gas::G_LOG_DATA * word_to_usize(size)? as u64;
                frame.charge_gas(data_cost)?;
                touch(frame, offset, size)
            }
            EXP => {
                let exponent = frame.stack.peek(1)?;
                let byte_len = (32 - exponent.leading_zeros() / 8) as u64;
                frame.charge_gas(gas::exp_cost(byte_len).saturating_sub(gas::G_EXP))
            }
            SSTORE => {
                let key = frame.stack.peek(0)?;
                let value = frame.stack.peek(1)?;
                let prev = self.host.state.get_storage(frame.address, key);
                let cost = if prev == Word::ZERO && value != Word::ZERO {
                    gas::G_SSTORE_SET
                } else {
                    gas::G_SSTORE_RESET
                };
                self.frames.last_mut().unwrap().charge_gas(cost)
            }
            CREATE => {
                let (offset, size) = (frame.stack.peek(1)?, frame.stack.peek(2)?);
                touch(frame, offset, size)
            }
            CALL => {
                let to_addr = word_to_address(frame.stack.peek(1)?);
                let value = frame.stack.peek(2)?;
                let (in_off, in_size) = (frame.stack.peek(3)?, frame.stack.peek(4)?);
                let (out_off, out_size) = (frame.stack.peek(5)?, frame.stack.peek(6)?);
                if value != Word::ZERO {
                    frame.charge_gas(gas::G_CALL_VALUE)?;
                }
                // A value-bearing call into a dead account brings that
                // account into existence; charge the same surcharge CREATE
                // pays for writing a fresh account.
                if value != Word::ZERO && account_is_dead(&self.host, to_addr) {
                    self.frames.last_mut().unwrap().charge_gas(gas::G_NEW_ACCOUNT)?;
                }
                let frame = self.frames.last_mut().unwrap();
                touch(frame, in_off, in_size)?;
                let frame = self.frames.last_mut().unwrap();
                touch(frame, out_off, out_size)
            }
            CALLCODE => {
                let value = frame.stack.peek(2)?;
                let (in_off, in_size) = (frame.stack.peek(3)?, frame.stack.peek(4)?);
                let (out_off, out_size) = (frame.stack.peek(5)?, frame.stack.peek(6)?);
                if value != Word::ZERO {
                    frame.charge_gas(gas::G_CALL_VALUE)?;
                }
                touch(frame, in_off, in_size)?;
                let frame = self.frames.last_mut().unwrap();
                touch(frame, out_off, out_size)
            }
            SELFDESTRUCT => {
                let beneficiary = word_to_address(frame.stack.peek(0)?);
                // The new-account surcharge only applies if this contract
                // actually has a balance to move into a not-yet-existing
                // beneficiary.
                if self.host.state.balance(frame.address) != Word::ZERO
                    && account_is_dead(&self.host, beneficiary)
                {
                    self.frames
                        .last_mut()
                        .unwrap()
                        .charge_gas(gas::G_SELFDESTRUCT_NEW_ACCOUNT)?;
                }
                Ok(())
            }
            DELEGATECALL => {
                let (in_off, in_size) = (frame.stack.peek(2)?, frame.stack.peek(3)?);
                let (out_off, out_size) = (frame.stack.peek(4)?, frame.stack.peek(5)?);
                touch(frame, in_off, in_size)?;
                let frame = self.frames.last_mut().unwrap();
                touch(frame, out_off, out_size)
            }
            _ => Ok(()),
        }
    }

    /// Handles `CREATE`/`CALL`/`CALLCODE`/`DELEGATECALL`: runs the handler to
    /// populate `pending_call`, then pushes the child frame described by it.
    fn dispatch_call_family(&mut self, opcode: u8) {
        use opcodes::{CALL, CALLCODE, CREATE, DELEGATECALL};

        let frame = self.frames.last_mut().unwrap();
        let result = match opcode {
            CREATE => crate::opcodes::system::create(frame),
            CALL => crate::opcodes::system::call(frame),
            CALLCODE => crate::opcodes::system::callcode(frame),
            DELEGATECALL => crate::opcodes::system::delegatecall(frame),
            _ => unreachable!(),
        };
        if let Err(e) = result {
            self.frames.last_mut().unwrap().fail(e);
            return;
        }

        if self.frames.len() >= MAX_CALL_DEPTH {
            let frame = self.frames.last_mut().unwrap();
            frame.pending_call = None;
            // A call attempted past the depth limit fails like any other
            // callee failure: the caller sees `0`, not its own exception.
            frame.stack.push(Word::ZERO).ok();
            frame.pc += 1;
            return;
        }

        let frame = self.frames.last_mut().unwrap();
        let pending = frame
            .pending_call
            .take()
            .expect("handler always stages a PendingCall on success");
        let depth = frame.depth + 1;
        let origin = frame.origin;
        let gas_price = frame.gas_price;
        let creator = frame.address;

        // §4.4 CREATE: insufficient caller balance fails the same way a
        // reverted child would, without ever spawning one or charging gas.
        if let PendingCall::Create(ref init) = pending {
            if self.host.state.balance(creator) < init.value {
                let frame = self.frames.last_mut().unwrap();
                frame.stack.push(Word::ZERO).ok();
                frame.pc += 1;
                return;
            }
        }

        // The gas handed to the child leaves the parent's budget now; only
        // what the child doesn't spend is credited back in `resolve_child_frame`.
        let granted_gas = match &pending {
            PendingCall::Create(init) => init.gas,
            PendingCall::Message(init) => init.gas,
        };
        self.frames.last_mut().unwrap().gas_remaining -= granted_gas;

        let checkpoint = self.host.state.snapshot();

        let child = match pending {
            PendingCall::Create(init) => {
                let nonce = self.host.state.nonce(creator);
                let new_address = derive_create_address(&creator, nonce);
                self.host.state.set_nonce(creator, nonce.wrapping_add(Word::from(1u64)));
                if init.value != Word::ZERO {
                    self.host.state.add_balance(new_address, init.value);
                    self.host.state.add_balance(creator, word_negate(init.value));
                }
                Frame::new(
                    creator,
                    new_address,
                    origin,
                    gas_price,
                    alloy_primitives::Bytes::new(),
                    init.init_code,
                    init.value,
                    false,
                    depth,
                    init.gas,
                    checkpoint,
                )
            }
            PendingCall::Message(init) => {
                let code = self.host.state.code(init.code_address);
                let mut child = Frame::new(
                    init.caller,
                    init.storage_address,
                    origin,
                    gas_price,
                    init.input,
                    code,
                    init.value,
                    init.is_static,
                    depth,
                    init.gas,
                    checkpoint,
                );
                if init.kind == CallKind::Call && init.value != Word::ZERO {
                    self.host.state.add_balance(init.storage_address, init.value);
                    self.host.state.add_balance(init.caller, word_negate(init.value));
                    // A value-bearing CALL grants its callee a stipend on
                    // top of the forwarded gas, not deducted from the caller.
                    child.gas_remaining += gas::G_CALL_STIPEND;
                }
                child.pending_out = Some((init.out_offset, init.out_size));
                child
            }
        };
        self.frames.push(child);
    }

    /// Pops a finished child frame, copies its output back into the
    /// caller's memory/stack, and rolls back state on failure (§4.6).
    fn resolve_child_frame(&mut self) {
        let child = self.frames.pop().expect("caller checked len > 1");
        let succeeded = match &child.exception {
            None => true,
            Some(e) => e.is_revert(),
        };

        if succeeded {
            self.host.state.commit(child.checkpoint);
        } else {
            self.host.state.revert(child.checkpoint);
        }

        let is_create = child.pending_out.is_none();
        if is_create && succeeded {
            self.host.state.set_code(child.address, child.output.clone());
        }

        let parent = self.frames.last_mut().unwrap();
        parent.return_data = child.output.clone();
        if let Some((out_offset, out_size)) = child.pending_out {
            let n = child.output.len().min(out_size);
            let _ = parent.memory.store(out_offset, n, &child.output[..n]);
        }

        if succeeded {
            let result = if is_create {
                Word::from_be_slice(child.address.as_slice())
            } else {
                Word::from(1u64)
            };
            parent.stack.push(result).ok();
            parent.refund += child.refund;
            parent.logs.extend(child.logs);
            parent.self_destructs.extend(child.self_destructs);
        } else {
            parent.stack.push(Word::ZERO).ok();
        }

        parent.gas_remaining += child.gas_remaining;
        parent.pc += 1;
    }
}

fn word_negate(value: Word) -> Word {
    Word::ZERO.wrapping_sub(value)
}

/// §3: an account with zero balance, zero nonce, and no code is
/// observationally equivalent to one that was never written.
fn account_is_dead(host: &Host, addr: Address) -> bool {
    host.state.balance(addr) == Word::ZERO
        && host.state.nonce(addr) == Word::ZERO
        && host.state.code(addr).is_empty()
}

/// A minimal stand-in for RLP(sender, nonce): not byte-compatible with a
/// real chain's `CREATE` address derivation (that needs the RLP/Keccak
/// collaborators spec.md excludes), but deterministic and collision-free
/// for a given `(sender, nonce)` pair within a single run.
fn derive_create_address(sender: &ferrum_primitives::Address, nonce: Word) -> ferrum_primitives::Address {
    let mut bytes = [0u8; 20];
    bytes[..20].copy_from_slice(sender.as_slice());
    let nonce_bytes = nonce.to_be_bytes::<32>();
    for i in 0..20 {
        bytes[i] ^= nonce_bytes[12 + i];
    }
    ferrum_primitives::Address::from(bytes)
}
