//! `0x20` SHA3 and the system opcodes (`0xf0`-`0xff`): CREATE, CALL,
//! CALLCODE, DELEGATECALL, RETURN, REVERT, INVALID, SELFDESTRUCT.
//!
//! `CREATE`/`CALL`/`CALLCODE`/`DELEGATECALL` only stage a [`PendingCall`] on
//! the frame; the interpreter loop owns the frame stack and is the only
//! place a child frame can actually be pushed and run (§4.5, §4.6).

use crate::error::ExecutionException;
use crate::frame::{CallInit, CallKind, CreateInit, Frame, PendingCall, SelfDestruct};
use crate::host::Host;
use crate::memory::word_to_usize;
use crate::opcodes::environment::word_to_address;
use ferrum_primitives::Word;

pub fn sha3(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let [offset, size] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let offset = word_to_usize(offset)?;
    let size = word_to_usize(size)?;
    let data = frame.memory.fetch(offset, size)?;
    let hash = host.hasher.hash(&data);
    frame.stack.push(Word::from_be_slice(hash.as_slice()))?;
    Ok(())
}

/// `CREATE(value, offset, size)`: stage a child frame that will execute
/// `init_code` and, on success, install the returned bytes as the new
/// contract's code.
pub fn create(frame: &mut Frame) -> Result<(), ExecutionException> {
    if frame.is_static {
        return Err(ExecutionException::InvalidInstruction);
    }
    let [value, offset, size] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    let offset = word_to_usize(offset)?;
    let size = word_to_usize(size)?;
    let init_code = frame.memory.fetch(offset, size)?;
    frame.pending_call = Some(PendingCall::Create(CreateInit {
        gas: frame.gas_remaining,
        value,
        init_code: init_code.into(),
    }));
    Ok(())
}

fn stage_call(
    frame: &mut Frame,
    kind: CallKind,
    gas: Word,
    to: Word,
    value: Word,
    in_offset: Word,
    in_size: Word,
    out_offset: Word,
    out_size: Word,
) -> Result<(), ExecutionException> {
    let in_offset = word_to_usize(in_offset)?;
    let in_size = word_to_usize(in_size)?;
    let out_offset = word_to_usize(out_offset)?;
    let out_size = word_to_usize(out_size)?;
    let input = frame.memory.fetch(in_offset, in_size)?;
    let to_addr = word_to_address(to);

    let (code_address, storage_address, caller, effective_value) = match kind {
        CallKind::Call => (to_addr, to_addr, frame.address, value),
        CallKind::CallCode => (to_addr, frame.address, frame.address, value),
        CallKind::DelegateCall => (to_addr, frame.address, frame.caller, frame.value),
    };

    let gas = gas.to::<u64>().min(frame.gas_remaining);
    frame.pending_call = Some(PendingCall::Message(CallInit {
        kind,
        gas,
        code_address,
        storage_address,
        caller,
        value: effective_value,
        input: input.into(),
        out_offset,
        out_size,
        is_static: frame.is_static,
    }));
    Ok(())
}

pub fn call(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [gas, to, value, in_off, in_size, out_off, out_size] = frame.stack.pop_list(7)?[..] else {
        unreachable!("pop_list(7) always returns exactly 7 elements")
    };
    if frame.is_static && value != Word::ZERO {
        return Err(ExecutionException::InvalidInstruction);
    }
    stage_call(
        frame,
        CallKind::Call,
        gas,
        to,
        value,
        in_off,
        in_size,
        out_off,
        out_size,
    )
}

pub fn callcode(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [gas, to, value, in_off, in_size, out_off, out_size] = frame.stack.pop_list(7)?[..] else {
        unreachable!("pop_list(7) always returns exactly 7 elements")
    };
    stage_call(
        frame,
        CallKind::CallCode,
        gas,
        to,
        value,
        in_off,
        in_size,
        out_off,
        out_size,
    )
}

pub fn delegatecall(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [gas, to, in_off, in_size, out_off, out_size] = frame.stack.pop_list(6)?[..] else {
        unreachable!("pop_list(6) always returns exactly 6 elements")
    };
    stage_call(
        frame,
        CallKind::DelegateCall,
        gas,
        to,
        Word::ZERO,
        in_off,
        in_size,
        out_off,
        out_size,
    )
}

pub fn ret(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [offset, size] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let offset = word_to_usize(offset)?;
    let size = word_to_usize(size)?;
    frame.output = frame.memory.fetch(offset, size)?.into();
    frame.succeed();
    Ok(())
}

pub fn revert(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [offset, size] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let offset = word_to_usize(offset)?;
    let size = word_to_usize(size)?;
    frame.output = frame.memory.fetch(offset, size)?.into();
    Err(ExecutionException::Reverted)
}

pub fn invalid(_frame: &mut Frame) -> Result<(), ExecutionException> {
    Err(ExecutionException::InvalidInstruction)
}

/// `SELFDESTRUCT(beneficiary)`: moves the callee's entire balance to
/// `beneficiary` immediately, credits the refund, and marks the callee for
/// removal at the end of the current transaction (the removal itself is
/// the transaction epilogue's job, out of scope here).
pub fn selfdestruct(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    if frame.is_static {
        return Err(ExecutionException::InvalidInstruction);
    }
    let beneficiary = word_to_address(frame.stack.pop()?);
    let balance = host.state.balance(frame.address);
    host.state.add_balance(beneficiary, balance);
    host.state.set_balance(frame.address, Word::ZERO);
    frame.refund += crate::gas::G_SELFDESTRUCT_REFUND;
    frame.self_destructs.push(SelfDestruct {
        address: frame.address,
        beneficiary,
    });
    frame.succeed();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(values: &[Word], is_static: bool) -> Frame {
        let mut frame = Frame::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Word::ZERO,
            Default::default(),
            Default::default(),
            Word::ZERO,
            is_static,
            0,
            1_000_000,
            0,
        );
        for v in values {
            frame.stack.push(*v).unwrap();
        }
        frame
    }

    #[test]
    fn return_captures_memory_as_output_and_halts() {
        let mut frame = frame_with(&[], false);
        frame.memory.store(0, 3, &[9, 8, 7]).unwrap();
        frame.stack.push(Word::from(3u64)).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        ret(&mut frame).unwrap();
        assert!(frame.halted);
        assert_eq!(frame.output.as_ref(), &[9, 8, 7]);
    }

    #[test]
    fn revert_preserves_output_and_signals_reverted() {
        let mut frame = frame_with(&[], false);
        frame.memory.store(0, 2, &[1, 2]).unwrap();
        frame.stack.push(Word::from(2u64)).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        assert_eq!(revert(&mut frame), Err(ExecutionException::Reverted));
        assert_eq!(frame.output.as_ref(), &[1, 2]);
    }

    #[test]
    fn create_is_rejected_under_a_static_frame() {
        let mut frame = frame_with(&[Word::ZERO, Word::ZERO, Word::ZERO], true);
        assert_eq!(
            create(&mut frame),
            Err(ExecutionException::InvalidInstruction)
        );
    }

    #[test]
    fn call_with_value_is_rejected_under_a_static_frame() {
        let mut frame = frame_with(
            &[
                Word::ZERO,
                Word::ZERO,
                Word::ZERO,
                Word::ZERO,
                Word::from(1u64),
                Word::ZERO,
                Word::from(100u64),
            ],
            true,
        );
        assert_eq!(call(&mut frame), Err(ExecutionException::InvalidInstruction));
    }

    #[test]
    fn selfdestruct_moves_balance_to_beneficiary_and_credits_refund() {
        use crate::host::{BlockInfo, NullBlockHashes};
        use ferrum_primitives::{Address, InMemoryState, State, TinyKeccak256};

        let callee = Address::from([0xAAu8; 20]);
        let beneficiary = Address::from([0xBBu8; 20]);

        let mut state = InMemoryState::new();
        state.set_balance(callee, Word::from(100u64));
        let hasher = TinyKeccak256;
        let block = BlockInfo {
            coinbase: Address::ZERO,
            timestamp: Word::ZERO,
            number: Word::ZERO,
            difficulty: Word::ZERO,
            gas_limit: Word::ZERO,
            chain_id: Word::ZERO,
        };
        let null_hashes = NullBlockHashes;
        let mut host = Host {
            state: &mut state,
            block: &block,
            hasher: &hasher,
            block_hashes: &null_hashes,
        };

        let mut frame = frame_with(&[], false);
        frame.address = callee;
        frame
            .stack
            .push(Word::from_be_slice(beneficiary.as_slice()))
            .unwrap();

        selfdestruct(&mut frame, &mut host).unwrap();

        assert_eq!(host.state.balance(callee), Word::ZERO);
        assert_eq!(host.state.balance(beneficiary), Word::from(100u64));
        assert_eq!(frame.refund, crate::gas::G_SELFDESTRUCT_REFUND);
        assert!(frame.halted);
    }
}
