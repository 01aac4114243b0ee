//! `0x50`-`0x5b`: POP, MLOAD, MSTORE, MSTORE8, SLOAD, SSTORE, JUMP, JUMPI,
//! PC, MSIZE, GAS, JUMPDEST.

use crate::error::ExecutionException;
use crate::frame::Frame;
use crate::host::Host;
use crate::memory::word_to_usize;
use ferrum_primitives::Word;

pub fn pop(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.pop()?;
    Ok(())
}

pub fn mload(frame: &mut Frame) -> Result<(), ExecutionException> {
    let offset = word_to_usize(frame.stack.pop()?)?;
    let value = frame.memory.load_word(offset)?;
    frame.stack.push(value)?;
    Ok(())
}

pub fn mstore(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [offset, value] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let offset = word_to_usize(offset)?;
    frame.memory.store_word(offset, value)
}

pub fn mstore8(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [offset, value] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let offset = word_to_usize(offset)?;
    let low_byte = value.to_be_bytes::<32>()[31];
    frame.memory.store_byte(offset, low_byte)
}

pub fn sload(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let key = frame.stack.pop()?;
    let value = host.state.get_storage(frame.address, key);
    frame.stack.push(value)?;
    Ok(())
}

/// Per spec.md §4.4, a write from zero to non-zero charges `G_SSTORE_SET`
/// and all other transitions charge `G_SSTORE_RESET`; a write from
/// non-zero back to zero additionally grants a gas refund, tracked on the
/// frame and settled by the caller after the top-level call completes.
pub fn sstore(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let [key, value] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let prev = host.state.get_storage(frame.address, key);
    if prev != Word::ZERO && value == Word::ZERO {
        frame.refund += crate::gas::G_SSTORE_REFUND;
    }
    host.state.set_storage(frame.address, key, value);
    Ok(())
}

/// `JUMP(dest)`: sets `pending_jump`, validated against the frame's
/// precomputed `JUMPDEST` set; the interpreter loop applies it instead of
/// the ordinary `pc += 1`.
pub fn jump(frame: &mut Frame) -> Result<(), ExecutionException> {
    let dest = word_to_usize(frame.stack.pop()?).map_err(|_| ExecutionException::InvalidJump)?;
    if !frame.is_valid_jumpdest(dest) {
        return Err(ExecutionException::InvalidJump);
    }
    frame.pending_jump = Some(dest);
    Ok(())
}

pub fn jumpi(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [dest, cond] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    if cond == Word::ZERO {
        return Ok(());
    }
    let dest = word_to_usize(dest).map_err(|_| ExecutionException::InvalidJump)?;
    if !frame.is_valid_jumpdest(dest) {
        return Err(ExecutionException::InvalidJump);
    }
    frame.pending_jump = Some(dest);
    Ok(())
}

pub fn pc(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(Word::from(frame.pc as u64))?;
    Ok(())
}

pub fn msize(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(Word::from(frame.memory.size() as u64))?;
    Ok(())
}

pub fn gas(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(Word::from(frame.gas_remaining))?;
    Ok(())
}

pub fn jumpdest(_frame: &mut Frame) -> Result<(), ExecutionException> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_code(code: &[u8]) -> Frame {
        Frame::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Word::ZERO,
            Default::default(),
            code.to_vec().into(),
            Word::ZERO,
            false,
            0,
            1_000_000,
            0,
        )
    }

    #[test]
    fn mstore_then_mload_round_trips() {
        let mut frame = frame_with_code(&[]);
        frame.stack.push(Word::from(0xCAFEu64)).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        mstore(&mut frame).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        mload(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0xCAFEu64));
    }

    #[test]
    fn jump_to_non_jumpdest_is_invalid() {
        let mut frame = frame_with_code(&[0x00, 0x00]);
        frame.stack.push(Word::from(1u64)).unwrap();
        assert_eq!(jump(&mut frame), Err(ExecutionException::InvalidJump));
    }

    #[test]
    fn jumpi_with_zero_condition_does_not_jump() {
        let mut frame = frame_with_code(&[0x5b]);
        frame.stack.push(Word::ZERO).unwrap();
        frame.stack.push(Word::from(0u64)).unwrap();
        jumpi(&mut frame).unwrap();
        assert_eq!(frame.pending_jump, None);
    }

    #[test]
    fn jumpi_with_nonzero_condition_jumps_to_a_valid_dest() {
        let mut frame = frame_with_code(&[0x5b]);
        frame.stack.push(Word::from(1u64)).unwrap();
        frame.stack.push(Word::from(0u64)).unwrap();
        jumpi(&mut frame).unwrap();
        assert_eq!(frame.pending_jump, Some(0));
    }
}
