//! `0x30`-`0x3c`: ADDRESS, BALANCE, ORIGIN, CALLER, CALLVALUE, CALLDATALOAD,
//! CALLDATASIZE, CALLDATACOPY, CODESIZE, CODECOPY, GASPRICE, EXTCODESIZE,
//! EXTCODECOPY.

use crate::error::ExecutionException;
use crate::frame::Frame;
use crate::host::Host;
use crate::memory::word_to_usize;
use ferrum_primitives::{Address, Word};

fn address_to_word(a: Address) -> Word {
    Word::from_be_slice(a.as_slice())
}

/// An address occupies the low 20 bytes of a 256-bit stack word; the rest
/// is discarded, matching how `PUSH20`-sized values round-trip through it.
pub fn word_to_address(w: Word) -> Address {
    let bytes = w.to_be_bytes::<32>();
    Address::from_slice(&bytes[12..])
}

pub fn address(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(address_to_word(frame.address))?;
    Ok(())
}

pub fn balance(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let a = frame.stack.pop()?;
    let addr = word_to_address(a);
    frame.stack.push(host.state.balance(addr))?;
    Ok(())
}

pub fn origin(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(address_to_word(frame.origin))?;
    Ok(())
}

pub fn caller(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(address_to_word(frame.caller))?;
    Ok(())
}

pub fn callvalue(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(frame.value)?;
    Ok(())
}

pub fn gasprice(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(frame.gas_price)?;
    Ok(())
}

/// `CALLDATALOAD(offset)`: 32 bytes of input data starting at `offset`,
/// zero-padded past the end.
pub fn calldataload(frame: &mut Frame) -> Result<(), ExecutionException> {
    let offset_w = frame.stack.pop()?;
    let mut buf = [0u8; 32];
    match word_to_usize(offset_w) {
        Ok(offset) if offset < frame.input.len() => {
            let n = (frame.input.len() - offset).min(32);
            buf[..n].copy_from_slice(&frame.input[offset..offset + n]);
        }
        _ => {}
    }
    frame.stack.push(Word::from_be_bytes(buf))?;
    Ok(())
}

pub fn calldatasize(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(Word::from(frame.input.len() as u64))?;
    Ok(())
}

pub fn codesize(frame: &mut Frame) -> Result<(), ExecutionException> {
    frame.stack.push(Word::from(frame.code.len() as u64))?;
    Ok(())
}

/// Copies `size` bytes starting at `src_offset` of `source` into memory at
/// `mem_offset`, zero-padding any region past the end of `source`.
fn copy_to_memory(
    frame: &mut Frame,
    source: &[u8],
    mem_offset: usize,
    src_offset: usize,
    size: usize,
) -> Result<(), ExecutionException> {
    let mut buf = vec![0u8; size];
    if src_offset < source.len() {
        let n = (source.len() - src_offset).min(size);
        buf[..n].copy_from_slice(&source[src_offset..src_offset + n]);
    }
    frame.memory.store(mem_offset, size, &buf)
}

pub fn calldatacopy(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [mem_off, src_off, size] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    let mem_off = word_to_usize(mem_off)?;
    let src_off = word_to_usize(src_off)?;
    let size = word_to_usize(size)?;
    let input = frame.input.clone();
    copy_to_memory(frame, &input, mem_off, src_off, size)
}

pub fn codecopy(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [mem_off, src_off, size] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    let mem_off = word_to_usize(mem_off)?;
    let src_off = word_to_usize(src_off)?;
    let size = word_to_usize(size)?;
    let code = frame.code.clone();
    copy_to_memory(frame, &code, mem_off, src_off, size)
}

pub fn extcodesize(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let a = frame.stack.pop()?;
    let addr = word_to_address(a);
    let len = host.state.code(addr).len();
    frame.stack.push(Word::from(len as u64))?;
    Ok(())
}

pub fn extcodecopy(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let a = frame.stack.pop()?;
    let [mem_off, src_off, size] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    let addr = word_to_address(a);
    let mem_off = word_to_usize(mem_off)?;
    let src_off = word_to_usize(src_off)?;
    let size = word_to_usize(size)?;
    let code = host.state.code(addr);
    copy_to_memory(frame, &code, mem_off, src_off, size)
}
