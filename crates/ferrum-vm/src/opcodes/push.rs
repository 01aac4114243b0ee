//! `0x60`-`0x7f`: PUSH1-PUSH32. Immediate data is read from `code[pc+1..]`,
//! zero-padded on the right if the code ends early, and the interpreter's
//! `pc` is advanced past the immediate bytes by the caller.

use crate::error::ExecutionException;
use crate::frame::Frame;
use ferrum_primitives::Word;

/// Push `n` bytes (`1..=32`) immediately following the opcode at `frame.pc`,
/// big-endian, short reads zero-padded. Returns the number of bytes consumed
/// so the interpreter can advance `pc` accordingly.
pub fn push(frame: &mut Frame, n: usize) -> Result<usize, ExecutionException> {
    debug_assert!((1..=32).contains(&n));
    let start = frame.pc + 1;
    let mut buf = [0u8; 32];
    for (i, slot) in buf[32 - n..].iter_mut().enumerate() {
        if let Some(&b) = frame.code.get(start + i) {
            *slot = b;
        }
    }
    frame.stack.push(Word::from_be_bytes(buf))?;
    Ok(n)
}
