//! `0x80`-`0x8f`, `0x90`-`0x9f`: DUP1-DUP16, SWAP1-SWAP16.

use crate::error::ExecutionException;
use crate::frame::Frame;

/// `DUPk`: push a copy of the `k`-th item from the top (`k` in `1..=16`).
pub fn dup(frame: &mut Frame, k: usize) -> Result<(), ExecutionException> {
    debug_assert!((1..=16).contains(&k));
    let v = frame.stack.peek(k - 1)?;
    frame.stack.push(v)?;
    Ok(())
}

/// `SWAPk`: exchange the top with the item `k` positions below it (`k` in `1..=16`).
pub fn swap(frame: &mut Frame, k: usize) -> Result<(), ExecutionException> {
    debug_assert!((1..=16).contains(&k));
    frame.stack.swap(k)?;
    Ok(())
}
