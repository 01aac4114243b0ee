//! `0x40`-`0x46`: BLOCKHASH, COINBASE, TIMESTAMP, NUMBER, DIFFICULTY,
//! GASLIMIT, CHAINID.

use crate::error::ExecutionException;
use crate::frame::Frame;
use crate::host::Host;
use ferrum_primitives::Word;

pub fn blockhash(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    let number = frame.stack.pop()?;
    frame.stack.push(host.block_hashes.block_hash(number))?;
    Ok(())
}

pub fn coinbase(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame
        .stack
        .push(Word::from_be_slice(host.block.coinbase.as_slice()))?;
    Ok(())
}

pub fn timestamp(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame.stack.push(host.block.timestamp)?;
    Ok(())
}

pub fn number(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame.stack.push(host.block.number)?;
    Ok(())
}

pub fn difficulty(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame.stack.push(host.block.difficulty)?;
    Ok(())
}

pub fn gaslimit(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame.stack.push(host.block.gas_limit)?;
    Ok(())
}

pub fn chainid(frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    frame.stack.push(host.block.chain_id)?;
    Ok(())
}
