//! Everything an opcode handler needs beyond its own frame: world state,
//! block metadata, and the hashing collaborator.

use ferrum_primitives::{Address, Keccak256, State, Word};

/// Block-level values visible to `COINBASE`/`TIMESTAMP`/`NUMBER`/
/// `DIFFICULTY`/`GASLIMIT`/`CHAINID` and to `BLOCKHASH`'s distance check.
#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
    pub coinbase: Address,
    pub timestamp: Word,
    pub number: Word,
    pub difficulty: Word,
    pub gas_limit: Word,
    pub chain_id: Word,
}

/// `BLOCKHASH(h)`: walk the ancestor chain. `h >= current` or
/// `h < current - 256` returns zero (§4.4); implementations backed by a
/// `HeaderChain` satisfy this by indexing on height.
pub trait BlockHashProvider {
    fn block_hash(&self, number: Word) -> Word;
}

pub struct NullBlockHashes;

impl BlockHashProvider for NullBlockHashes {
    fn block_hash(&self, _number: Word) -> Word {
        Word::ZERO
    }
}

pub struct Host<'a> {
    pub state: &'a mut dyn State,
    pub block: &'a BlockInfo,
    pub hasher: &'a dyn Keccak256,
    pub block_hashes: &'a dyn BlockHashProvider,
}
