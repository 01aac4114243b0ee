//! Header and block value types. Immutable once written: nothing in this
//! crate ever mutates a `Header` or `Block` in place, only replaces the
//! store's association from a hash to one.

use alloy_primitives::{Bloom, Bytes};
use ferrum_primitives::{Address, Hash, Word};
use serde::{Deserialize, Serialize};

/// A block header. Nothing beyond what [`crate::header_chain::HeaderChain`]
/// needs is interpreted here (parent linkage, timestamps, gas-limit drift,
/// difficulty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub parent_hash: Hash,
    pub ommers_hash: Hash,
    pub beneficiary: Address,
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: Word,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: Hash,
    pub nonce: u64,
}

impl Header {
    /// A header with `number == 0` is genesis: it has no parent and its
    /// declared difficulty is accepted as-is rather than recomputed.
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }
}

/// The undecoded wire form of a single transaction. Transaction decoding is
/// out of scope here; this crate only ever moves these bytes around, keyed
/// by the block that contains them.
pub type RawTransaction = Bytes;

/// A block: a header plus its transactions and ommers, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<RawTransaction>,
    pub ommers: Vec<Header>,
}

impl Block {
    pub fn genesis(header: Header) -> Self {
        debug_assert!(header.is_genesis());
        Self {
            header,
            transactions: Vec::new(),
            ommers: Vec::new(),
        }
    }
}
