//! Log entries emitted by `LOG0`-`LOG4`.

use crate::account::Address;
use crate::word::Word;
use alloy_primitives::Bytes;

/// At most 4 topics, per the `LOGk` family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<Word>,
    pub data: Bytes,
}
