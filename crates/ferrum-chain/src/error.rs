//! Header/block validity failures. These never mutate persisted state and
//! are always surfaced to the caller of `validate`/`insert_blocks` as typed
//! failures rather than silently skipped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("parent {0:?} not found")]
    ParentNotFound(alloy_primitives::B256),
    #[error("header number {actual} does not follow parent number {parent}")]
    NonSequentialNumber { parent: u64, actual: u64 },
    #[error("header timestamp {actual} does not exceed parent timestamp {parent}")]
    TimestampNotMonotonic { parent: u64, actual: u64 },
    #[error("gas limit {0} below the protocol minimum")]
    GasLimitTooLow(u64),
    #[error("gas limit drift {drift} from parent {parent} exceeds the bound")]
    GasLimitDrift { parent: u64, drift: i64 },
    #[error("declared difficulty {declared} does not match the computed value {expected}")]
    DifficultyMismatch {
        declared: ferrum_primitives::Word,
        expected: ferrum_primitives::Word,
    },
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("decoding failure: {0}")]
    Decode(String),
    #[error("block references a header that was never written: {0:?}")]
    MissingHeader(alloy_primitives::B256),
}
