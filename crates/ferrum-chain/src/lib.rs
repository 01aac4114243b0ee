//! The proof-of-work header chain and the block-by-hash facade built on top
//! of it: a content-addressed store keyed by header hash, with auxiliary
//! height and total-difficulty indices and a HEAD pointer chosen by
//! cumulative difficulty.

pub mod block_chain;
pub mod codec;
pub mod config;
pub mod error;
pub mod header;
pub mod header_chain;
pub mod storage;

pub use block_chain::BlockChain;
pub use codec::{BincodeHeaderCodec, HeaderCodec};
pub use config::ChainConfig;
pub use error::{ChainError, HeaderError};
pub use header::{Block, Header, RawTransaction};
pub use header_chain::{ChainBlockHashes, HeaderChain};
pub use storage::{BatchOp, MemoryStorage, StorageBackend};
