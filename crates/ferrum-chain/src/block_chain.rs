//! The block-chain facade: stores blocks by hash and delegates header
//! validity, HEAD, and total-difficulty queries to the [`HeaderChain`] it
//! wraps. On construction it writes the supplied genesis block if the
//! header chain has no HEAD yet.

use crate::codec::HeaderCodec;
use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::header::{Block, Header};
use crate::header_chain::HeaderChain;
use crate::storage::StorageBackend;
use ferrum_primitives::{Hash, Keccak256, Word};

fn key_block(hash: Hash) -> Vec<u8> {
    [b"b".as_slice(), hash.as_slice()].concat()
}

pub struct BlockChain<S, C, K> {
    headers: HeaderChain<S, C, K>,
    codec: C,
}

impl<S: StorageBackend, C: HeaderCodec + Clone, K: Keccak256> BlockChain<S, C, K> {
    /// Wraps `storage` in a [`HeaderChain`], writing `genesis` if the chain
    /// has no HEAD yet (a fresh store, or one reopened before any block was
    /// ever written).
    pub fn new(storage: S, codec: C, hasher: K, config: ChainConfig, genesis: Block) -> Self {
        let mut headers = HeaderChain::new(storage, codec.clone(), hasher, config);
        if headers.head().is_none() {
            headers
                .write(genesis.header.clone())
                .expect("genesis headers always validate");
        }
        let mut chain = Self { headers, codec };
        chain.persist_block(&genesis);
        chain
    }

    pub fn headers(&self) -> &HeaderChain<S, C, K> {
        &self.headers
    }

    pub fn head(&self) -> Option<Header> {
        self.headers.head()
    }

    pub fn total_difficulty(&self, hash: Hash) -> Option<Word> {
        self.headers.total_difficulty(hash)
    }

    pub fn get_block(&self, hash: Hash) -> Option<Block> {
        let bytes = self.headers_storage_get(&key_block(hash))?;
        self.codec.decode(&bytes).ok()
    }

    /// Escape hatch for reading the raw block bytes without exposing the
    /// inner `HeaderChain`'s private storage field.
    fn headers_storage_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.headers.storage_get(key)
    }

    fn persist_block(&mut self, block: &Block) {
        let hash = self.headers.hash_of(&block.header);
        let encoded = self.codec.encode(block);
        self.headers.storage_put(key_block(hash), encoded);
    }

    /// Appends each block in order: validates its header via the header
    /// chain, then persists the block by hash. A header that fails
    /// validation stops the import there — the rejected block and anything
    /// after it are never written — but blocks already accepted earlier in
    /// the same call stay committed, exactly as a real header's rejection
    /// never unwinds its already-canonical ancestors.
    pub fn insert_blocks(&mut self, blocks: Vec<Block>) -> Result<(), ChainError> {
        for block in blocks {
            self.headers.write(block.header.clone())?;
            self.persist_block(&block);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeHeaderCodec;
    use crate::storage::MemoryStorage;
    use alloy_primitives::{Address, Bloom, Bytes};
    use ferrum_primitives::TinyKeccak256;

    fn genesis_header() -> Header {
        Header {
            parent_hash: Hash::ZERO,
            ommers_hash: ferrum_primitives::keccak::EMPTY_LIST_HASH,
            beneficiary: Address::ZERO,
            state_root: Hash::ZERO,
            transactions_root: Hash::ZERO,
            receipts_root: Hash::ZERO,
            logs_bloom: Bloom::ZERO,
            difficulty: Word::from(131_072u64),
            number: 0,
            gas_limit: 5_000,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: Hash::ZERO,
            nonce: 0,
        }
    }

    #[test]
    fn construction_writes_genesis_exactly_once() {
        let genesis = Block::genesis(genesis_header());
        let chain = BlockChain::new(
            MemoryStorage::new(),
            BincodeHeaderCodec,
            TinyKeccak256,
            ChainConfig::default(),
            genesis.clone(),
        );
        assert_eq!(chain.head().unwrap(), genesis.header);
        let hash = chain.headers().hash_of(&genesis.header);
        assert_eq!(chain.get_block(hash), Some(genesis));
    }

    #[test]
    fn insert_blocks_appends_and_updates_head() {
        let genesis = Block::genesis(genesis_header());
        let mut chain = BlockChain::new(
            MemoryStorage::new(),
            BincodeHeaderCodec,
            TinyKeccak256,
            ChainConfig::default(),
            genesis.clone(),
        );
        let genesis_hash = chain.headers().hash_of(&genesis.header);

        let mut header = Header {
            number: 1,
            parent_hash: genesis_hash,
            timestamp: 10,
            ..genesis_header()
        };
        header.difficulty = chain.headers().calculate_difficulty(&header, &genesis.header);
        let block = Block {
            header: header.clone(),
            transactions: Vec::new(),
            ommers: Vec::new(),
        };

        chain.insert_blocks(vec![block.clone()]).unwrap();
        assert_eq!(chain.head().unwrap().number, 1);
        let hash = chain.headers().hash_of(&header);
        assert_eq!(chain.get_block(hash), Some(block));
    }
}
