//! Exercises `BlockChain` through its public surface rather than
//! `HeaderChain`'s internals: importing a batch of blocks and reading back
//! total difficulty and the canonical height index.

use alloy_primitives::{Address, Bytes};
use ferrum_chain::{BincodeHeaderCodec, Block, BlockChain, ChainConfig, Header, MemoryStorage};
use ferrum_primitives::{TinyKeccak256, Word};

fn header(number: u64, parent_hash: ferrum_primitives::Hash, timestamp: u64) -> Header {
    Header {
        parent_hash,
        ommers_hash: ferrum_primitives::keccak::EMPTY_LIST_HASH,
        beneficiary: Address::ZERO,
        state_root: Default::default(),
        transactions_root: Default::default(),
        receipts_root: Default::default(),
        logs_bloom: Default::default(),
        difficulty: Word::ZERO,
        number,
        gas_limit: 5_000_000,
        gas_used: 0,
        timestamp,
        extra_data: Bytes::new(),
        mix_hash: Default::default(),
        nonce: 0,
    }
}

fn new_chain(genesis: Header) -> BlockChain<MemoryStorage, BincodeHeaderCodec, TinyKeccak256> {
    BlockChain::new(
        MemoryStorage::new(),
        BincodeHeaderCodec,
        TinyKeccak256,
        ChainConfig::default(),
        Block::genesis(genesis),
    )
}

#[test]
fn inserting_a_batch_of_blocks_advances_the_head_and_total_difficulty() {
    let genesis = header(0, Default::default(), 0);
    let genesis_difficulty = Word::from(131_072u64);
    let mut genesis = genesis;
    genesis.difficulty = genesis_difficulty;
    let mut chain = new_chain(genesis.clone());

    let genesis_hash = chain.headers().hash_of(&genesis);
    let mut child = header(1, genesis_hash, 10);
    child.difficulty = chain.headers().calculate_difficulty(&child, &genesis);

    let blocks = vec![Block {
        header: child.clone(),
        transactions: Vec::new(),
        ommers: Vec::new(),
    }];
    chain.insert_blocks(blocks).expect("valid single-child chain");

    let head = chain.head().expect("head set after import");
    assert_eq!(head.number, 1);
    assert_eq!(
        chain.total_difficulty(chain.headers().hash_of(&head)),
        Some(genesis_difficulty + child.difficulty)
    );
}

#[test]
fn the_higher_total_difficulty_sibling_wins_head_across_a_batch() {
    let mut genesis = header(0, Default::default(), 0);
    genesis.difficulty = Word::from(131_072u64);
    let mut chain = new_chain(genesis.clone());
    let genesis_hash = chain.headers().hash_of(&genesis);

    let mut low = header(1, genesis_hash, 10);
    low.difficulty = chain.headers().calculate_difficulty(&low, &genesis);

    // Same parent and height as `low`, but an earlier timestamp so the
    // time_factor term computes higher and `calculate_difficulty` derives a
    // legitimately larger value, instead of a hand-bumped one `validate`
    // would reject as a declared/expected difficulty mismatch.
    let mut high = header(1, genesis_hash, 1);
    high.extra_data = Bytes::from_static(b"sibling");
    high.difficulty = chain.headers().calculate_difficulty(&high, &genesis);

    chain
        .insert_blocks(vec![
            Block { header: low, transactions: Vec::new(), ommers: Vec::new() },
            Block { header: high.clone(), transactions: Vec::new(), ommers: Vec::new() },
        ])
        .expect("both siblings individually valid");

    let head = chain.head().expect("head set after import");
    assert_eq!(chain.headers().hash_of(&head), chain.headers().hash_of(&high));
}
