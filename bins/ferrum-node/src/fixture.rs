//! JSON fixture format the `run` subcommand replays: a genesis header, a
//! sequence of subsequent headers to import, and a sequence of bytecode
//! programs to execute. Fixture loading is ambient CLI tooling, not part of
//! the interpreter or header-chain core those two collaborate through.

use alloy_primitives::{Address, Bytes};
use ferrum_chain::{Block, Header};
use ferrum_primitives::Word;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub genesis: Header,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub programs: Vec<ProgramFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ProgramFixture {
    pub name: String,
    pub code: Bytes,
    #[serde(default)]
    pub input: Bytes,
    #[serde(default)]
    pub caller: Address,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub value: Word,
    pub gas_limit: u64,
}

impl Fixture {
    pub fn genesis_block(&self) -> Block {
        Block::genesis(self.genesis.clone())
    }

    /// A minimal built-in demo used when no `--fixture` path is given:
    /// genesis plus the spec's scenario 3 ("EQ; JUMPI to a valid JUMPDEST").
    pub fn demo() -> Self {
        let genesis = Header {
            parent_hash: Default::default(),
            ommers_hash: ferrum_primitives::keccak::EMPTY_LIST_HASH,
            beneficiary: Address::ZERO,
            state_root: Default::default(),
            transactions_root: Default::default(),
            receipts_root: Default::default(),
            logs_bloom: Default::default(),
            difficulty: Word::from(131_072u64),
            number: 0,
            gas_limit: 5_000_000,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: Default::default(),
            nonce: 0,
        };
        let program = ProgramFixture {
            name: "eq-jumpi-jumpdest".to_string(),
            // PUSH1 0; PUSH1 0; EQ; PUSH2 0x000a; JUMPI; INVALID; JUMPDEST; STOP
            code: Bytes::from_static(&[
                0x60, 0x00, 0x60, 0x00, 0x14, 0x61, 0x00, 0x0a, 0x57, 0xfe, 0x5b, 0x00,
            ]),
            input: Bytes::new(),
            caller: Address::ZERO,
            address: Address::ZERO,
            value: Word::ZERO,
            gas_limit: 100_000,
        };
        Self {
            genesis,
            headers: Vec::new(),
            programs: vec![program],
        }
    }
}
