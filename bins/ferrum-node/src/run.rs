//! Drives a [`Fixture`] end to end: imports its headers into a
//! [`BlockChain`], then executes each of its bytecode programs through the
//! interpreter against a fresh in-memory world state, printing the outcome
//! of each.

use crate::fixture::Fixture;
use colored::Colorize;
use ferrum_chain::{BincodeHeaderCodec, Block, BlockChain, ChainBlockHashes, ChainConfig, MemoryStorage};
use ferrum_primitives::{InMemoryState, TinyKeccak256, Word};
use ferrum_vm::{BlockInfo, ExecutionResult, Frame, Host, Interpreter};
use tracing::info;

pub fn run_fixture(fixture: Fixture) -> eyre::Result<()> {
    let mut chain = BlockChain::new(
        MemoryStorage::new(),
        BincodeHeaderCodec,
        TinyKeccak256,
        ChainConfig::default(),
        fixture.genesis_block(),
    );

    if !fixture.headers.is_empty() {
        let blocks: Vec<Block> = fixture
            .headers
            .iter()
            .cloned()
            .map(|header| Block {
                header,
                transactions: Vec::new(),
                ommers: Vec::new(),
            })
            .collect();
        chain.insert_blocks(blocks)?;
    }

    let head = chain.head().expect("genesis is always written on construction");
    info!(number = head.number, %head.difficulty, "chain head after import");
    println!(
        "chain head: number={} difficulty={}",
        head.number, head.difficulty
    );

    for program in &fixture.programs {
        let result = execute_program(&chain, &head, program);
        print_result(&program.name, &result);
    }

    Ok(())
}

fn execute_program<S, C, K>(
    chain: &BlockChain<S, C, K>,
    head: &ferrum_chain::Header,
    program: &crate::fixture::ProgramFixture,
) -> ExecutionResult
where
    S: ferrum_chain::StorageBackend,
    C: ferrum_chain::HeaderCodec,
    K: ferrum_primitives::Keccak256,
{
    let mut state = InMemoryState::new();
    let hasher = TinyKeccak256;
    let block_hashes = ChainBlockHashes {
        chain: chain.headers(),
        current_number: head.number,
        current_parent_hash: head.parent_hash,
    };
    let block_info = BlockInfo {
        coinbase: head.beneficiary,
        timestamp: Word::from(head.timestamp),
        number: Word::from(head.number),
        difficulty: head.difficulty,
        gas_limit: Word::from(head.gas_limit),
        chain_id: Word::from(1u64),
    };
    let host = Host {
        state: &mut state,
        block: &block_info,
        hasher: &hasher,
        block_hashes: &block_hashes,
    };
    let frame = Frame::new(
        program.caller,
        program.address,
        program.caller,
        Word::ZERO,
        program.input.clone(),
        program.code.clone(),
        program.value,
        false,
        0,
        program.gas_limit,
        0,
    );
    Interpreter::new(host, frame).run()
}

fn print_result(name: &str, result: &ExecutionResult) {
    let status = if result.success {
        "OK".green()
    } else {
        "FAILED".red()
    };
    let output_hex: String = result.output.iter().map(|b| format!("{b:02x}")).collect();
    println!(
        "{name}: {status} gas_used={} output=0x{output_hex}",
        result.gas_used
    );
    if let Some(e) = &result.exception {
        println!("  exception: {e}");
    }
    if !result.logs.is_empty() {
        println!("  logs: {}", result.logs.len());
    }
}
