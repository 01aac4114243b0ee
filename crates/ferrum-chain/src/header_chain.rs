//! The header chain: validates headers against their parent, derives
//! difficulty, and maintains the hash/height/total-difficulty indices plus
//! the HEAD pointer. Reorg is resolved here: `write` compares the
//! candidate's total difficulty against the current head's and, when it
//! wins, rewrites the height index along the new canonical chain.

use crate::codec::HeaderCodec;
use crate::config::ChainConfig;
use crate::error::{ChainError, HeaderError};
use crate::header::Header;
use crate::storage::{BatchOp, StorageBackend};
use ferrum_primitives::{Hash, Keccak256, Word};
use ferrum_vm::BlockHashProvider;
use tracing::{info, warn};

fn key_head() -> Vec<u8> {
    b"head".to_vec()
}

fn key_genesis() -> Vec<u8> {
    b"genesis".to_vec()
}

fn key_header(hash: Hash) -> Vec<u8> {
    [b"h".as_slice(), hash.as_slice()].concat()
}

fn key_total_difficulty(hash: Hash) -> Vec<u8> {
    [b"h".as_slice(), hash.as_slice(), b"t".as_slice()].concat()
}

fn key_height(number: u64) -> Vec<u8> {
    [b"h".as_slice(), &number.to_be_bytes(), b"n".as_slice()].concat()
}

/// Content-addressed header store plus its hash/height/total-difficulty
/// indices and the HEAD pointer.
pub struct HeaderChain<S, C, K> {
    storage: S,
    codec: C,
    hasher: K,
    config: ChainConfig,
}

impl<S: StorageBackend, C: HeaderCodec, K: Keccak256> HeaderChain<S, C, K> {
    pub fn new(storage: S, codec: C, hasher: K, config: ChainConfig) -> Self {
        Self {
            storage,
            codec,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Keccak-256 of the header's encoded bytes; its identity in the store.
    pub fn hash_of(&self, header: &Header) -> Hash {
        self.hasher.hash(&self.codec.encode(header))
    }

    pub fn get_header(&self, hash: Hash) -> Option<Header> {
        let bytes = self.storage.get(&key_header(hash))?;
        self.codec.decode(&bytes).ok()
    }

    pub fn get_header_hash_by_number(&self, number: u64) -> Option<Hash> {
        let bytes = self.storage.get(&key_height(number))?;
        Some(Hash::from_slice(&bytes))
    }

    pub fn total_difficulty(&self, hash: Hash) -> Option<Word> {
        let bytes = self.storage.get(&key_total_difficulty(hash))?;
        self.codec.decode(&bytes).ok()
    }

    pub fn head(&self) -> Option<Header> {
        let bytes = self.storage.get(&key_head())?;
        self.codec.decode(&bytes).ok()
    }

    pub fn genesis(&self) -> Option<Header> {
        let bytes = self.storage.get(&key_genesis())?;
        self.codec.decode(&bytes).ok()
    }

    /// Raw storage access for [`crate::block_chain::BlockChain`], which
    /// shares this chain's backend to persist blocks under the `"b"` prefix
    /// without this crate exposing the `storage` field itself.
    pub fn storage_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.get(key)
    }

    pub fn storage_put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.storage.put(&key, value);
    }

    /// `calculate_difficulty(H, P)`: the Homestead-era formula with an
    /// ommer-aware time factor and the difficulty-bomb term.
    pub fn calculate_difficulty(&self, header: &Header, parent: &Header) -> Word {
        if header.is_genesis() {
            return header.difficulty;
        }

        let x = parent.difficulty / Word::from(self.config.difficulty_adjustment_divisor);

        let y: i64 = if header.ommers_hash == ferrum_primitives::keccak::EMPTY_LIST_HASH {
            1
        } else {
            2
        };
        let time_delta = header.timestamp.saturating_sub(parent.timestamp);
        let time_factor =
            (y - (time_delta / self.config.difficulty_time_divisor) as i64).max(-99);

        let fake_height = header.number.saturating_sub(self.config.bomb_delay);
        let bomb_exponent = (fake_height / self.config.bomb_exponent_divisor) as i64 - 2;
        let bomb = if bomb_exponent >= 0 {
            ferrum_primitives::word::exp(Word::from(2u64), Word::from(bomb_exponent as u64))
        } else {
            Word::ZERO
        };

        let adjustment = x.saturating_mul(Word::from(time_factor.unsigned_abs()));
        let adjusted = if time_factor >= 0 {
            parent
                .difficulty
                .saturating_add(adjustment)
                .saturating_add(bomb)
        } else {
            parent
                .difficulty
                .saturating_sub(adjustment)
                .saturating_add(bomb)
        };

        self.config.difficulty_floor.max(adjusted)
    }

    /// `valid(header)`. Genesis (`number == 0`) is accepted unconditionally;
    /// it has no parent to check against.
    pub fn validate(&self, header: &Header) -> Result<(), HeaderError> {
        if header.is_genesis() {
            return Ok(());
        }

        let parent = self
            .get_header(header.parent_hash)
            .ok_or(HeaderError::ParentNotFound(header.parent_hash))?;

        if parent.number + 1 != header.number {
            return Err(HeaderError::NonSequentialNumber {
                parent: parent.number,
                actual: header.number,
            });
        }
        if header.timestamp <= parent.timestamp {
            return Err(HeaderError::TimestampNotMonotonic {
                parent: parent.timestamp,
                actual: header.timestamp,
            });
        }
        if header.gas_limit < self.config.minimum_gas_limit {
            return Err(HeaderError::GasLimitTooLow(header.gas_limit));
        }
        let bound = parent.gas_limit / self.config.gas_limit_bound_divisor;
        let drift = header.gas_limit as i64 - parent.gas_limit as i64;
        if drift.unsigned_abs() >= bound {
            return Err(HeaderError::GasLimitDrift {
                parent: parent.gas_limit,
                drift,
            });
        }
        let expected = self.calculate_difficulty(header, &parent);
        if header.difficulty != expected {
            return Err(HeaderError::DifficultyMismatch {
                declared: header.difficulty,
                expected,
            });
        }
        Ok(())
    }

    /// Validates (unless genesis), persists, and — if this header's total
    /// difficulty beats the current head's — promotes it to HEAD and
    /// rewrites the height index along its ancestry back to the point it
    /// rejoins the chain that was already canonical.
    pub fn write(&mut self, header: Header) -> Result<Hash, ChainError> {
        if !header.is_genesis() {
            if let Err(e) = self.validate(&header) {
                warn!(number = header.number, error = %e, "header rejected");
                return Err(e.into());
            }
        }

        let hash = self.hash_of(&header);
        let td = if header.is_genesis() {
            header.difficulty
        } else {
            let parent_td = self
                .total_difficulty(header.parent_hash)
                .ok_or(ChainError::MissingHeader(header.parent_hash))?;
            parent_td.saturating_add(header.difficulty)
        };

        let mut ops = vec![
            BatchOp::Put(key_header(hash), self.codec.encode(&header)),
            BatchOp::Put(key_total_difficulty(hash), self.codec.encode(&td)),
        ];
        if header.is_genesis() {
            ops.push(BatchOp::Put(key_genesis(), self.codec.encode(&header)));
        }
        self.storage.batch(ops);
        info!(number = header.number, %hash, "header accepted");

        let current_head_td = match self.head() {
            None => None,
            Some(head_header) => {
                let head_hash = self.hash_of(&head_header);
                Some(self.total_difficulty(head_hash).unwrap_or(head_header.difficulty))
            }
        };
        let wins_head = match current_head_td {
            None => true,
            Some(head_td) => td > head_td,
        };
        if wins_head {
            self.set_head(hash, header);
        }

        Ok(hash)
    }

    fn set_head(&mut self, hash: Hash, header: Header) {
        let mut ops = vec![BatchOp::Put(key_head(), self.codec.encode(&header))];

        let mut cursor_hash = hash;
        let mut cursor_header = header;
        loop {
            let already_canonical =
                self.get_header_hash_by_number(cursor_header.number) == Some(cursor_hash);
            ops.push(BatchOp::Put(
                key_height(cursor_header.number),
                cursor_hash.as_slice().to_vec(),
            ));
            if already_canonical || cursor_header.is_genesis() {
                break;
            }
            let parent_hash = cursor_header.parent_hash;
            let Some(parent) = self.get_header(parent_hash) else {
                warn!(%parent_hash, "reorg walk hit a missing ancestor; stopping early");
                break;
            };
            cursor_hash = parent_hash;
            cursor_header = parent;
        }
        self.storage.batch(ops);
    }

    /// `BLOCKHASH(h)`: zero if `h` is not within the last 256 blocks of
    /// `current_number`, otherwise the hash reached by walking
    /// `parent_hash` pointers `current_number - h - 1` times starting from
    /// `current_parent_hash`.
    pub fn block_hash_by_distance(
        &self,
        current_number: u64,
        current_parent_hash: Hash,
        target: u64,
    ) -> Hash {
        if target >= current_number || current_number - target > 256 {
            return Hash::ZERO;
        }
        let distance = current_number - target - 1;
        let mut hash = current_parent_hash;
        for _ in 0..distance {
            match self.get_header(hash) {
                Some(h) => hash = h.parent_hash,
                None => return Hash::ZERO,
            }
        }
        hash
    }
}

fn word_to_u64(w: Word) -> Option<u64> {
    let limbs = w.as_limbs();
    if limbs[1] != 0 || limbs[2] != 0 || limbs[3] != 0 {
        None
    } else {
        Some(limbs[0])
    }
}

/// Adapter satisfying `ferrum_vm`'s [`BlockHashProvider`] for the block
/// currently executing, so `BLOCKHASH` can be wired straight to a
/// [`HeaderChain`] without the VM knowing about headers at all.
pub struct ChainBlockHashes<'a, S, C, K> {
    pub chain: &'a HeaderChain<S, C, K>,
    pub current_number: u64,
    pub current_parent_hash: Hash,
}

impl<S: StorageBackend, C: HeaderCodec, K: Keccak256> BlockHashProvider
    for ChainBlockHashes<'_, S, C, K>
{
    fn block_hash(&self, number: Word) -> Word {
        let Some(target) = word_to_u64(number) else {
            return Word::ZERO;
        };
        let hash =
            self.chain
                .block_hash_by_distance(self.current_number, self.current_parent_hash, target);
        Word::from_be_slice(hash.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeHeaderCodec;
    use crate::storage::MemoryStorage;
    use alloy_primitives::{Address, Bloom, Bytes};
    use ferrum_primitives::TinyKeccak256;

    fn chain() -> HeaderChain<MemoryStorage, BincodeHeaderCodec, TinyKeccak256> {
        HeaderChain::new(
            MemoryStorage::new(),
            BincodeHeaderCodec,
            TinyKeccak256,
            ChainConfig::default(),
        )
    }

    fn header(number: u64, parent_hash: Hash, difficulty: Word, timestamp: u64) -> Header {
        Header {
            parent_hash,
            ommers_hash: ferrum_primitives::keccak::EMPTY_LIST_HASH,
            beneficiary: Address::ZERO,
            state_root: Hash::ZERO,
            transactions_root: Hash::ZERO,
            receipts_root: Hash::ZERO,
            logs_bloom: Bloom::ZERO,
            difficulty,
            number,
            gas_limit: 5_000,
            gas_used: 0,
            timestamp,
            extra_data: Bytes::new(),
            mix_hash: Hash::ZERO,
            nonce: 0,
        }
    }

    #[test]
    fn difficulty_example_from_spec_scenario_5() {
        let c = chain();
        let parent = header(0, Hash::ZERO, Word::from(131_072u64), 0);
        let candidate = header(1, c.hash_of(&parent), Word::ZERO, 5);
        let expected = c.calculate_difficulty(&candidate, &parent);
        assert_eq!(expected, Word::from(131_136u64));
    }

    #[test]
    fn total_difficulty_accumulates_from_genesis() {
        let mut c = chain();
        let genesis = header(0, Hash::ZERO, Word::from(131_072u64), 0);
        let genesis_hash = c.write(genesis.clone()).unwrap();
        assert_eq!(c.total_difficulty(genesis_hash), Some(Word::from(131_072u64)));

        let mut child = header(1, genesis_hash, Word::ZERO, 10);
        child.difficulty = c.calculate_difficulty(&child, &genesis);
        let child_hash = c.write(child.clone()).unwrap();
        assert_eq!(
            c.total_difficulty(child_hash),
            Some(Word::from(131_072u64) + child.difficulty)
        );
    }

    #[test]
    fn head_follows_the_higher_total_difficulty_sibling() {
        let mut c = chain();
        let genesis = header(0, Hash::ZERO, Word::from(131_072u64), 0);
        let genesis_hash = c.write(genesis.clone()).unwrap();

        let mut low = header(1, genesis_hash, Word::ZERO, 10);
        low.difficulty = c.calculate_difficulty(&low, &genesis);
        // Same parent and height as `low`, but an earlier timestamp: the
        // time_factor term comes out higher (1 instead of 0), so
        // `calculate_difficulty` legitimately derives a larger value
        // instead of a hand-bumped one `validate` would reject.
        let mut high = header(1, genesis_hash, Word::ZERO, 1);
        high.extra_data = Bytes::from_static(b"sibling");
        high.difficulty = c.calculate_difficulty(&high, &genesis);

        c.write(low.clone()).unwrap();
        let high_hash = c.write(high.clone()).unwrap();

        assert_eq!(c.head().unwrap().number, 1);
        assert_eq!(c.hash_of(&c.head().unwrap()), high_hash);
        assert_eq!(c.get_header_hash_by_number(1), Some(high_hash));
    }

    #[test]
    fn invalid_non_sequential_number_is_rejected() {
        let mut c = chain();
        let genesis = header(0, Hash::ZERO, Word::from(131_072u64), 0);
        let genesis_hash = c.write(genesis.clone()).unwrap();

        let mut bad = header(2, genesis_hash, Word::ZERO, 10);
        bad.difficulty = c.calculate_difficulty(&bad, &genesis);
        assert!(matches!(
            c.write(bad),
            Err(ChainError::Header(HeaderError::NonSequentialNumber { .. }))
        ));
    }

    #[test]
    fn blockhash_out_of_window_is_zero() {
        let c = chain();
        assert_eq!(
            c.block_hash_by_distance(300, Hash::ZERO, 10),
            Hash::ZERO
        );
        assert_eq!(
            c.block_hash_by_distance(10, Hash::ZERO, 10),
            Hash::ZERO
        );
    }
}
