//! The `Keccak256` hash collaborator (§6). The VM and chain are generic over
//! this trait and never link a crypto crate directly; [`TinyKeccak256`] is
//! the concrete adapter the binary and test suite run against.

use crate::account::Hash;

pub trait Keccak256 {
    fn hash(&self, data: &[u8]) -> Hash;
}

/// The canonical Keccak-256 of RLP-encoding an empty list (`0xc0`), i.e. the
/// `ommers_hash` of a block with no ommers. Used by [`crate::word`] callers
/// computing the difficulty-adjustment `y` term without needing an RLP
/// encoder in this crate.
pub const EMPTY_LIST_HASH: Hash = Hash::new([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a, 0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13, 0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

/// Concrete [`Keccak256`] backed by the `tiny-keccak` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TinyKeccak256;

impl Keccak256 for TinyKeccak256 {
    fn hash(&self, data: &[u8]) -> Hash {
        use tiny_keccak::{Hasher, Keccak};
        let mut hasher = Keccak::v256();
        hasher.update(data);
        let mut out = [0u8; 32];
        hasher.finalize(&mut out);
        Hash::new(out)
    }
}
