//! The header/block codec collaborator. The real protocol uses a
//! length-prefixed recursive encoding of nested byte sequences (RLP); that
//! format is out of scope here, so this crate depends on it only through a
//! trait, with a concrete `bincode`-backed adapter for the binary and the
//! test suite to run against — the same round-trip pattern a host IPC
//! boundary uses for its own state (de)serialization.

use serde::{de::DeserializeOwned, Serialize};

pub trait HeaderCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Vec<u8>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeHeaderCodec;

impl HeaderCodec for BincodeHeaderCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Vec<u8> {
        bincode::serialize(value).expect("in-memory structures always serialize")
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String> {
        bincode::deserialize(bytes).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_value() {
        let codec = BincodeHeaderCodec;
        let encoded = codec.encode(&42u64);
        let decoded: u64 = codec.decode(&encoded).unwrap();
        assert_eq!(decoded, 42);
    }
}
