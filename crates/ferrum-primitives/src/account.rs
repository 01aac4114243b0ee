//! Account and address/hash aliases.

use crate::word::Word;
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use alloy_primitives::{Address, B256 as Hash};

/// World-state account. Absent accounts are observationally equivalent to
/// [`Account::default`]: zero balance, zero nonce, no code, no storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: Word,
    pub nonce: Word,
    pub code: Bytes,
    pub storage: HashMap<Word, Word>,
}

impl Account {
    /// A "dead" account: every field at its default, eligible for implicit
    /// removal after self-destruct.
    pub fn is_dead(&self) -> bool {
        self.balance.is_zero() && self.nonce.is_zero() && self.code.is_empty()
    }
}
