//! The `State` collaborator (§6): the authoritative world state the VM reads
//! and mutates through a narrow trait, plus an in-memory reference
//! implementation used by the interpreter's own tests and the CLI demo.

use crate::account::{Account, Address};
use crate::word::Word;
use alloy_primitives::Bytes;
use std::collections::HashMap;

/// Opaque handle returned by [`State::snapshot`]; only meaningful as an
/// argument to [`State::revert`] or [`State::commit`] on the same state.
pub type SnapshotId = usize;

/// World-state interface consumed by the VM. Implementations own account
/// storage and must make `snapshot`/`revert`/`commit` cheap enough to call
/// on every `CALL`/`CREATE`.
pub trait State {
    fn balance(&self, addr: Address) -> Word;
    fn nonce(&self, addr: Address) -> Word;
    fn set_balance(&mut self, addr: Address, value: Word);
    fn add_balance(&mut self, addr: Address, value: Word);
    fn set_nonce(&mut self, addr: Address, value: Word);
    fn code(&self, addr: Address) -> Bytes;
    fn set_code(&mut self, addr: Address, code: Bytes);
    fn get_storage(&self, addr: Address, key: Word) -> Word;
    fn set_storage(&mut self, addr: Address, key: Word, value: Word);

    /// Record a point to which this state can later be [`State::revert`]ed.
    fn snapshot(&mut self) -> SnapshotId;
    /// Undo every mutation made since `id` was taken.
    fn revert(&mut self, id: SnapshotId);
    /// Accept the mutations made since `id`. A no-op for a journal-based
    /// implementation: committing simply declines to undo them, leaving an
    /// enclosing (older) snapshot free to revert past this point later.
    fn commit(&mut self, id: SnapshotId);
}

enum JournalEntry {
    Balance(Address, Word),
    Nonce(Address, Word),
    Code(Address, Bytes),
    Storage(Address, Word, Word),
}

/// A plain `HashMap`-backed `State`, undo-logged for `revert`/`commit`.
#[derive(Default)]
pub struct InMemoryState {
    accounts: HashMap<Address, Account>,
    journal: Vec<JournalEntry>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    fn account(&self, addr: Address) -> Account {
        self.accounts.get(&addr).cloned().unwrap_or_default()
    }

    fn entry(&mut self, addr: Address) -> &mut Account {
        self.accounts.entry(addr).or_default()
    }
}

impl State for InMemoryState {
    fn balance(&self, addr: Address) -> Word {
        self.account(addr).balance
    }

    fn nonce(&self, addr: Address) -> Word {
        self.account(addr).nonce
    }

    fn set_balance(&mut self, addr: Address, value: Word) {
        let prev = self.balance(addr);
        self.journal.push(JournalEntry::Balance(addr, prev));
        self.entry(addr).balance = value;
    }

    fn add_balance(&mut self, addr: Address, value: Word) {
        let prev = self.balance(addr);
        self.set_balance(addr, prev.wrapping_add(value));
    }

    fn set_nonce(&mut self, addr: Address, value: Word) {
        let prev = self.nonce(addr);
        self.journal.push(JournalEntry::Nonce(addr, prev));
        self.entry(addr).nonce = value;
    }

    fn code(&self, addr: Address) -> Bytes {
        self.account(addr).code
    }

    fn set_code(&mut self, addr: Address, code: Bytes) {
        let prev = self.code(addr);
        self.journal.push(JournalEntry::Code(addr, prev));
        self.entry(addr).code = code;
    }

    fn get_storage(&self, addr: Address, key: Word) -> Word {
        self.account(addr)
            .storage
            .get(&key)
            .copied()
            .unwrap_or(Word::ZERO)
    }

    fn set_storage(&mut self, addr: Address, key: Word, value: Word) {
        let prev = self.get_storage(addr, key);
        self.journal.push(JournalEntry::Storage(addr, key, prev));
        self.entry(addr).storage.insert(key, value);
    }

    fn snapshot(&mut self) -> SnapshotId {
        self.journal.len()
    }

    fn revert(&mut self, id: SnapshotId) {
        while self.journal.len() > id {
            match self.journal.pop().expect("checked len above") {
                JournalEntry::Balance(addr, prev) => self.entry(addr).balance = prev,
                JournalEntry::Nonce(addr, prev) => self.entry(addr).nonce = prev,
                JournalEntry::Code(addr, prev) => self.entry(addr).code = prev,
                JournalEntry::Storage(addr, key, prev) => {
                    self.entry(addr).storage.insert(key, prev);
                }
            }
        }
    }

    fn commit(&mut self, _id: SnapshotId) {
        // Entries already applied to `accounts`; leaving the journal intact
        // lets an outer snapshot still unwind past this point.
    }
}
