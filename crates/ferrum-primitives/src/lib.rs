//! Value types and collaborator contracts shared by `ferrum-vm` and
//! `ferrum-chain`: 256-bit word arithmetic, the account model, and the
//! `State`/`Keccak256` interfaces external collaborators implement.

pub mod account;
pub mod keccak;
pub mod log;
pub mod state;
pub mod word;

pub use account::{Account, Address, Hash};
pub use keccak::{Keccak256, TinyKeccak256};
pub use log::LogEntry;
pub use state::{InMemoryState, SnapshotId, State};
pub use word::Word;
