//! The stack-based bytecode interpreter (§3, §4): 256-bit word arithmetic,
//! byte-addressable memory, a bounded operand stack, and a fetch/dispatch
//! loop driving an explicit frame stack instead of recursing into nested
//! `CALL`/`CREATE` frames.

pub mod error;
pub mod frame;
pub mod gas;
pub mod host;
pub mod interpreter;
pub mod memory;
pub mod opcodes;
pub mod stack;

pub use error::{ExecutionException, StackError};
pub use frame::{CallInit, CallKind, CreateInit, Frame, PendingCall, SelfDestruct};
pub use host::{BlockHashProvider, BlockInfo, Host, NullBlockHashes};
pub use interpreter::{ExecutionResult, Interpreter, MAX_CALL_DEPTH};
pub use memory::Memory;
pub use stack::Stack;
