//! Frame-level and dispatch-level error kinds (§7).

use thiserror::Error;

/// Raised before a handler dispatches, from the static arity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("stack underflow")]
    Underflow,
    #[error("stack overflow")]
    Overflow,
}

/// Every way a frame's execution can come to a halt short of `STOP`/`RETURN`.
/// `CREATE`/`CALL`/`CALLCODE`/`DELEGATECALL` never let these propagate to the
/// parent's own exception channel; the caller always sees a `0` pushed
/// instead (§7).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionException {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,
    #[error("invalid instruction")]
    InvalidInstruction,
    #[error("invalid jump destination")]
    InvalidJump,
    #[error("out of gas")]
    OutOfGas,
    /// Explicit `REVERT`. Output is preserved and state is rolled back, but
    /// (unlike the other variants) this is not a failure the caller should
    /// log as abnormal.
    #[error("reverted")]
    Reverted,
    #[error("call stack too deep")]
    CallTooDeep,
}

impl From<StackError> for ExecutionException {
    fn from(e: StackError) -> Self {
        match e {
            StackError::Underflow => ExecutionException::StackUnderflow,
            StackError::Overflow => ExecutionException::StackOverflow,
        }
    }
}

impl ExecutionException {
    /// `REVERT` is the only exception kind that still returns output data
    /// and represents an intentional, not "abnormal", halt.
    pub fn is_revert(&self) -> bool {
        matches!(self, ExecutionException::Reverted)
    }
}
