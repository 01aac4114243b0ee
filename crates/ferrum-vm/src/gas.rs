//! Per-opcode gas costs (§9 Open Question: "gas schedule"). The teacher's
//! `execution/gas.rs` hard-codes a handful of syscall-adjacent costs
//! (`SLOAD_COLD`, `CALL_BASE`, ...); here the same constants are generalized
//! into a full Frontier-era cost table charged by the interpreter loop
//! before dispatch, as spec.md §4.5 requires.

/// Cost of the cheapest opcode class (arithmetic, stack, most environment
/// reads).
pub const G_BASE: u64 = 2;
pub const G_VERYLOW: u64 = 3;
pub const G_LOW: u64 = 5;
pub const G_MID: u64 = 8;
pub const G_HIGH: u64 = 10;
pub const G_JUMPDEST: u64 = 1;
pub const G_SLOAD: u64 = 50;
pub const G_SSTORE_SET: u64 = 20000;
pub const G_SSTORE_RESET: u64 = 5000;
pub const G_SSTORE_REFUND: u64 = 15000;
pub const G_SHA3: u64 = 30;
pub const G_SHA3_WORD: u64 = 6;
pub const G_MEMORY_WORD: u64 = 3;
pub const G_LOG: u64 = 375;
pub const G_LOG_DATA: u64 = 8;
pub const G_LOG_TOPIC: u64 = 375;
pub const G_CREATE: u64 = 32000;
pub const G_CALL: u64 = 40;
pub const G_CALL_VALUE: u64 = 9000;
pub const G_CALL_STIPEND: u64 = 2300;
pub const G_NEW_ACCOUNT: u64 = 25000;
pub const G_SELFDESTRUCT: u64 = 0;
pub const G_SELFDESTRUCT_NEW_ACCOUNT: u64 = 25000;
pub const G_SELFDESTRUCT_REFUND: u64 = 24000;
pub const G_EXP: u64 = 10;
pub const G_EXP_BYTE: u64 = 10;
pub const G_COPY_WORD: u64 = 3;

/// Quadratic memory-expansion cost for growing from `old_words` to
/// `new_words` active words: `3*words + words^2/512`, the increase only.
pub fn memory_expansion_cost(old_words: u64, new_words: u64) -> u64 {
    if new_words <= old_words {
        return 0;
    }
    let cost = |w: u64| G_MEMORY_WORD * w + (w * w) / 512;
    cost(new_words).saturating_sub(cost(old_words))
}

/// Cost of `EXP`: base cost plus a per-byte cost for the exponent's
/// significant bytes.
pub fn exp_cost(exponent_byte_len: u64) -> u64 {
    G_EXP + G_EXP_BYTE * exponent_byte_len
}
