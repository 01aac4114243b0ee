//! Protocol constants the header validator is parameterized over: these are
//! fork-specific and must not be hard-coded into the validator itself.

use ferrum_primitives::Word;

/// Frontier-era protocol constants. A later fork is a different
/// [`ChainConfig`] value, not a different code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// No block may declare a gas limit below this.
    pub minimum_gas_limit: u64,
    /// `|gas_limit - parent.gas_limit|` must stay strictly below
    /// `parent.gas_limit / gas_limit_bound_divisor`.
    pub gas_limit_bound_divisor: u64,
    /// Floor below which `calculate_difficulty` never drops, regardless of
    /// the adjustment terms. Deliberately a protocol constant rather than
    /// the being-validated header's own declared difficulty, which would be
    /// circular.
    pub difficulty_floor: Word,
    /// Number subtracted from `header.number` before computing the
    /// difficulty-bomb exponent ("fake block number"), delaying the bomb.
    pub bomb_delay: u64,
    /// Divisor applied to the (delayed) block number before taking the bomb
    /// exponent.
    pub bomb_exponent_divisor: u64,
    /// Divisor of the parent's difficulty making up the `x` adjustment term.
    pub difficulty_adjustment_divisor: u64,
    /// Divisor of the timestamp delta making up the `y` time-factor term.
    pub difficulty_time_divisor: u64,
}

impl Default for ChainConfig {
    /// Frontier protocol constants.
    fn default() -> Self {
        Self {
            minimum_gas_limit: 5_000,
            gas_limit_bound_divisor: 1_024,
            difficulty_floor: Word::from(131_072u64),
            bomb_delay: 3_000_000,
            bomb_exponent_divisor: 100_000,
            difficulty_adjustment_divisor: 2_048,
            difficulty_time_divisor: 9,
        }
    }
}
