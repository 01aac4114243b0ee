//! 256-bit word arithmetic with EVM semantics.
//!
//! `Word` wraps [`alloy_primitives::U256`]. Plain unsigned wraparound
//! (`ADD`/`SUB`/`MUL`) is just the underlying type's `wrapping_*` methods;
//! everything here covers the EVM-specific conventions the bare type doesn't
//! encode: division/modulo by zero returning zero, two's-complement signed
//! division and remainder, `ADDMOD`/`MULMOD` without intermediate overflow,
//! modular exponentiation, `SIGNEXTEND` and `BYTE`.

use alloy_primitives::U256;

pub type Word = U256;

/// `bit 255` set.
pub fn is_negative(w: Word) -> bool {
    (w >> 255) & Word::from(1u64) != Word::ZERO
}

/// Two's-complement negation, mod 2^256.
pub fn negate(w: Word) -> Word {
    (!w).wrapping_add(Word::from(1u64))
}

fn magnitude(w: Word) -> Word {
    if is_negative(w) {
        negate(w)
    } else {
        w
    }
}

/// `(a + b) mod 2^256`.
pub fn add(a: Word, b: Word) -> Word {
    a.wrapping_add(b)
}

/// `(a - b) mod 2^256`.
pub fn sub(a: Word, b: Word) -> Word {
    a.wrapping_sub(b)
}

/// `(a * b) mod 2^256`.
pub fn mul(a: Word, b: Word) -> Word {
    a.wrapping_mul(b)
}

/// Unsigned division; `b == 0` yields zero rather than panicking.
pub fn div(a: Word, b: Word) -> Word {
    if b.is_zero() {
        Word::ZERO
    } else {
        a / b
    }
}

/// Unsigned modulo; `b == 0` yields zero.
pub fn rem(a: Word, b: Word) -> Word {
    if b.is_zero() {
        Word::ZERO
    } else {
        a % b
    }
}

/// Signed division, truncating toward zero. `b == 0` yields zero.
///
/// The `MIN_INT / -1` overflow case is not special-cased: the magnitude of
/// `MIN_INT` (`2^255`) is itself the two's-complement negation of `MIN_INT`,
/// so dividing magnitudes and restoring the sign naturally reproduces
/// `MIN_INT` without a dedicated branch.
pub fn sdiv(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return Word::ZERO;
    }
    let negative = is_negative(a) != is_negative(b);
    let q = magnitude(a) / magnitude(b);
    if negative {
        negate(q)
    } else {
        q
    }
}

/// Signed remainder; sign follows the dividend. `b == 0` yields zero.
pub fn smod(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return Word::ZERO;
    }
    let r = magnitude(a) % magnitude(b);
    if is_negative(a) {
        negate(r)
    } else {
        r
    }
}

/// `(a + b) mod m`, computed without losing the carry out of the 256-bit add.
pub fn addmod(a: Word, b: Word, m: Word) -> Word {
    if m.is_zero() {
        return Word::ZERO;
    }
    reduce_mod(add_wide(a, b), m)
}

/// `(a * b) mod m`, computed over the full 512-bit product.
pub fn mulmod(a: Word, b: Word, m: Word) -> Word {
    if m.is_zero() {
        return Word::ZERO;
    }
    reduce_mod(mul_wide(a, b), m)
}

/// `base ^ exponent mod 2^256`, by square-and-multiply.
pub fn exp(base: Word, exponent: Word) -> Word {
    let mut result = Word::from(1u64);
    let mut b = base;
    let mut e = exponent;
    while e != Word::ZERO {
        if e & Word::from(1u64) == Word::from(1u64) {
            result = result.wrapping_mul(b);
        }
        b = b.wrapping_mul(b);
        e >>= 1;
    }
    result
}

/// `SIGNEXTEND(bits, value)`: sign-extend the `(bits*8+7)`-th bit of `value`.
/// `bits >= 32` returns `value` unchanged.
pub fn sign_extend(bits: Word, value: Word) -> Word {
    if bits >= Word::from(32u64) {
        return value;
    }
    let bits = bits.as_limbs()[0] as usize;
    let sign_bit_index = bits * 8 + 7;
    if sign_bit_index == 255 {
        // The sign bit is the word's own MSB: the value already occupies
        // the full width, nothing to extend.
        return value;
    }
    let shift = sign_bit_index + 1;
    let sign_set = (value >> sign_bit_index) & Word::from(1u64) != Word::ZERO;
    if sign_set {
        value | (Word::MAX << shift)
    } else {
        value & ((Word::from(1u64) << shift) - Word::from(1u64))
    }
}

/// `BYTE(pos, val)`: the `pos`-th most-significant byte of `val`, or zero
/// when `pos >= 32`.
pub fn byte(pos: Word, val: Word) -> Word {
    if pos >= Word::from(32u64) {
        return Word::ZERO;
    }
    let p = pos.as_limbs()[0] as usize;
    let shift = 256 - 8 * (p + 1);
    (val >> shift) & Word::from(0xffu64)
}

/// Signed less-than.
pub fn slt(a: Word, b: Word) -> bool {
    let (an, bn) = (is_negative(a), is_negative(b));
    if an != bn {
        an
    } else {
        a < b
    }
}

/// Signed greater-than.
pub fn sgt(a: Word, b: Word) -> bool {
    slt(b, a)
}

/// A 256-bit value split into eight little-endian `u64` limbs, wide enough
/// to hold a full 256x256 product (or a 256-bit add with carry) without
/// overflowing during reduction.
type Wide = [u64; 8];

fn add_wide(a: Word, b: Word) -> Wide {
    let (al, bl) = (a.as_limbs(), b.as_limbs());
    let mut out = [0u64; 8];
    let mut carry: u128 = 0;
    for i in 0..4 {
        let sum = al[i] as u128 + bl[i] as u128 + carry;
        out[i] = sum as u64;
        carry = sum >> 64;
    }
    out[4] = carry as u64;
    out
}

fn mul_wide(a: Word, b: Word) -> Wide {
    let (al, bl) = (a.as_limbs(), b.as_limbs());
    let mut out = [0u64; 8];
    for i in 0..4 {
        let mut carry: u128 = 0;
        for j in 0..4 {
            let idx = i + j;
            let prod = al[i] as u128 * bl[j] as u128 + out[idx] as u128 + carry;
            out[idx] = prod as u64;
            carry = prod >> 64;
        }
        let mut k = i + 4;
        while carry > 0 {
            let sum = out[k] as u128 + carry;
            out[k] = sum as u64;
            carry = sum >> 64;
            k += 1;
        }
    }
    out
}

fn wide_bit(n: &Wide, i: usize) -> u64 {
    (n[i / 64] >> (i % 64)) & 1
}

fn wide_ge(a: &Wide, b: &Wide) -> bool {
    for i in (0..8).rev() {
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    true
}

fn wide_shl1_or(a: &mut Wide, bit_in: u64) {
    let mut carry = bit_in & 1;
    for limb in a.iter_mut() {
        let next_carry = *limb >> 63;
        *limb = (*limb << 1) | carry;
        carry = next_carry;
    }
}

fn wide_sub_assign(a: &mut Wide, b: &Wide) {
    let mut borrow: i128 = 0;
    for i in 0..8 {
        let diff = a[i] as i128 - b[i] as i128 - borrow;
        if diff < 0 {
            a[i] = (diff + (1i128 << 64)) as u64;
            borrow = 1;
        } else {
            a[i] = diff as u64;
            borrow = 0;
        }
    }
}

/// Binary long division of a 512-bit numerator by a 256-bit modulus,
/// returning the remainder. `m` must be non-zero.
fn reduce_mod(numerator: Wide, m: Word) -> Word {
    let mut divisor = [0u64; 8];
    divisor[0..4].copy_from_slice(m.as_limbs());
    let mut remainder: Wide = [0u64; 8];
    for i in (0..512).rev() {
        wide_shl1_or(&mut remainder, wide_bit(&numerator, i));
        if wide_ge(&remainder, &divisor) {
            wide_sub_assign(&mut remainder, &divisor);
        }
    }
    Word::from_limbs([remainder[0], remainder[1], remainder[2], remainder[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wraps_mod_2_256() {
        assert_eq!(add(Word::MAX, Word::from(1u64)), Word::ZERO);
    }

    #[test]
    fn sub_two_minus_five_wraps() {
        // scenario 2 from the spec: 2 - 5 == 2^256 - 3
        let expected = Word::MAX - Word::from(2u64);
        assert_eq!(sub(Word::from(2u64), Word::from(5u64)), expected);
    }

    #[test]
    fn div_and_mod_by_zero_are_zero() {
        assert_eq!(div(Word::from(9u64), Word::ZERO), Word::ZERO);
        assert_eq!(rem(Word::from(9u64), Word::ZERO), Word::ZERO);
        assert_eq!(sdiv(Word::from(9u64), Word::ZERO), Word::ZERO);
        assert_eq!(smod(Word::from(9u64), Word::ZERO), Word::ZERO);
    }

    #[test]
    fn sdiv_min_int_by_minus_one_is_min_int() {
        let min_int = Word::from(1u64) << 255;
        let minus_one = Word::MAX;
        assert_eq!(sdiv(min_int, minus_one), min_int);
    }

    #[test]
    fn sdiv_truncates_toward_zero() {
        // -7 / 2 == -3 (truncation, not floor)
        let minus_seven = negate(Word::from(7u64));
        let expected = negate(Word::from(3u64));
        assert_eq!(sdiv(minus_seven, Word::from(2u64)), expected);
    }

    #[test]
    fn smod_sign_follows_dividend() {
        // -7 % 2 == -1
        let minus_seven = negate(Word::from(7u64));
        let expected = negate(Word::from(1u64));
        assert_eq!(smod(minus_seven, Word::from(2u64)), expected);
    }

    #[test]
    fn addmod_reduces_without_overflow() {
        // (MAX + MAX) mod 10: MAX mod 10 == 5 twice -> 10 -> 0
        assert_eq!(addmod(Word::MAX, Word::MAX, Word::from(10u64)), Word::ZERO);
        assert_eq!(addmod(Word::from(0u64), Word::from(0u64), Word::from(0u64)), Word::ZERO);
    }

    #[test]
    fn mulmod_reduces_full_product() {
        assert_eq!(
            mulmod(Word::MAX, Word::MAX, Word::from(12u64)),
            (Word::MAX % Word::from(12u64)) * (Word::MAX % Word::from(12u64)) % Word::from(12u64)
        );
    }

    #[test]
    fn exp_wraps_mod_2_256() {
        assert_eq!(exp(Word::from(2u64), Word::from(256u64)), Word::ZERO);
        assert_eq!(exp(Word::from(2u64), Word::from(0u64)), Word::from(1u64));
    }

    #[test]
    fn sign_extend_low_bits() {
        // SIGNEXTEND(0, 0xff) == all ones (byte 0xff sign-extended is -1)
        assert_eq!(sign_extend(Word::from(0u64), Word::from(0xffu64)), Word::MAX);
        // SIGNEXTEND(0, 0x7f) == 0x7f (positive byte stays put)
        assert_eq!(sign_extend(Word::from(0u64), Word::from(0x7fu64)), Word::from(0x7fu64));
    }

    #[test]
    fn sign_extend_bits_at_or_above_32_is_identity() {
        let v = Word::from(0xdead_beefu64);
        assert_eq!(sign_extend(Word::from(32u64), v), v);
        assert_eq!(sign_extend(Word::from(1000u64), v), v);
    }

    #[test]
    fn byte_extracts_most_significant_first() {
        let v = Word::from(0x0102u64);
        assert_eq!(byte(Word::from(31u64), v), Word::from(0x02u64));
        assert_eq!(byte(Word::from(30u64), v), Word::from(0x01u64));
        assert_eq!(byte(Word::from(32u64), v), Word::ZERO);
    }

    #[test]
    fn not_not_is_identity_and_xor_self_is_zero() {
        let v = Word::from(0x1234u64);
        assert_eq!(!(!v), v);
        assert_eq!(v ^ v, Word::ZERO);
        assert_eq!(v & Word::MAX, v);
    }

    #[test]
    fn slt_sgt_handle_sign() {
        let minus_one = Word::MAX;
        let one = Word::from(1u64);
        assert!(slt(minus_one, one));
        assert!(!slt(one, minus_one));
        assert!(sgt(one, minus_one));
    }
}
