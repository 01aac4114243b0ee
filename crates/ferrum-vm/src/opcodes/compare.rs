//! `0x10`-`0x15`: LT, GT, SLT, SGT, EQ, ISZERO.

use crate::error::ExecutionException;
use crate::frame::Frame;
use ferrum_primitives::{word, Word};

fn push_bool(frame: &mut Frame, cond: bool) -> Result<(), ExecutionException> {
    frame.stack.push(if cond { Word::from(1u64) } else { Word::ZERO })?;
    Ok(())
}

pub fn lt(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    push_bool(frame, a < b)
}

pub fn gt(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    push_bool(frame, a > b)
}

pub fn slt(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    push_bool(frame, word::slt(a, b))
}

pub fn sgt(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    push_bool(frame, word::sgt(a, b))
}

pub fn eq(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    push_bool(frame, a == b)
}

pub fn iszero(frame: &mut Frame) -> Result<(), ExecutionException> {
    let a = frame.stack.pop()?;
    push_bool(frame, a == Word::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(values: &[Word]) -> Frame {
        let mut frame = Frame::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Word::ZERO,
            Default::default(),
            Default::default(),
            Word::ZERO,
            false,
            0,
            1_000_000,
            0,
        );
        for v in values {
            frame.stack.push(*v).unwrap();
        }
        frame
    }

    #[test]
    fn lt_compares_unsigned() {
        let mut frame = frame_with(&[Word::from(2u64), Word::from(1u64)]);
        lt(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(1u64));
    }

    #[test]
    fn slt_treats_top_bit_as_sign() {
        // -1 < 1
        let mut frame = frame_with(&[Word::from(1u64), Word::MAX]);
        slt(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(1u64));
    }

    #[test]
    fn iszero_on_zero_is_one() {
        let mut frame = frame_with(&[Word::ZERO]);
        iszero(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(1u64));
    }
}
