//! `0x16`-`0x1a`: AND, OR, XOR, NOT, BYTE.

use crate::error::ExecutionException;
use crate::frame::Frame;
use ferrum_primitives::word;

pub fn and(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    frame.stack.push(a & b)?;
    Ok(())
}

pub fn or(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    frame.stack.push(a | b)?;
    Ok(())
}

pub fn xor(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    frame.stack.push(a ^ b)?;
    Ok(())
}

pub fn not(frame: &mut Frame) -> Result<(), ExecutionException> {
    let a = frame.stack.pop()?;
    frame.stack.push(!a)?;
    Ok(())
}

pub fn byte(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [i, x] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    frame.stack.push(word::byte(i, x))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_primitives::Word;

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
    fn not_not_is_identity() {
        let mut frame = frame_with(&[Word::from(123u64)]);
        not(&mut frame).unwrap();
        not(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(123u64));
    }

    #[test]
    fn byte_extracts_most_significant_first() {
        let mut frame = frame_with(&[Word::from(0xAAu64), Word::from(31u64)]);
        byte(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0xAAu64));
    }

    #[test]
    fn and_or_xor_agree_with_bitwise_identities() {
        let a = Word::from(0b1100u64);
        let b = Word::from(0b1010u64);
        let mut frame = frame_with(&[b, a]);
        and(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0b1000u64));

        let mut frame = frame_with(&[b, a]);
        or(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0b1110u64));

        let mut frame = frame_with(&[b, a]);
        xor(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0b0110u64));
    }
}
