//! `0x01`-`0x0b`: ADD, MUL, SUB, DIV, SDIV, MOD, SMOD, ADDMOD, MULMOD, EXP, SIGNEXTEND.

use crate::error::ExecutionException;
use crate::frame::Frame;
use ferrum_primitives::word;

macro_rules! binop {
    ($name:ident, $f:path) => {
        pub fn $name(frame: &mut Frame) -> Result<(), ExecutionException> {
            let [a, b] = frame.stack.pop_list(2)?[..] else {
                unreachable!("pop_list(2) always returns exactly 2 elements")
            };
            frame.stack.push($f(a, b))?;
            Ok(())
        }
    };
}

binop!(add, word::add);
binop!(mul, word::mul);
binop!(sub, word::sub);
binop!(div, word::div);
binop!(sdiv, word::sdiv);
binop!(modulo, word::rem);
binop!(smod, word::smod);
binop!(exp, word::exp);

pub fn addmod(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b, m] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    frame.stack.push(word::addmod(a, b, m))?;
    Ok(())
}

pub fn mulmod(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [a, b, m] = frame.stack.pop_list(3)?[..] else {
        unreachable!("pop_list(3) always returns exactly 3 elements")
    };
    frame.stack.push(word::mulmod(a, b, m))?;
    Ok(())
}

pub fn signextend(frame: &mut Frame) -> Result<(), ExecutionException> {
    let [bits, value] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    frame.stack.push(word::sign_extend(bits, value))?;
    Ok(())
}
