//! The opcode table (§4.4) and single dispatch point the interpreter loop
//! drives. Each opcode's stack arity is fixed here so the loop can check
//! underflow/overflow once, before handing off to the handler, instead of
//! every handler re-deriving it from its own `pop`/`push` calls.

pub mod arithmetic;
pub mod bitwise;
pub mod block_info;
pub mod compare;
pub mod dup_swap;
pub mod environment;
pub mod log_ops;
pub mod memory_ops;
pub mod push;
pub mod system;

use crate::error::ExecutionException;
use crate::frame::Frame;
use crate::host::Host;

pub const STOP: u8 = 0x00;
pub const ADD: u8 = 0x01;
pub const MUL: u8 = 0x02;
pub const SUB: u8 = 0x03;
pub const DIV: u8 = 0x04;
pub const SDIV: u8 = 0x05;
pub const MOD: u8 = 0x06;
pub const SMOD: u8 = 0x07;
pub const ADDMOD: u8 = 0x08;
pub const MULMOD: u8 = 0x09;
pub const EXP: u8 = 0x0a;
pub const SIGNEXTEND: u8 = 0x0b;

pub const LT: u8 = 0x10;
pub const GT: u8 = 0x11;
pub const SLT: u8 = 0x12;
pub const SGT: u8 = 0x13;
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
pub const AND: u8 = 0x16;
pub const OR: u8 = 0x17;
pub const XOR: u8 = 0x18;
pub const NOT: u8 = 0x19;
pub const BYTE: u8 = 0x1a;

pub const SHA3: u8 = 0x20;

pub const ADDRESS: u8 = 0x30;
pub const BALANCE: u8 = 0x31;
pub const ORIGIN: u8 = 0x32;
pub const CALLER: u8 = 0x33;
pub const CALLVALUE: u8 = 0x34;
pub const CALLDATALOAD: u8 = 0x35;
pub const CALLDATASIZE: u8 = 0x36;
pub const CALLDATACOPY: u8 = 0x37;
pub const CODESIZE: u8 = 0x38;
pub const CODECOPY: u8 = 0x39;
pub const GASPRICE: u8 = 0x3a;
pub const EXTCODESIZE: u8 = 0x3b;
pub const EXTCODECOPY: u8 = 0x3c;

pub const BLOCKHASH: u8 = 0x40;
pub const COINBASE: u8 = 0x41;
pub const TIMESTAMP: u8 = 0x42;
pub const NUMBER: u8 = 0x43;
pub const DIFFICULTY: u8 = 0x44;
pub const GASLIMIT: u8 = 0x45;
pub const CHAINID: u8 = 0x46;

pub const POP: u8 = 0x50;
pub const MLOAD: u8 = 0x51;
pub const MSTORE: u8 = 0x52;
pub const MSTORE8: u8 = 0x53;
pub const SLOAD: u8 = 0x54;
pub const SSTORE: u8 = 0x55;
pub const JUMP: u8 = 0x56;
pub const JUMPI: u8 = 0x57;
pub const PC: u8 = 0x58;
pub const MSIZE: u8 = 0x59;
pub const GAS: u8 = 0x5a;
pub const JUMPDEST: u8 = 0x5b;

pub const PUSH1: u8 = 0x60;
pub const PUSH32: u8 = 0x7f;
pub const DUP1: u8 = 0x80;
pub const DUP16: u8 = 0x8f;
pub const SWAP1: u8 = 0x90;
pub const SWAP16: u8 = 0x9f;

pub const LOG0: u8 = 0xa0;
pub const LOG4: u8 = 0xa4;

pub const CREATE: u8 = 0xf0;
pub const CALL: u8 = 0xf1;
pub const CALLCODE: u8 = 0xf2;
pub const RETURN: u8 = 0xf3;
pub const DELEGATECALL: u8 = 0xf4;
pub const REVERT: u8 = 0xfd;
pub const INVALID: u8 = 0xfe;
pub const SELFDESTRUCT: u8 = 0xff;

/// Static stack arity plus the base (pre-memory-expansion) gas cost of an
/// opcode, looked up once per step so the interpreter can enforce
/// over/underflow and charge gas before a handler ever runs.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub name: &'static str,
    pub inputs: usize,
    pub outputs: usize,
    pub base_gas: u64,
}

const fn op(name: &'static str, inputs: usize, outputs: usize, base_gas: u64) -> Option<OpInfo> {
    Some(OpInfo {
        name,
        inputs,
        outputs,
        base_gas,
    })
}

/// Looks up static arity/cost metadata for `opcode`. `None` means the byte
/// is not assigned to any instruction; the interpreter treats that exactly
/// like `INVALID`.
pub fn op_info(opcode: u8) -> Option<OpInfo> {
    use crate::gas::*;

    if (PUSH1..=PUSH32).contains(&opcode) {
        return op("PUSH", 0, 1, G_VERYLOW);
    }
    if (DUP1..=DUP16).contains(&opcode) {
        let k = (opcode - DUP1 + 1) as usize;
        return op("DUP", k, k + 1, G_VERYLOW);
    }
    if (SWAP1..=SWAP16).contains(&opcode) {
        let k = (opcode - SWAP1 + 1) as usize;
        return op("SWAP", k + 1, k + 1, G_VERYLOW);
    }
    if (LOG0..=LOG4).contains(&opcode) {
        let k = (opcode - LOG0) as usize;
        return op("LOG", 2 + k, 0, G_LOG + G_LOG_TOPIC * k as u64);
    }

    match opcode {
        STOP => op("STOP", 0, 0, 0),
        ADD => op("ADD", 2, 1, G_VERYLOW),
        MUL => op("MUL", 2, 1, G_LOW),
        SUB => op("SUB", 2, 1, G_VERYLOW),
        DIV => op("DIV", 2, 1, G_LOW),
        SDIV => op("SDIV", 2, 1, G_LOW),
        MOD => op("MOD", 2, 1, G_LOW),
        SMOD => op("SMOD", 2, 1, G_LOW),
        ADDMOD => op("ADDMOD", 3, 1, G_MID),
        MULMOD => op("MULMOD", 3, 1, G_MID),
        EXP => op("EXP", 2, 1, G_EXP),
        SIGNEXTEND => op("SIGNEXTEND", 2, 1, G_LOW),

        LT => op("LT", 2, 1, G_VERYLOW),
        GT => op("GT", 2, 1, G_VERYLOW),
        SLT => op("SLT", 2, 1, G_VERYLOW),
        SGT => op("SGT", 2, 1, G_VERYLOW),
        EQ => op("EQ", 2, 1, G_VERYLOW),
        ISZERO => op("ISZERO", 1, 1, G_VERYLOW),
        AND => op("AND", 2, 1, G_VERYLOW),
        OR => op("OR", 2, 1, G_VERYLOW),
        XOR => op("XOR", 2, 1, G_VERYLOW),
        NOT => op("NOT", 1, 1, G_VERYLOW),
        BYTE => op("BYTE", 2, 1, G_VERYLOW),

        SHA3 => op("SHA3", 2, 1, G_SHA3),

        ADDRESS => op("ADDRESS", 0, 1, G_BASE),
        BALANCE => op("BALANCE", 1, 1, G_HIGH),
        ORIGIN => op("ORIGIN", 0, 1, G_BASE),
        CALLER => op("CALLER", 0, 1, G_BASE),
        CALLVALUE => op("CALLVALUE", 0, 1, G_BASE),
        CALLDATALOAD => op("CALLDATALOAD", 1, 1, G_VERYLOW),
        CALLDATASIZE => op("CALLDATASIZE", 0, 1, G_BASE),
        CALLDATACOPY => op("CALLDATACOPY", 3, 0, G_VERYLOW),
        CODESIZE => op("CODESIZE", 0, 1, G_BASE),
        CODECOPY => op("CODECOPY", 3, 0, G_VERYLOW),
        GASPRICE => op("GASPRICE", 0, 1, G_BASE),
        EXTCODESIZE => op("EXTCODESIZE", 1, 1, G_HIGH),
        EXTCODECOPY => op("EXTCODECOPY", 4, 0, G_HIGH),

        BLOCKHASH => op("BLOCKHASH", 1, 1, G_HIGH),
        COINBASE => op("COINBASE", 0, 1, G_BASE),
        TIMESTAMP => op("TIMESTAMP", 0, 1, G_BASE),
        NUMBER => op("NUMBER", 0, 1, G_BASE),
        DIFFICULTY => op("DIFFICULTY", 0, 1, G_BASE),
        GASLIMIT => op("GASLIMIT", 0, 1, G_BASE),
        CHAINID => op("CHAINID", 0, 1, G_BASE),

        POP => op("POP", 1, 0, G_BASE),
        MLOAD => op("MLOAD", 1, 1, G_VERYLOW),
        MSTORE => op("MSTORE", 2, 0, G_VERYLOW),
        MSTORE8 => op("MSTORE8", 2, 0, G_VERYLOW),
        SLOAD => op("SLOAD", 1, 1, G_SLOAD),
        SSTORE => op("SSTORE", 2, 0, 0), // §4.4: charged dynamically by the handler.
        JUMP => op("JUMP", 1, 0, G_MID),
        JUMPI => op("JUMPI", 2, 0, G_HIGH),
        PC => op("PC", 0, 1, G_BASE),
        MSIZE => op("MSIZE", 0, 1, G_BASE),
        GAS => op("GAS", 0, 1, G_BASE),
        JUMPDEST => op("JUMPDEST", 0, 0, G_JUMPDEST),

        CREATE => op("CREATE", 3, 1, G_CREATE),
        CALL => op("CALL", 7, 1, G_CALL),
        CALLCODE => op("CALLCODE", 7, 1, G_CALL),
        RETURN => op("RETURN", 2, 0, 0),
        DELEGATECALL => op("DELEGATECALL", 6, 1, G_CALL),
        REVERT => op("REVERT", 2, 0, 0),
        INVALID => None,
        SELFDESTRUCT => op("SELFDESTRUCT", 1, 0, G_SELFDESTRUCT),

        _ => None,
    }
}

/// Opcodes whose effect is visible only through `frame.pending_call`,
/// deferred to the interpreter loop rather than executed here.
pub fn is_call_family(opcode: u8) -> bool {
    matches!(opcode, CREATE | CALL | CALLCODE | DELEGATECALL)
}

/// Runs every opcode handler that doesn't need to spawn a child frame.
/// `CREATE`/`CALL`/`CALLCODE`/`DELEGATECALL` are handled by the interpreter
/// loop directly so it can push/pop the frame stack around them.
pub fn dispatch(opcode: u8, frame: &mut Frame, host: &mut Host) -> Result<(), ExecutionException> {
    use arithmetic::*;
    use bitwise::*;
    use block_info::*;
    use compare::*;
    use environment::*;
    use log_ops::log;
    use memory_ops::*;
    use system::{invalid, ret, revert, selfdestruct, sha3};

    if (PUSH1..=PUSH32).contains(&opcode) {
        let n = (opcode - PUSH1 + 1) as usize;
        let consumed = push::push(frame, n)?;
        frame.pc += consumed + 1;
        return Ok(());
    }
    if (DUP1..=DUP16).contains(&opcode) {
        return dup_swap::dup(frame, (opcode - DUP1 + 1) as usize);
    }
    if (SWAP1..=SWAP16).contains(&opcode) {
        return dup_swap::swap(frame, (opcode - SWAP1 + 1) as usize);
    }
    if (LOG0..=LOG4).contains(&opcode) {
        return log(frame, (opcode - LOG0) as usize);
    }

    match opcode {
        STOP => {
            frame.succeed();
            Ok(())
        }
        ADD => add(frame),
        MUL => mul(frame),
        SUB => sub(frame),
        DIV => div(frame),
        SDIV => sdiv(frame),
        MOD => modulo(frame),
        SMOD => smod(frame),
        ADDMOD => addmod(frame),
        MULMOD => mulmod(frame),
        EXP => exp(frame),
        SIGNEXTEND => signextend(frame),

        LT => lt(frame),
        GT => gt(frame),
        SLT => slt(frame),
        SGT => sgt(frame),
        EQ => eq(frame),
        ISZERO => iszero(frame),
        AND => and(frame),
        OR => or(frame),
        XOR => xor(frame),
        NOT => not(frame),
        BYTE => byte(frame),

        SHA3 => sha3(frame, host),

        ADDRESS => address(frame),
        BALANCE => balance(frame, host),
        ORIGIN => origin(frame),
        CALLER => caller(frame),
        CALLVALUE => callvalue(frame),
        CALLDATALOAD => calldataload(frame),
        CALLDATASIZE => calldatasize(frame),
        CALLDATACOPY => calldatacopy(frame),
        CODESIZE => codesize(frame),
        CODECOPY => codecopy(frame),
        GASPRICE => gasprice(frame),
        EXTCODESIZE => extcodesize(frame, host),
        EXTCODECOPY => extcodecopy(frame, host),

        BLOCKHASH => blockhash(frame, host),
        COINBASE => coinbase(frame, host),
        TIMESTAMP => timestamp(frame, host),
        NUMBER => number(frame, host),
        DIFFICULTY => difficulty(frame, host),
        GASLIMIT => gaslimit(frame, host),
        CHAINID => chainid(frame, host),

        POP => pop(frame),
        MLOAD => mload(frame),
        MSTORE => mstore(frame),
        MSTORE8 => mstore8(frame),
        SLOAD => sload(frame, host),
        SSTORE => sstore(frame, host),
        JUMP => jump(frame),
        JUMPI => jumpi(frame),
        PC => pc(frame),
        MSIZE => msize(frame),
        GAS => gas(frame),
        JUMPDEST => jumpdest(frame),

        RETURN => ret(frame),
        REVERT => revert(frame),
        INVALID => invalid(frame),
        SELFDESTRUCT => selfdestruct(frame, host),

        CREATE | CALL | CALLCODE | DELEGATECALL => {
            unreachable!("call-family opcodes are dispatched by the interpreter loop")
        }

        _ => Err(ExecutionException::InvalidInstruction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_has_arity_two_to_one() {
        let info = op_info(ADD).unwrap();
        assert_eq!((info.inputs, info.outputs), (2, 1));
    }

    #[test]
    fn dup3_needs_three_present_and_pushes_a_fourth() {
        let info = op_info(DUP1 + 2).unwrap();
        assert_eq!((info.inputs, info.outputs), (3, 4));
    }

    #[test]
    fn swap2_needs_three_and_leaves_three() {
        let info = op_info(SWAP1 + 1).unwrap();
        assert_eq!((info.inputs, info.outputs), (3, 3));
    }

    #[test]
    fn invalid_byte_has_no_op_info() {
        assert!(op_info(INVALID).is_none());
        assert!(op_info(0x0c).is_none());
    }
}
