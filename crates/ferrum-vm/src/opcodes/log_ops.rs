//! `0xa0`-`0xa4`: LOG0-LOG4. A no-op under a static (`is_static`) frame, per
//! spec.md §4.4's "state-mutating opcodes under a static call fail".

use crate::error::ExecutionException;
use crate::frame::Frame;
use crate::memory::word_to_usize;
use ferrum_primitives::LogEntry;

/// `LOGk(offset, size, topic1..topicK)`: append a log entry recording the
/// frame's own address, `k` indexed topics, and the memory region as data.
pub fn log(frame: &mut Frame, topic_count: usize) -> Result<(), ExecutionException> {
    debug_assert!(topic_count <= 4);
    if frame.is_static {
        return Err(ExecutionException::InvalidInstruction);
    }
    let [offset, size] = frame.stack.pop_list(2)?[..] else {
        unreachable!("pop_list(2) always returns exactly 2 elements")
    };
    let topics = frame.stack.pop_list(topic_count)?;
    let offset = word_to_usize(offset)?;
    let size = word_to_usize(size)?;
    let data = frame.memory.fetch(offset, size)?;
    frame.logs.push(LogEntry {
        address: frame.address,
        topics,
        data: data.into(),
    });
    Ok(())
}
