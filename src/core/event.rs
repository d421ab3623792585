use super::types::{ProcessId, SimTime};
use std::cmp::Ordering;

/// A pending wake-up: resume `process` once the clock reaches `wake_time`.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub wake_time: SimTime,
    pub sequence_num: u64,
    pub process: ProcessId,
}

impl Event {
    pub fn new(wake_time: SimTime, sequence_num: u64, process: ProcessId) -> Self {
        Self {
            wake_time,
            sequence_num,
            process,
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.wake_time == other.wake_time && self.sequence_num == other.sequence_num
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .wake_time
            .cmp(&self.wake_time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}
