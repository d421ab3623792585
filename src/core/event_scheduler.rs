use super::errors::{SimError, SimResult};
use super::event::Event;
use super::types::{ProcessId, SimTime};
use std::collections::BinaryHeap;

/// Simulated clock plus the time-ordered set of pending wake-ups.
///
/// Wake-ups at the same instant pop in the order they were scheduled.
/// The clock only ever moves forward.
pub struct EventScheduler {
    event_queue: BinaryHeap<Event>,
    sequence_counter: u64,
    now: SimTime,
}

impl EventScheduler {
    /// Create a new EventScheduler with the clock at zero
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: SimTime::ZERO,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `process` to wake `delay` days from now
    pub fn schedule_after(&mut self, process: ProcessId, delay: f64) -> SimResult<()> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SimError::InvalidDelay { delay });
        }

        let event = Event::new(self.now + delay, self.sequence_counter, process);
        self.event_queue.push(event);
        self.sequence_counter += 1;
        Ok(())
    }

    /// Pop the earliest wake-up and move the clock to its timestamp
    pub fn advance(&mut self) -> Option<Event> {
        let event = self.event_queue.pop()?;
        debug_assert!(event.wake_time >= self.now, "clock moved backwards");
        self.now = event.wake_time;
        Some(event)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the next wake time without removing events
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.wake_time)
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
