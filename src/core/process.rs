use super::errors::SimResult;
use super::types::{ProcessId, SimTime};

/// How a process gives control back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume again after this many simulated days (may be zero)
    Timeout(f64),
    /// The process is finished; nothing further is scheduled
    Terminate,
}

/// A suspendable unit of simulated activity.
///
/// The engine calls `resume` once per wake-up. A process runs
/// uninterrupted until it returns, so everything it does to the world
/// inside one call is atomic with respect to other processes.
pub trait Process<W> {
    /// Human readable name, used in log lines
    fn label(&self) -> &str;

    fn resume(&mut self, ctx: &mut Context<'_, W>) -> SimResult<Suspend>;
}

/// View handed to a process while it is running.
pub struct Context<'a, W> {
    now: SimTime,
    pid: ProcessId,
    /// Shared simulation state, mutable only by the running process
    pub world: &'a mut W,
    spawned: &'a mut Vec<Box<dyn Process<W>>>,
}

impl<'a, W> Context<'a, W> {
    pub(crate) fn new(
        now: SimTime,
        pid: ProcessId,
        world: &'a mut W,
        spawned: &'a mut Vec<Box<dyn Process<W>>>,
    ) -> Self {
        Self {
            now,
            pid,
            world,
            spawned,
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Id of the process currently running
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Start a new process at the current instant.
    ///
    /// Spawned processes wake in spawn order, ahead of the spawning
    /// process's own next wake-up, even if that wake-up is a zero timeout.
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) {
        self.spawned.push(process);
    }
}
