use super::errors::SimResult;
use super::event_scheduler::EventScheduler;
use super::process::{Context, Process, Suspend};
use super::types::{ProcessId, SimTime};
use log::{debug, warn};
use std::collections::HashMap;

/// Observer trait for simulation events
pub trait SimulationObserver<W> {
    /// Called when the simulated clock moves forward
    fn on_time_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

    /// Called after every resumed process has given control back
    fn on_step_complete(&mut self, now: SimTime, world: &W);
}

/// Single-threaded cooperative scheduler over a world of type `W`.
///
/// Exactly one process runs at a time. Every live process owns exactly
/// one pending wake-up; a process that terminates is dropped.
pub struct SimulationEngine<W> {
    scheduler: EventScheduler,
    processes: HashMap<ProcessId, Box<dyn Process<W>>>,
    world: W,
    next_pid: u64,
    observers: Vec<Box<dyn SimulationObserver<W>>>,
    events_processed: u64,
    processes_spawned: u64,
}

impl<W> SimulationEngine<W> {
    /// Create a new engine around `world` with the clock at zero
    pub fn new(world: W) -> Self {
        Self {
            scheduler: EventScheduler::new(),
            processes: HashMap::new(),
            world,
            next_pid: 0,
            observers: Vec::new(),
            events_processed: 0,
            processes_spawned: 0,
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<W>>) {
        self.observers.push(observer);
    }

    fn notify_time_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    fn notify_step_complete(&mut self, now: SimTime) {
        for observer in &mut self.observers {
            observer.on_step_complete(now, &self.world);
        }
    }

    /// Start `process` at the current instant, after everything already
    /// pending at this instant
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> SimResult<ProcessId> {
        let pid = ProcessId(self.next_pid);
        self.next_pid += 1;
        self.scheduler.schedule_after(pid, 0.0)?;
        debug!("[{}] spawned {} ({})", self.now(), pid, process.label());
        self.processes.insert(pid, process);
        self.processes_spawned += 1;
        Ok(pid)
    }

    /// Resume the process owning the earliest wake-up. Returns true if
    /// wake-ups remain afterwards.
    pub fn step(&mut self) -> SimResult<bool> {
        let old_time = self.scheduler.now();
        let Some(event) = self.scheduler.advance() else {
            return Ok(false);
        };
        let now = event.wake_time;
        if old_time != now {
            self.notify_time_advance(old_time, now);
        }

        let pid = event.process;
        let Some(mut process) = self.processes.remove(&pid) else {
            warn!("[{}] wake-up for unknown process {}", now, pid);
            return Ok(self.has_pending_events());
        };

        let mut spawned = Vec::new();
        let suspend = {
            let mut ctx = Context::new(now, pid, &mut self.world, &mut spawned);
            process.resume(&mut ctx)?
        };

        for child in spawned {
            self.spawn(child)?;
        }

        match suspend {
            Suspend::Timeout(delay) => {
                self.scheduler.schedule_after(pid, delay)?;
                self.processes.insert(pid, process);
            }
            Suspend::Terminate => {
                debug!("[{}] {} ({}) terminated", now, pid, process.label());
            }
        }

        self.events_processed += 1;
        self.notify_step_complete(now);

        Ok(self.has_pending_events())
    }

    /// Process every wake-up strictly before `horizon`, returns the final
    /// simulated time
    pub fn run_until(&mut self, horizon: SimTime) -> SimResult<SimTime> {
        while let Some(next) = self.scheduler.peek_next_time() {
            if next >= horizon {
                break;
            }
            self.step()?;
        }
        Ok(self.now())
    }

    /// Run until no wake-ups remain
    pub fn run(&mut self) -> SimResult<SimTime> {
        while self.step()? {}
        Ok(self.now())
    }

    /// Get current simulation time
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Discard the engine and hand back the world
    pub fn into_world(self) -> W {
        self.world
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    pub fn processes_spawned(&self) -> u64 {
        self.processes_spawned
    }

    pub fn live_processes(&self) -> usize {
        self.processes.len()
    }
}
