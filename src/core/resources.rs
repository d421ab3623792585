//! Capacity-bounded shared counters.
//!
//! Acquisition is synchronous: `try_acquire` either grants the full amount
//! immediately or leaves the resource untouched. Nothing ever waits.

use super::errors::{SimError, SimResult};
use super::types::ProcessId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    Bounded(u64),
    Unbounded,
}

impl Capacity {
    pub fn admits(&self, level: u64, amount: u64) -> bool {
        match self {
            Capacity::Bounded(limit) => level
                .checked_add(amount)
                .is_some_and(|total| total <= *limit),
            Capacity::Unbounded => true,
        }
    }

    /// The limit, or `None` when unbounded
    pub fn limit(&self) -> Option<u64> {
        match self {
            Capacity::Bounded(limit) => Some(*limit),
            Capacity::Unbounded => None,
        }
    }
}

/// Result of a non-blocking acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    Granted,
    Denied,
}

impl Acquire {
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquire::Granted)
    }
}

/// Read access shared by both primitives
pub trait Resource {
    fn name(&self) -> &str;
    fn capacity(&self) -> Capacity;
    fn level(&self) -> u64;

    fn available(&self) -> Option<u64> {
        self.capacity().limit().map(|limit| limit - self.level())
    }
}

/// Tracks an aggregate occupied amount, e.g. the people on site.
#[derive(Debug, Clone)]
pub struct LevelResource {
    name: String,
    capacity: Capacity,
    level: u64,
}

impl LevelResource {
    pub fn new(name: impl Into<String>, capacity: Capacity) -> Self {
        Self {
            name: name.into(),
            capacity,
            level: 0,
        }
    }

    pub fn try_acquire(&mut self, amount: u64) -> Acquire {
        if self.capacity.admits(self.level, amount) {
            self.level += amount;
            Acquire::Granted
        } else {
            Acquire::Denied
        }
    }

    pub fn release(&mut self, amount: u64) -> SimResult<()> {
        if amount > self.level {
            return Err(SimError::OverRelease {
                resource: self.name.clone(),
                requested: amount,
                level: self.level,
            });
        }
        self.level -= amount;
        Ok(())
    }
}

impl Resource for LevelResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }

    fn level(&self) -> u64 {
        self.level
    }
}

/// Tracks occupied discrete units per holder, e.g. meadow places.
///
/// A holder must release exactly what it acquired.
#[derive(Debug, Clone)]
pub struct SlotResource {
    name: String,
    capacity: Capacity,
    occupied: u64,
    holders: BTreeMap<ProcessId, u64>,
}

impl SlotResource {
    pub fn new(name: impl Into<String>, capacity: Capacity) -> Self {
        Self {
            name: name.into(),
            capacity,
            occupied: 0,
            holders: BTreeMap::new(),
        }
    }

    pub fn try_acquire(&mut self, holder: ProcessId, units: u64) -> Acquire {
        if !self.capacity.admits(self.occupied, units) {
            return Acquire::Denied;
        }
        self.occupied += units;
        *self.holders.entry(holder).or_insert(0) += units;
        Acquire::Granted
    }

    pub fn release(&mut self, holder: ProcessId, units: u64) -> SimResult<()> {
        let held = self.held_by(holder);
        if held != units {
            return Err(SimError::ReleaseMismatch {
                resource: self.name.clone(),
                holder,
                requested: units,
                held,
            });
        }
        if units > self.occupied {
            return Err(SimError::OverRelease {
                resource: self.name.clone(),
                requested: units,
                level: self.occupied,
            });
        }
        self.occupied -= units;
        self.holders.remove(&holder);
        Ok(())
    }

    /// Units currently held by `holder`
    pub fn held_by(&self, holder: ProcessId) -> u64 {
        self.holders.get(&holder).copied().unwrap_or(0)
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }
}

impl Resource for SlotResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }

    fn level(&self) -> u64 {
        self.occupied
    }
}
