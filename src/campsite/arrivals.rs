use super::admission::GroupAdmission;
use super::config::AdmissionConfig;
use super::distributions::ArrivalSampler;
use super::model::CampsiteWorld;
use crate::core::errors::SimResult;
use crate::core::process::{Context, Process, Suspend};
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Start of a day: open the day's statistics and spawn its groups
    Arrive,
    /// Same instant, after every group spawned this day has been admitted
    /// or rejected: take the daily snapshot
    Settle,
}

/// Generates every day's arriving groups.
///
/// Groups are spawned before the generator's own zero-length settle
/// timeout, so FIFO ordering guarantees all same-day admissions are
/// resolved when the snapshot is taken.
pub struct ArrivalGenerator {
    sampler: Arc<ArrivalSampler>,
    policy: AdmissionConfig,
    day: u32,
    phase: Phase,
}

impl ArrivalGenerator {
    pub fn new(sampler: Arc<ArrivalSampler>, policy: AdmissionConfig) -> Self {
        Self {
            sampler,
            policy,
            day: 0,
            phase: Phase::Arrive,
        }
    }

    /// Day the generator is currently working on
    pub fn day(&self) -> u32 {
        self.day
    }
}

impl Process<CampsiteWorld> for ArrivalGenerator {
    fn label(&self) -> &str {
        "arrivals"
    }

    fn resume(&mut self, ctx: &mut Context<'_, CampsiteWorld>) -> SimResult<Suspend> {
        match self.phase {
            Phase::Arrive => {
                ctx.world.stats.advance_day();
                let count = self.sampler.group_count(self.day, &mut ctx.world.rng);
                ctx.world.stats.record_arrivals(u64::from(count));
                debug!("[{}] day {}: {} groups arrive", ctx.now(), self.day, count);

                for index in 0..count {
                    let group = self.sampler.sample_group(self.day, &mut ctx.world.rng);
                    ctx.spawn(Box::new(GroupAdmission::new(group, index, self.policy)));
                }

                self.phase = Phase::Settle;
                Ok(Suspend::Timeout(0.0))
            }
            Phase::Settle => {
                ctx.world.record_daily_snapshot();
                self.day += 1;
                self.phase = Phase::Arrive;
                Ok(Suspend::Timeout(1.0))
            }
        }
    }
}
