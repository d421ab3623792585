//! Check-in, stay and check-out of a single group.
//!
//! ```text
//! Arrived -> PeopleCheckFailed
//!         -> PeopleAdmitted -> SiteCheckFailed
//!                           -> Occupying -> CheckedOut
//! ```
//!
//! Both capacity checks are immediate: a group that cannot be placed right
//! now leaves, it never waits.

use super::config::AdmissionConfig;
use super::model::{CampsiteWorld, Group, SiteCategory};
use super::statistics::UsageCategory;
use crate::core::errors::SimResult;
use crate::core::process::{Context, Process, Suspend};
use crate::core::types::ProcessId;
use log::{debug, warn};

/// Check-out happens before the next check-in on the same day
pub const TURNOVER_ADJUSTMENT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionState {
    Arrived,
    PeopleCheckFailed,
    PeopleAdmitted,
    SiteCheckFailed,
    Occupying { site: SiteCategory, units: u64 },
    CheckedOut,
}

impl AdmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdmissionState::PeopleCheckFailed | AdmissionState::SiteCheckFailed | AdmissionState::CheckedOut
        )
    }
}

pub struct GroupAdmission {
    label: String,
    group: Group,
    policy: AdmissionConfig,
    state: AdmissionState,
}

impl GroupAdmission {
    pub fn new(group: Group, index: u32, policy: AdmissionConfig) -> Self {
        Self {
            label: format!("{}-{}", group.arrival_day, index),
            group,
            policy,
            state: AdmissionState::Arrived,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn state(&self) -> AdmissionState {
        self.state
    }

    /// Run both capacity checks for `holder` and book the outcome.
    ///
    /// People capacity taken in the first check is handed back before
    /// returning if no site capacity is available.
    pub fn admit(&mut self, holder: ProcessId, world: &mut CampsiteWorld) -> SimResult<AdmissionState> {
        let group = self.group;
        let party = u64::from(group.party_size);

        if !world.campsite.people_mut().try_acquire(party).is_granted() {
            debug!("[{}] reject {} people, limit reached", self.label, party);
            world.stats.record_usage(UsageCategory::People, 0, 0, party);
            self.state = AdmissionState::PeopleCheckFailed;
            return Ok(self.state);
        }
        self.state = AdmissionState::PeopleAdmitted;

        let Some((site, units)) = self.place(holder, world) else {
            world.campsite.people_mut().release(party)?;
            debug!("[{}] reject {}, no place available", self.label, group.form);
            let wanted = group.form.site();
            world.stats.record_usage(wanted.into(), 0, 0, group.form.site_units());
            self.state = AdmissionState::SiteCheckFailed;
            return Ok(self.state);
        };

        debug!(
            "[{}] check in {} on {:?}, {} people, {} nights",
            self.label, group.form, site, party, group.nights
        );
        let nights = f64::from(group.nights);
        let prices = world.campsite.prices();
        let earnings_person = prices.person * party as f64 * nights;
        let earnings_base = prices.form.get(group.form) * nights;

        world.stats.record_usage(UsageCategory::People, 0, party, 0);
        world.stats.record_usage(site.into(), 0, units, 0);
        world.stats.record_financial(earnings_person, earnings_base, 0.0, 0.0);

        self.state = AdmissionState::Occupying { site, units };
        Ok(self.state)
    }

    /// Try the form's own site, then the overflow site if enabled
    fn place(&self, holder: ProcessId, world: &mut CampsiteWorld) -> Option<(SiteCategory, u64)> {
        let form = self.group.form;
        let site = form.site();
        let units = form.site_units();
        if world.campsite.site_mut(site).try_acquire(holder, units).is_granted() {
            return Some((site, units));
        }

        let overflow = self.policy.tent_overflow_to_lots && site == SiteCategory::Meadow;
        if overflow && world.campsite.site_mut(SiteCategory::Lots).try_acquire(holder, 1).is_granted() {
            debug!("[{}] meadow full, {} moved to a caravan lot", self.label, form);
            return Some((SiteCategory::Lots, 1));
        }
        None
    }

    /// Release the site first, then the people
    pub fn check_out(&mut self, holder: ProcessId, world: &mut CampsiteWorld) -> SimResult<()> {
        if let AdmissionState::Occupying { site, units } = self.state {
            world.campsite.site_mut(site).release(holder, units)?;
            world.campsite.people_mut().release(u64::from(self.group.party_size))?;
            debug!("[{}] check out", self.label);
            self.state = AdmissionState::CheckedOut;
        }
        Ok(())
    }

    /// Time on site: the booked nights minus the same-day turnover
    pub fn stay_length(&self) -> f64 {
        f64::from(self.group.nights) - TURNOVER_ADJUSTMENT
    }
}

impl Process<CampsiteWorld> for GroupAdmission {
    fn label(&self) -> &str {
        &self.label
    }

    fn resume(&mut self, ctx: &mut Context<'_, CampsiteWorld>) -> SimResult<Suspend> {
        let holder = ctx.pid();
        match self.state {
            AdmissionState::Arrived => match self.admit(holder, ctx.world)? {
                AdmissionState::Occupying { .. } => Ok(Suspend::Timeout(self.stay_length())),
                _ => Ok(Suspend::Terminate),
            },
            AdmissionState::Occupying { .. } => {
                self.check_out(holder, ctx.world)?;
                Ok(Suspend::Terminate)
            }
            state => {
                warn!("[{}] resumed in state {:?}", self.label, state);
                Ok(Suspend::Terminate)
            }
        }
    }
}
