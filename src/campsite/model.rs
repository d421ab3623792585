use super::config::{CampsiteConfig, CostsConfig, PricesConfig};
use super::statistics::{StatisticsCollector, UsageCategory, UsageLimits};
use crate::core::resources::{Capacity, LevelResource, Resource, SlotResource};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// How a group camps. Decides which site resource it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CamperForm {
    /// Just a tent, one place on the meadow
    Tent,
    /// Tent plus car, two places on the meadow
    TentWithCar,
    /// Caravan or motorhome, one caravan lot
    Caravan,
}

impl CamperForm {
    pub const ALL: [CamperForm; 3] = [CamperForm::Tent, CamperForm::TentWithCar, CamperForm::Caravan];

    /// Site resource this form is booked on
    pub fn site(&self) -> SiteCategory {
        match self {
            CamperForm::Tent | CamperForm::TentWithCar => SiteCategory::Meadow,
            CamperForm::Caravan => SiteCategory::Lots,
        }
    }

    /// Units of `site()` the form occupies
    pub fn site_units(&self) -> u64 {
        match self {
            CamperForm::Tent => 1,
            CamperForm::TentWithCar => 2,
            CamperForm::Caravan => 1,
        }
    }
}

impl std::fmt::Display for CamperForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CamperForm::Tent => "tent",
            CamperForm::TentWithCar => "tent+car",
            CamperForm::Caravan => "caravan",
        };
        f.write_str(name)
    }
}

/// One value per camper form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerForm<T> {
    pub tent: T,
    pub tent_with_car: T,
    pub caravan: T,
}

impl<T: Copy> PerForm<T> {
    pub fn get(&self, form: CamperForm) -> T {
        match form {
            CamperForm::Tent => self.tent,
            CamperForm::TentWithCar => self.tent_with_car,
            CamperForm::Caravan => self.caravan,
        }
    }

    /// Values in `CamperForm::ALL` order
    pub fn to_array(&self) -> [T; 3] {
        [self.tent, self.tent_with_car, self.caravan]
    }
}

/// Discrete capacity a group can be placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SiteCategory {
    Meadow,
    Lots,
}

/// One arriving party. Immutable once sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub form: CamperForm,
    pub party_size: u32,
    pub nights: u32,
    pub arrival_day: u32,
}

/// The three shared resources plus the price and cost table.
#[derive(Debug, Clone)]
pub struct Campsite {
    people: LevelResource,
    meadow: SlotResource,
    lots: SlotResource,
    prices: PricesConfig,
    costs: CostsConfig,
}

impl Campsite {
    pub fn new(config: &CampsiteConfig) -> Self {
        let sizes = &config.sizes;
        Self {
            people: LevelResource::new("people", sizes.people_capacity),
            meadow: SlotResource::new("meadow", Capacity::Bounded(sizes.meadow_capacity)),
            lots: SlotResource::new("lots", Capacity::Bounded(sizes.lot_capacity)),
            prices: config.prices.clone(),
            costs: config.costs.clone(),
        }
    }

    pub fn people(&self) -> &LevelResource {
        &self.people
    }

    pub fn people_mut(&mut self) -> &mut LevelResource {
        &mut self.people
    }

    pub fn site(&self, category: SiteCategory) -> &SlotResource {
        match category {
            SiteCategory::Meadow => &self.meadow,
            SiteCategory::Lots => &self.lots,
        }
    }

    pub fn site_mut(&mut self, category: SiteCategory) -> &mut SlotResource {
        match category {
            SiteCategory::Meadow => &mut self.meadow,
            SiteCategory::Lots => &mut self.lots,
        }
    }

    pub fn prices(&self) -> &PricesConfig {
        &self.prices
    }

    pub fn costs(&self) -> &CostsConfig {
        &self.costs
    }

    pub fn limits(&self) -> UsageLimits {
        UsageLimits {
            people: self.people.capacity().limit(),
            meadow: self.meadow.capacity().limit(),
            lots: self.lots.capacity().limit(),
        }
    }
}

/// Everything one run mutates: the campsite, its statistics and the
/// run's random source. Created fresh for every run.
pub struct CampsiteWorld {
    pub campsite: Campsite,
    pub stats: StatisticsCollector,
    pub rng: StdRng,
}

impl CampsiteWorld {
    pub fn new(campsite: Campsite, rng: StdRng) -> Self {
        Self {
            campsite,
            stats: StatisticsCollector::new(),
            rng,
        }
    }

    /// Record end-of-admissions occupancy and the day's running costs
    pub fn record_daily_snapshot(&mut self) {
        let people = self.campsite.people().level();
        let meadow = self.campsite.site(SiteCategory::Meadow).level();
        let lots = self.campsite.site(SiteCategory::Lots).level();

        self.stats.record_usage(UsageCategory::People, people, 0, 0);
        self.stats.record_usage(UsageCategory::Meadow, meadow, 0, 0);
        self.stats.record_usage(UsageCategory::Lots, lots, 0, 0);

        let costs = self.campsite.costs();
        let costs_person = costs.person * people as f64;
        let costs_base = costs.daily;
        self.stats.record_financial(0.0, 0.0, costs_person, costs_base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_dispatch() {
        assert_eq!(CamperForm::Tent.site(), SiteCategory::Meadow);
        assert_eq!(CamperForm::TentWithCar.site(), SiteCategory::Meadow);
        assert_eq!(CamperForm::Caravan.site(), SiteCategory::Lots);
        assert_eq!(CamperForm::TentWithCar.site_units(), 2);
        assert_eq!(CamperForm::Caravan.site_units(), 1);
    }

    #[test]
    fn test_per_form_lookup() {
        let prices = PerForm { tent: 5.0, tent_with_car: 9.0, caravan: 15.0 };
        assert_eq!(prices.get(CamperForm::TentWithCar), 9.0);
        assert_eq!(prices.to_array(), [5.0, 9.0, 15.0]);
    }

    #[test]
    fn test_campsite_from_reference_config() {
        let campsite = Campsite::new(&CampsiteConfig::default());
        let limits = campsite.limits();
        assert_eq!(limits.people, Some(150));
        assert_eq!(limits.meadow, Some(50));
        assert_eq!(limits.lots, Some(30));
        assert_eq!(campsite.people().level(), 0);
    }
}
