use super::distributions::check_weights;
use super::model::PerForm;
use crate::core::errors::{SimError, SimResult};
use crate::core::execution::ExecutionConfig;
use crate::core::resources::Capacity;
use serde::{Deserialize, Serialize};

/// Days in the reference year: 12 months of 30 days
pub const DAYS_PER_YEAR: u32 = 12 * 30;

/// Longest stay in nights
pub const MAX_NIGHTS: usize = 14;

/// Largest party size
pub const MAX_PARTY_SIZE: usize = 4;

/// Number of new groups per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupsConfig {
    /// Normal distribution of raw arrivals per day
    pub day_mean: f64,
    pub day_sd: f64,
    /// Seasonal demand curve, a normal density over the month index
    /// (0 = start of January) scaled to peak at 1.0
    pub year_mean: f64,
    pub year_sd: f64,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            day_mean: 12.0,
            day_sd: 4.0,
            year_mean: 7.0,
            year_sd: 2.0,
        }
    }
}

/// Absolute frequencies of group attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampersConfig {
    pub form_weights: PerForm<f64>,
    /// Index 0 is a one night stay
    pub duration_weights: Vec<f64>,
    /// Index 0 is a single person
    pub people_weights: Vec<f64>,
}

impl Default for CampersConfig {
    fn default() -> Self {
        Self {
            form_weights: PerForm {
                tent: 1.0,
                tent_with_car: 3.0,
                caravan: 6.0,
            },
            duration_weights: vec![5.0, 5.0, 6.0, 7.0, 9.0, 8.0, 10.0, 6.0, 4.0, 3.0, 1.0, 1.0, 1.0, 2.0],
            people_weights: vec![1.0, 5.0, 2.0, 4.0],
        }
    }
}

/// Daily rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricesConfig {
    pub person: f64,
    pub form: PerForm<f64>,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            person: 5.0,
            form: PerForm {
                tent: 5.0,
                tent_with_car: 9.0,
                caravan: 15.0,
            },
        }
    }
}

/// Costs are negative amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostsConfig {
    /// Per person on site per day (water, waste, ...)
    pub person: f64,
    /// Fixed overhead per day (wages, land tax, ...)
    pub daily: f64,
}

impl Default for CostsConfig {
    fn default() -> Self {
        Self {
            person: -2.0,
            daily: -350.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizesConfig {
    pub meadow_capacity: u64,
    pub lot_capacity: u64,
    pub people_capacity: Capacity,
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self {
            meadow_capacity: 50,
            lot_capacity: 30,
            people_capacity: Capacity::Bounded(150),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Tents denied a meadow place try a caravan lot before giving up.
    /// Overflowing tents are booked into the lot statistics.
    pub tent_overflow_to_lots: bool,
}

/// Complete, immutable input of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampsiteConfig {
    pub groups: GroupsConfig,
    pub campers: CampersConfig,
    pub prices: PricesConfig,
    pub costs: CostsConfig,
    pub sizes: SizesConfig,
    pub admission: AdmissionConfig,
    pub execution: ExecutionConfig,
    /// Base seed; `None` draws every run from OS entropy
    pub seed: Option<u64>,
    pub num_experiments: usize,
    pub horizon_days: u32,
}

impl Default for CampsiteConfig {
    fn default() -> Self {
        Self {
            groups: GroupsConfig::default(),
            campers: CampersConfig::default(),
            prices: PricesConfig::default(),
            costs: CostsConfig::default(),
            sizes: SizesConfig::default(),
            admission: AdmissionConfig::default(),
            execution: ExecutionConfig::default(),
            seed: Some(42),
            num_experiments: 25,
            horizon_days: DAYS_PER_YEAR,
        }
    }
}

impl CampsiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_num_experiments(mut self, num_experiments: usize) -> Self {
        self.num_experiments = num_experiments;
        self
    }

    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_day_distribution(mut self, mean: f64, sd: f64) -> Self {
        self.groups.day_mean = mean;
        self.groups.day_sd = sd;
        self
    }

    pub fn with_season(mut self, mean: f64, sd: f64) -> Self {
        self.groups.year_mean = mean;
        self.groups.year_sd = sd;
        self
    }

    pub fn with_form_weights(mut self, weights: PerForm<f64>) -> Self {
        self.campers.form_weights = weights;
        self
    }

    pub fn with_duration_weights(mut self, weights: Vec<f64>) -> Self {
        self.campers.duration_weights = weights;
        self
    }

    pub fn with_people_weights(mut self, weights: Vec<f64>) -> Self {
        self.campers.people_weights = weights;
        self
    }

    pub fn with_prices(mut self, prices: PricesConfig) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_costs(mut self, costs: CostsConfig) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_capacities(mut self, meadow: u64, lots: u64, people: Capacity) -> Self {
        self.sizes = SizesConfig {
            meadow_capacity: meadow,
            lot_capacity: lots,
            people_capacity: people,
        };
        self
    }

    pub fn with_tent_overflow(mut self, enabled: bool) -> Self {
        self.admission.tent_overflow_to_lots = enabled;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    /// Check everything that can be checked before simulated time starts
    pub fn validate(&self) -> SimResult<()> {
        let groups = &self.groups;
        if !groups.day_mean.is_finite() || !groups.day_sd.is_finite() || groups.day_sd < 0.0 {
            return Err(SimError::InvalidDistribution {
                name: "groups.day".to_string(),
                reason: format!("mean {} / sd {} must be finite with sd >= 0", groups.day_mean, groups.day_sd),
            });
        }
        if !groups.year_mean.is_finite() || !groups.year_sd.is_finite() || groups.year_sd <= 0.0 {
            return Err(SimError::InvalidDistribution {
                name: "groups.year".to_string(),
                reason: format!("mean {} / sd {} must be finite with sd > 0", groups.year_mean, groups.year_sd),
            });
        }

        let campers = &self.campers;
        check_weights("campers.form_weights", &campers.form_weights.to_array())?;
        check_weights("campers.duration_weights", &campers.duration_weights)?;
        check_weights("campers.people_weights", &campers.people_weights)?;
        if campers.duration_weights.len() > MAX_NIGHTS {
            return Err(SimError::InvalidDistribution {
                name: "campers.duration_weights".to_string(),
                reason: format!("at most {MAX_NIGHTS} nights are supported"),
            });
        }
        if campers.people_weights.len() > MAX_PARTY_SIZE {
            return Err(SimError::InvalidDistribution {
                name: "campers.people_weights".to_string(),
                reason: format!("at most {MAX_PARTY_SIZE} people per group are supported"),
            });
        }

        let prices = &self.prices;
        for (field, price) in [
            ("prices.person", prices.person),
            ("prices.form.tent", prices.form.tent),
            ("prices.form.tent_with_car", prices.form.tent_with_car),
            ("prices.form.caravan", prices.form.caravan),
        ] {
            if !price.is_finite() || price < 0.0 {
                return Err(invalid_config(field, format!("{price} must be a non-negative rate")));
            }
        }

        for (field, cost) in [("costs.person", self.costs.person), ("costs.daily", self.costs.daily)] {
            if !cost.is_finite() || cost > 0.0 {
                return Err(invalid_config(field, format!("{cost} must be zero or negative")));
            }
        }

        if self.num_experiments == 0 {
            return Err(invalid_config("num_experiments", "at least one run is required".to_string()));
        }
        if self.horizon_days == 0 {
            return Err(invalid_config("horizon_days", "at least one day is required".to_string()));
        }
        if self.execution.thread_pool_size == Some(0) {
            return Err(invalid_config("execution.thread_pool_size", "pool needs at least one thread".to_string()));
        }

        Ok(())
    }
}

fn invalid_config(field: &str, reason: String) -> SimError {
    SimError::InvalidConfig {
        field: field.to_string(),
        reason,
    }
}
