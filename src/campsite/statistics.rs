use super::model::SiteCategory;
use crate::core::errors::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// What a usage record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UsageCategory {
    /// People on site, counted in persons
    People,
    /// Tent meadow, counted in meadow places
    Meadow,
    /// Caravan lots, counted in lots
    Lots,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 3] = [UsageCategory::People, UsageCategory::Meadow, UsageCategory::Lots];
}

impl From<SiteCategory> for UsageCategory {
    fn from(site: SiteCategory) -> Self {
        match site {
            SiteCategory::Meadow => UsageCategory::Meadow,
            SiteCategory::Lots => UsageCategory::Lots,
        }
    }
}

/// One category on one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Level after the day's admissions settled
    pub occupied: u64,
    pub new: u64,
    pub rejected: u64,
}

/// Money on one day. Costs are negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyFinancials {
    pub earnings_person: f64,
    pub earnings_base: f64,
    pub costs_person: f64,
    pub costs_base: f64,
}

impl DailyFinancials {
    pub fn balance(&self) -> f64 {
        self.earnings_person + self.earnings_base + self.costs_person + self.costs_base
    }
}

/// Everything recorded for one simulated day of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Groups that arrived, admitted or not
    pub arrivals: u64,
    pub people: DailyUsage,
    pub meadow: DailyUsage,
    pub lots: DailyUsage,
    pub financials: DailyFinancials,
}

impl DayRecord {
    pub fn usage(&self, category: UsageCategory) -> &DailyUsage {
        match category {
            UsageCategory::People => &self.people,
            UsageCategory::Meadow => &self.meadow,
            UsageCategory::Lots => &self.lots,
        }
    }

    fn usage_mut(&mut self, category: UsageCategory) -> &mut DailyUsage {
        match category {
            UsageCategory::People => &mut self.people,
            UsageCategory::Meadow => &mut self.meadow,
            UsageCategory::Lots => &mut self.lots,
        }
    }

    /// Value of one tracked series on this day
    pub fn value(&self, series: Series) -> f64 {
        match series {
            Series::Arrivals => self.arrivals as f64,
            Series::Occupied(category) => self.usage(category).occupied as f64,
            Series::New(category) => self.usage(category).new as f64,
            Series::Rejected(category) => self.usage(category).rejected as f64,
            Series::EarningsPerson => self.financials.earnings_person,
            Series::EarningsBase => self.financials.earnings_base,
            Series::CostsPerson => self.financials.costs_person,
            Series::CostsBase => self.financials.costs_base,
            Series::Balance => self.financials.balance(),
        }
    }
}

/// Every day-indexed series a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Series {
    Arrivals,
    Occupied(UsageCategory),
    New(UsageCategory),
    Rejected(UsageCategory),
    EarningsPerson,
    EarningsBase,
    CostsPerson,
    CostsBase,
    Balance,
}

impl Series {
    pub fn all() -> Vec<Series> {
        let mut all = vec![Series::Arrivals];
        for category in UsageCategory::ALL {
            all.push(Series::Occupied(category));
            all.push(Series::New(category));
            all.push(Series::Rejected(category));
        }
        all.extend([
            Series::EarningsPerson,
            Series::EarningsBase,
            Series::CostsPerson,
            Series::CostsBase,
            Series::Balance,
        ]);
        all
    }
}

/// Capacity limits carried next to the results; `None` means unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub people: Option<u64>,
    pub meadow: Option<u64>,
    pub lots: Option<u64>,
}

impl UsageLimits {
    pub fn get(&self, category: UsageCategory) -> Option<u64> {
        match category {
            UsageCategory::People => self.people,
            UsageCategory::Meadow => self.meadow,
            UsageCategory::Lots => self.lots,
        }
    }
}

/// Accumulates day-indexed statistics of one run.
///
/// All `record_*` calls add to the current (last) day.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    days: Vec<DayRecord>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh, zeroed day
    pub fn advance_day(&mut self) {
        self.days.push(DayRecord::default());
    }

    fn current_mut(&mut self) -> &mut DayRecord {
        if self.days.is_empty() {
            self.days.push(DayRecord::default());
        }
        let last = self.days.len() - 1;
        &mut self.days[last]
    }

    pub fn record_usage(&mut self, category: UsageCategory, occupied: u64, new: u64, rejected: u64) {
        let usage = self.current_mut().usage_mut(category);
        usage.occupied += occupied;
        usage.new += new;
        usage.rejected += rejected;
    }

    pub fn record_financial(&mut self, earnings_person: f64, earnings_base: f64, costs_person: f64, costs_base: f64) {
        let financials = &mut self.current_mut().financials;
        financials.earnings_person += earnings_person;
        financials.earnings_base += earnings_base;
        financials.costs_person += costs_person;
        financials.costs_base += costs_base;
    }

    pub fn record_arrivals(&mut self, groups: u64) {
        self.current_mut().arrivals += groups;
    }

    pub fn current_day(&self) -> Option<&DayRecord> {
        self.days.last()
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn into_run_result(self, limits: UsageLimits) -> RunResult {
        RunResult {
            days: self.days,
            limits,
        }
    }
}

/// Output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub days: Vec<DayRecord>,
    pub limits: UsageLimits,
}

impl RunResult {
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    pub fn value(&self, day: usize, series: Series) -> Option<f64> {
        self.days.get(day).map(|record| record.value(series))
    }

    pub fn series(&self, series: Series) -> Vec<f64> {
        self.days.iter().map(|record| record.value(series)).collect()
    }

    pub fn balance(&self) -> Vec<f64> {
        self.series(Series::Balance)
    }
}

/// Mean, spread, peak and total of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub max: f64,
    pub sum: f64,
}

impl SeriesSummary {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            max,
            sum,
        })
    }
}

/// Averaged usage of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSeries {
    pub limit: Option<u64>,
    pub occupied: Vec<f64>,
    pub new: Vec<f64>,
    pub rejected: Vec<f64>,
}

/// Element-wise mean of all runs of an experiment.
///
/// This is everything a reporting layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub runs: usize,
    pub arrivals: Vec<f64>,
    pub people: UsageSeries,
    pub meadow: UsageSeries,
    pub lots: UsageSeries,
    pub earnings_person: Vec<f64>,
    pub earnings_base: Vec<f64>,
    pub costs_person: Vec<f64>,
    pub costs_base: Vec<f64>,
    pub balance: Vec<f64>,
}

impl AggregateResult {
    /// Average `runs` day by day. Days missing from any run are dropped.
    pub fn from_runs(runs: &[RunResult]) -> SimResult<Self> {
        let Some(first) = runs.first() else {
            return Err(SimError::InvalidConfig {
                field: "num_experiments".to_string(),
                reason: "nothing to average".to_string(),
            });
        };
        let days = runs.iter().map(RunResult::num_days).min().unwrap_or(0);
        let count = runs.len() as f64;

        let mean = |series: Series| -> Vec<f64> {
            (0..days)
                .map(|day| runs.iter().map(|run| run.days[day].value(series)).sum::<f64>() / count)
                .collect()
        };
        let usage = |category: UsageCategory| UsageSeries {
            limit: first.limits.get(category),
            occupied: mean(Series::Occupied(category)),
            new: mean(Series::New(category)),
            rejected: mean(Series::Rejected(category)),
        };

        Ok(Self {
            runs: runs.len(),
            arrivals: mean(Series::Arrivals),
            people: usage(UsageCategory::People),
            meadow: usage(UsageCategory::Meadow),
            lots: usage(UsageCategory::Lots),
            earnings_person: mean(Series::EarningsPerson),
            earnings_base: mean(Series::EarningsBase),
            costs_person: mean(Series::CostsPerson),
            costs_base: mean(Series::CostsBase),
            balance: mean(Series::Balance),
        })
    }

    pub fn num_days(&self) -> usize {
        self.balance.len()
    }

    pub fn usage(&self, category: UsageCategory) -> &UsageSeries {
        match category {
            UsageCategory::People => &self.people,
            UsageCategory::Meadow => &self.meadow,
            UsageCategory::Lots => &self.lots,
        }
    }

    pub fn series(&self, series: Series) -> &[f64] {
        match series {
            Series::Arrivals => &self.arrivals,
            Series::Occupied(category) => &self.usage(category).occupied,
            Series::New(category) => &self.usage(category).new,
            Series::Rejected(category) => &self.usage(category).rejected,
            Series::EarningsPerson => &self.earnings_person,
            Series::EarningsBase => &self.earnings_base,
            Series::CostsPerson => &self.costs_person,
            Series::CostsBase => &self.costs_base,
            Series::Balance => &self.balance,
        }
    }

    pub fn summary(&self, series: Series) -> Option<SeriesSummary> {
        SeriesSummary::of(self.series(series))
    }

    pub fn total_balance(&self) -> f64 {
        self.balance.iter().sum()
    }

    pub fn mean_daily_balance(&self) -> f64 {
        if self.balance.is_empty() {
            0.0
        } else {
            self.total_balance() / self.balance.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(days: &[(u64, f64)]) -> RunResult {
        let mut collector = StatisticsCollector::new();
        for (people, earnings) in days {
            collector.advance_day();
            collector.record_usage(UsageCategory::People, *people, 1, 0);
            collector.record_financial(*earnings, 0.0, 0.0, -10.0);
        }
        collector.into_run_result(UsageLimits::default())
    }

    #[test]
    fn test_records_accumulate_into_current_day() {
        let mut collector = StatisticsCollector::new();
        collector.advance_day();
        collector.record_usage(UsageCategory::Meadow, 0, 1, 0);
        collector.record_usage(UsageCategory::Meadow, 0, 2, 1);
        collector.advance_day();
        collector.record_usage(UsageCategory::Meadow, 4, 0, 0);

        let days = collector.days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].meadow, DailyUsage { occupied: 0, new: 3, rejected: 1 });
        assert_eq!(days[1].meadow.occupied, 4);
        assert_eq!(days[1].people, DailyUsage::default());
    }

    #[test]
    fn test_balance_sums_all_components() {
        let financials = DailyFinancials {
            earnings_person: 20.0,
            earnings_base: 15.0,
            costs_person: -4.0,
            costs_base: -350.0,
        };
        assert_eq!(financials.balance(), -319.0);
    }

    #[test]
    fn test_series_covers_every_category() {
        let all = Series::all();
        assert_eq!(all.len(), 15);
        assert!(all.contains(&Series::Rejected(UsageCategory::Lots)));
    }

    #[test]
    fn test_aggregate_is_element_wise_mean() {
        let a = run_with(&[(2, 10.0), (4, 30.0)]);
        let b = run_with(&[(6, 20.0), (0, 0.0)]);
        let aggregate = AggregateResult::from_runs(&[a, b]).unwrap();

        assert_eq!(aggregate.runs, 2);
        assert_eq!(aggregate.people.occupied, vec![4.0, 2.0]);
        assert_eq!(aggregate.earnings_person, vec![15.0, 15.0]);
        assert_eq!(aggregate.balance, vec![5.0, 5.0]);
        assert_eq!(aggregate.total_balance(), 10.0);
        assert_eq!(aggregate.mean_daily_balance(), 5.0);
    }

    #[test]
    fn test_aggregate_truncates_to_shortest_run() {
        let a = run_with(&[(1, 1.0), (1, 1.0), (1, 1.0)]);
        let b = run_with(&[(1, 1.0)]);
        let aggregate = AggregateResult::from_runs(&[a, b]).unwrap();
        assert_eq!(aggregate.num_days(), 1);
    }

    #[test]
    fn test_aggregate_of_nothing_is_an_error() {
        assert!(AggregateResult::from_runs(&[]).is_err());
    }

    #[test]
    fn test_series_summary() {
        let summary = SeriesSummary::of(&[1.0, 3.0]).unwrap();
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.std_dev, 1.0);
        assert_eq!(summary.max, 3.0);
        assert_eq!(summary.sum, 4.0);
        assert!(SeriesSummary::of(&[]).is_none());
    }
}
