use campsim::campsite::config::DAYS_PER_YEAR;
use campsim::campsite::statistics::{Series, UsageCategory};
use campsim::core::execution::{ConcurrencyMode, ExecutionConfig};
use campsim::{CampsiteConfig, ExperimentRunner};

const DAYS_PER_MONTH: usize = 30;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("Campsite occupancy, one simulated year");

    let config = CampsiteConfig::default()
        .with_horizon_days(DAYS_PER_YEAR)
        .with_execution(ExecutionConfig::new().with_concurrency(ConcurrencyMode::Rayon));

    println!("Configuration:");
    println!(
        "  Groups per day: mean={:.1}, sd={:.1}; season peak at month {:.1} (sd {:.1})",
        config.groups.day_mean, config.groups.day_sd, config.groups.year_mean, config.groups.year_sd
    );
    println!(
        "  Capacities: meadow={}, lots={}, people={:?}",
        config.sizes.meadow_capacity, config.sizes.lot_capacity, config.sizes.people_capacity
    );
    println!("  Runs: {} with seed {:?}", config.num_experiments, config.seed);
    println!();

    let runner = ExperimentRunner::new(config)?;
    let aggregate = runner.run()?;

    println!("{:>5} {:>8} {:>8} {:>8} {:>8} {:>10}", "month", "people", "meadow", "lots", "rejected", "balance");
    let months = aggregate.num_days().div_ceil(DAYS_PER_MONTH);
    for month in 0..months {
        let start = month * DAYS_PER_MONTH;
        let end = (start + DAYS_PER_MONTH).min(aggregate.num_days());
        let mean = |series: Series| {
            let values = &aggregate.series(series)[start..end];
            values.iter().sum::<f64>() / values.len() as f64
        };
        let rejected: f64 = UsageCategory::ALL
            .iter()
            .map(|category| aggregate.series(Series::Rejected(*category))[start..end].iter().sum::<f64>())
            .sum();
        println!(
            "{:>5} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>10.1}",
            month + 1,
            mean(Series::Occupied(UsageCategory::People)),
            mean(Series::Occupied(UsageCategory::Meadow)),
            mean(Series::Occupied(UsageCategory::Lots)),
            rejected,
            mean(Series::Balance),
        );
    }

    println!();
    for category in UsageCategory::ALL {
        if let Some(summary) = aggregate.summary(Series::Occupied(category)) {
            println!(
                "{:?}: mean {:.1}, peak {:.1}, limit {:?}",
                category,
                summary.mean,
                summary.max,
                aggregate.usage(category).limit
            );
        }
    }
    println!(
        "Balance: {:.0} over the year, {:.1} per day",
        aggregate.total_balance(),
        aggregate.mean_daily_balance()
    );

    Ok(())
}
