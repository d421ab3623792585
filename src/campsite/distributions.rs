//! Probability distributions behind the arrival process.
//!
//! These primitives know nothing about the event kernel, so a pure
//! day-by-day Monte-Carlo estimate can reuse them directly.

use super::config::{CampsiteConfig, DAYS_PER_YEAR};
use super::model::{CamperForm, Group};
use crate::core::errors::{SimError, SimResult};
use log::warn;
use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Normal density at `x`. With `scale` set the normalisation is dropped
/// and the peak equals `scale`.
pub fn normal_density(x: f64, mean: f64, sd: f64, scale: Option<f64>) -> f64 {
    let shape = (-0.5 * ((x - mean) / sd).powi(2)).exp();
    match scale {
        Some(peak) => shape * peak,
        None => shape / (sd * (2.0 * std::f64::consts::PI).sqrt()),
    }
}

/// Reject weight tables a discrete choice cannot be built from
pub fn check_weights(name: &str, weights: &[f64]) -> SimResult<()> {
    let invalid = |reason: String| SimError::InvalidDistribution {
        name: name.to_string(),
        reason,
    };

    if weights.is_empty() {
        return Err(invalid("no weights given".to_string()));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(invalid(format!("weight {bad} is negative or not finite")));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(invalid("weights sum to zero".to_string()));
    }
    Ok(())
}

/// Demand multiplier for every day of the year, peak-normalised to 1.0.
///
/// Day `d` is evaluated at month position `d / 30`.
#[derive(Debug, Clone)]
pub struct SeasonalCurve {
    multipliers: Vec<f64>,
}

impl SeasonalCurve {
    pub fn new(mean: f64, sd: f64) -> Self {
        let multipliers = (0..DAYS_PER_YEAR)
            .map(|day| normal_density(day as f64 / 30.0, mean, sd, Some(1.0)))
            .collect();
        Self { multipliers }
    }

    /// Multiplier for `day`, wrapping around the year
    pub fn multiplier(&self, day: u32) -> f64 {
        self.multipliers[day as usize % self.multipliers.len()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.multipliers
    }
}

/// Weighted choice over a fixed set of values
#[derive(Debug, Clone)]
pub struct DiscreteChoice<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> DiscreteChoice<T> {
    pub fn new(name: &str, values: Vec<T>, weights: &[f64]) -> SimResult<Self> {
        check_weights(name, weights)?;
        if values.len() != weights.len() {
            return Err(SimError::InvalidDistribution {
                name: name.to_string(),
                reason: format!("{} values but {} weights", values.len(), weights.len()),
            });
        }
        let index = WeightedIndex::new(weights).map_err(|err| SimError::InvalidDistribution {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { values, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// All distributions needed to generate one day of arrivals
#[derive(Debug, Clone)]
pub struct ArrivalSampler {
    day_count: Normal<f64>,
    seasonal: SeasonalCurve,
    forms: DiscreteChoice<CamperForm>,
    nights: DiscreteChoice<u32>,
    people: DiscreteChoice<u32>,
}

impl ArrivalSampler {
    pub fn from_config(config: &CampsiteConfig) -> SimResult<Self> {
        let groups = &config.groups;
        let day_count = Normal::new(groups.day_mean, groups.day_sd).map_err(|err| SimError::InvalidDistribution {
            name: "groups.day".to_string(),
            reason: err.to_string(),
        })?;
        if groups.year_sd <= 0.0 || !groups.year_sd.is_finite() {
            return Err(SimError::InvalidDistribution {
                name: "groups.year".to_string(),
                reason: format!("sd {} must be positive", groups.year_sd),
            });
        }
        let seasonal = SeasonalCurve::new(groups.year_mean, groups.year_sd);
        if seasonal.as_slice().iter().all(|m| *m == 0.0) {
            warn!("seasonal demand curve is zero on every day, no group will ever arrive");
        }

        let campers = &config.campers;
        let forms = DiscreteChoice::new(
            "campers.form_weights",
            CamperForm::ALL.to_vec(),
            &campers.form_weights.to_array(),
        )?;
        let nights = DiscreteChoice::new(
            "campers.duration_weights",
            (1..=campers.duration_weights.len() as u32).collect(),
            &campers.duration_weights,
        )?;
        let people = DiscreteChoice::new(
            "campers.people_weights",
            (1..=campers.people_weights.len() as u32).collect(),
            &campers.people_weights,
        )?;

        Ok(Self {
            day_count,
            seasonal,
            forms,
            nights,
            people,
        })
    }

    /// Number of groups arriving on `day`: a normal draw scaled by the
    /// seasonal multiplier, rounded half-to-even and clamped at zero
    pub fn group_count<R: Rng + ?Sized>(&self, day: u32, rng: &mut R) -> u32 {
        let raw = self.day_count.sample(rng);
        let scaled = (self.seasonal.multiplier(day) * raw).round_ties_even();
        if scaled <= 0.0 {
            0
        } else {
            scaled as u32
        }
    }

    /// Draw form, stay length and party size for one group, in that order
    pub fn sample_group<R: Rng + ?Sized>(&self, day: u32, rng: &mut R) -> Group {
        let form = self.forms.sample(rng);
        let nights = self.nights.sample(rng);
        let party_size = self.people.sample(rng);
        Group {
            form,
            party_size,
            nights,
            arrival_day: day,
        }
    }

    pub fn seasonal(&self) -> &SeasonalCurve {
        &self.seasonal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campsite::model::PerForm;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normal_density_peak_scaling() {
        assert_eq!(normal_density(7.0, 7.0, 2.0, Some(1.0)), 1.0);
        assert!(normal_density(1.0, 7.0, 2.0, Some(1.0)) < 0.02);
        let unscaled = normal_density(0.0, 0.0, 1.0, None);
        assert!((unscaled - 0.398_942_280_4).abs() < 1e-9);
    }

    #[test]
    fn test_seasonal_curve_shape() {
        let curve = SeasonalCurve::new(7.0, 2.0);
        assert_eq!(curve.as_slice().len(), 360);
        assert_eq!(curve.multiplier(210), 1.0);
        assert!(curve.multiplier(0) < curve.multiplier(180));
        assert_eq!(curve.multiplier(360 + 210), 1.0);
    }

    #[test]
    fn test_check_weights() {
        assert!(check_weights("w", &[1.0, 0.0]).is_ok());
        assert!(check_weights("w", &[]).is_err());
        assert!(check_weights("w", &[0.0, 0.0]).is_err());
        assert!(check_weights("w", &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_concentrated_choice_is_deterministic() {
        let choice = DiscreteChoice::new("nights", vec![1u32, 2, 3], &[0.0, 1.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(choice.sample(&mut rng), 2);
        }
    }

    #[test]
    fn test_choice_length_mismatch() {
        let result = DiscreteChoice::new("nights", vec![1u32, 2], &[1.0]);
        assert!(matches!(result, Err(SimError::InvalidDistribution { .. })));
    }

    #[test]
    fn test_group_count_without_spread() {
        let config = CampsiteConfig::new()
            .with_day_distribution(5.0, 0.0)
            .with_season(0.0, 1.0);
        let sampler = ArrivalSampler::from_config(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sampler.group_count(0, &mut rng), 5);
    }

    #[test]
    fn test_group_count_never_negative() {
        let config = CampsiteConfig::new()
            .with_day_distribution(-3.0, 0.0)
            .with_season(0.0, 1.0);
        let sampler = ArrivalSampler::from_config(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sampler.group_count(0, &mut rng), 0);
    }

    #[test]
    fn test_sampled_groups_stay_in_range() {
        let sampler = ArrivalSampler::from_config(&CampsiteConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let group = sampler.sample_group(3, &mut rng);
            assert!((1..=14).contains(&group.nights));
            assert!((1..=4).contains(&group.party_size));
            assert_eq!(group.arrival_day, 3);
        }
    }

    #[test]
    fn test_sample_group_follows_concentrated_weights() {
        let config = CampsiteConfig::new()
            .with_form_weights(PerForm {
                tent: 0.0,
                tent_with_car: 0.0,
                caravan: 1.0,
            })
            .with_duration_weights(vec![0.0, 0.0, 1.0])
            .with_people_weights(vec![0.0, 1.0]);
        let sampler = ArrivalSampler::from_config(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let group = sampler.sample_group(0, &mut rng);
        assert_eq!(group.form, CamperForm::Caravan);
        assert_eq!(group.nights, 3);
        assert_eq!(group.party_size, 2);
    }
}
