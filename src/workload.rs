//! Synthetic customer tables.
//!
//! Inter-arrival and service times are drawn from exponential distributions using a seeded PCG64 generator, so a
//! given [`WorkloadSpec`] always produces the same table. Arrival times are the running sum of the inter-arrival
//! draws; service times are floored at [`WorkloadSpec::min_service_time`]. Both are rounded to two decimals, as a
//! till receipt would show them.

use crate::checkout::Customer;
use crate::error::ConfigError;

use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSpec {
    pub customers: usize,
    pub mean_inter_arrival: f64,
    pub mean_service_time: f64,
    pub min_service_time: f64,
    pub seed: u64,
}

impl Default for WorkloadSpec {
    /// Roughly 83% utilization on three lanes: one arrival per minute against 0.4 services per lane per minute.
    fn default() -> Self {
        Self {
            customers: 500,
            mean_inter_arrival: 1.0,
            mean_service_time: 2.5,
            min_service_time: 0.5,
            seed: 42,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::BadWorkload { name, value })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl WorkloadSpec {
    /// # Errors
    ///
    /// Every mean and the service-time floor must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("mean_inter_arrival", self.mean_inter_arrival)?;
        positive("mean_service_time", self.mean_service_time)?;
        positive("min_service_time", self.min_service_time)
    }

    /// Draw a customer table, sorted by arrival time, with ids `1..=customers`.
    ///
    /// # Errors
    ///
    /// See [`validate()`](WorkloadSpec::validate).
    pub fn generate(&self) -> Result<Vec<Customer>, ConfigError> {
        self.validate()?;

        let inter_arrival = Exp::new(1.0 / self.mean_inter_arrival).map_err(|_| ConfigError::BadWorkload {
            name: "mean_inter_arrival",
            value: self.mean_inter_arrival,
        })?;
        let service = Exp::new(1.0 / self.mean_service_time).map_err(|_| ConfigError::BadWorkload {
            name: "mean_service_time",
            value: self.mean_service_time,
        })?;

        let mut rng = Pcg64::seed_from_u64(self.seed);
        // all gaps first, then all service times, so the arrival pattern for a seed doesn't depend on service draws
        let gaps: Vec<f64> = (0..self.customers).map(|_| inter_arrival.sample(&mut rng)).collect();
        let services: Vec<f64> = (0..self.customers).map(|_| service.sample(&mut rng)).collect();

        let mut arrival = 0.0;
        let customers = gaps
            .into_iter()
            .zip(services)
            .enumerate()
            .map(|(i, (gap, service_time))| {
                arrival += gap;
                Customer::new(
                    i as u64 + 1,
                    round_cents(arrival),
                    round_cents(service_time.max(self.min_service_time)).max(self.min_service_time),
                )
            })
            .collect();
        Ok(customers)
    }
}
