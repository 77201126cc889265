//! The checkout model: one arrival process and N lanes sharing a single FIFO line.
//!
//! [`simulate()`] is the driver. It validates the customer table and the configuration, spawns the lanes (server ids
//! `1..=N`, in that order) and then the arrival process, runs the scheduler under the configured [`Termination`]
//! policy, and hands back a [`Ledger`]. Nothing about the scheduler's internal state escapes through the result.

mod arrivals;
mod customer;
mod lane;
mod ledger;

pub use arrivals::Arrivals;
pub use customer::{sort_by_arrival, validate, Customer, InputError};
pub use lane::Lane;
pub use ledger::{LaneSummary, Ledger, ServerState, ServiceRecord};

use crate::config::SimConfig;
use crate::engine::Simulation;
use crate::error::InvariantViolation;
use crate::process::{spawn, Host, Kernel, Process, Suspend, Wake};
use crate::{Error, SimState};

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The checkout's virtual clock type.
pub type Clock = NotNan<f64>;

/// Margin the fixed-horizon policy adds after the last arrival unless configured otherwise.
pub const DEFAULT_HORIZON_MARGIN: f64 = 1000.0;

pub(crate) fn clock(value: f64) -> Result<Clock, Error> {
    NotNan::new(value).map_err(|_| InvariantViolation::NanClock.into())
}

/// When the driver stops advancing the clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Termination {
    /// Stop once the arrival process has finished and every customer it enqueued has been served.
    Drained,
    /// Stop at `last arrival + margin`, even if customers are still waiting or being served. Any such customer is
    /// missing from the ledger and counted in [`Outcome::unserved`].
    Horizon {
        #[serde(default = "default_margin")]
        margin: f64,
    },
}

fn default_margin() -> f64 {
    DEFAULT_HORIZON_MARGIN
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Drained
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub ledger: Ledger,
    /// Clock reading when the run stopped.
    pub end_time: f64,
    /// Customers in the input table without a service record. Always zero under [`Termination::Drained`].
    pub unserved: usize,
}

#[derive(Debug)]
enum Checkout {
    Arrivals(Arrivals),
    Lane(Lane),
}

impl Process<Clock, Customer> for Checkout {
    fn resume(&mut self, wake: Wake<Customer>, now: &Clock) -> Result<Suspend<Clock, Customer>, Error> {
        match self {
            Checkout::Arrivals(arrivals) => arrivals.resume(wake, now),
            Checkout::Lane(lane) => lane.resume(wake, now),
        }
    }
}

#[derive(Debug)]
struct Store {
    kernel: Kernel<Checkout, Customer>,
    termination: Termination,
}

impl SimState<Clock> for Store {
    fn is_complete(&self, _: &Clock) -> bool {
        match self.termination {
            Termination::Drained => self.kernel.is_drained(),
            Termination::Horizon { .. } => false,
        }
    }
}

impl Host<Clock> for Store {
    type Item = Customer;
    type Proc = Checkout;

    fn kernel(&self) -> &Kernel<Checkout, Customer> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Checkout, Customer> {
        &mut self.kernel
    }
}

impl Store {
    fn into_ledger(self) -> Ledger {
        Ledger::from_lanes(self.kernel.into_processes().into_iter().filter_map(|process| match process {
            Checkout::Lane(lane) => Some(lane.into_state()),
            Checkout::Arrivals(_) => None,
        }))
    }
}

/// Run the checkout over a customer table.
///
/// The table must be sorted by arrival time; use [`sort_by_arrival()`] first if it may not be. Equal-time events
/// fire in the order they were scheduled, so the same table and configuration always produce the same ledger.
///
/// # Errors
///
/// * [`Error::Config`] or [`Error::Input`] before anything is simulated.
/// * [`Error::Invariant`], [`Error::BackInTime`] or [`Error::NegativeDelay`] if an ordering guarantee breaks while
///   running. These indicate a defect, never bad input.
pub fn simulate(customers: Vec<Customer>, config: &SimConfig) -> Result<Outcome, Error> {
    config.validate()?;
    validate(&customers)?;

    let total = customers.len();
    let last_arrival = customers.last().map_or(0.0, |customer| customer.arrival_time);
    info!(
        customers = total,
        lanes = config.lanes,
        termination = ?config.termination,
        "starting checkout simulation"
    );

    let store = Store {
        kernel: Kernel::new(),
        termination: config.termination,
    };
    let mut sim = Simulation::new(store, clock(0.0)?);
    for server_id in 1..=config.lanes {
        spawn(&mut sim, Checkout::Lane(Lane::new(server_id)))?;
    }
    spawn(&mut sim, Checkout::Arrivals(Arrivals::new(customers)))?;

    match config.termination {
        Termination::Drained => sim.run()?,
        Termination::Horizon { margin } => sim.run_until(clock(last_arrival + margin)?)?,
    }

    let end_time = sim.current_time().into_inner();
    let ledger = sim.into_state().into_ledger();
    let unserved = total - ledger.len();
    if unserved > 0 {
        warn!(
            unserved,
            end_time, "run stopped at its horizon before every customer was served; the ledger is truncated"
        );
    }
    info!(served = ledger.len(), end_time, "checkout simulation finished");

    Ok(Outcome {
        ledger,
        end_time,
        unserved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lanes: u32) -> SimConfig {
        SimConfig {
            lanes,
            termination: Termination::Drained,
        }
    }

    #[test]
    fn single_customer_walks_straight_up() {
        let outcome = simulate(vec![Customer::new(1, 2.0, 3.0)], &config(2)).unwrap();
        let record = outcome.ledger.records()[0];
        assert_eq!(0.0, record.wait_time);
        assert_eq!(1, record.server_id);
        assert_eq!(5.0, record.service_end_time);
        assert_eq!(5.0, outcome.end_time);
        assert_eq!(0, outcome.unserved);
    }

    #[test]
    fn empty_table_produces_empty_ledger() {
        let outcome = simulate(Vec::new(), &config(3)).unwrap();
        assert!(outcome.ledger.is_empty());
        assert_eq!(3, outcome.ledger.lanes().len());
        assert_eq!(0.0, outcome.end_time);
    }

    #[test]
    fn zero_lanes_is_a_config_error() {
        let result = simulate(vec![Customer::new(1, 0.0, 1.0)], &config(0));
        assert_eq!(Err(Error::Config(crate::ConfigError::NoLanes)), result);
    }

    #[test]
    fn unsorted_table_is_rejected_before_running() {
        let customers = vec![Customer::new(1, 5.0, 1.0), Customer::new(2, 1.0, 1.0)];
        assert!(matches!(
            simulate(customers, &config(1)),
            Err(Error::Input(InputError::Unsorted { row: 1, id: 2, .. }))
        ));
    }

    #[test]
    fn horizon_policy_truncates_and_counts_unserved() {
        let customers = vec![
            Customer::new(1, 0.0, 10.0),
            Customer::new(2, 1.0, 10.0),
            Customer::new(3, 2.0, 10.0),
        ];
        let config = SimConfig {
            lanes: 1,
            termination: Termination::Horizon { margin: 13.0 },
        };
        let outcome = simulate(customers, &config).unwrap();

        // horizon at 15: customer 1 done at 10, customer 2 still at the counter until 20
        assert_eq!(1, outcome.ledger.len());
        assert_eq!(2, outcome.unserved);
        assert_eq!(15.0, outcome.end_time);
    }

    #[test]
    fn termination_parses_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            termination: Termination,
        }

        let horizon: Wrapper = toml::from_str("[termination]\npolicy = \"horizon\"\n").unwrap();
        assert_eq!(Termination::Horizon { margin: 1000.0 }, horizon.termination);

        let drained: Wrapper = toml::from_str("[termination]\npolicy = \"drained\"\n").unwrap();
        assert_eq!(Termination::Drained, drained.termination);
    }
}
