//! # Overview
//!
//! checkout-sim is a discrete-event simulation of a supermarket checkout: customers join one shared first-come,
//! first-served line and are served by whichever of N identical lanes asks for the next customer first. The crate is
//! built in three layers, each usable on its own:
//!
//! * [`engine`] is a generic event queue and runner. Events are ordered by execution time and then by the order in
//!   which they were scheduled, so equal-time events always fire in a reproducible order. Parameterizing over the
//!   [`SimState`] and [`SimTime`] traits gives events exclusive access to your state and full control over how time is
//!   represented.
//! * [`process`] turns the engine into a process-oriented simulator. Each logical process is an explicit state machine
//!   implementing [`Process`]: it is resumed with a [`Wake`] and answers with a [`Suspend`] describing what it waits
//!   for next, either a span of virtual time or an item from the shared [`Exchange`].
//! * [`checkout`] is the queueing model itself. [`simulate()`] runs an arrival process and the lanes over a customer
//!   table and returns a [`Ledger`] with one [`ServiceRecord`] per customer.
//!
//! Around the model sit a seeded [`workload`] generator, CSV interchange in [`table`], a performance [`report`], and
//! TOML run configuration in [`config`]. The `checkout-sim` binary wires these together on the command line.
//!
//! # Example
//!
//! ```
//! use checkout_sim::checkout::{simulate, Customer};
//! use checkout_sim::config::SimConfig;
//!
//! let customers = vec![Customer::new(1, 0.0, 10.0), Customer::new(2, 1.0, 1.0)];
//! let config = SimConfig { lanes: 1, ..SimConfig::default() };
//! let outcome = simulate(customers, &config)?;
//!
//! // strictly first come, first served: the short job waits for the long one
//! assert_eq!(Some(9.0), outcome.ledger.get(2).map(|record| record.wait_time));
//! # Ok::<(), checkout_sim::Error>(())
//! ```
//!
//! [`Process`]: process::Process
//! [`Wake`]: process::Wake
//! [`Suspend`]: process::Suspend
//! [`Exchange`]: process::Exchange
//! [`simulate()`]: checkout::simulate
//! [`Ledger`]: checkout::Ledger
//! [`ServiceRecord`]: checkout::ServiceRecord

mod error;
mod generic_parameters;
pub mod checkout;
pub mod config;
pub mod engine;
pub mod process;
pub mod report;
pub mod table;
pub mod workload;

pub use error::{ConfigError, Error, InvariantViolation, Result};
pub use generic_parameters::{SimState, SimTime};
