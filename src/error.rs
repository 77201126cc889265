use thiserror::Error;

use crate::checkout::InputError;

/// Errors that may be encountered while configuring or executing
/// a simulation.
///
/// The [`BackInTime`] and [`NegativeDelay`] variants originate
/// from the safe interface of the [`EventQueue`] to indicate that
/// an event's scheduled execution time is prior to the queue's
/// current time. Either error likely corresponds to a logical bug
/// on the client side, e.g. forgetting to add an offset to the
/// current time when scheduling a new event.
///
/// [`Input`] and [`Config`] are raised before the first event
/// executes; nothing has been simulated when they are returned.
///
/// [`Invariant`] signals that the ordering guarantees of the
/// scheduler or the shared queue were broken at runtime. These are
/// never clamped or recovered from, since every downstream metric
/// would be corrupt.
///
/// The [`BadExecution`] variant originates from client code,
/// providing a wrapper that can pass through [`Simulation::run()`]
/// in a type-safe manner.
///
/// [`EventQueue`]: crate::engine::EventQueue
/// [`Simulation::run()`]: crate::engine::Simulation::run
/// [`BackInTime`]: Error::BackInTime
/// [`NegativeDelay`]: Error::NegativeDelay
/// [`Input`]: Error::Input
/// [`Config`]: Error::Config
/// [`Invariant`]: Error::Invariant
/// [`BadExecution`]: Error::BadExecution
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The event queue rejected an event that would
    /// have been scheduled for a time that has
    /// already passed.
    #[error("event execution time is less than current simulation time")]
    BackInTime,
    /// The event queue rejected a delay that would
    /// move the clock backward.
    #[error("cannot schedule an event with a negative delay")]
    NegativeDelay,
    /// The customer table failed validation.
    #[error("invalid customer table: {0}")]
    Input(#[from] InputError),
    /// The run configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An ordering guarantee was broken while running.
    #[error("simulation invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
    /// A client-generated error was encountered
    /// while executing an event. Call [`source()`]
    /// or unpack this value to handle it directly.
    ///
    /// [`source()`]: std::error::Error::source
    #[error("error while executing event: {0}")]
    BadExecution(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::BackInTime, Error::BackInTime) => true,
            (Error::NegativeDelay, Error::NegativeDelay) => true,
            (Error::Input(e1), Error::Input(e2)) => e1 == e2,
            (Error::Config(e1), Error::Config(e2)) => e1 == e2,
            (Error::Invariant(e1), Error::Invariant(e2)) => e1 == e2,
            (Error::BadExecution(e1), Error::BadExecution(e2)) => {
                let e1: *const dyn std::error::Error = e1.as_ref();
                let e2: *const dyn std::error::Error = e2.as_ref();
                std::ptr::eq(e1, e2)
            },
            _ => false,
        }
    }
}

/// Problems with the run configuration, detected before the simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("at least one checkout lane is required")]
    NoLanes,
    #[error("horizon margin must be a finite, non-negative number (got {0})")]
    BadMargin(f64),
    #[error("workload parameter `{name}` must be a finite, positive number (got {value})")]
    BadWorkload { name: &'static str, value: f64 },
    #[error("unable to read config file: {0}")]
    Read(String),
    #[error("unable to parse config file: {0}")]
    Parse(String),
}

/// Runtime conditions that can only arise from a defect in the scheduler or the
/// shared-queue handoff.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("customer {customer} would wait a negative {wait} time units")]
    NegativeWait { customer: u64, wait: f64 },
    #[error("process {process} was woken with {wake} while {state}")]
    UnexpectedWake {
        process: usize,
        wake: &'static str,
        state: &'static str,
    },
    #[error("{process} received a {wake} while {phase}")]
    OutOfStep {
        process: String,
        wake: &'static str,
        phase: &'static str,
    },
    #[error("item delivered to process {0}, which was not waiting on the exchange")]
    DoubleDelivery(usize),
    #[error("clock value is not a number")]
    NanClock,
    #[error("no process is registered under id {0}")]
    UnknownProcess(usize),
}

/// [`std::result::Result`]`<(), `[`checkout_sim::Error`]`>`
///
/// A type alias that simplifies the signatures of
/// the scheduling functions.
///
/// [`checkout_sim::Error`]: Error
pub type Result = std::result::Result<(), Error>;
