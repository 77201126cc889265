use super::EventQueue;
use crate::{SimState, SimTime};
use std::fmt::Debug;

/// A wake-up that fires at a point in simulated time.
///
/// The one required method describes what happens when the wake-up fires. The trait is generic over the simulation
/// state and the clock type so that a model's state and its events are checked against each other at compile time.
///
/// Requiring implementors to be [`Debug`] enables printing the full contents of an [`EventQueue`] when necessary.
///
/// Process-oriented models rarely implement this directly; the [`Resume`] event in the process layer covers the
/// common case of handing control back to a suspended process.
///
/// [`Resume`]: crate::process::Resume
pub trait Event<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Update the simulation according to the specific type of event. The simulation will invoke this method during
    /// [`Simulation::run()`] for each scheduled event in sequence. Exclusive access will be provided to both the
    /// simulation's current state and the event queue, allowing for both mutation of the simulation's state and
    /// scheduling of new events.
    ///
    /// The simulation's clock time, accessible on the `event_queue` parameter, is updated before this method runs.
    ///
    /// # Errors
    ///
    /// Any error returned here stops [`Simulation::run()`] and is handed back to its caller unchanged. Client errors
    /// that don't fit one of the crate's variants can be wrapped in [`Error::BadExecution`].
    ///
    /// [`Simulation::run()`]: crate::engine::Simulation::run
    /// [`Error::BadExecution`]: crate::Error::BadExecution
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result;
}
