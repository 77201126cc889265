//! The event scheduler and virtual clock.
//!
//! An [`EventQueue`] owns the clock and the pending wake-ups; a [`Simulation`] owns the queue together with the
//! model state and drives the two in a single-threaded loop.

mod events;
mod simulation;

pub use events::event_traits::Event;
pub use events::EventQueue;
pub use simulation::Simulation;
