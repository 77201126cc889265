//! Suspendable processes on top of the event engine.
//!
//! A [`Process`] is an explicit state machine. Each time the scheduler hands it control it receives a [`Wake`]
//! describing why, and answers with a [`Suspend`] request describing what it waits for next. The kernel turns those
//! requests into wake-ups on the [`EventQueue`], so every suspension point is a scheduler registration and nothing
//! ever blocks the host thread.
//!
//! Two suspension points exist: a timed delay ([`Suspend::Hold`] / [`Suspend::Until`]) and a blocking take from the
//! shared [`Exchange`] ([`Suspend::Get`]). Offering an item ([`Suspend::Put`]) never blocks, since the exchange is
//! unbounded, and a `Get` that finds an item buffered is answered on the spot.

mod exchange;
mod kernel;

pub use exchange::Exchange;
pub use kernel::{Kernel, Status};

use crate::engine::{Event, EventQueue, Simulation};
use crate::error::InvariantViolation;
use crate::{Error, SimState, SimTime};

use std::fmt::{Debug, Display, Formatter};
use std::ops::Add;
use tracing::trace;

/// Handle to a process registered with a [`Kernel`]. Ids are assigned in spawn order starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(usize);

impl ProcessId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for ProcessId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a process is being resumed.
#[derive(Debug, Clone, PartialEq)]
pub enum Wake<Item> {
    /// First resumption after [`spawn()`].
    Start,
    /// A [`Suspend::Hold`] or [`Suspend::Until`] has elapsed.
    Timeout,
    /// The exchange delivered an item in answer to [`Suspend::Get`].
    Delivered(Item),
    /// The exchange accepted the item offered with [`Suspend::Put`].
    Accepted,
}

impl<Item> Wake<Item> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Wake::Start => "start",
            Wake::Timeout => "timeout",
            Wake::Delivered(_) => "delivery",
            Wake::Accepted => "acceptance",
        }
    }
}

/// What a process waits for next.
#[derive(Debug, Clone, PartialEq)]
pub enum Suspend<Time, Item> {
    /// Resume with [`Wake::Timeout`] after the given delay.
    Hold(Time),
    /// Resume with [`Wake::Timeout`] at the given instant.
    Until(Time),
    /// Resume with [`Wake::Delivered`] once the exchange has an item for this process.
    Get,
    /// Enqueue the item and resume immediately with [`Wake::Accepted`].
    Put(Item),
    /// Never resume again.
    Finish,
}

/// A logical, independently suspendable unit of simulated behavior.
pub trait Process<Time, Item>: Debug {
    /// Run until the next suspension point.
    ///
    /// # Errors
    ///
    /// Returning an error stops the simulation; it surfaces unchanged from [`Simulation::run()`].
    fn resume(&mut self, wake: Wake<Item>, now: &Time) -> Result<Suspend<Time, Item>, Error>;
}

/// A simulation state that embeds a [`Kernel`], letting [`Resume`] events reach the processes.
pub trait Host<Time>: SimState<Time>
where
    Time: SimTime,
{
    type Item: Debug + 'static;
    type Proc: Process<Time, Self::Item>;

    fn kernel(&self) -> &Kernel<Self::Proc, Self::Item>;

    fn kernel_mut(&mut self) -> &mut Kernel<Self::Proc, Self::Item>;
}

/// The single event type of a process-oriented model: hand control back to one process.
#[derive(Debug)]
pub struct Resume<Item> {
    process: ProcessId,
    wake: Option<Wake<Item>>,
}

impl<Item> Resume<Item> {
    fn new(process: ProcessId, wake: Wake<Item>) -> Self {
        Self {
            process,
            wake: Some(wake),
        }
    }
}

impl<State, Time> Event<State, Time> for Resume<State::Item>
where
    State: Host<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result {
        let Some(wake) = self.wake.take() else {
            return Err(InvariantViolation::UnexpectedWake {
                process: self.process.0,
                wake: "repeated wake-up",
                state: "already resumed",
            }
            .into());
        };
        dispatch(simulation_state, event_queue, self.process, wake)
    }
}

/// Register `process` with the kernel and schedule its [`Wake::Start`] at the current time. Processes spawned at the
/// same instant start in spawn order.
///
/// # Errors
///
/// Only fails if the clock type's [`Clone`] misbehaves; see [`EventQueue::schedule_now()`].
pub fn spawn<State, Time>(sim: &mut Simulation<State, Time>, process: State::Proc) -> Result<ProcessId, Error>
where
    State: Host<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    let id = sim.state_mut().kernel_mut().register(process);
    sim.schedule_now(Resume::new(id, Wake::Start))?;
    Ok(id)
}

/// Resume one process and keep it running until it reaches a suspension point that needs the scheduler.
fn dispatch<State, Time>(
    state: &mut State,
    event_queue: &mut EventQueue<State, Time>,
    id: ProcessId,
    wake: Wake<State::Item>,
) -> crate::Result
where
    State: Host<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    let kernel = state.kernel_mut();
    kernel.begin(id, &wake)?;

    let mut wake = wake;
    loop {
        let request = kernel.process_mut(id)?.resume(wake, event_queue.current_time())?;
        trace!(process = %id, now = ?event_queue.current_time(), ?request, "process suspended");

        wake = match request {
            Suspend::Hold(delay) => {
                return event_queue.schedule_with_delay(Resume::new(id, Wake::Timeout), delay);
            },
            Suspend::Until(instant) => {
                return event_queue.schedule(Resume::new(id, Wake::Timeout), instant);
            },
            Suspend::Get => match kernel.request(id)? {
                Some(item) => Wake::Delivered(item),
                None => return Ok(()),
            },
            Suspend::Put(item) => {
                if let Some((waiter, item)) = kernel.offer(item)? {
                    event_queue.schedule_now(Resume::new(waiter, Wake::Delivered(item)))?;
                }
                Wake::Accepted
            },
            Suspend::Finish => return kernel.finish(id),
        };
    }
}
