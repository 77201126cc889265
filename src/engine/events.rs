mod event_holder;
pub(super) mod event_traits;

use crate::{Error, SimState, SimTime};
use event_holder::EventHolder;
use event_traits::Event;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Add;

/// Priority queue of scheduled events, and the owner of the virtual clock.
///
/// Events will execute in ascending order of execution time, with ties broken by the order in which they were pushed
/// onto the queue. A wake-up scheduled for "now" therefore runs after every wake-up already pending for "now", which
/// is what keeps equal-timestamp arrivals and service completions in a stable order from one run to the next.
///
/// The clock only moves when [`Simulation`] pops the next event. Client code reads it through [`current_time()`] and
/// has no way to set it directly.
///
/// Every scheduling method compares the desired execution time against the current clock time. Attempting to
/// schedule an event for a time that is already past will result in an [`Error::BackInTime`] (or
/// [`Error::NegativeDelay`] for the delay-based method) without modifying the queue.
///
/// [`Simulation`]: crate::engine::Simulation
/// [`current_time()`]: EventQueue::current_time
#[derive(Debug, Default)]
pub struct EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    events: BinaryHeap<Reverse<EventHolder<State, Time>>>,
    last_execution_time: Time,
    events_added: usize,
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Construct a new [`EventQueue`] with no scheduled events and a clock initialized to the provided time.
    pub(crate) fn new(start_time: Time) -> Self {
        Self {
            events: BinaryHeap::default(),
            last_execution_time: start_time,
            events_added: 0,
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time on `self`, returns an [`Error::BackInTime`] to indicate the likely
    /// presence of a logical bug at the call site, with no modifications to the queue.
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        if time < self.last_execution_time {
            return Err(Error::BackInTime);
        }

        self.push(Box::new(event), time);
        Ok(())
    }

    fn push(&mut self, event: Box<dyn Event<State, Time>>, time: Time) {
        let count = self.increment_event_count();
        self.events.push(Reverse(EventHolder {
            execution_time: time,
            event,
            insertion_sequence: count,
        }));
    }

    /// Helper function to make sure incrementing the internal count of added events occurs the same way across all
    /// scheduling methods.
    fn increment_event_count(&mut self) -> usize {
        let count = self.events_added;
        self.events_added += 1;
        count
    }

    /// Crate-internal function to pop an event from the queue. Updates the current clock time to match the execution
    /// time of the popped event.
    pub(crate) fn next(&mut self) -> Option<Box<dyn Event<State, Time>>> {
        let Reverse(holder) = self.events.pop()?;
        self.last_execution_time = holder.execution_time;
        Some(holder.event)
    }

    /// Crate-internal function to move the clock forward without executing anything, used when a run stops at its
    /// horizon. Never moves the clock backward.
    pub(crate) fn advance_to(&mut self, time: Time) {
        if time > self.last_execution_time {
            self.last_execution_time = time;
        }
    }

    /// Get a shared reference to the simulation's current clock time.
    pub fn current_time(&self) -> &Time {
        &self.last_execution_time
    }

    /// Execution time of the earliest pending event, if any.
    pub fn peek_time(&self) -> Option<&Time> {
        self.events.peek().map(|Reverse(holder)| &holder.execution_time)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will still
    /// execute before this event does.
    ///
    /// # Errors
    ///
    /// If the result of calling [`Clone::clone`] on the current sim time results in a new value that is somehow less
    /// than the current sim time, this method will return an [`Error::BackInTime`]. Note that such behavior is not
    /// expected from implementations of [`Clone::clone`] in most cases.
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self.last_execution_time.clone();
        self.schedule(event, event_time)
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    /// Schedule the provided event after the specified delay. The event's execution time will be equal to the result of
    /// `self.current_time().clone() + delay`.
    ///
    /// # Errors
    ///
    /// If the calculated execution time is less than the current clock time on `self`, the delay was negative:
    /// returns an [`Error::NegativeDelay`] with no modifications to the queue.
    pub fn schedule_with_delay<EventType>(&mut self, event: EventType, delay: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self.last_execution_time.clone() + delay;
        if event_time < self.last_execution_time {
            return Err(Error::NegativeDelay);
        }

        self.push(Box::new(event), event_time);
        Ok(())
    }
}

impl<State, Time> std::fmt::Display for EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {:?}",
            self.events.len(),
            self.last_execution_time
        )
    }
}
