use super::Event;
use crate::{SimState, SimTime};
use std::cmp::Ordering;

/// A pending wake-up: the boxed event plus its sort key.
///
/// Ordering compares the due time first and the insertion sequence second, so two wake-ups due at the same instant
/// fire in the order they were scheduled.
#[derive(Debug)]
pub(super) struct EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    pub execution_time: Time,
    pub event: Box<dyn Event<State, Time>>,
    pub insertion_sequence: usize,
}

impl<State, Time> PartialEq<Self> for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<State, Time> Eq for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
}

impl<State, Time> PartialOrd<Self> for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State, Time> Ord for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.execution_time
            .cmp(&other.execution_time)
            .then_with(|| self.insertion_sequence.cmp(&other.insertion_sequence))
    }
}
