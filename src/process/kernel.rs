use super::{Exchange, ProcessId, Wake};
use crate::error::InvariantViolation;
use crate::Error;

/// Where a process currently stands with respect to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A wake-up for the process is pending in the event queue.
    Scheduled,
    /// Blocked on the exchange; only a delivery can wake it.
    Waiting,
    /// Returned [`Suspend::Finish`]; never resumed again.
    ///
    /// [`Suspend::Finish`]: super::Suspend::Finish
    Finished,
}

impl Status {
    fn name(self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::Waiting => "waiting",
            Status::Finished => "finished",
        }
    }
}

#[derive(Debug)]
struct Slot<P> {
    process: P,
    status: Status,
    /// Received an item it has not yet come back to the exchange for.
    holds_item: bool,
}

/// Process table plus the shared exchange.
///
/// The kernel does the bookkeeping the termination check depends on: how many processes still have a wake-up
/// pending, and how many delivered items are settled, i.e. their consumer has since asked the exchange for another
/// item or finished.
#[derive(Debug)]
pub struct Kernel<P, Item> {
    slots: Vec<Slot<P>>,
    exchange: Exchange<Item>,
    scheduled: usize,
    served: usize,
}

impl<P, Item> Kernel<P, Item> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            exchange: Exchange::new(),
            scheduled: 0,
            served: 0,
        }
    }

    /// Register a process. Its status starts as [`Status::Scheduled`]; the caller is responsible for scheduling the
    /// matching [`Wake::Start`], which [`spawn()`] does.
    ///
    /// [`spawn()`]: super::spawn
    pub fn register(&mut self, process: P) -> ProcessId {
        let id = ProcessId(self.slots.len());
        self.slots.push(Slot {
            process,
            status: Status::Scheduled,
            holds_item: false,
        });
        self.scheduled += 1;
        id
    }

    pub fn process(&self, id: ProcessId) -> Option<&P> {
        self.slots.get(id.0).map(|slot| &slot.process)
    }

    /// All registered processes, in spawn order.
    pub fn processes(&self) -> impl Iterator<Item = (ProcessId, &P)> + '_ {
        self.slots.iter().enumerate().map(|(i, slot)| (ProcessId(i), &slot.process))
    }

    /// Consume the kernel, keeping the processes in spawn order.
    pub fn into_processes(self) -> Vec<P> {
        self.slots.into_iter().map(|slot| slot.process).collect()
    }

    pub fn status(&self, id: ProcessId) -> Option<Status> {
        self.slots.get(id.0).map(|slot| slot.status)
    }

    pub fn exchange(&self) -> &Exchange<Item> {
        &self.exchange
    }

    /// Processes that still have a wake-up pending.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Delivered items whose consumer has come back to the exchange or finished.
    pub fn served(&self) -> usize {
        self.served
    }

    /// True once no process has a wake-up pending and every item ever enqueued has been served. Producers never
    /// wait on the exchange, so this also means every producer has finished.
    pub fn is_drained(&self) -> bool {
        self.scheduled == 0 && self.exchange.enqueued() == self.served
    }

    fn slot_mut(&mut self, id: ProcessId) -> Result<&mut Slot<P>, Error> {
        self.slots
            .get_mut(id.0)
            .ok_or_else(|| InvariantViolation::UnknownProcess(id.0).into())
    }

    /// Check that a wake-up popped from the event queue matches the process' status.
    pub(super) fn begin(&mut self, id: ProcessId, wake: &Wake<Item>) -> crate::Result {
        let slot = self.slot_mut(id)?;
        if slot.status != Status::Scheduled {
            return Err(InvariantViolation::UnexpectedWake {
                process: id.0,
                wake: wake.name(),
                state: slot.status.name(),
            }
            .into());
        }
        Ok(())
    }

    pub(super) fn process_mut(&mut self, id: ProcessId) -> Result<&mut P, Error> {
        Ok(&mut self.slot_mut(id)?.process)
    }

    /// The process is done with whatever item it held.
    fn settle(&mut self, id: ProcessId) -> crate::Result {
        let slot = self.slot_mut(id)?;
        if slot.holds_item {
            slot.holds_item = false;
            self.served += 1;
        }
        Ok(())
    }

    /// Ask the exchange for an item on behalf of `id`. On a miss the process is parked as a waiter.
    pub(super) fn request(&mut self, id: ProcessId) -> Result<Option<Item>, Error> {
        self.settle(id)?;
        match self.exchange.dequeue(id) {
            Some(item) => {
                self.slot_mut(id)?.holds_item = true;
                Ok(Some(item))
            },
            None => {
                self.slot_mut(id)?.status = Status::Waiting;
                self.scheduled -= 1;
                Ok(None)
            },
        }
    }

    /// Offer an item to the exchange. Returns the waiter it was handed to, which the caller must wake with the item.
    pub(super) fn offer(&mut self, item: Item) -> Result<Option<(ProcessId, Item)>, Error> {
        let Some((waiter, item)) = self.exchange.enqueue(item) else {
            return Ok(None);
        };

        let slot = self.slot_mut(waiter)?;
        if slot.status != Status::Waiting || slot.holds_item {
            return Err(InvariantViolation::DoubleDelivery(waiter.0).into());
        }
        slot.status = Status::Scheduled;
        slot.holds_item = true;
        self.scheduled += 1;
        Ok(Some((waiter, item)))
    }

    pub(super) fn finish(&mut self, id: ProcessId) -> crate::Result {
        self.settle(id)?;
        self.slot_mut(id)?.status = Status::Finished;
        self.scheduled -= 1;
        Ok(())
    }
}

impl<P, Item> Default for Kernel<P, Item> {
    fn default() -> Self {
        Self::new()
    }
}
