use super::ProcessId;

use std::collections::VecDeque;

/// Unbounded FIFO handoff buffer between producing and consuming processes.
///
/// At any moment either items are buffered or consumers are waiting, never both: an [`enqueue()`] with a consumer
/// already waiting hands the item straight to the longest-waiting one. Delivery order is strictly the order of
/// enqueueing, so the n-th item enqueued is always the n-th item delivered no matter which consumer receives it.
///
/// [`enqueue()`]: Exchange::enqueue
#[derive(Debug)]
pub struct Exchange<Item> {
    items: VecDeque<Item>,
    waiters: VecDeque<ProcessId>,
    enqueued: usize,
    delivered: usize,
}

impl<Item> Exchange<Item> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            waiters: VecDeque::new(),
            enqueued: 0,
            delivered: 0,
        }
    }

    /// Offer an item. Returns the item together with the consumer it must be delivered to when one was waiting;
    /// returns `None` when the item was buffered instead.
    pub fn enqueue(&mut self, item: Item) -> Option<(ProcessId, Item)> {
        self.enqueued += 1;
        match self.waiters.pop_front() {
            Some(waiter) => {
                debug_assert!(self.items.is_empty(), "items buffered while a consumer was waiting");
                self.delivered += 1;
                Some((waiter, item))
            },
            None => {
                self.items.push_back(item);
                None
            },
        }
    }

    /// Take the oldest buffered item. On a miss `requester` joins the back of the waiter line and `None` is
    /// returned; the requester must then stay suspended until an [`enqueue()`] delivers to it.
    ///
    /// [`enqueue()`]: Exchange::enqueue
    pub fn dequeue(&mut self, requester: ProcessId) -> Option<Item> {
        match self.items.pop_front() {
            Some(item) => {
                self.delivered += 1;
                Some(item)
            },
            None => {
                self.waiters.push_back(requester);
                None
            },
        }
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumers currently blocked, longest-waiting first.
    pub fn waiters(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.waiters.iter().copied()
    }

    /// Total items ever enqueued.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    /// Total items ever handed to a consumer.
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl<Item> Default for Exchange<Item> {
    fn default() -> Self {
        Self::new()
    }
}
