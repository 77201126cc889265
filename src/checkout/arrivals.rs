use super::{clock, Clock, Customer};
use crate::error::InvariantViolation;
use crate::process::{Process, Suspend, Wake};
use crate::Error;

use tracing::debug;

/// Feeds the pre-sorted customer table into the shared queue, each customer at their own arrival time.
///
/// Waits with [`Suspend::Until`] on the tabulated arrival time rather than a computed delay, so the clock lands on
/// exactly that value and a customer who walks up to an idle lane waits exactly zero.
#[derive(Debug)]
pub struct Arrivals {
    upcoming: std::vec::IntoIter<Customer>,
    due: Option<Customer>,
    released: usize,
}

impl Arrivals {
    /// `customers` must already be validated; see [`validate()`].
    ///
    /// [`validate()`]: super::validate
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            upcoming: customers.into_iter(),
            due: None,
            released: 0,
        }
    }

    /// Customers put into the queue so far.
    pub fn released(&self) -> usize {
        self.released
    }

    fn next_arrival(&mut self) -> Result<Suspend<Clock, Customer>, Error> {
        match self.upcoming.next() {
            Some(customer) => {
                let at = clock(customer.arrival_time)?;
                self.due = Some(customer);
                Ok(Suspend::Until(at))
            },
            None => {
                debug!(released = self.released, "arrival process finished");
                Ok(Suspend::Finish)
            },
        }
    }

    fn out_of_step(&self, wake: &Wake<Customer>) -> Error {
        InvariantViolation::OutOfStep {
            process: "arrival process".into(),
            wake: wake.name(),
            phase: if self.due.is_some() {
                "waiting for an arrival"
            } else {
                "between arrivals"
            },
        }
        .into()
    }
}

impl Process<Clock, Customer> for Arrivals {
    fn resume(&mut self, wake: Wake<Customer>, _now: &Clock) -> Result<Suspend<Clock, Customer>, Error> {
        match wake {
            Wake::Start | Wake::Accepted if self.due.is_none() => self.next_arrival(),
            Wake::Timeout => match self.due.take() {
                Some(customer) => {
                    self.released += 1;
                    debug!(customer = customer.id, at = customer.arrival_time, "customer joined the queue");
                    Ok(Suspend::Put(customer))
                },
                None => Err(self.out_of_step(&wake)),
            },
            _ => Err(self.out_of_step(&wake)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: f64) -> Clock {
        clock(value).unwrap()
    }

    #[test]
    fn releases_customers_at_their_arrival_times() {
        let first = Customer::new(1, 0.0, 1.0);
        let second = Customer::new(2, 2.5, 1.0);
        let mut arrivals = Arrivals::new(vec![first, second]);

        assert_eq!(Suspend::Until(at(0.0)), arrivals.resume(Wake::Start, &at(0.0)).unwrap());
        assert_eq!(Suspend::Put(first), arrivals.resume(Wake::Timeout, &at(0.0)).unwrap());
        assert_eq!(Suspend::Until(at(2.5)), arrivals.resume(Wake::Accepted, &at(0.0)).unwrap());
        assert_eq!(Suspend::Put(second), arrivals.resume(Wake::Timeout, &at(2.5)).unwrap());
        assert_eq!(Suspend::Finish, arrivals.resume(Wake::Accepted, &at(2.5)).unwrap());
        assert_eq!(2, arrivals.released());
    }

    #[test]
    fn empty_table_finishes_immediately() {
        let mut arrivals = Arrivals::new(Vec::new());
        assert_eq!(Suspend::Finish, arrivals.resume(Wake::Start, &at(0.0)).unwrap());
    }

    #[test]
    fn deliveries_are_rejected() {
        let customer = Customer::new(1, 0.0, 1.0);
        let mut arrivals = Arrivals::new(vec![customer]);
        assert!(matches!(
            arrivals.resume(Wake::Delivered(customer), &at(0.0)),
            Err(Error::Invariant(InvariantViolation::OutOfStep { .. }))
        ));
    }
}
