use super::{clock, Clock, Customer, ServerState, ServiceRecord};
use crate::error::InvariantViolation;
use crate::process::{Process, Suspend, Wake};
use crate::Error;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Waiting on the shared queue.
    Idle,
    Serving { customer: Customer, started: Clock },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Serving { .. } => "serving",
        }
    }
}

/// One checkout lane: take the next customer from the shared queue, serve them, record it, repeat. Never finishes on
/// its own; the driver decides when to stop.
#[derive(Debug)]
pub struct Lane {
    state: ServerState,
    phase: Phase,
}

impl Lane {
    pub fn new(server_id: u32) -> Self {
        Self {
            state: ServerState::new(server_id),
            phase: Phase::Idle,
        }
    }

    pub fn server_id(&self) -> u32 {
        self.state.server_id
    }

    pub fn is_serving(&self) -> bool {
        matches!(self.phase, Phase::Serving { .. })
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    pub fn into_state(self) -> ServerState {
        self.state
    }

    fn start_service(&mut self, customer: Customer, now: Clock) -> Result<Suspend<Clock, Customer>, Error> {
        let wait = now.into_inner() - customer.arrival_time;
        if wait < 0.0 {
            return Err(InvariantViolation::NegativeWait {
                customer: customer.id,
                wait,
            }
            .into());
        }

        debug!(lane = self.state.server_id, customer = customer.id, wait, "service started");
        self.phase = Phase::Serving { customer, started: now };
        Ok(Suspend::Hold(clock(customer.service_time)?))
    }

    fn finish_service(&mut self, customer: Customer, started: Clock, now: Clock) -> Suspend<Clock, Customer> {
        let record = ServiceRecord::new(&customer, started.into_inner(), now.into_inner(), self.state.server_id);
        debug!(
            lane = self.state.server_id,
            customer = customer.id,
            end = record.service_end_time,
            "service finished"
        );
        self.state.record(record);
        self.phase = Phase::Idle;
        Suspend::Get
    }
}

impl Process<Clock, Customer> for Lane {
    fn resume(&mut self, wake: Wake<Customer>, now: &Clock) -> Result<Suspend<Clock, Customer>, Error> {
        match (self.phase, wake) {
            (Phase::Idle, Wake::Start) => Ok(Suspend::Get),
            (Phase::Idle, Wake::Delivered(customer)) => self.start_service(customer, *now),
            (Phase::Serving { customer, started }, Wake::Timeout) => Ok(self.finish_service(customer, started, *now)),
            (phase, wake) => Err(InvariantViolation::OutOfStep {
                process: format!("lane {}", self.state.server_id),
                wake: wake.name(),
                phase: phase.name(),
            }
            .into()),
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
    fn serves_then_records() {
        let customer = Customer::new(4, 1.0, 2.5);
        let mut lane = Lane::new(2);

        assert_eq!(Suspend::Get, lane.resume(Wake::Start, &at(0.0)).unwrap());
        assert_eq!(Suspend::Hold(at(2.5)), lane.resume(Wake::Delivered(customer), &at(3.0)).unwrap());
        assert!(lane.is_serving());
        assert_eq!(Suspend::Get, lane.resume(Wake::Timeout, &at(5.5)).unwrap());
        assert!(!lane.is_serving());

        let state = lane.into_state();
        assert_eq!(2.5, state.busy_time);
        assert_eq!(1, state.records.len());
        let record = state.records[0];
        assert_eq!(
            (4, 1.0, 3.0, 5.5, 2.0, 2, 4.5),
            (
                record.customer_id,
                record.arrival_time,
                record.service_start_time,
                record.service_end_time,
                record.wait_time,
                record.server_id,
                record.time_in_system
            )
        );
    }

    #[test]
    fn negative_wait_is_an_invariant_violation() {
        let mut lane = Lane::new(1);
        lane.resume(Wake::Start, &at(0.0)).unwrap();
        let early = lane.resume(Wake::Delivered(Customer::new(1, 5.0, 1.0)), &at(4.0));
        assert!(matches!(
            early,
            Err(Error::Invariant(InvariantViolation::NegativeWait { customer: 1, .. }))
        ));
    }

    #[test]
    fn delivery_while_serving_is_rejected() {
        let mut lane = Lane::new(3);
        lane.resume(Wake::Start, &at(0.0)).unwrap();
        lane.resume(Wake::Delivered(Customer::new(1, 0.0, 1.0)), &at(0.0)).unwrap();

        let err = lane
            .resume(Wake::Delivered(Customer::new(2, 0.0, 1.0)), &at(0.0))
            .unwrap_err();
        assert_eq!("simulation invariant violated: lane 3 received a delivery while serving", err.to_string());
    }
}
