use super::Customer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One customer's complete timeline through the checkout. Written once, when the lane finishes serving them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "Customer ID")]
    pub customer_id: u64,
    #[serde(rename = "Arrival Time")]
    pub arrival_time: f64,
    #[serde(rename = "Service Start Time")]
    pub service_start_time: f64,
    #[serde(rename = "Service End Time")]
    pub service_end_time: f64,
    #[serde(rename = "Service Time")]
    pub service_time: f64,
    #[serde(rename = "Wait Time")]
    pub wait_time: f64,
    #[serde(rename = "Server ID")]
    pub server_id: u32,
    #[serde(rename = "Time in System")]
    pub time_in_system: f64,
}

impl ServiceRecord {
    pub(crate) fn new(customer: &Customer, service_start_time: f64, service_end_time: f64, server_id: u32) -> Self {
        let wait_time = service_start_time - customer.arrival_time;
        Self {
            customer_id: customer.id,
            arrival_time: customer.arrival_time,
            service_start_time,
            service_end_time,
            service_time: customer.service_time,
            wait_time,
            server_id,
            time_in_system: wait_time + customer.service_time,
        }
    }
}

/// Everything one lane accumulates. Only that lane's own process writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerState {
    pub server_id: u32,
    pub busy_time: f64,
    pub records: Vec<ServiceRecord>,
}

impl ServerState {
    pub(crate) fn new(server_id: u32) -> Self {
        Self {
            server_id,
            busy_time: 0.0,
            records: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, record: ServiceRecord) {
        self.busy_time += record.service_time;
        self.records.push(record);
    }
}

/// Per-lane totals carried alongside the records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneSummary {
    pub server_id: u32,
    pub busy_time: f64,
    pub customers_served: usize,
}

/// The output of a run: every service record ordered by customer id, plus per-lane totals ordered by server id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    records: Vec<ServiceRecord>,
    lanes: Vec<LaneSummary>,
}

impl Ledger {
    /// Merge the lanes' own records. Lanes that served nobody still appear in [`lanes()`].
    ///
    /// [`lanes()`]: Ledger::lanes
    pub(crate) fn from_lanes(states: impl IntoIterator<Item = ServerState>) -> Self {
        let mut records = Vec::new();
        let mut lanes = Vec::new();
        for state in states {
            lanes.push(LaneSummary {
                server_id: state.server_id,
                busy_time: state.busy_time,
                customers_served: state.records.len(),
            });
            records.extend(state.records);
        }
        records.sort_by_key(|record| record.customer_id);
        lanes.sort_by_key(|lane| lane.server_id);
        Self { records, lanes }
    }

    /// Rebuild a ledger from bare records, e.g. ones read back from a results table. Lane totals are derived from
    /// the records, so a lane that served nobody is absent.
    pub fn from_records(mut records: Vec<ServiceRecord>) -> Self {
        records.sort_by_key(|record| record.customer_id);

        let mut lanes: BTreeMap<u32, LaneSummary> = BTreeMap::new();
        for record in &records {
            let lane = lanes.entry(record.server_id).or_insert(LaneSummary {
                server_id: record.server_id,
                busy_time: 0.0,
                customers_served: 0,
            });
            lane.busy_time += record.service_time;
            lane.customers_served += 1;
        }

        Self {
            records,
            lanes: lanes.into_values().collect(),
        }
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn lanes(&self) -> &[LaneSummary] {
        &self.lanes
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, customer_id: u64) -> Option<&ServiceRecord> {
        self.records
            .binary_search_by_key(&customer_id, |record| record.customer_id)
            .ok()
            .map(|index| &self.records[index])
    }

    /// Records served by one lane, in customer-id order.
    pub fn for_lane(&self, server_id: u32) -> impl Iterator<Item = &ServiceRecord> + '_ {
        self.records.iter().filter(move |record| record.server_id == server_id)
    }

    pub fn into_records(self) -> Vec<ServiceRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(server_id: u32, served: &[(u64, f64, f64, f64)]) -> ServerState {
        let mut state = ServerState::new(server_id);
        for &(id, arrival, start, service) in served {
            let customer = Customer::new(id, arrival, service);
            state.record(ServiceRecord::new(&customer, start, start + service, server_id));
        }
        state
    }

    #[test]
    fn record_derives_wait_and_time_in_system() {
        let record = ServiceRecord::new(&Customer::new(9, 1.0, 1.0), 10.0, 11.0, 2);
        assert_eq!(9.0, record.wait_time);
        assert_eq!(10.0, record.time_in_system);
        assert_eq!(2, record.server_id);
    }

    #[test]
    fn ledger_orders_records_by_customer() {
        let ledger = Ledger::from_lanes(vec![
            lane(2, &[(2, 0.5, 0.5, 4.0)]),
            lane(1, &[(1, 0.0, 0.0, 1.0), (3, 0.75, 1.0, 2.0)]),
            lane(3, &[]),
        ]);

        let ids: Vec<u64> = ledger.records().iter().map(|r| r.customer_id).collect();
        assert_eq!(vec![1, 2, 3], ids);

        let lanes: Vec<(u32, f64, usize)> = ledger
            .lanes()
            .iter()
            .map(|l| (l.server_id, l.busy_time, l.customers_served))
            .collect();
        assert_eq!(vec![(1, 3.0, 2), (2, 4.0, 1), (3, 0.0, 0)], lanes);

        assert_eq!(Some(0.25), ledger.get(3).map(|r| r.wait_time));
        assert_eq!(None, ledger.get(4));
        assert_eq!(2, ledger.for_lane(1).count());
    }

    #[test]
    fn from_records_rebuilds_lane_totals() {
        let original = Ledger::from_lanes(vec![
            lane(1, &[(1, 0.0, 0.0, 1.0), (3, 0.75, 1.0, 2.0)]),
            lane(2, &[(2, 0.5, 0.5, 4.0)]),
        ]);
        let rebuilt = Ledger::from_records(original.clone().into_records());
        assert_eq!(original, rebuilt);
    }
}
