use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One row of the input table: who arrives when, and how long they take at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "Customer ID")]
    pub id: u64,
    #[serde(rename = "Arrival Time")]
    pub arrival_time: f64,
    #[serde(rename = "Service Time")]
    pub service_time: f64,
}

impl Customer {
    pub fn new(id: u64, arrival_time: f64, service_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
        }
    }
}

/// Reasons a customer table is rejected before the simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InputError {
    #[error("customer {id} has a non-finite {field}")]
    NonFinite { id: u64, field: &'static str },
    #[error("customer {id} arrives at negative time {arrival_time}")]
    NegativeArrival { id: u64, arrival_time: f64 },
    #[error("customer {id} has non-positive service time {service_time}")]
    NonPositiveService { id: u64, service_time: f64 },
    #[error("customer {id} (row {row}) arrives at {arrival_time}, before the previous row's {previous}")]
    Unsorted {
        row: usize,
        id: u64,
        arrival_time: f64,
        previous: f64,
    },
    #[error("customer id {id} appears more than once")]
    DuplicateId { id: u64 },
}

/// Check the invariants the arrival process relies on: every time finite, arrivals non-negative and in
/// non-decreasing order, service times strictly positive, ids unique.
///
/// # Errors
///
/// Reports the first offending row.
pub fn validate(customers: &[Customer]) -> Result<(), InputError> {
    let mut seen = HashSet::with_capacity(customers.len());
    let mut previous: Option<f64> = None;

    for (row, customer) in customers.iter().enumerate() {
        let id = customer.id;
        if !customer.arrival_time.is_finite() {
            return Err(InputError::NonFinite {
                id,
                field: "arrival time",
            });
        }
        if !customer.service_time.is_finite() {
            return Err(InputError::NonFinite {
                id,
                field: "service time",
            });
        }
        if customer.arrival_time < 0.0 {
            return Err(InputError::NegativeArrival {
                id,
                arrival_time: customer.arrival_time,
            });
        }
        if customer.service_time <= 0.0 {
            return Err(InputError::NonPositiveService {
                id,
                service_time: customer.service_time,
            });
        }
        if let Some(previous) = previous {
            if customer.arrival_time < previous {
                return Err(InputError::Unsorted {
                    row,
                    id,
                    arrival_time: customer.arrival_time,
                    previous,
                });
            }
        }
        if !seen.insert(id) {
            return Err(InputError::DuplicateId { id });
        }
        previous = Some(customer.arrival_time);
    }
    Ok(())
}

/// Stable sort by arrival time. Customers with equal arrival times keep their relative order.
pub fn sort_by_arrival(customers: &mut [Customer]) {
    customers.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Customer> {
        vec![
            Customer::new(1, 0.0, 2.0),
            Customer::new(2, 0.5, 1.0),
            Customer::new(3, 0.5, 3.0),
        ]
    }

    #[test]
    fn accepts_sorted_table_with_ties() {
        assert_eq!(Ok(()), validate(&table()));
        assert_eq!(Ok(()), validate(&[]));
    }

    #[test]
    fn rejects_unsorted_arrivals() {
        let mut customers = table();
        customers.push(Customer::new(4, 0.25, 1.0));
        assert_eq!(
            Err(InputError::Unsorted {
                row: 3,
                id: 4,
                arrival_time: 0.25,
                previous: 0.5
            }),
            validate(&customers)
        );
    }

    #[test]
    fn rejects_bad_times() {
        assert_eq!(
            Err(InputError::NegativeArrival {
                id: 7,
                arrival_time: -1.0
            }),
            validate(&[Customer::new(7, -1.0, 1.0)])
        );
        assert_eq!(
            Err(InputError::NonPositiveService {
                id: 7,
                service_time: 0.0
            }),
            validate(&[Customer::new(7, 1.0, 0.0)])
        );
        assert!(matches!(
            validate(&[Customer::new(7, f64::NAN, 1.0)]),
            Err(InputError::NonFinite { id: 7, .. })
        ));
        assert!(matches!(
            validate(&[Customer::new(7, 1.0, f64::INFINITY)]),
            Err(InputError::NonFinite { id: 7, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let customers = [Customer::new(1, 0.0, 1.0), Customer::new(1, 1.0, 1.0)];
        assert_eq!(Err(InputError::DuplicateId { id: 1 }), validate(&customers));
    }

    #[test]
    fn sort_keeps_ties_in_table_order() {
        let mut customers = vec![
            Customer::new(1, 3.0, 1.0),
            Customer::new(2, 1.0, 1.0),
            Customer::new(3, 3.0, 1.0),
            Customer::new(4, 0.0, 1.0),
        ];
        sort_by_arrival(&mut customers);
        let ids: Vec<u64> = customers.iter().map(|c| c.id).collect();
        assert_eq!(vec![4, 2, 1, 3], ids);
    }
}
