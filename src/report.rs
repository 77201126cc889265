//! Performance summary of a finished run.
//!
//! Everything here is computed from a [`Ledger`] alone. Time units are whatever the customer table uses; the text
//! report assumes minutes, which is what the generated workloads model.

use crate::checkout::{Ledger, ServiceRecord};

use std::fmt::{Display, Formatter};

/// Mean lane utilization above which the system is reported as near capacity.
pub const HIGH_UTILIZATION: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneUtilization {
    pub server_id: u32,
    pub busy_time: f64,
    /// Busy time as a percentage of the last service end time.
    pub utilization: f64,
    pub customers_served: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Finding {
    /// Mean lane utilization, above [`HIGH_UTILIZATION`].
    HighUtilization(f64),
    HealthyUtilization(f64),
    /// Customers spend longer in line than at the counter on average.
    WaitExceedsService,
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::HighUtilization(utilization) => write!(
                f,
                "HIGH SYSTEM UTILIZATION ({:.1}%). Servers are near capacity.",
                utilization
            ),
            Finding::HealthyUtilization(utilization) => {
                write!(f, "System utilization is healthy ({:.1}%).", utilization)
            },
            Finding::WaitExceedsService => {
                write!(f, "Wait time exceeds service time. Process is bottlenecked by service rate.")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_customers: usize,
    /// From the first arrival to the last service end.
    pub duration: f64,
    pub throughput_per_hour: f64,
    pub average_wait: f64,
    pub average_service: f64,
    pub average_time_in_system: f64,
    pub p95_wait: f64,
    pub lanes: Vec<LaneUtilization>,
    /// Sample standard deviation of the per-lane customer counts. `None` with fewer than two lanes.
    pub workload_imbalance: Option<f64>,
    pub findings: Vec<Finding>,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    values.sum::<f64>() / n as f64
}

/// Quantile of `values` with linear interpolation between the two closest ranks.
///
/// `values` must be non-empty; it is sorted in place.
fn quantile(values: &mut [f64], q: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    let position = q * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    values[lower] + (values[upper] - values[lower]) * (position - lower as f64)
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values.iter().copied());
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

impl Summary {
    /// Summarize a ledger. Lanes that served nobody count toward utilization and imbalance. Returns `None` when the
    /// ledger has no records.
    pub fn from_ledger(ledger: &Ledger) -> Option<Self> {
        let records = ledger.records();
        if records.is_empty() {
            return None;
        }

        let total_customers = records.len();
        let first_arrival = records.iter().map(|r| r.arrival_time).fold(f64::INFINITY, f64::min);
        let last_end = records.iter().map(|r| r.service_end_time).fold(f64::NEG_INFINITY, f64::max);
        let duration = last_end - first_arrival;
        let throughput_per_hour = if duration > 0.0 {
            total_customers as f64 / duration * 60.0
        } else {
            0.0
        };

        let average_wait = mean(records.iter().map(|r| r.wait_time));
        let average_service = mean(records.iter().map(|r| r.service_time));
        let average_time_in_system = mean(records.iter().map(|r| r.time_in_system));
        let mut waits: Vec<f64> = records.iter().map(|r| r.wait_time).collect();
        let p95_wait = quantile(&mut waits, 0.95);

        let lanes: Vec<LaneUtilization> = ledger
            .lanes()
            .iter()
            .map(|lane| LaneUtilization {
                server_id: lane.server_id,
                busy_time: lane.busy_time,
                utilization: if last_end > 0.0 {
                    lane.busy_time / last_end * 100.0
                } else {
                    0.0
                },
                customers_served: lane.customers_served,
            })
            .collect();
        let counts: Vec<f64> = lanes.iter().map(|lane| lane.customers_served as f64).collect();
        let workload_imbalance = sample_std_dev(&counts);

        let mean_utilization = mean(lanes.iter().map(|lane| lane.utilization));
        let mut findings = vec![if mean_utilization > HIGH_UTILIZATION {
            Finding::HighUtilization(mean_utilization)
        } else {
            Finding::HealthyUtilization(mean_utilization)
        }];
        if average_wait > average_service {
            findings.push(Finding::WaitExceedsService);
        }

        Some(Self {
            total_customers,
            duration,
            throughput_per_hour,
            average_wait,
            average_service,
            average_time_in_system,
            p95_wait,
            lanes,
            workload_imbalance,
            findings,
        })
    }

    /// Summarize bare records, e.g. a results table written by another tool. Only lanes that appear in the records
    /// are known.
    pub fn from_records(records: Vec<ServiceRecord>) -> Option<Self> {
        Self::from_ledger(&Ledger::from_records(records))
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = "==================================================";
        writeln!(f, "{}", rule)?;
        writeln!(f, "SUPERMARKET CHECKOUT SIMULATION REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(f, "OVERALL METRICS")?;
        writeln!(f, "------------------")?;
        writeln!(f, "Total Customers Served: {}", self.total_customers)?;
        writeln!(f, "Total Simulation Time : {:.2} minutes", self.duration)?;
        writeln!(f, "Throughput            : {:.2} customers/hour", self.throughput_per_hour)?;
        writeln!(f, "Average Waiting Time  : {:.2} minutes", self.average_wait)?;
        writeln!(f, "Average Time in System: {:.2} minutes", self.average_time_in_system)?;
        writeln!(f, "95th % Waiting Time   : {:.2} minutes", self.p95_wait)?;
        writeln!(f)?;
        writeln!(f, "COUNTER METRICS")?;
        writeln!(f, "------------------")?;
        for lane in &self.lanes {
            writeln!(
                f,
                "Counter {}: {:.2}% Utilization | Served {} customers",
                lane.server_id, lane.utilization, lane.customers_served
            )?;
        }
        writeln!(f)?;
        match self.workload_imbalance {
            Some(std_dev) => writeln!(f, "Workload Imbalance (StdDev of counts): {:.2}", std_dev)?,
            None => writeln!(f, "Workload Imbalance (StdDev of counts): n/a")?,
        }
        writeln!(f)?;
        writeln!(f, "BOTTLENECK ANALYSIS")?;
        writeln!(f, "----------------------")?;
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(customer_id: u64, arrival: f64, start: f64, service: f64, server_id: u32) -> ServiceRecord {
        let wait_time = start - arrival;
        ServiceRecord {
            customer_id,
            arrival_time: arrival,
            service_start_time: start,
            service_end_time: start + service,
            service_time: service,
            wait_time,
            server_id,
            time_in_system: wait_time + service,
        }
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let mut values = vec![4.0, 0.0, 2.0, 1.0, 3.0];
        assert!((quantile(&mut values, 0.95) - 3.8).abs() < 1e-12);
        assert_eq!(2.0, quantile(&mut values, 0.5));
        assert_eq!(7.0, quantile(&mut [7.0], 0.95));
    }

    #[test]
    fn summary_of_a_saturated_lane() {
        // one lane, A(0, 10) then B(1, 1): B waits 9
        let summary = Summary::from_records(vec![record(1, 0.0, 0.0, 10.0, 1), record(2, 1.0, 10.0, 1.0, 1)]).unwrap();

        assert_eq!(2, summary.total_customers);
        assert_eq!(11.0, summary.duration);
        assert_eq!(4.5, summary.average_wait);
        assert_eq!(5.5, summary.average_service);
        assert_eq!(10.0, summary.average_time_in_system);
        assert!((summary.p95_wait - 8.55).abs() < 1e-9);
        assert!((summary.throughput_per_hour - 2.0 / 11.0 * 60.0).abs() < 1e-9);

        assert_eq!(1, summary.lanes.len());
        assert_eq!(100.0, summary.lanes[0].utilization);
        assert_eq!(None, summary.workload_imbalance);
        assert_eq!(vec![Finding::HighUtilization(100.0)], summary.findings);
    }

    #[test]
    fn even_counts_have_no_imbalance() {
        let ledger = Ledger::from_records(vec![
            record(1, 0.0, 0.0, 2.0, 1),
            record(2, 1.0, 1.0, 2.0, 2),
            record(3, 2.0, 2.0, 2.0, 1),
            record(4, 3.0, 4.0, 6.0, 2),
        ]);
        let summary = Summary::from_ledger(&ledger).unwrap();

        assert_eq!(Some(0.0), summary.workload_imbalance);
        assert_eq!(vec![40.0, 80.0], summary.lanes.iter().map(|l| l.utilization).collect::<Vec<_>>());
        assert_eq!(vec![Finding::HealthyUtilization(60.0)], summary.findings);
    }

    #[test]
    fn long_waits_are_flagged() {
        let summary = Summary::from_records(vec![
            record(1, 0.0, 0.0, 1.0, 1),
            record(2, 0.0, 1.0, 1.0, 2),
            record(3, 0.0, 2.0, 1.0, 1),
            record(4, 0.0, 3.0, 1.0, 2),
        ])
        .unwrap();
        assert!(summary.findings.contains(&Finding::WaitExceedsService));
    }

    #[test]
    fn empty_ledger_has_no_summary() {
        assert_eq!(None, Summary::from_ledger(&Ledger::default()));
    }

    #[test]
    fn report_text_lists_every_counter() {
        let summary = Summary::from_records(vec![record(1, 0.0, 0.0, 2.0, 1), record(2, 0.5, 0.5, 1.5, 2)]).unwrap();
        let text = summary.to_string();
        assert!(text.contains("Total Customers Served: 2"));
        assert!(text.contains("Counter 1: 100.00% Utilization | Served 1 customers"));
        assert!(text.contains("Counter 2: 75.00% Utilization | Served 1 customers"));
        assert!(text.contains("Workload Imbalance (StdDev of counts): 0.00"));
    }
}
