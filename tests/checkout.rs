mod util;

use checkout_sim::checkout::{simulate, Customer, Ledger, Termination};
use checkout_sim::config::SimConfig;
use checkout_sim::report::Summary;
use checkout_sim::table;
use checkout_sim::workload::WorkloadSpec;

fn lanes(lanes: u32) -> SimConfig {
    SimConfig {
        lanes,
        termination: Termination::Drained,
    }
}

fn run(customers: Vec<Customer>, config: &SimConfig) -> Ledger {
    simulate(customers, config).expect("simulation should complete normally").ledger
}

fn generated(customers: usize, seed: u64) -> Vec<Customer> {
    WorkloadSpec {
        customers,
        seed,
        ..WorkloadSpec::default()
    }
    .generate()
    .expect("default workload parameters are valid")
}

#[test]
fn idle_lane_serves_on_arrival() {
    let ledger = run(vec![Customer::new(1, 0.0, 2.0), Customer::new(2, 5.0, 1.0)], &lanes(1));

    assert_eq!(2, ledger.len());
    for record in ledger.records() {
        assert_eq!(0.0, record.wait_time, "customer {} should not wait", record.customer_id);
        assert_eq!(record.arrival_time, record.service_start_time);
    }
}

#[test]
fn short_job_waits_behind_long_one() {
    let ledger = run(vec![Customer::new(1, 0.0, 10.0), Customer::new(2, 1.0, 1.0)], &lanes(1));

    let b = ledger.get(2).unwrap();
    assert_eq!(9.0, b.wait_time);
    assert_eq!(10.0, b.service_start_time);
    assert_eq!(11.0, b.service_end_time);
    assert_eq!(10.0, b.time_in_system);
}

#[test]
fn first_lane_to_free_up_takes_the_next_customer() {
    let customers = vec![
        Customer::new(1, 0.0, 5.0),
        Customer::new(2, 0.1, 5.0),
        Customer::new(3, 0.2, 5.0),
    ];
    let ledger = run(customers, &lanes(2));

    let servers: Vec<u32> = ledger.records().iter().map(|r| r.server_id).collect();
    assert_eq!(vec![1, 2, 1], servers);

    let third = ledger.get(3).unwrap();
    assert_eq!(5.0, third.service_start_time);
    assert_floats_near_equal!(4.8, third.wait_time, "third customer waits for lane 1");
}

#[test]
fn simultaneous_arrivals_fill_lanes_in_order() {
    let customers = (1..=4).map(|id| Customer::new(id, 1.0, 2.0)).collect();
    let ledger = run(customers, &lanes(3));

    let servers: Vec<u32> = ledger.records().iter().map(|r| r.server_id).collect();
    assert_eq!(vec![1, 2, 3, 1], servers);
    assert_eq!(2.0, ledger.get(4).unwrap().wait_time);
}

#[test]
fn every_customer_is_served_exactly_once() {
    let customers = generated(2_000, 7);
    let ledger = run(customers.clone(), &lanes(3));

    assert_eq!(customers.len(), ledger.len());
    let ids: Vec<u64> = ledger.records().iter().map(|r| r.customer_id).collect();
    let expected: Vec<u64> = customers.iter().map(|c| c.id).collect();
    assert_eq!(expected, ids);

    let per_lane: usize = ledger.lanes().iter().map(|lane| lane.customers_served).sum();
    assert_eq!(customers.len(), per_lane);
}

#[test]
fn records_are_internally_consistent() {
    let customers = generated(2_000, 8);
    let ledger = run(customers.clone(), &lanes(2));

    for (customer, record) in customers.iter().zip(ledger.records()) {
        assert_eq!(customer.id, record.customer_id);
        assert_eq!(customer.arrival_time, record.arrival_time);
        assert_eq!(customer.service_time, record.service_time);
        assert!(record.wait_time >= 0.0, "negative wait for {}", record.customer_id);
        assert!(record.service_start_time >= record.arrival_time);
        assert_eq!(
            record.service_start_time + record.service_time,
            record.service_end_time,
            "end time of customer {}",
            record.customer_id
        );
        assert!((1..=2).contains(&record.server_id));
    }
}

#[test]
fn service_starts_in_arrival_order() {
    let customers = generated(3_000, 9);
    let ledger = run(customers, &lanes(3));

    // the n-th customer to arrive is the n-th to reach a counter, across all lanes
    for pair in ledger.records().windows(2) {
        assert!(
            pair[0].service_start_time <= pair[1].service_start_time,
            "customer {} started after customer {}",
            pair[0].customer_id,
            pair[1].customer_id
        );
    }

    for lane in ledger.lanes() {
        let served: Vec<_> = ledger.for_lane(lane.server_id).collect();
        for pair in served.windows(2) {
            assert!(pair[0].service_end_time <= pair[1].service_start_time);
        }
    }
}

#[test]
fn same_input_same_ledger() {
    let customers = generated(1_000, 10);
    let first = run(customers.clone(), &lanes(3));
    let second = run(customers, &lanes(3));
    assert_eq!(first, second);

    let mut first_bytes = Vec::new();
    let mut second_bytes = Vec::new();
    table::write_ledger(&mut first_bytes, &first).unwrap();
    table::write_ledger(&mut second_bytes, &second).unwrap();
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn short_horizon_drops_customers_with_a_count() {
    let customers = generated(500, 11);
    let last_arrival = customers.last().unwrap().arrival_time;
    let config = SimConfig {
        lanes: 1,
        termination: Termination::Horizon { margin: 0.0 },
    };

    // one lane at this load cannot keep up, so the line is still long at the last arrival
    let outcome = simulate(customers.clone(), &config).unwrap();
    assert!(outcome.unserved > 0);
    assert_eq!(customers.len(), outcome.ledger.len() + outcome.unserved);
    assert_eq!(last_arrival, outcome.end_time);
    assert!(outcome.ledger.records().iter().all(|r| r.service_end_time <= last_arrival));

    let drained = simulate(customers.clone(), &lanes(1)).unwrap();
    assert_eq!(0, drained.unserved);
    assert_eq!(customers.len(), drained.ledger.len());
}

#[test]
fn tables_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("customers.csv");
    let output = dir.path().join("simulation_results.csv");

    let customers = generated(300, 12);
    table::save_customers(&input, &customers).unwrap();
    let loaded = table::load_customers(&input).unwrap();
    assert_eq!(customers, loaded);

    let outcome = simulate(loaded, &lanes(3)).unwrap();
    table::save_ledger(&output, &outcome.ledger).unwrap();
    let reread = table::load_ledger(&output).unwrap();
    assert_eq!(outcome.ledger.records(), reread.records());

    let summary = Summary::from_ledger(&reread).unwrap();
    assert_eq!(300, summary.total_customers);
    assert_eq!(3, summary.lanes.len());
}
