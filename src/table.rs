//! CSV interchange for customer tables and ledgers.
//!
//! Column headers follow the tables the checkout has always exchanged with its data generator and its analysis
//! scripts: `Customer ID, Arrival Time, Service Time` in, and the [`ServiceRecord`] columns out.

use crate::checkout::{sort_by_arrival, Customer, Ledger, ServiceRecord};
use crate::Error;

use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Read a customer table and sort it by arrival time. Rows with equal arrival times keep their table order.
///
/// # Errors
///
/// Malformed rows are reported as [`Error::Csv`]. No value checks happen here; [`simulate()`] validates the table.
///
/// [`simulate()`]: crate::checkout::simulate
pub fn read_customers<R: Read>(reader: R) -> Result<Vec<Customer>, Error> {
    let mut customers = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<Customer>, _>>()?;
    sort_by_arrival(&mut customers);
    debug!(rows = customers.len(), "read customer table");
    Ok(customers)
}

/// # Errors
///
/// See [`read_customers()`]; a missing or unreadable file surfaces as [`Error::Io`].
pub fn load_customers(path: impl AsRef<Path>) -> Result<Vec<Customer>, Error> {
    read_customers(std::fs::File::open(path)?)
}

/// # Errors
///
/// Any write failure.
pub fn write_customers<W: Write>(writer: W, customers: &[Customer]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for customer in customers {
        writer.serialize(customer)?;
    }
    writer.flush()?;
    Ok(())
}

/// # Errors
///
/// Any write failure.
pub fn save_customers(path: impl AsRef<Path>, customers: &[Customer]) -> Result<(), Error> {
    write_customers(std::fs::File::create(path)?, customers)
}

/// Write the ledger's records, in customer-id order.
///
/// # Errors
///
/// Any write failure.
pub fn write_ledger<W: Write>(writer: W, ledger: &Ledger) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in ledger.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// # Errors
///
/// Any write failure.
pub fn save_ledger(path: impl AsRef<Path>, ledger: &Ledger) -> Result<(), Error> {
    write_ledger(std::fs::File::create(path)?, ledger)
}

/// Read a results table back into a [`Ledger`].
///
/// # Errors
///
/// Malformed rows are reported as [`Error::Csv`].
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger, Error> {
    let records = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<ServiceRecord>, _>>()?;
    Ok(Ledger::from_records(records))
}

/// # Errors
///
/// See [`read_ledger()`]; a missing or unreadable file surfaces as [`Error::Io`].
pub fn load_ledger(path: impl AsRef<Path>) -> Result<Ledger, Error> {
    read_ledger(std::fs::File::open(path)?)
}
