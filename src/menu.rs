use dialoguer::{Input, Select};
use std::{
    error::Error,
    io::{self, Write},
};
use tracing::warn;

use crate::commands::{add_customer, delete_customer, search_customer, view_customers};
use crate::error::StoreError;
use crate::records::NewRecord;
use crate::store::RecordStore;

const ITEMS: [&str; 5] = [
    "Add New Customer",
    "View All Customers",
    "Search Customer",
    "Delete Customer",
    "Exit",
];

fn prompt(label: &str) -> dialoguer::Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
}

fn prompt_new_record() -> dialoguer::Result<NewRecord> {
    Ok(NewRecord {
        customer_id: prompt("Enter customer ID")?,
        name: prompt("Enter customer name")?,
        phone: prompt("Enter contact number")?,
        email: prompt("Enter email address")?,
        address: prompt("Enter address")?,
        room_type: prompt("Enter room type (Single/Double/Deluxe)")?,
        days: prompt("Enter number of days stayed")?,
    })
}

/// Runs one store action. A failure is printed and the menu carries on; only
/// a failure to write to `out` is returned.
fn attempt<W, F>(out: &mut W, action: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> Result<(), StoreError>,
{
    match action(out) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "menu action failed");
            writeln!(out, "Error: {e}")
        }
    }
}

/// Runs the menu until the user picks Exit.
pub fn run(store: &RecordStore) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout();
    loop {
        let choice = Select::new()
            .with_prompt("HOTEL MANAGEMENT")
            .items(&ITEMS)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                println!("\n--- Add New Customer ---");
                let new = prompt_new_record()?;
                attempt(&mut out, |out| add_customer(store, new, out).map(drop))?;
            }
            1 => {
                println!("\n--- All Customer Records ---");
                attempt(&mut out, |out| view_customers(store, out))?;
            }
            2 => {
                let key = prompt("Enter CustomerID or Name to search")?;
                attempt(&mut out, |out| search_customer(store, &key, out))?;
            }
            3 => {
                let key = prompt("Enter CustomerID or Name to delete")?;
                attempt(&mut out, |out| delete_customer(store, &key, out))?;
            }
            _ => {
                println!("Exiting... Goodbye!");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failure_is_reported_and_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        // a directory opens but cannot be read as a data file
        let store = RecordStore::new(dir.path());
        let mut out = Vec::new();

        attempt(&mut out, |out| view_customers(&store, out)).unwrap();
        attempt(&mut out, |out| search_customer(&store, "alice", out)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Error: ").count(), 2);
    }

    #[test]
    fn successful_action_prints_only_its_own_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hotel_data.csv"));
        store.initialize().unwrap();
        let mut out = Vec::new();

        attempt(&mut out, |out| view_customers(&store, out)).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "No records found!\n");
    }
}
