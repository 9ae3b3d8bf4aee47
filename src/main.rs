use clap::Parser;
use std::{error::Error, io, path::Path, path::PathBuf};

mod analytics;
mod cli;
mod commands;
mod error;
mod format;
mod logging;
mod menu;
mod records;
mod store;

use cli::{Command, CommandLine};
use error::StoreError;
use records::NewRecord;
use store::RecordStore;

fn main() -> Result<(), Box<dyn Error>> {
    let args = CommandLine::parse();
    logging::init(&args.log_level);

    let store = RecordStore::new(resolve_data_file(&args.file)?);
    match store.initialize() {
        Ok(true) => println!("Created new data file: {}", store.path().display()),
        Ok(false) => {}
        Err(e) => {
            tracing::error!(path = %store.path().display(), error = %e, "cannot initialize data file");
            if matches!(e, StoreError::PermissionDenied { .. }) {
                eprintln!("Close programs using the file and try again.");
            }
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let mut out = io::stdout();
    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&store)?,
        Command::Add {
            id,
            name,
            phone,
            email,
            address,
            room,
            days,
        } => {
            let new = NewRecord {
                customer_id: id,
                name,
                phone,
                email,
                address,
                room_type: room,
                days,
            };
            if !commands::add_customer(&store, new, &mut out)? {
                std::process::exit(1);
            }
        }
        Command::List => commands::view_customers(&store, &mut out)?,
        Command::Search { key } => commands::search_customer(&store, &key, &mut out)?,
        Command::Delete { key } => commands::delete_customer(&store, &key, &mut out)?,
        Command::Stats { dataset } => commands::show_stats(&store, dataset.as_deref(), &mut out)?,
    }

    Ok(())
}

fn resolve_data_file(file: &Path) -> Result<PathBuf, Box<dyn Error>> {
    const CSV_EXTENSION: &str = "csv";

    if file.extension().and_then(|ext| ext.to_str()) != Some(CSV_EXTENSION) {
        eprintln!("Error: The file must have a .csv extension");
        std::process::exit(1);
    }

    Ok(std::env::current_dir()?.join(file))
}
