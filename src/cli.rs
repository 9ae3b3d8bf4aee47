use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::{parse_filter, DEFAULT_LOG_LEVEL};

/// Hotel customer records kept in a CSV file.
#[derive(Debug, Parser)]
#[command(name = "hotel-records", version)]
pub struct CommandLine {
    /// Customer data file
    #[arg(long, env = "HOTEL_DATA_FILE", default_value = "hotel_data.csv")]
    pub file: PathBuf,

    /// Log filter (trace, debug, info, warn, error, off)
    #[arg(long, env = "HOTEL_LOG", default_value = DEFAULT_LOG_LEVEL, value_parser = parse_filter)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Interactive menu (the default)
    Menu,
    /// Add a customer record
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Single, Double or Deluxe
        #[arg(long)]
        room: String,
        /// Nights stayed
        #[arg(long, allow_hyphen_values = true)]
        days: String,
    },
    /// Print all customer records
    List,
    /// Find records by customer id or name
    Search { key: String },
    /// Delete records by customer id or name
    Delete { key: String },
    /// Summary statistics for the data file or an external bookings dataset
    Stats {
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_means_menu() {
        let args = CommandLine::try_parse_from(["hotel-records"]).unwrap();

        assert_eq!(args.command, None);
        assert_eq!(args.file, PathBuf::from("hotel_data.csv"));
    }

    #[test]
    fn parse_add() {
        let args = CommandLine::try_parse_from([
            "hotel-records",
            "--file",
            "guests.csv",
            "add",
            "--id",
            "C1",
            "--name",
            "Alice",
            "--room",
            "single",
            "--days",
            "-1",
        ])
        .unwrap();

        assert_eq!(args.file, PathBuf::from("guests.csv"));
        match args.command {
            Some(Command::Add {
                id,
                room,
                days,
                phone,
                ..
            }) => {
                assert_eq!(id, "C1");
                assert_eq!(room, "single");
                assert_eq!(days, "-1");
                assert_eq!(phone, "");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_stats_dataset() {
        let args =
            CommandLine::try_parse_from(["hotel-records", "stats", "--dataset", "b.csv"]).unwrap();

        assert_eq!(
            args.command,
            Some(Command::Stats {
                dataset: Some(PathBuf::from("b.csv"))
            })
        );
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let result =
            CommandLine::try_parse_from(["hotel-records", "--log-level", "hotel_records=loud"]);

        assert!(result.is_err());
    }

    #[test]
    fn add_requires_room() {
        assert!(
            CommandLine::try_parse_from(["hotel-records", "add", "--id", "C1", "--name", "A"])
                .is_err()
        );
    }
}
