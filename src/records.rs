use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use csv::StringRecord;
use std::{fmt, io::Read, str::FromStr};

use crate::error::StoreError;

/// Column names of the data file, in on-disk order.
pub const HEADER: [&str; 10] = [
    "CustomerID",
    "Name",
    "Phone",
    "Email",
    "Address",
    "RoomType",
    "Days",
    "Amount",
    "CheckInDate",
    "CheckOutDate",
];

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum RoomType {
    Single,
    Double,
    Deluxe,
}

impl RoomType {
    /// Price per night.
    pub fn nightly_rate(self) -> u64 {
        match self {
            RoomType::Single => 1500,
            RoomType::Double => 2500,
            RoomType::Deluxe => 4000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Deluxe => "Deluxe",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "single" => Ok(RoomType::Single),
            "double" => Ok(RoomType::Double),
            "deluxe" => Ok(RoomType::Deluxe),
            _ => Err(StoreError::InvalidRoomType(trimmed.to_owned())),
        }
    }
}

/// One row of the data file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Record {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "RoomType", deserialize_with = "trim_and_parse_room_type")]
    pub room_type: RoomType,
    #[serde(rename = "Days", deserialize_with = "trim_and_parse")]
    pub days: u32,
    #[serde(rename = "Amount", deserialize_with = "trim_and_parse")]
    pub amount: u64,
    #[serde(rename = "CheckInDate", deserialize_with = "trim_and_parse_date")]
    pub check_in: NaiveDate,
    #[serde(rename = "CheckOutDate", deserialize_with = "trim_and_parse_date")]
    pub check_out: NaiveDate,
}

/// A data-file row with its cells exactly as stored. Rows that no longer
/// parse as a [`Record`] can still be matched, shown and deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow(StringRecord);

impl StoredRow {
    pub fn new(cells: StringRecord) -> Self {
        Self(cells)
    }

    pub fn customer_id(&self) -> &str {
        self.0.get(0).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.0.get(1).unwrap_or_default()
    }

    pub fn cells(&self) -> &StringRecord {
        &self.0
    }

    /// True when the customer id or the name equals `key`, ignoring case and
    /// surrounding whitespace.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.trim().to_lowercase();
        self.customer_id().trim().to_lowercase() == key || self.name().trim().to_lowercase() == key
    }

    pub fn to_record(&self) -> Result<Record, csv::Error> {
        self.0.deserialize(Some(&StringRecord::from(HEADER.to_vec())))
    }
}

impl From<&Record> for StoredRow {
    fn from(record: &Record) -> Self {
        Self(StringRecord::from(vec![
            record.customer_id.clone(),
            record.name.clone(),
            record.phone.clone(),
            record.email.clone(),
            record.address.clone(),
            record.room_type.to_string(),
            record.days.to_string(),
            record.amount.to_string(),
            record.check_in.to_string(),
            record.check_out.to_string(),
        ]))
    }
}

/// Caller-supplied fields for a new record. Room type and days stay raw text
/// until [`NewRecord::into_record`] validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub customer_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub room_type: String,
    pub days: String,
}

impl NewRecord {
    /// Validates the request and prices it for a stay starting on `check_in`.
    pub fn into_record(self, check_in: NaiveDate) -> Result<Record, StoreError> {
        let days_text = self.days.trim();
        let invalid_days = || StoreError::InvalidDays(days_text.to_owned());
        // "-0" is zero nights; anything below zero is rejected
        let days = days_text
            .parse::<i64>()
            .ok()
            .and_then(|days| u32::try_from(days).ok())
            .ok_or_else(invalid_days)?;
        let room_type: RoomType = self.room_type.parse()?;
        let check_out = check_in
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(invalid_days)?;

        Ok(Record {
            customer_id: self.customer_id.trim().to_owned(),
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: self.email.split_whitespace().collect(),
            address: self.address.trim().to_owned(),
            room_type,
            days,
            amount: room_type.nightly_rate() * u64::from(days),
            check_in,
            check_out,
        })
    }
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, StoreError> {
    // csv::Reader buffers internally
    let mut rdr = csv::Reader::from_reader(reader);

    let records = rdr.deserialize::<Record>().collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

fn trim_and_parse_room_type<'de, D>(deserializer: D) -> Result<RoomType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    trimmed
        .parse::<RoomType>()
        .map_err(|_| serde::de::Error::unknown_variant(trimmed, &["Single", "Double", "Deluxe"]))
}

fn trim_and_parse<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let s: String = String::deserialize(deserializer)?;
    s.trim().parse::<T>().map_err(serde::de::Error::custom)
}

fn trim_and_parse_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
