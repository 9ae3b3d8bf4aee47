use csv::StringRecord;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    error::Error,
    fs::File,
    io::Read,
    path::Path,
};

use crate::records::{read_records, Record, RoomType, HEADER};

/// Aggregates over the customer data file.
#[derive(Debug, PartialEq)]
pub struct LocalSummary {
    pub records: usize,
    pub average_stay: Option<f64>,
    pub total_revenue: u64,
    pub room_types: BTreeMap<RoomType, usize>,
}

impl LocalSummary {
    pub fn from_records(records: &[Record]) -> Self {
        let total_days: u64 = records.iter().map(|r| u64::from(r.days)).sum();
        let mut room_types = BTreeMap::new();
        for record in records {
            *room_types.entry(record.room_type).or_insert(0) += 1;
        }

        Self {
            records: records.len(),
            average_stay: mean(total_days as f64, records.len()),
            total_revenue: records.iter().map(|r| r.amount).sum(),
            room_types,
        }
    }
}

/// One row of a public hotel-bookings dataset. Unknown columns are ignored
/// and unparsable cells become `None`.
#[derive(Debug, Deserialize)]
struct BookingRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    hotel: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    is_canceled: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    stays_in_weekend_nights: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    stays_in_week_nights: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    adr: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    market_segment: Option<String>,
}

pub const PREVIEW_ROWS: usize = 5;

/// Aggregates over an external bookings dataset. Each statistic is `None`
/// when the columns it needs are absent.
#[derive(Debug, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<String>,
    /// The first [`PREVIEW_ROWS`] rows as read.
    pub head: Vec<StringRecord>,
    pub average_stay: Option<f64>,
    pub cancellation_rate: Option<f64>,
    pub revenue_estimate: Option<f64>,
    pub hotels: Vec<(String, usize)>,
    pub market_segments: Vec<(String, usize)>,
}

impl DatasetSummary {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Box<dyn Error>> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(str::to_owned).collect();
        let has = |name: &str| columns.iter().any(|c| c == name);
        let has_stay = has("stays_in_weekend_nights") && has("stays_in_week_nights");
        let has_adr = has("adr");

        let mut rows = 0;
        let mut stay_total = 0.0;
        let (mut canceled, mut cancel_known) = (0.0, 0);
        let mut revenue = 0.0;
        let mut hotels = HashMap::new();
        let mut segments = HashMap::new();
        let mut head = Vec::with_capacity(PREVIEW_ROWS);

        for cells in rdr.records() {
            let cells = cells?;
            let row: BookingRow = cells.deserialize(Some(&headers))?;
            if head.len() < PREVIEW_ROWS {
                head.push(cells);
            }
            rows += 1;

            let stay = row.stays_in_weekend_nights.unwrap_or(0.0)
                + row.stays_in_week_nights.unwrap_or(0.0);
            stay_total += stay;

            if let Some(flag) = row.is_canceled {
                canceled += flag;
                cancel_known += 1;
            }

            let adr = row.adr.unwrap_or(0.0);
            revenue += if has_stay { adr * stay } else { adr };

            if let Some(hotel) = row.hotel {
                *hotels.entry(hotel).or_insert(0) += 1;
            }
            if let Some(segment) = row.market_segment {
                *segments.entry(segment).or_insert(0) += 1;
            }
        }

        Ok(Self {
            rows,
            average_stay: has_stay.then(|| mean(stay_total, rows)).flatten(),
            cancellation_rate: mean(canceled, cancel_known).map(|rate| rate * 100.0),
            revenue_estimate: has_adr.then_some(revenue),
            hotels: value_counts(hotels),
            market_segments: value_counts(segments),
            columns,
            head,
        })
    }
}

/// Either kind of summary, picked from the file's header row.
#[derive(Debug, PartialEq)]
pub enum Summary {
    Local(LocalSummary),
    Dataset(DatasetSummary),
}

/// Summarizes the CSV at `path`. Files with the customer-record header are
/// read as records, anything else as a bookings dataset.
pub fn summarize_file<P: AsRef<Path>>(path: P) -> Result<Summary, Box<dyn Error>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)?;
    let is_local = rdr.headers()?.iter().eq(HEADER.iter().copied());
    drop(rdr);

    let file = File::open(path)?;
    if is_local {
        let records = read_records(file)?;
        Ok(Summary::Local(LocalSummary::from_records(&records)))
    } else {
        Ok(Summary::Dataset(DatasetSummary::from_reader(file)?))
    }
}

fn mean(total: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| total / count as f64)
}

/// Most frequent first, ties broken by value.
fn value_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_local_summary() {
        let Summary::Local(summary) = summarize_file("test-inputs/hotel_data.csv").unwrap() else {
            panic!("expected a local summary");
        };

        assert_eq!(summary.records, 4);
        assert!(approx(summary.average_stay, 7.0 / 4.0));
        assert_eq!(summary.total_revenue, 17000);
        assert_eq!(summary.room_types[&RoomType::Single], 1);
        assert_eq!(summary.room_types[&RoomType::Double], 2);
        assert_eq!(summary.room_types[&RoomType::Deluxe], 1);
    }

    #[test]
    fn local_summary_of_nothing() {
        let summary = LocalSummary::from_records(&[]);

        assert_eq!(summary.records, 0);
        assert_eq!(summary.average_stay, None);
        assert_eq!(summary.total_revenue, 0);
        assert!(summary.room_types.is_empty());
    }

    #[test]
    fn test_dataset_summary() {
        let Summary::Dataset(summary) = summarize_file("test-inputs/hotel_bookings.csv").unwrap()
        else {
            panic!("expected a dataset summary");
        };

        assert_eq!(summary.rows, 5);
        assert_eq!(summary.columns.len(), 8);
        assert_eq!(summary.head.len(), PREVIEW_ROWS);
        assert_eq!(summary.head[0].get(0), Some("Resort Hotel"));
        assert_eq!(summary.head[1].get(7), Some("80.5"));
        assert_eq!(summary.head[4].get(1), Some(""));
        assert!(approx(summary.average_stay, 2.4));
        assert!(approx(summary.cancellation_rate, 50.0));
        assert!(approx(summary.revenue_estimate, 861.5));
        assert_eq!(
            summary.hotels,
            vec![("City Hotel".to_string(), 3), ("Resort Hotel".to_string(), 2)]
        );
        assert_eq!(
            summary.market_segments,
            vec![
                ("Online TA".to_string(), 3),
                ("Direct".to_string(), 1),
                ("Groups".to_string(), 1),
            ]
        );
    }

    #[test]
    fn dataset_without_stay_columns_sums_adr() {
        let data = "hotel,adr,is_canceled\nCity Hotel,100,x\nCity Hotel,50.5,\n";

        let summary = DatasetSummary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(summary.average_stay, None);
        assert_eq!(summary.cancellation_rate, None);
        assert!(approx(summary.revenue_estimate, 150.5));
        assert!(summary.market_segments.is_empty());
        assert_eq!(summary.head.len(), 2);
    }

    #[test]
    fn dataset_without_adr_has_no_revenue() {
        let data = "stays_in_weekend_nights,stays_in_week_nights\n1,2\n0,1\n";

        let summary = DatasetSummary::from_reader(data.as_bytes()).unwrap();

        assert!(approx(summary.average_stay, 2.0));
        assert_eq!(summary.revenue_estimate, None);
    }
}
