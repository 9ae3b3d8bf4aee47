//! Human-readable rendering of records and summaries.

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

use crate::analytics::{DatasetSummary, LocalSummary};
use crate::records::{StoredRow, HEADER};

/// All rows as one table, header included. Cells are shown as stored.
pub fn format_records_table(rows: &[StoredRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(HEADER.to_vec());
    for row in rows {
        table.add_row(row.cells().iter().collect::<Vec<_>>());
    }
    table.to_string()
}

/// A single row as `Column: value` lines.
pub fn format_record_detail(row: &StoredRow) -> String {
    HEADER
        .iter()
        .zip(row.cells().iter())
        .map(|(column, value)| format!("{}: {}\n", column, value))
        .collect()
}

fn counts_table(title: &str, counts: impl IntoIterator<Item = (String, usize)>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![title, "Count"]);
    for (value, count) in counts {
        table.add_row(vec![value, count.to_string()]);
    }
    table.to_string()
}

pub fn format_local_summary(summary: &LocalSummary) -> String {
    let mut out = String::new();
    out.push_str("--- Customer records ---\n");
    out.push_str(&format!("Records: {}\n", summary.records));
    match summary.average_stay {
        Some(avg) => out.push_str(&format!("Average stay (Days): {:.2}\n", avg)),
        None => out.push_str("Average stay (Days): n/a\n"),
    }
    out.push_str(&format!(
        "Total revenue (sum of Amount): {}\n",
        summary.total_revenue
    ));
    if !summary.room_types.is_empty() {
        out.push('\n');
        out.push_str(&counts_table(
            "RoomType",
            summary
                .room_types
                .iter()
                .map(|(room_type, count)| (room_type.to_string(), *count)),
        ));
        out.push('\n');
    }
    out
}

pub fn format_dataset_summary(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    out.push_str("--- Bookings dataset ---\n");
    out.push_str(&format!(
        "Shape: ({}, {})\n",
        summary.rows,
        summary.columns.len()
    ));
    out.push_str(&format!("Columns: {}\n", summary.columns.join(", ")));
    if !summary.head.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(summary.columns.clone());
        for row in &summary.head {
            table.add_row(row.iter().collect::<Vec<_>>());
        }
        out.push_str(&format!("\nFirst {} rows:\n{}\n\n", summary.head.len(), table));
    }
    if let Some(avg) = summary.average_stay {
        out.push_str(&format!("Average stay (days): {:.2}\n", avg));
    }
    if let Some(rate) = summary.cancellation_rate {
        out.push_str(&format!("Cancellation Rate: {:.2}%\n", rate));
    }
    if let Some(revenue) = summary.revenue_estimate {
        out.push_str(&format!("Estimated total revenue (sum): {:.2}\n", revenue));
    }
    if !summary.hotels.is_empty() {
        out.push('\n');
        out.push_str(&counts_table("Hotel", summary.hotels.iter().cloned()));
        out.push('\n');
    }
    if !summary.market_segments.is_empty() {
        out.push('\n');
        out.push_str(&counts_table(
            "Market segment",
            summary.market_segments.iter().cloned(),
        ));
        out.push('\n');
    }
    out
}
