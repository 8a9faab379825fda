//! CSV export of the saved-leads list.
//!
//! Fields are joined with commas and never quoted. Commas inside `notes`
//! become semicolons; commas in any other column (names and addresses
//! commonly contain them) are written as-is and will shift columns for a
//! strict CSV reader.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ExportError;
use crate::lead::Lead;

pub const CSV_HEADER: [&str; 8] = [
    "Name",
    "Phone",
    "Address",
    "Cuisine",
    "Called",
    "Notes",
    "Location",
    "Google Maps Link",
];

/// Encode `leads` as CSV text, header first, one row per lead in order.
///
/// Rows are `\n`-separated with no trailing newline, so an empty list
/// encodes to the header line alone.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the CSV writer fails.
pub fn encode_csv(leads: &[Lead]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for lead in leads {
        let notes = lead.notes.replace(',', ";");
        writer.write_record([
            lead.name.as_str(),
            lead.phone.as_str(),
            lead.address.as_str(),
            lead.cuisine.as_str(),
            if lead.called { "Yes" } else { "No" },
            notes.as_str(),
            lead.location.as_str(),
            lead.maps_url.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encode(e.into_error().into()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// `restaurant_leads_<YYYY-MM-DD>.csv` for the day the export runs.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("restaurant_leads_{}.csv", date.format("%Y-%m-%d"))
}

/// Encode `leads` and write them into `dir` under [`export_file_name`].
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the directory or file cannot be written,
/// or [`ExportError::Encode`] if encoding fails.
pub fn write_export(leads: &[Lead], dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
    let body = encode_csv(leads)?;
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(export_file_name(date));
    std::fs::write(&path, body).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), rows = leads.len(), "leads exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::lead::BusinessListing;

    const HEADER_LINE: &str = "Name,Phone,Address,Cuisine,Called,Notes,Location,Google Maps Link";

    fn lead(name: &str, notes: &str, called: bool) -> Lead {
        let mut lead = Lead::from_listing(
            BusinessListing {
                name: name.to_string(),
                phone: "555-0123".to_string(),
                address: "9 Bleecker St".to_string(),
                cuisine: "Italian".to_string(),
                maps_url: "https://maps.google.com/?cid=7".to_string(),
            },
            "West Village",
            Utc::now(),
        );
        lead.notes = notes.to_string();
        lead.called = called;
        lead
    }

    #[test]
    fn empty_list_encodes_header_only() {
        assert_eq!(encode_csv(&[]).unwrap(), HEADER_LINE);
    }

    #[test]
    fn row_renders_called_and_sanitizes_notes() {
        let csv = encode_csv(&[lead("A, B", "x,y", true)]).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER_LINE);
        assert_eq!(
            lines[1],
            "A, B,555-0123,9 Bleecker St,Italian,Yes,x;y,West Village,https://maps.google.com/?cid=7"
        );
    }

    #[test]
    fn uncalled_lead_renders_no() {
        let csv = encode_csv(&[lead("Nonna", "", false)]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",No,"), "row: {row}");
    }

    #[test]
    fn header_emitted_once_and_rows_keep_order() {
        let leads = vec![lead("First", "", false), lead("Second", "", true), lead("Third", "", false)];
        let csv = encode_csv(&leads).unwrap();

        assert_eq!(csv.matches(HEADER_LINE).count(), 1);
        let names: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn quotes_are_not_added_or_escaped() {
        let csv = encode_csv(&[lead("Joe's \"Famous\" Pizza", "", false)]).unwrap();
        assert!(csv.contains("\nJoe's \"Famous\" Pizza,"), "csv: {csv}");
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "restaurant_leads_2026-03-07.csv");
    }

    #[test]
    fn write_export_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let leads = vec![lead("Nonna", "cash only, closed Mon", false)];

        let path = write_export(&leads, &dir.path().join("exports"), date).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "restaurant_leads_2026-10-16.csv"
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, encode_csv(&leads).unwrap());
        assert!(written.contains("cash only; closed Mon"));
    }
}
