//! CSV report serialization.
//!
//! One row per location of interest, in report order (closest first,
//! unmatched last). Free-text fields are quoted per RFC 4180; matched-only
//! columns are left empty on unmatched rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::FixedOffset;
use log::info;

use crate::error::{CheckerError, Result};
use crate::report::ExposureReport;
use crate::time_utils::format_timestamp_ms;

const HEADER: &str = "event,location,start,end,latitude,longitude,\
matched_time,distance_km,personal_latitude,personal_longitude,matching_records,comment";

/// Write the report as CSV. Timestamps are rendered in `utc_offset`, the
/// same offset the feed was parsed with.
pub fn write_csv<W: Write>(
    writer: &mut W,
    report: &ExposureReport,
    utc_offset: FixedOffset,
) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for m in &report.matches {
        let row = [
            escape(&m.event),
            escape(m.location.as_deref().unwrap_or("")),
            escape(&format_timestamp_ms(m.start_ms, utc_offset)),
            escape(&format_timestamp_ms(m.end_ms, utc_offset)),
            m.latitude.to_string(),
            m.longitude.to_string(),
            m.matched_time_ms
                .map(|t| format_timestamp_ms(t, utc_offset))
                .unwrap_or_default(),
            m.distance_km.map(|d| format!("{d:.2}")).unwrap_or_default(),
            m.personal_latitude.map(|v| v.to_string()).unwrap_or_default(),
            m.personal_longitude.map(|v| v.to_string()).unwrap_or_default(),
            m.match_count.map(|n| n.to_string()).unwrap_or_default(),
            escape(&m.comment),
        ];
        writeln!(writer, "{}", row.join(","))?;
    }
    Ok(())
}

/// Write the report CSV to disk. See [`write_csv`].
pub fn export_csv(path: &Path, report: &ExposureReport, utc_offset: FixedOffset) -> Result<()> {
    let file = File::create(path).map_err(|source| CheckerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, report, utc_offset).map_err(|source| CheckerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Quote a field if it contains a comma, quote or newline; embedded quotes
/// are doubled.
fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
