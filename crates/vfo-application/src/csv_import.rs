//! CSV lead import.
//!
//! Expected header (case-insensitive, any order): `name,email,pkg,slot,stage,phone`.
//! Fields are split on bare commas; quoting is not supported.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use vfo_core::booking::Booking;
use vfo_core::pipeline::{PipelineDefinition, SIMPLE_STAGES};

/// Parses lead rows into new bookings on the primary track.
///
/// Rows without a name or an email are skipped. A stage outside the primary
/// stage set becomes `New`. Output preserves file order.
pub fn parse_leads(text: &str) -> Vec<Booking> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    let col = |name: &str| header.iter().position(|h| h == name);
    let (name_idx, email_idx) = (col("name"), col("email"));
    let (pkg_idx, slot_idx, stage_idx, phone_idx) =
        (col("pkg"), col("slot"), col("stage"), col("phone"));

    let batch = Utc::now().timestamp_millis();
    let simple = PipelineDefinition::simple();
    let mut out = Vec::new();

    for (row, line) in lines.enumerate() {
        let cols: Vec<&str> = line.split(',').collect();
        let field = |idx: Option<usize>| -> String {
            idx.and_then(|i| cols.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let name = field(name_idx);
        let email = field(email_idx);
        if name.is_empty() || email.is_empty() {
            tracing::debug!("[Import] Skipping CSV row {}: missing name or email", row + 1);
            continue;
        }

        let mut booking = Booking::new(format!("lead-{}-{}", batch, row + 1), name, email);
        booking.pkg = field(pkg_idx);
        booking.slot = field(slot_idx);
        booking.appointment_at = parse_slot(&booking.slot);
        let phone = field(phone_idx);
        if !phone.is_empty() {
            booking.phone = Some(phone);
        }
        let stage = field(stage_idx);
        if SIMPLE_STAGES.contains(&stage.as_str()) {
            booking.stage = stage;
        } else {
            booking.stage = simple.initial_stage().unwrap_or("New").to_string();
        }
        out.push(booking);
    }

    out
}

/// Best-effort timestamp from a free-text slot.
fn parse_slot(slot: &str) -> Option<String> {
    if slot.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(slot) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(slot, fmt) {
            return Some(naive.and_utc().to_rfc3339());
        }
    }
    NaiveDate::parse_from_str(slot, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_case_insensitive_and_reorderable() {
        let csv = "Email,NAME,Stage,phone\r\nann@example.com,Ann Lee,Paid,555-0100\n";
        let leads = parse_leads(csv);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Ann Lee");
        assert_eq!(leads[0].stage, "Paid");
        assert_eq!(leads[0].phone.as_deref(), Some("555-0100"));
        assert!(leads[0].id.starts_with("lead-"));
    }

    #[test]
    fn test_skips_incomplete_rows_and_normalizes_stage() {
        let csv = "name,email,pkg,slot,stage\n\
                   ,nobody@example.com,,,\n\
                   Bo Chen,,,,\n\
                   Cy Diaz,cy@example.com,consult-60,2025-03-04 10:30,engaged\n";
        let leads = parse_leads(csv);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].stage, "New");
        assert_eq!(leads[0].pkg, "consult-60");
        assert_eq!(
            leads[0].appointment_at.as_deref(),
            Some("2025-03-04T10:30:00+00:00")
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_leads("").is_empty());
        assert!(parse_leads("name,email\n").is_empty());
    }
}
