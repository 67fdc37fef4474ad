use chrono::{DateTime, Utc};
use crate::domain::models::registration::RegistrationListing;

const BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 9] = [
    "ID",
    "Full Name",
    "Email",
    "College",
    "Department",
    "Event Name",
    "Category",
    "Event Date",
    "Registration Date",
];

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("event_registrations_{}.csv", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Renders the rows as a UTF-8 CSV document prefixed with a byte-order mark
/// so spreadsheet tools pick the right encoding. The header row is always
/// written.
pub fn render_csv(rows: &[RegistrationListing]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(BOM.len() + 128 * (rows.len() + 1));
    buf.extend_from_slice(BOM);
    write_record(&mut buf, HEADER.iter().map(|h| h.to_string()));

    for row in rows {
        write_record(&mut buf, [
            row.id.clone(),
            row.full_name.clone(),
            row.email.clone(),
            row.college.clone(),
            row.department.clone(),
            row.event_name.clone(),
            row.category.clone(),
            row.event_date.format("%Y-%m-%d").to_string(),
            row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    buf
}

/// Cells a spreadsheet would evaluate as a formula get a leading apostrophe.
fn neutralize_formula(field: String) -> String {
    if field.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        format!("'{}", field)
    } else {
        field
    }
}

fn write_record(buf: &mut Vec<u8>, fields: impl IntoIterator<Item = String>) {
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            buf.push(b',');
        }
        let field = neutralize_formula(field);
        if field.contains([',', '"', '\n', '\r']) {
            buf.push(b'"');
            buf.extend_from_slice(field.replace('"', "\"\"").as_bytes());
            buf.push(b'"');
        } else {
            buf.extend_from_slice(field.as_bytes());
        }
    }
    buf.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn listing(name: &str) -> RegistrationListing {
        RegistrationListing {
            id: "abc".into(),
            event_id: "ev".into(),
            full_name: name.into(),
            email: "x@example.com".into(),
            college: "MIT".into(),
            department: "EECS".into(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap(),
            event_name: "Hack, Night".into(),
            category: "Technical".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_empty_export_still_has_bom_and_header() {
        let csv = render_csv(&[]);
        assert!(csv.starts_with(BOM));
        let text = String::from_utf8(csv[BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "ID,Full Name,Email,College,Department,Event Name,Category,Event Date,Registration Date\n");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let csv = render_csv(&[listing("Dwayne \"The Rock\" Johnson")]);
        let text = String::from_utf8(csv[BOM.len()..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "abc,\"Dwayne \"\"The Rock\"\" Johnson\",x@example.com,MIT,EECS,\"Hack, Night\",Technical,2026-03-01,2026-02-03 04:05:06"
        );
    }

    #[test]
    fn test_formula_cells_are_neutralized() {
        let mut row = listing("=HYPERLINK(\"http://evil\")");
        row.email = "+cmd@example.com".into();
        row.college = "-2+3".into();
        row.department = "@SUM(A1)".into();

        let csv = render_csv(&[row]);
        let text = String::from_utf8(csv[BOM.len()..].to_vec()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "abc,\"'=HYPERLINK(\"\"http://evil\"\")\",'+cmd@example.com,'-2+3,'@SUM(A1),\"Hack, Night\",Technical,2026-03-01,2026-02-03 04:05:06"
        );
    }

    #[test]
    fn test_filename_carries_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 3, 9).unwrap();
        assert_eq!(export_filename(now), "event_registrations_2026-10-18_14-03-09.csv");
    }
}
