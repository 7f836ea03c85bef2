use chrono::NaiveDateTime;

use crate::model::quote::{FormType, NormalizedRow, QuoteSubmission};

/// Fallback used in notification bodies for most missing fields.
pub const NOT_PROVIDED: &str = "Not provided";
/// Fallback used in notification bodies for timeline and budget.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Where the value of a column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSource {
    Timestamp,
    Field(&'static str),
    /// Primary key first, then its alias.
    FieldOr(&'static str, &'static str),
    Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub source: CellSource,
    pub fallback: &'static str,
}

const fn column(label: &'static str, source: CellSource) -> ColumnSpec {
    ColumnSpec { label, source, fallback: NOT_PROVIDED }
}

const fn column_unspecified(label: &'static str, source: CellSource) -> ColumnSpec {
    ColumnSpec { label, source, fallback: NOT_SPECIFIED }
}

const LANDSCAPE_COLUMNS: &[ColumnSpec] = &[
    column("Timestamp", CellSource::Timestamp),
    column("Name", CellSource::Field("name")),
    column("Email", CellSource::Field("email")),
    column("Phone", CellSource::Field("phone")),
    column("Service", CellSource::FieldOr("service", "serviceType")),
    column("Message", CellSource::FieldOr("message", "projectDetails")),
    column("Yard Area (sq ft)", CellSource::FieldOr("yardAreaSqft", "approximateSize")),
    column("Yard Area (sq m)", CellSource::Field("yardAreaSqm")),
    column("Map Location", CellSource::Coordinates),
];

const CONSTRUCTION_COLUMNS: &[ColumnSpec] = &[
    column("Timestamp", CellSource::Timestamp),
    column("Name", CellSource::Field("name")),
    column("Email", CellSource::Field("email")),
    column("Phone", CellSource::Field("phone")),
    column("Address", CellSource::Field("address")),
    column("Service Type", CellSource::FieldOr("serviceType", "service")),
    column("Project Details", CellSource::FieldOr("projectDetails", "message")),
    column("Approximate Size", CellSource::FieldOr("approximateSize", "yardAreaSqft")),
    column_unspecified("Preferred Timeline", CellSource::Field("preferredTimeline")),
    column_unspecified("Budget Range", CellSource::Field("budgetRange")),
    column("Additional Info", CellSource::Field("additionalInfo")),
];

const GENERAL_COLUMNS: &[ColumnSpec] = &[
    column("Timestamp", CellSource::Timestamp),
    column("Name", CellSource::Field("name")),
    column("Email", CellSource::Field("email")),
    column("Phone", CellSource::Field("phone")),
    column("Service", CellSource::FieldOr("service", "serviceType")),
    column("Message", CellSource::FieldOr("message", "projectDetails")),
];

/// Column layout of the spreadsheet row for a form type.
pub fn layout_for(form_type: FormType) -> &'static [ColumnSpec] {
    match form_type {
        FormType::Landscape => LANDSCAPE_COLUMNS,
        FormType::Construction => CONSTRUCTION_COLUMNS,
        FormType::General => GENERAL_COLUMNS,
    }
}

/// Spreadsheet timestamp, e.g. `10/17/2026, 3:04:05 PM`.
pub fn format_timestamp(captured_at: NaiveDateTime) -> String {
    captured_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Value of a non-timestamp column, `None` when the submission lacks it.
pub fn resolve_cell(submission: &QuoteSubmission, source: CellSource) -> Option<String> {
    match source {
        CellSource::Timestamp => None,
        CellSource::Field(key) => submission.field(key),
        CellSource::FieldOr(primary, alternate) => submission.field_or(primary, alternate),
        CellSource::Coordinates => submission.coordinates(),
    }
}

/// Builds the row for `submission`. Missing values become empty cells so
/// column positions never shift.
pub fn normalize(submission: &QuoteSubmission, captured_at: NaiveDateTime) -> NormalizedRow {
    let cells = layout_for(submission.form_type())
        .iter()
        .map(|spec| match spec.source {
            CellSource::Timestamp => format_timestamp(captured_at),
            source => resolve_cell(submission, source).unwrap_or_default(),
        })
        .collect();
    NormalizedRow::new(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn captured_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(captured_at()), "10/17/2026, 3:04:05 PM");
        let morning = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap().and_hms_opt(0, 30, 0).unwrap();
        assert_eq!(format_timestamp(morning), "1/2/2026, 12:30:00 AM");
    }

    #[test]
    fn test_construction_layout() {
        let submission = QuoteSubmission::from_value(json!({
            "formType": "construction_quote",
            "name": "A",
            "email": "a@x.com",
            "address": "1 Rd",
            "serviceType": "Paving",
            "projectDetails": "Fix driveway",
            "approximateSize": "500",
            "preferredTimeline": "2 weeks",
            "budgetRange": "$1000-2500",
            "additionalInfo": "none"
        }));
        let row = normalize(&submission, captured_at());
        assert_eq!(
            row.cells(),
            &[
                "10/17/2026, 3:04:05 PM",
                "A",
                "a@x.com",
                "",
                "1 Rd",
                "Paving",
                "Fix driveway",
                "500",
                "2 weeks",
                "$1000-2500",
                "none",
            ]
        );
    }

    #[test]
    fn test_landscape_layout_with_coordinates() {
        let submission = QuoteSubmission::from_value(json!({
            "formType": "landscape_quote",
            "name": "Ben",
            "email": "ben@x.com",
            "phone": "555-0100",
            "service": "Lawn care",
            "message": "Weekly mowing",
            "yardAreaSqft": 1200,
            "yardAreaSqm": 111.5,
            "mapLat": 40.1,
            "mapLng": -75.2
        }));
        let row = normalize(&submission, captured_at());
        assert_eq!(row.len(), 9);
        assert_eq!(&row.cells()[1..], &[
            "Ben", "ben@x.com", "555-0100", "Lawn care", "Weekly mowing", "1200", "111.5", "40.1, -75.2",
        ]);
    }

    #[test]
    fn test_landscape_missing_longitude_leaves_cell_empty() {
        let submission = QuoteSubmission::from_value(json!({
            "formType": "landscape_quote",
            "name": "Ben",
            "email": "ben@x.com",
            "mapLat": 40.1
        }));
        let row = normalize(&submission, captured_at());
        assert_eq!(row.len(), 9);
        assert_eq!(row.cells()[8], "");
    }

    #[test]
    fn test_general_layout_for_unknown_form_type() {
        let submission = QuoteSubmission::from_value(json!({
            "formType": "something_else",
            "name": "Cy",
            "email": "cy@x.com",
            "serviceType": "Fencing",
            "projectDetails": "New fence",
            "address": "ignored"
        }));
        let row = normalize(&submission, captured_at());
        assert_eq!(&row.cells()[1..], &["Cy", "cy@x.com", "", "Fencing", "New fence"]);
    }

    #[test]
    fn test_construction_reads_aliases() {
        let submission = QuoteSubmission::from_value(json!({
            "formType": "construction_quote",
            "name": "D",
            "email": "d@x.com",
            "service": "Retaining wall",
            "message": "Sloped yard",
            "yardAreaSqft": "800"
        }));
        let row = normalize(&submission, captured_at());
        assert_eq!(row.cells()[5], "Retaining wall");
        assert_eq!(row.cells()[6], "Sloped yard");
        assert_eq!(row.cells()[7], "800");
        assert_eq!(row.cells()[8], "");
        assert_eq!(row.cells()[10], "");
    }

    #[test]
    fn test_layout_widths_are_fixed() {
        assert_eq!(layout_for(FormType::Landscape).len(), 9);
        assert_eq!(layout_for(FormType::Construction).len(), 11);
        assert_eq!(layout_for(FormType::General).len(), 6);
        let empty = normalize(&QuoteSubmission::default(), captured_at());
        assert_eq!(empty.len(), 6);
        assert!(empty.cells()[1..].iter().all(String::is_empty));
    }
}
