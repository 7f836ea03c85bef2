use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Form type tag carried in the `formType` field of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    Landscape,
    Construction,
    General,
}

impl FormType {
    pub const LANDSCAPE_TAG: &'static str = "landscape_quote";
    pub const CONSTRUCTION_TAG: &'static str = "construction_quote";
    pub const GENERAL_TAG: &'static str = "general_form";

    /// Unknown or missing tags fall through to the generic layout.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(Self::LANDSCAPE_TAG) => FormType::Landscape,
            Some(Self::CONSTRUCTION_TAG) => FormType::Construction,
            _ => FormType::General,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            FormType::Landscape => Self::LANDSCAPE_TAG,
            FormType::Construction => Self::CONSTRUCTION_TAG,
            FormType::General => Self::GENERAL_TAG,
        }
    }
}

/// Raw quote form submission as received from the client.
///
/// No schema is enforced: any JSON object is accepted and fields are read
/// leniently through [`QuoteSubmission::field`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteSubmission(Map<String, Value>);

impl QuoteSubmission {
    pub fn new(fields: Map<String, Value>) -> Self {
        QuoteSubmission(fields)
    }

    /// Anything that is not a JSON object becomes an empty submission.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => QuoteSubmission(fields),
            _ => QuoteSubmission::default(),
        }
    }

    /// Text value of a field; `null`, empty strings and missing keys are `None`.
    pub fn field(&self, key: &str) -> Option<String> {
        let text = match self.0.get(key)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn field_or(&self, primary: &str, alternate: &str) -> Option<String> {
        self.field(primary).or_else(|| self.field(alternate))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn name(&self) -> Option<String> {
        self.field("name")
    }

    pub fn email(&self) -> Option<String> {
        self.field("email")
    }

    pub fn form_type(&self) -> FormType {
        FormType::from_tag(self.0.get("formType").and_then(Value::as_str))
    }

    pub fn set_form_type(&mut self, form_type: FormType) {
        self.0.insert(
            "formType".to_string(),
            Value::String(form_type.as_tag().to_string()),
        );
    }

    /// `"<lat>, <lng>"` when both map coordinates were submitted.
    pub fn coordinates(&self) -> Option<String> {
        match (self.field("mapLat"), self.field("mapLng")) {
            (Some(lat), Some(lng)) => Some(format!("{}, {}", lat, lng)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Spreadsheet tab a row is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetDestination {
    LandscapeQuotes,
    ConstructionQuotes,
}

impl SheetDestination {
    pub fn for_form_type(form_type: FormType) -> Self {
        match form_type {
            FormType::Construction => SheetDestination::ConstructionQuotes,
            _ => SheetDestination::LandscapeQuotes,
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            SheetDestination::LandscapeQuotes => "Landscape Quotes",
            SheetDestination::ConstructionQuotes => "Construction Quotes",
        }
    }

    /// A1 range used for appends, e.g. `Landscape Quotes!A:Z`.
    pub fn append_range(&self) -> String {
        format!("{}!A:Z", self.sheet_name())
    }
}

/// One spreadsheet row; cell positions are fixed per form type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow(Vec<String>);

impl NormalizedRow {
    pub fn new(cells: Vec<String>) -> Self {
        NormalizedRow(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of the two side effects for a single submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub sheet_recorded: bool,
    pub email_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> QuoteSubmission {
        QuoteSubmission::from_value(value)
    }

    #[test]
    fn test_form_type_from_tag() {
        assert_eq!(FormType::from_tag(Some("landscape_quote")), FormType::Landscape);
        assert_eq!(FormType::from_tag(Some("construction_quote")), FormType::Construction);
        assert_eq!(FormType::from_tag(Some("general_form")), FormType::General);
        assert_eq!(FormType::from_tag(Some("patio_quote")), FormType::General);
        assert_eq!(FormType::from_tag(None), FormType::General);
    }

    #[test]
    fn test_field_renders_scalars() {
        let s = submission(json!({
            "name": "Ana",
            "yardAreaSqft": 500,
            "mapLat": 40.1,
            "newsletter": true,
            "phone": "",
            "address": null
        }));
        assert_eq!(s.field("name").as_deref(), Some("Ana"));
        assert_eq!(s.field("yardAreaSqft").as_deref(), Some("500"));
        assert_eq!(s.field("mapLat").as_deref(), Some("40.1"));
        assert_eq!(s.field("newsletter").as_deref(), Some("true"));
        assert_eq!(s.field("phone"), None);
        assert_eq!(s.field("address"), None);
        assert_eq!(s.field("missing"), None);
    }

    #[test]
    fn test_non_object_is_empty_submission() {
        let s = submission(json!(["name", "email"]));
        assert!(s.fields().is_empty());
        assert_eq!(s.name(), None);
    }

    #[test]
    fn test_coordinates_need_both_values() {
        assert_eq!(submission(json!({"mapLat": 40.1})).coordinates(), None);
        assert_eq!(submission(json!({"mapLng": -75.2})).coordinates(), None);
        assert_eq!(
            submission(json!({"mapLat": 40.1, "mapLng": -75.2})).coordinates().as_deref(),
            Some("40.1, -75.2")
        );
    }

    #[test]
    fn test_set_form_type_overrides_tag() {
        let mut s = submission(json!({"formType": "construction_quote"}));
        s.set_form_type(FormType::General);
        assert_eq!(s.form_type(), FormType::General);
        assert_eq!(s.fields()["formType"], json!("general_form"));
    }

    #[test]
    fn test_sheet_destination_is_two_way() {
        assert_eq!(
            SheetDestination::for_form_type(FormType::Construction).append_range(),
            "Construction Quotes!A:Z"
        );
        assert_eq!(
            SheetDestination::for_form_type(FormType::Landscape).sheet_name(),
            "Landscape Quotes"
        );
        assert_eq!(
            SheetDestination::for_form_type(FormType::General).sheet_name(),
            "Landscape Quotes"
        );
    }
}
