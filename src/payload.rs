//! Embedded attribute payload parsing and projection.
//!
//! A payload is a JSON list of `{"name": ..., "value": ...}` objects stored in
//! a single CSV cell. Parsing is total: every input string maps to either an
//! attribute list or `None`, and nothing here returns an error.

use crate::models::Attribute;

/// Parse a raw payload cell into its attribute list.
///
/// Returns `None` for anything that is not a JSON array of objects with string
/// `name` and `value` fields. Extra fields on an object are ignored and an
/// empty array is a valid, empty list.
pub fn parse_payload(raw: &str) -> Option<Vec<Attribute>> {
    serde_json::from_str(raw).ok()
}

/// Value of the first attribute named exactly `name`.
///
/// Matching is case-sensitive with no trimming. If the name repeats, later
/// occurrences are ignored.
pub fn project_attribute(attributes: Option<&[Attribute]>, name: &str) -> Option<String> {
    attributes?
        .iter()
        .find(|attribute| attribute.name == name)
        .map(|attribute| attribute.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_payload() {
        let attrs = parse_payload(
            r#"[{"name": "Severity", "value": "High"}, {"name": "Crop", "value": "Barley"}]"#,
        )
        .unwrap();
        assert_eq!(
            attrs,
            vec![
                Attribute::new("Severity", "High"),
                Attribute::new("Crop", "Barley")
            ]
        );
    }

    #[test]
    fn test_parse_empty_list_is_present() {
        assert_eq!(parse_payload("[]"), Some(vec![]));
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let attrs = parse_payload(r#"[{"name": "Pest", "value": "Aphid", "id": 7}]"#).unwrap();
        assert_eq!(attrs, vec![Attribute::new("Pest", "Aphid")]);
    }

    #[test]
    fn test_parse_malformed_inputs_are_absent() {
        let malformed = [
            "",
            "   ",
            "not json",
            "null",
            "42",
            r#""a string""#,
            r#"{"name": "Severity", "value": "High"}"#,
            r#"[{"name": "Severity"}]"#,
            r#"[{"value": "High"}]"#,
            r#"[{"name": "Severity", "value": 3}]"#,
            r#"[{"name": null, "value": "High"}]"#,
            r#"["Severity", "High"]"#,
            r#"[{"name": "Severity", "value": "High"}"#,
            "[{'name': 'Severity', 'value': 'High'}]",
        ];
        for raw in malformed {
            assert_eq!(parse_payload(raw), None, "expected absent for {raw:?}");
        }
    }

    #[test]
    fn test_project_first_match_wins() {
        let attrs = parse_payload(
            r#"[{"name": "Severity", "value": "High"}, {"name": "Severity", "value": "Low"}]"#,
        );
        assert_eq!(
            project_attribute(attrs.as_deref(), "Severity"),
            Some("High".to_string())
        );
    }

    #[test]
    fn test_project_absent_input() {
        assert_eq!(project_attribute(None, "Severity"), None);
    }

    #[test]
    fn test_project_missing_name() {
        let attrs = vec![Attribute::new("Crop", "Wheat")];
        assert_eq!(project_attribute(Some(attrs.as_slice()), "Severity"), None);
    }

    #[test]
    fn test_project_is_case_sensitive() {
        let attrs = vec![
            Attribute::new("severity", "Low"),
            Attribute::new("Severity ", "Medium"),
        ];
        assert_eq!(project_attribute(Some(attrs.as_slice()), "Severity"), None);
        assert_eq!(
            project_attribute(Some(attrs.as_slice()), "severity"),
            Some("Low".to_string())
        );
    }

    #[test]
    fn test_project_empty_value_is_present() {
        let attrs = vec![Attribute::new("Severity", "")];
        assert_eq!(
            project_attribute(Some(attrs.as_slice()), "Severity"),
            Some(String::new())
        );
    }
}
