//! Request validation helpers shared by the HTTP handlers.
//!
//! Every failure is an `invalid_request` error whose `details` name the
//! offending `field` and a machine-readable `code`.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    MissingField,
    BlankField,
    TooLong,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::BlankField => "blank_field",
            Self::TooLong => "too_long",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// JSON field name as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// A text field with its column width in characters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextField {
    name: FieldName,
    max_chars: Option<usize>,
}

impl TextField {
    pub(crate) const fn bounded(name: &'static str, max_chars: usize) -> Self {
        Self {
            name: FieldName::new(name),
            max_chars: Some(max_chars),
        }
    }

    pub(crate) const fn unbounded(name: &'static str) -> Self {
        Self {
            name: FieldName::new(name),
            max_chars: None,
        }
    }
}

fn validation_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    validation_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, expected: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be one of {expected}")).with_details(json!({
        "field": name,
        "value": value,
        "code": ValidationCode::InvalidValue.as_str(),
    }))
}

/// Reject blank or over-long text, returning the value unchanged otherwise.
pub(crate) fn text(value: String, field: TextField) -> Result<String, Error> {
    let name = field.name.as_str();
    if value.trim().is_empty() {
        return Err(validation_error(
            field.name,
            ValidationCode::BlankField,
            format!("{name} must not be blank"),
        ));
    }
    if let Some(max) = field.max_chars
        && value.chars().count() > max
    {
        return Err(validation_error(
            field.name,
            ValidationCode::TooLong,
            format!("{name} must be at most {max} characters"),
        ));
    }
    Ok(value)
}

pub(crate) fn optional_text(
    value: Option<String>,
    field: TextField,
) -> Result<Option<String>, Error> {
    value.map(|value| text(value, field)).transpose()
}

/// Required text for payloads whose fields are all optional in shape.
pub(crate) fn required_text(value: Option<String>, field: TextField) -> Result<String, Error> {
    let value = value.ok_or_else(|| missing_field_error(field.name))?;
    text(value, field)
}

pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a closed vocabulary value such as an access or action type.
pub(crate) fn parse_enum<T: FromStr>(
    value: &str,
    field: FieldName,
    expected: &str,
) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| invalid_value_error(field, value, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessType;
    use rstest::rstest;

    const USERNAME: TextField = TextField::bounded("username", 5);

    fn detail_code(error: &Error) -> Option<&str> {
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case("", "blank_field")]
    #[case("   ", "blank_field")]
    #[case("abcdef", "too_long")]
    fn text_rejects_unusable_values(#[case] value: &str, #[case] code: &str) {
        let err = text(value.to_owned(), USERNAME).expect_err("rejected");
        assert_eq!(detail_code(&err), Some(code));
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("username"))
        );
    }

    #[rstest]
    fn text_counts_characters_not_bytes() {
        assert_eq!(text("ééééé".into(), USERNAME).expect("fits"), "ééééé");
    }

    #[rstest]
    fn required_text_reports_missing_field() {
        let err = required_text(None, TextField::unbounded("phase")).expect_err("missing");
        assert_eq!(err.message(), "missing required field: phase");
        assert_eq!(detail_code(&err), Some("missing_field"));
    }

    #[rstest]
    fn parse_enum_names_the_rejected_value() {
        let err = parse_enum::<AccessType>(
            "owner",
            FieldName::new("access_type"),
            "administrator, editor, user",
        )
        .expect_err("unknown access type");
        assert_eq!(detail_code(&err), Some("invalid_value"));
        assert_eq!(err.details().and_then(|d| d.get("value")), Some(&json!("owner")));
    }
}
