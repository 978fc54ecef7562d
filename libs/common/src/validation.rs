//! Field-scoped validation errors

use serde::Serialize;
use std::collections::BTreeMap;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
/// Key for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation messages keyed by the payload field they refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the error of a single-field check, if any.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    /// Require an optional string to be present and non-blank, returning it.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            None => {
                self.add(field, REQUIRED);
                None
            }
            Some(v) if v.trim().is_empty() => {
                self.add(field, BLANK);
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Key a deserializer message by the field it names.
    ///
    /// Messages look like `price: invalid type: ... at line 1 column 9`; the
    /// leading path becomes the field and the position suffix is dropped.
    /// Anything without a path lands under [`NON_FIELD_ERRORS`].
    pub fn from_deserialize_error(detail: &str) -> Self {
        let detail = strip_position(detail.trim());

        match detail.split_once(": ") {
            Some((path, message))
                if !path.is_empty() && !path.contains(char::is_whitespace) && path != "." =>
            {
                Self::single(path, message)
            }
            _ => Self::single(NON_FIELD_ERRORS, detail),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Drop a trailing ` at line N column M`.
fn strip_position(detail: &str) -> &str {
    match detail.rfind(" at line ") {
        Some(idx)
            if detail[idx + " at line ".len()..]
                .split(" column ")
                .all(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())) =>
        {
            &detail[..idx]
        }
        _ => detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("password", "too short");
        errors.add("password", "needs a digit");
        errors.add("email", "invalid");

        assert_eq!(
            errors.get("password"),
            Some(&["too short".to_string(), "needs a digit".to_string()][..])
        );
        assert!(errors.contains("email"));
        assert!(!errors.contains("role"));
    }

    #[test]
    fn serializes_as_a_plain_map() {
        let errors = FieldErrors::single("role", "The user role cannot be changed after creation.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": ["The user role cannot be changed after creation."]})
        );
    }

    #[test]
    fn required_distinguishes_missing_and_blank() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.required("city", Some("Douala")), Some("Douala"));
        assert_eq!(errors.required("state", None), None);
        assert_eq!(errors.required("country", Some("   ")), None);

        assert_eq!(errors.get("state"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("country"), Some(&[BLANK.to_string()][..]));
        assert!(!errors.contains("city"));
    }

    #[test]
    fn finish_returns_value_only_when_clean() {
        assert_eq!(FieldErrors::new().finish(7), Ok(7));
        assert!(FieldErrors::single("x", "bad").finish(7).is_err());
    }

    #[test]
    fn deserialize_errors_are_keyed_by_field() {
        let errors = FieldErrors::from_deserialize_error(
            "email: invalid type: integer `5`, expected a string at line 1 column 12",
        );
        assert_eq!(
            errors.get("email"),
            Some(&["invalid type: integer `5`, expected a string".to_string()][..])
        );

        let errors = FieldErrors::from_deserialize_error("page: invalid digit found in string");
        assert_eq!(
            errors.get("page"),
            Some(&["invalid digit found in string".to_string()][..])
        );
    }

    #[test]
    fn deserialize_errors_without_a_path_are_non_field() {
        let errors = FieldErrors::from_deserialize_error(
            "invalid type: string \"x\", expected struct SignupRequest at line 1 column 3",
        );
        assert_eq!(
            errors.get(NON_FIELD_ERRORS),
            Some(&["invalid type: string \"x\", expected struct SignupRequest".to_string()][..])
        );

        let errors = FieldErrors::from_deserialize_error("EOF while parsing a value at line 1 column 0");
        assert_eq!(
            errors.get(NON_FIELD_ERRORS),
            Some(&["EOF while parsing a value".to_string()][..])
        );
    }
}
