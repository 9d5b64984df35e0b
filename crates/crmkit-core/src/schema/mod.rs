//! Per-collection record validation.
//!
//! A collection either has no schema ([`Validation::None`], every object
//! shape passes) or a [`Schema`] checked in one of two modes:
//!
//! - **create** (strict): every required field present, every field of the
//!   right kind, no unrecognized fields.
//! - **update** (partial): only fields present in the patch are checked;
//!   missing required fields are fine, unrecognized fields are still
//!   rejected.
//!
//! Text lengths count characters as given; whitespace is not trimmed.
//!
//! Validation is pure and synchronous. Repositories run it before touching
//! the store.

mod email;

pub use email::is_valid_email;

use serde_json::Value;

use crate::error::ValidationError;
use crate::record::Fields;

/// The validation policy bound to one collection.
#[derive(Debug, Clone, Default)]
pub enum Validation {
    /// Any object shape is accepted.
    #[default]
    None,
    /// Records are checked against a declared shape.
    Schema(Schema),
}

impl Validation {
    /// Check a complete record before creation.
    pub fn validate_for_create(&self, record: &Fields) -> Result<(), ValidationError> {
        match self {
            Validation::None => Ok(()),
            Validation::Schema(schema) => schema.check(record, Mode::Create),
        }
    }

    /// Check a partial record before it is merged into a stored one.
    pub fn validate_for_update(&self, patch: &Fields) -> Result<(), ValidationError> {
        match self {
            Validation::None => Ok(()),
            Validation::Schema(schema) => schema.check(patch, Mode::Update),
        }
    }

    /// Returns the schema, if any.
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Validation::None => None,
            Validation::Schema(schema) => Some(schema),
        }
    }
}

impl From<Schema> for Validation {
    fn from(schema: Schema) -> Self {
        Validation::Schema(schema)
    }
}

impl From<Option<Schema>> for Validation {
    fn from(schema: Option<Schema>) -> Self {
        schema.map_or(Validation::None, Validation::Schema)
    }
}

/// Expected kind of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A string of at least `min_len` characters (after trimming whitespace).
    Text { min_len: usize },
    /// A string with valid email syntax.
    Email,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
}

impl FieldKind {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            FieldKind::Text { min_len } => {
                let s = value.as_str().ok_or("expected text")?;
                let len = s.chars().count();
                if len == 0 && *min_len > 0 {
                    Err("must not be empty".to_string())
                } else if len < *min_len {
                    Err(format!("must be at least {} characters", min_len))
                } else {
                    Ok(())
                }
            }
            FieldKind::Email => {
                let s = value.as_str().ok_or("expected text")?;
                if is_valid_email(s) {
                    Ok(())
                } else {
                    Err("invalid email address".to_string())
                }
            }
            FieldKind::Number => value
                .is_number()
                .then_some(())
                .ok_or_else(|| "expected a number".to_string()),
            FieldKind::Boolean => value
                .is_boolean()
                .then_some(())
                .ok_or_else(|| "expected a boolean".to_string()),
        }
    }
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// A declared record shape.
///
/// Fields are checked in declaration order; the first failure wins.
///
/// # Example
///
/// ```
/// use crmkit_core::schema::{FieldKind, Schema, Validation};
/// use serde_json::json;
///
/// let validation = Validation::from(
///     Schema::new()
///         .required("name", FieldKind::Text { min_len: 1 })
///         .required("email", FieldKind::Email),
/// );
///
/// let patch = json!({"email": "jane@x.com"});
/// assert!(validation.validate_for_update(patch.as_object().unwrap()).is_ok());
/// assert!(validation.validate_for_create(patch.as_object().unwrap()).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

impl Schema {
    /// An empty strict schema: only declared fields are accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field.
    pub fn required(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(name, kind, true)
    }

    /// Declare an optional field.
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(name, kind, false)
    }

    fn field(mut self, name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            required,
        });
        self
    }

    /// Declared fields, in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn check(&self, record: &Fields, mode: Mode) -> Result<(), ValidationError> {
        for spec in &self.fields {
            match record.get(&spec.name) {
                Some(value) => spec
                    .kind
                    .check(value)
                    .map_err(|reason| ValidationError::new(&spec.name, reason))?,
                None if spec.required && mode == Mode::Create => {
                    return Err(ValidationError::new(&spec.name, "required"));
                }
                None => {}
            }
        }

        // serde_json::Map iterates in key order, which keeps this deterministic.
        if let Some(unknown) = record.keys().find(|key| self.spec(key).is_none()) {
            return Err(ValidationError::new(unknown, "unrecognized field"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer() -> Validation {
        Schema::new()
            .required("name", FieldKind::Text { min_len: 1 })
            .required("email", FieldKind::Email)
            .into()
    }

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn no_schema_accepts_anything() {
        let validation = Validation::None;
        let record = fields(json!({"anything": [1, 2], "id": "ignored-here"}));
        assert!(validation.validate_for_create(&record).is_ok());
        assert!(validation.validate_for_update(&record).is_ok());
        assert!(validation.validate_for_create(&Fields::new()).is_ok());
    }

    #[test]
    fn create_accepts_complete_record() {
        let record = fields(json!({"name": "Jane", "email": "jane@x.com"}));
        assert!(customer().validate_for_create(&record).is_ok());
    }

    #[test]
    fn create_rejects_empty_name() {
        let record = fields(json!({"name": "", "email": "a@b.com"}));
        let err = customer().validate_for_create(&record).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.reason, "must not be empty");
    }

    #[test]
    fn whitespace_counts_toward_length() {
        let record = fields(json!({"name": " ", "email": "a@b.com"}));
        assert!(customer().validate_for_create(&record).is_ok());
    }

    #[test]
    fn create_rejects_missing_required_field() {
        let record = fields(json!({"email": "john@example.com"}));
        let err = customer().validate_for_create(&record).unwrap_err();
        assert_eq!(err, ValidationError::new("name", "required"));
    }

    #[test]
    fn create_rejects_invalid_email() {
        let record = fields(json!({"name": "John Doe", "email": "invalid-email"}));
        let err = customer().validate_for_create(&record).unwrap_err();
        assert_eq!(err, ValidationError::new("email", "invalid email address"));
    }

    #[test]
    fn create_rejects_unknown_field() {
        let record = fields(json!({"name": "Jane", "email": "jane@x.com", "phone": "555"}));
        let err = customer().validate_for_create(&record).unwrap_err();
        assert_eq!(err, ValidationError::new("phone", "unrecognized field"));
    }

    #[test]
    fn create_rejects_wrong_type() {
        let record = fields(json!({"name": 42, "email": "jane@x.com"}));
        let err = customer().validate_for_create(&record).unwrap_err();
        assert_eq!(err, ValidationError::new("name", "expected text"));
    }

    #[test]
    fn update_accepts_partial_patch() {
        assert!(
            customer()
                .validate_for_update(&fields(json!({"email": "jane@x.com"})))
                .is_ok()
        );
        assert!(
            customer()
                .validate_for_update(&fields(json!({"name": "John Updated"})))
                .is_ok()
        );
        assert!(customer().validate_for_update(&Fields::new()).is_ok());
    }

    #[test]
    fn update_checks_present_fields() {
        let err = customer()
            .validate_for_update(&fields(json!({"name": "", "email": "john@example.com"})))
            .unwrap_err();
        assert_eq!(err.field, "name");

        let err = customer()
            .validate_for_update(&fields(json!({"email": "nope"})))
            .unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn update_rejects_unknown_field() {
        let err = customer()
            .validate_for_update(&fields(json!({"phone": "555-0100"})))
            .unwrap_err();
        assert_eq!(err, ValidationError::new("phone", "unrecognized field"));
    }

    #[test]
    fn create_acceptance_implies_update_acceptance() {
        let record = fields(json!({"name": "Jane", "email": "jane@x.com"}));
        let validation = customer();
        assert!(validation.validate_for_create(&record).is_ok());

        // Every subset of an accepted record is an accepted patch.
        let keys: Vec<&String> = record.keys().collect();
        for mask in 0..(1u32 << keys.len()) {
            let subset: Fields = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << *i) != 0)
                .map(|(_, k)| ((*k).clone(), record[*k].clone()))
                .collect();
            assert!(validation.validate_for_update(&subset).is_ok());
        }
    }

    #[test]
    fn number_and_boolean_kinds() {
        let validation: Validation = Schema::new()
            .required("amount", FieldKind::Number)
            .optional("paid", FieldKind::Boolean)
            .into();

        assert!(
            validation
                .validate_for_create(&fields(json!({"amount": 12.5})))
                .is_ok()
        );
        assert_eq!(
            validation
                .validate_for_create(&fields(json!({"amount": "12.5"})))
                .unwrap_err()
                .reason,
            "expected a number"
        );
        assert_eq!(
            validation
                .validate_for_update(&fields(json!({"paid": "yes"})))
                .unwrap_err()
                .field,
            "paid"
        );
    }

    #[test]
    fn min_len_reason() {
        let validation: Validation = Schema::new()
            .required("code", FieldKind::Text { min_len: 3 })
            .into();
        let err = validation
            .validate_for_create(&fields(json!({"code": "ab"})))
            .unwrap_err();
        assert_eq!(err.reason, "must be at least 3 characters");
    }
}
