//! Declarative request-body validation.
//!
//! A [`Schema`] is plain data: an ordered list of field names with their
//! [`FieldRule`]s, declared statically next to each endpoint. Validation
//! walks fields in declaration order and stops at the first failure, so the
//! error a caller sees for a multi-error body is deterministic. Fields
//! present in the input but not declared in the schema never reach the
//! output — undeclared input is dropped, not passed through.

use regex::Regex;
use serde_json::{Map, Value};

use tensorforge_types::ValidationError;

/// JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Constraints for one field.
///
/// `min`/`max` are character counts for strings and numeric bounds for
/// numbers. `pattern` is anchored on both ends when compiled.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field_type: FieldType,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    one_of: Option<&'static [&'static str]>,
    pattern: Option<Regex>,
}

impl FieldRule {
    fn new(field_type: FieldType) -> Self {
        Self { field_type, required: false, min: None, max: None, one_of: None, pattern: None }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.one_of = Some(allowed);
        self
    }

    /// Anchored regex the whole string must match. Schemas are declared in
    /// statics, so an invalid pattern is a startup-time panic, not a request
    /// failure.
    pub fn pattern(mut self, pattern: &str) -> Self {
        let anchored = format!("^(?:{})$", pattern);
        self.pattern = Some(Regex::new(&anchored).expect("field pattern is valid regex"));
        self
    }
}

/// Ordered field schema for one endpoint body.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    /// Validate an already-sanitized body against this schema.
    ///
    /// Returns the allow-listed fields on success, or the first failure in
    /// declaration order.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationError> {
        let object = input.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut data = Map::new();

        for (name, rule) in &self.fields {
            let value = object.get(*name);
            if is_absent(value) {
                if rule.required {
                    return Err(ValidationError::MissingField { field: name.to_string() });
                }
                continue;
            }
            let value = value.expect("checked by is_absent");

            if !rule.field_type.matches(value) {
                return Err(ValidationError::WrongType {
                    field: name.to_string(),
                    expected: rule.field_type.name().to_string(),
                });
            }

            match rule.field_type {
                FieldType::String => {
                    let s = value.as_str().expect("type checked above");
                    check_string(name, rule, s)?;
                }
                FieldType::Number => {
                    let n = value.as_f64().expect("type checked above");
                    check_number(name, rule, n)?;
                }
                FieldType::Boolean => {}
            }

            data.insert(name.to_string(), value.clone());
        }

        Ok(data)
    }
}

/// Absent, JSON null, and the empty string all count as "not provided".
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn check_string(name: &str, rule: &FieldRule, s: &str) -> Result<(), ValidationError> {
    let len = s.chars().count();
    if let Some(min) = rule.min {
        if len < min as usize {
            return Err(ValidationError::TooShort { field: name.to_string(), min: min as usize });
        }
    }
    if let Some(max) = rule.max {
        if len > max as usize {
            return Err(ValidationError::TooLong { field: name.to_string(), max: max as usize });
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(s) {
            return Err(ValidationError::PatternMismatch { field: name.to_string() });
        }
    }
    if let Some(allowed) = rule.one_of {
        if !allowed.iter().any(|candidate| *candidate == s) {
            return Err(ValidationError::NotInEnum {
                field: name.to_string(),
                allowed: allowed.join(", "),
            });
        }
    }
    Ok(())
}

fn check_number(name: &str, rule: &FieldRule, n: f64) -> Result<(), ValidationError> {
    if let Some(min) = rule.min {
        if n < min {
            return Err(ValidationError::BelowMinimum { field: name.to_string(), min });
        }
    }
    if let Some(max) = rule.max {
        if n > max {
            return Err(ValidationError::AboveMaximum { field: name.to_string(), max });
        }
    }
    Ok(())
}
