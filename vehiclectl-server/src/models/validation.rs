//! Payload validation primitives
//!
//! Request bodies arrive as raw JSON and are checked field by field, in
//! declaration order. The first failing field wins; later fields are not
//! inspected. Checks never touch the database.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

/// ASCII letters and digits only
static ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("invalid alphanumeric regex"));

/// Decimal number text, surrounding whitespace allowed (`" 2020 "`, `"2.02e3"`)
static NUMERIC_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?\s*$")
        .expect("invalid numeric text regex")
});

/// Validation error for request payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is not valid JSON
    Malformed { reason: String },

    /// Body is JSON but not an object
    NotObject,

    /// Field is absent
    Required { field: &'static str },

    /// Field is present but not a string
    NotString { field: &'static str },

    /// String field is empty
    Empty { field: &'static str },

    /// String shorter than the minimum length
    TooShort { field: &'static str, min: usize },

    /// String exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String contains characters outside `[A-Za-z0-9]`
    NotAlphanumeric { field: &'static str },

    /// Field is present but not a number
    NotNumber { field: &'static str },

    /// Number has a fractional part
    NotInteger { field: &'static str },

    /// Integer does not fit the column it is stored in
    OutOfRange { field: &'static str },

    /// Integer below the allowed minimum
    BelowMinimum { field: &'static str, min: i64 },

    /// Key that no field of the payload accepts
    UnknownField { field: String },

    /// Field-specific wording replacing the default message
    Described {
        field: &'static str,
        message: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Malformed { .. } | Self::NotObject => None,
            Self::UnknownField { field } => Some(field.as_str()),
            Self::Required { field }
            | Self::NotString { field }
            | Self::Empty { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::NotAlphanumeric { field }
            | Self::NotNumber { field }
            | Self::NotInteger { field }
            | Self::OutOfRange { field }
            | Self::BelowMinimum { field, .. }
            | Self::Described { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "invalid JSON body: {}", reason),
            Self::NotObject => write!(f, "\"value\" must be of type object"),
            Self::Required { field } => write!(f, "\"{}\" is required", field),
            Self::NotString { field } => write!(f, "\"{}\" must be a string", field),
            Self::Empty { field } => write!(f, "\"{}\" is not allowed to be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "\"{}\" length must be at least {} characters long", field, min)
            }
            Self::TooLong { field, max } => write!(
                f,
                "\"{}\" length must be less than or equal to {} characters long",
                field, max
            ),
            Self::NotAlphanumeric { field } => {
                write!(f, "\"{}\" must only contain alpha-numeric characters", field)
            }
            Self::NotNumber { field } => write!(f, "\"{}\" must be a number", field),
            Self::NotInteger { field } => write!(f, "\"{}\" must be an integer", field),
            Self::OutOfRange { field } => write!(f, "\"{}\" must be a safe number", field),
            Self::BelowMinimum { field, min } => {
                write!(f, "\"{}\" must be greater than or equal to {}", field, min)
            }
            Self::UnknownField { field } => write!(f, "\"{}\" is not allowed", field),
            Self::Described { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Typed payload built from a raw JSON body.
pub trait FromPayload: Sized {
    fn from_payload(body: &Value) -> Result<Self, ValidationError>;
}

/// Object view over a JSON body
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, ValidationError> {
        match body {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(ValidationError::NotObject),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field)
    }

    /// Reject keys outside `allowed`. Runs after the declared fields.
    pub fn deny_unknown(&self, allowed: &[&str]) -> Result<(), ValidationError> {
        match self.map.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(key) => Err(ValidationError::UnknownField { field: key.clone() }),
            None => Ok(()),
        }
    }
}

/// Which check a custom message replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    Empty,
    Min,
    Alphanumeric,
}

/// Required string field
#[derive(Debug, Clone)]
pub struct StringRule {
    field: &'static str,
    min: usize,
    max: Option<usize>,
    alphanumeric: bool,
    messages: Vec<(Check, &'static str)>,
}

impl StringRule {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            min: 0,
            max: None,
            alphanumeric: false,
            messages: Vec::new(),
        }
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn alphanumeric(mut self) -> Self {
        self.alphanumeric = true;
        self
    }

    /// Replace the default message for one check.
    pub fn message(mut self, check: Check, message: &'static str) -> Self {
        self.messages.push((check, message));
        self
    }

    fn fail(&self, check: Check, default: ValidationError) -> ValidationError {
        self.messages
            .iter()
            .find(|(c, _)| *c == check)
            .map(|&(_, message)| ValidationError::Described {
                field: self.field,
                message,
            })
            .unwrap_or(default)
    }

    pub fn check(&self, fields: &Fields<'_>) -> Result<String, ValidationError> {
        let field = self.field;
        let s = match fields.get(field) {
            None => {
                return Err(self.fail(Check::Required, ValidationError::Required { field }))
            }
            Some(Value::String(s)) => s,
            Some(_) => return Err(ValidationError::NotString { field }),
        };

        if s.is_empty() {
            return Err(self.fail(Check::Empty, ValidationError::Empty { field }));
        }

        if self.alphanumeric && !ALPHANUMERIC_RE.is_match(s) {
            return Err(self.fail(
                Check::Alphanumeric,
                ValidationError::NotAlphanumeric { field },
            ));
        }

        let len = s.chars().count();
        if len < self.min {
            return Err(self.fail(
                Check::Min,
                ValidationError::TooShort {
                    field,
                    min: self.min,
                },
            ));
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(ValidationError::TooLong { field, max });
            }
        }

        Ok(s.clone())
    }
}

/// Required integer field
///
/// Numbers and numeric strings are both accepted; `"2020"` converts to 2020.
#[derive(Debug, Clone, Copy)]
pub struct IntegerRule {
    field: &'static str,
    min: Option<i64>,
}

impl IntegerRule {
    pub fn new(field: &'static str) -> Self {
        Self { field, min: None }
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn check(&self, fields: &Fields<'_>) -> Result<i64, ValidationError> {
        let field = self.field;
        let n = match fields.get(field) {
            None => return Err(ValidationError::Required { field }),
            Some(Value::Number(n)) => as_integer(n, field)?,
            Some(Value::String(s)) if NUMERIC_TEXT_RE.is_match(s) => parse_integer(s, field)?,
            Some(_) => return Err(ValidationError::NotNumber { field }),
        };

        if let Some(min) = self.min {
            if n < min {
                return Err(ValidationError::BelowMinimum { field, min });
            }
        }

        Ok(n)
    }

    /// Same as [`IntegerRule::check`], narrowed to a 32-bit column.
    pub fn check_i32(&self, fields: &Fields<'_>) -> Result<i32, ValidationError> {
        let n = self.check(fields)?;
        i32::try_from(n).map_err(|_| ValidationError::OutOfRange { field: self.field })
    }
}

/// Accepts `2020` and `2020.0`, rejects `2020.5`.
fn as_integer(n: &Number, field: &'static str) -> Result<i64, ValidationError> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(ValidationError::OutOfRange { field });
    }
    match n.as_f64() {
        Some(f) => whole(f, field),
        None => Err(ValidationError::OutOfRange { field }),
    }
}

/// Numeric text to integer. Plain digits parse exactly; decimal and
/// exponent forms go through `f64` and must be whole.
fn parse_integer(text: &str, field: &'static str) -> Result<i64, ValidationError> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Ok(i);
    }
    match text.parse::<f64>() {
        Ok(f) => whole(f, field),
        Err(_) => Err(ValidationError::NotNumber { field }),
    }
}

fn whole(f: f64, field: &'static str) -> Result<i64, ValidationError> {
    if !f.is_finite() || f < i64::MIN as f64 || f > i64::MAX as f64 {
        Err(ValidationError::OutOfRange { field })
    } else if f.fract() != 0.0 {
        Err(ValidationError::NotInteger { field })
    } else {
        Ok(f as i64)
    }
}
