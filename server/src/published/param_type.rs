use std::fmt;

use serde_json::{Number, Value};

/// Declared type of a published method parameter. Decoding checks the
/// client supplied JSON against the type and normalizes numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    /// Integral number; integral doubles such as `65.0` are accepted
    Int,
    Double,
    String,
    /// Any JSON value, including null
    Json,
    /// The inner type, or null
    Nullable(Box<ParamType>),
    Array(Box<ParamType>),
}

impl ParamType {
    pub fn nullable(inner: ParamType) -> Self {
        ParamType::Nullable(Box::new(inner))
    }

    pub fn array(element: ParamType) -> Self {
        ParamType::Array(Box::new(element))
    }

    pub fn accepts_null(&self) -> bool {
        matches!(self, ParamType::Nullable(_) | ParamType::Json)
    }

    pub fn decode(&self, value: &Value) -> Result<Value, String> {
        if value.is_null() {
            return if self.accepts_null() {
                Ok(Value::Null)
            } else {
                Err(format!("null is not accepted for a {} parameter", self))
            };
        }

        match self {
            ParamType::Bool => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| self.mismatch(value)),
            ParamType::Int => {
                if let Some(int) = value.as_i64() {
                    return Ok(Value::from(int));
                }
                match value.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
                        Ok(Value::from(float as i64))
                    }
                    _ => Err(self.mismatch(value)),
                }
            }
            ParamType::Double => value
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.mismatch(value)),
            ParamType::String => value
                .as_str()
                .map(|string| Value::String(string.to_string()))
                .ok_or_else(|| self.mismatch(value)),
            ParamType::Json => Ok(value.clone()),
            ParamType::Nullable(inner) => inner.decode(value),
            ParamType::Array(element) => {
                let items = value.as_array().ok_or_else(|| self.mismatch(value))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        element
                            .decode(item)
                            .map_err(|reason| format!("item {}: {}", index, reason))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }

    fn mismatch(&self, value: &Value) -> String {
        format!("{} is not a valid {} value", value, self)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => write!(f, "bool"),
            ParamType::Int => write!(f, "int"),
            ParamType::Double => write!(f, "double"),
            ParamType::String => write!(f, "string"),
            ParamType::Json => write!(f, "json"),
            ParamType::Nullable(inner) => write!(f, "{}?", inner),
            ParamType::Array(element) => write!(f, "{}[]", element),
        }
    }
}
