use serde_json::{Map, Value};

use crate::{
    protocol::error::DecodeError,
    tree::{FeatureId, NodeId},
};

/// Typed field access on one JSON record, reporting failures against the
/// record's type name
pub(crate) struct RecordReader<'a> {
    record: &'a str,
    object: &'a Map<String, Value>,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(record: &'a str, object: &'a Map<String, Value>) -> Self {
        Self { record, object }
    }

    pub(crate) fn has(&self, field: &str) -> bool {
        self.object.contains_key(field)
    }

    pub(crate) fn value(&self, field: &'static str) -> Result<&'a Value, DecodeError> {
        self.object.get(field).ok_or_else(|| DecodeError::MissingField {
            record: self.record.to_string(),
            field,
        })
    }

    pub(crate) fn opt_value(&self, field: &'static str) -> Option<&'a Value> {
        self.object.get(field)
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<String, DecodeError> {
        self.value(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    pub(crate) fn opt_string(&self, field: &'static str) -> Result<Option<String>, DecodeError> {
        match self.object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.invalid(field, "a string")),
        }
    }

    pub(crate) fn integer(&self, field: &'static str) -> Result<i64, DecodeError> {
        let value = self.value(field)?;
        if let Some(int) = value.as_i64() {
            return Ok(int);
        }
        // Browsers send every number as a double
        match value.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => Ok(float as i64),
            _ => Err(self.invalid(field, "an integer")),
        }
    }

    pub(crate) fn usize(&self, field: &'static str) -> Result<usize, DecodeError> {
        let int = self.integer(field)?;
        usize::try_from(int).map_err(|_| self.invalid(field, "a non-negative integer"))
    }

    pub(crate) fn node_id(&self, field: &'static str) -> Result<NodeId, DecodeError> {
        let int = self.integer(field)?;
        u32::try_from(int)
            .map(NodeId::new)
            .map_err(|_| self.invalid(field, "a node id"))
    }

    pub(crate) fn feature_id(&self, field: &'static str) -> Result<FeatureId, DecodeError> {
        let int = self.integer(field)?;
        FeatureId::try_from(int).map_err(|_| self.invalid(field, "a feature id"))
    }

    pub(crate) fn bool_or_default(&self, field: &'static str) -> Result<bool, DecodeError> {
        match self.object.get(field) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::Number(number)) => Ok(number.as_f64().is_some_and(|n| n != 0.0)),
            Some(_) => Err(self.invalid(field, "a boolean")),
        }
    }

    pub(crate) fn array(&self, field: &'static str) -> Result<&'a Vec<Value>, DecodeError> {
        self.value(field)?
            .as_array()
            .ok_or_else(|| self.invalid(field, "an array"))
    }

    pub(crate) fn invalid(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::InvalidField {
            record: self.record.to_string(),
            field,
            expected,
        }
    }

    pub(crate) fn conflict(&self, first: &'static str, second: &'static str) -> DecodeError {
        DecodeError::ConflictingPayload {
            record: self.record.to_string(),
            first,
            second,
        }
    }
}

/// Splits a record into its type discriminator and its fields
pub(crate) fn record_type<'a>(
    what: &'static str,
    json: &'a Value,
) -> Result<(&'a str, &'a Map<String, Value>), DecodeError> {
    let object = json.as_object().ok_or(DecodeError::NotAnObject { what })?;
    let type_name = object
        .get(super::constants::TYPE)
        .ok_or_else(|| DecodeError::MissingField {
            record: what.to_string(),
            field: super::constants::TYPE,
        })?
        .as_str()
        .ok_or_else(|| DecodeError::InvalidField {
            record: what.to_string(),
            field: super::constants::TYPE,
            expected: "a string",
        })?;
    Ok((type_name, object))
}
